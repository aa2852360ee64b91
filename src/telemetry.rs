use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::session::{EngagementRecord, ExerciseRecord, SessionSnapshot};
use crate::ui;

pub const ENGAGEMENT_FILE: &str = "user_engagement_data.csv";
pub const EXERCISE_FILE: &str = "generated_exercises.csv";

pub const ENGAGEMENT_COLUMNS: [&str; 7] = [
    "Operand1",
    "Operand2",
    "Operation",
    "UserAnswer",
    "CorrectAnswer",
    "TimeTaken",
    "IsCorrect",
];
pub const EXERCISE_COLUMNS: [&str; 4] = ["Operand1", "Operand2", "Operation", "Answer"];

/// Consumer of drill results: file exports and live charts.
///
/// Every call receives the full accumulated list, never a delta.
pub trait TelemetrySink {
    fn export_engagements(&mut self, records: &[EngagementRecord]) -> Result<()>;

    fn export_exercises(&mut self, exercises: &[ExerciseRecord]) -> Result<()>;

    /// Periodic redraw hook; sinks without a display ignore it.
    fn refresh(&mut self, _snapshot: &SessionSnapshot<'_>) -> Result<()> {
        Ok(())
    }
}

impl<A: TelemetrySink, B: TelemetrySink> TelemetrySink for (A, B) {
    fn export_engagements(&mut self, records: &[EngagementRecord]) -> Result<()> {
        self.0.export_engagements(records)?;
        self.1.export_engagements(records)
    }

    fn export_exercises(&mut self, exercises: &[ExerciseRecord]) -> Result<()> {
        self.0.export_exercises(exercises)?;
        self.1.export_exercises(exercises)
    }

    fn refresh(&mut self, snapshot: &SessionSnapshot<'_>) -> Result<()> {
        self.0.refresh(snapshot)?;
        self.1.refresh(snapshot)
    }
}

impl<S: TelemetrySink> TelemetrySink for Option<S> {
    fn export_engagements(&mut self, records: &[EngagementRecord]) -> Result<()> {
        match self {
            Some(sink) => sink.export_engagements(records),
            None => Ok(()),
        }
    }

    fn export_exercises(&mut self, exercises: &[ExerciseRecord]) -> Result<()> {
        match self {
            Some(sink) => sink.export_exercises(exercises),
            None => Ok(()),
        }
    }

    fn refresh(&mut self, snapshot: &SessionSnapshot<'_>) -> Result<()> {
        match self {
            Some(sink) => sink.refresh(snapshot),
            None => Ok(()),
        }
    }
}

/// Overwrites the two CSV files in `dir` on every export
#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn engagement_path(&self) -> PathBuf {
        self.dir.join(ENGAGEMENT_FILE)
    }

    pub fn exercise_path(&self) -> PathBuf {
        self.dir.join(EXERCISE_FILE)
    }

    fn write_table<T: serde::Serialize>(&self, path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Header written by hand so an empty table still carries it.
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        wtr.write_record(columns)?;
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;

        tracing::debug!(path = %path.display(), rows = rows.len(), "exported table");
        Ok(())
    }
}

impl TelemetrySink for CsvExporter {
    fn export_engagements(&mut self, records: &[EngagementRecord]) -> Result<()> {
        self.write_table(&self.engagement_path(), &ENGAGEMENT_COLUMNS, records)
    }

    fn export_exercises(&mut self, exercises: &[ExerciseRecord]) -> Result<()> {
        self.write_table(&self.exercise_path(), &EXERCISE_COLUMNS, exercises)
    }
}

/// Prints a text rendering of the dashboard whenever the refresh timer fires
pub struct LiveChart<W: Write> {
    out: W,
    width: u16,
    height: u16,
}

impl<W: Write> LiveChart<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self { out, width, height }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TelemetrySink for LiveChart<W> {
    fn export_engagements(&mut self, _records: &[EngagementRecord]) -> Result<()> {
        Ok(())
    }

    fn export_exercises(&mut self, _exercises: &[ExerciseRecord]) -> Result<()> {
        Ok(())
    }

    fn refresh(&mut self, snapshot: &SessionSnapshot<'_>) -> Result<()> {
        let text = ui::render_text(snapshot, self.width, self.height);
        writeln!(self.out)?;
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps copies of everything it receives
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub engagement_exports: Vec<Vec<EngagementRecord>>,
    pub exercise_exports: Vec<Vec<ExerciseRecord>>,
    pub refreshes: usize,
}

impl RecordingSink {
    pub fn last_engagements(&self) -> &[EngagementRecord] {
        self.engagement_exports.last().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn last_exercises(&self) -> &[ExerciseRecord] {
        self.exercise_exports.last().map(Vec::as_slice).unwrap_or_default()
    }
}

impl TelemetrySink for RecordingSink {
    fn export_engagements(&mut self, records: &[EngagementRecord]) -> Result<()> {
        self.engagement_exports.push(records.to_vec());
        Ok(())
    }

    fn export_exercises(&mut self, exercises: &[ExerciseRecord]) -> Result<()> {
        self.exercise_exports.push(exercises.to_vec());
        Ok(())
    }

    fn refresh(&mut self, _snapshot: &SessionSnapshot<'_>) -> Result<()> {
        self.refreshes += 1;
        Ok(())
    }
}
