use std::io::Write;

use rand::Rng;

use crate::drill::Drill;
use crate::error::Result;
use crate::input::LineSource;
use crate::problem::{generate_problem, Operation};
use crate::runtime::Clock;
use crate::session::ExerciseRecord;
use crate::telemetry::TelemetrySink;

/// Up to `count` practice problems for `operation`; failed draws are dropped.
pub fn exercises_for<R: Rng + ?Sized>(
    operation: Operation,
    count: usize,
    rng: &mut R,
) -> Vec<ExerciseRecord> {
    (0..count)
        .filter_map(|_| generate_problem(operation, rng))
        .map(|p| ExerciseRecord::from(&p))
        .collect()
}

impl<R, S, W, C, T> Drill<R, S, W, C, T>
where
    R: Rng,
    S: LineSource,
    W: Write,
    C: Clock,
    T: TelemetrySink,
{
    /// Add practice problems for every operation under the weak threshold.
    ///
    /// Exercises are appended to the running list, which is exported whole.
    /// Returns how many were added by this call.
    pub fn generate_exercises(&mut self) -> Result<usize> {
        let weak = self
            .state
            .summary()
            .weak_operations(self.config.weak_threshold);

        let mut produced = 0;
        for operation in weak {
            writeln!(self.out, "Generating exercises for {operation}...")?;
            for exercise in exercises_for(operation, self.config.extra_exercises, &mut self.rng) {
                self.state.add_exercise(exercise);
                produced += 1;
            }
        }

        tracing::info!(produced, total = self.state.exercises().len(), "exercises generated");
        self.sink.export_exercises(self.state.exercises())?;
        Ok(produced)
    }
}
