use std::io::Write;

use rand::Rng;

use crate::config::DrillConfig;
use crate::error::Result;
use crate::input::{read_confirmation, read_number, LineSource};
use crate::runtime::{Clock, RefreshTimer};
use crate::session::SessionState;
use crate::telemetry::TelemetrySink;
use crate::util::within_tolerance;

pub const CONTINUE_PROMPT: &str = "Would you like to continue solving exercises? (yes/no): ";
pub const NO_EXERCISES: &str = "No exercises generated based on current performance.";
pub const EVALUATING: &str = "Evaluating user performance...";
pub const GENERATING: &str = "Generating and solving exercises based on performance...";

/// Where the continuous practice loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillState {
    Build,
    Present,
    Evaluate,
    AskContinue,
    Done,
}

/// An accepted, timed and judged answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Answer {
    pub value: f64,
    pub elapsed_secs: f64,
    pub is_correct: bool,
}

/// Owns the session state and every collaborator a drill run talks to.
///
/// The quiz battery lives in `evaluator.rs` and the weak-area builder in
/// `adaptive.rs`; this file holds the shared prompt plumbing and the loop.
pub struct Drill<R, S, W, C, T> {
    pub(crate) config: DrillConfig,
    pub(crate) state: SessionState,
    pub(crate) rng: R,
    pub(crate) input: S,
    pub(crate) out: W,
    clock: C,
    pub(crate) sink: T,
    refresh: RefreshTimer,
}

impl<R, S, W, C, T> Drill<R, S, W, C, T>
where
    R: Rng,
    S: LineSource,
    W: Write,
    C: Clock,
    T: TelemetrySink,
{
    pub fn new(config: DrillConfig, rng: R, input: S, out: W, clock: C, sink: T) -> Self {
        let refresh = RefreshTimer::new(config.refresh_interval());
        Self {
            config,
            state: SessionState::new(),
            rng,
            input,
            out,
            clock,
            sink,
            refresh,
        }
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn input(&self) -> &S {
        &self.input
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// Whole program flow: one evaluation round, then the practice loop.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{EVALUATING}")?;
        self.evaluate_performance()?;

        writeln!(self.out, "{GENERATING}")?;
        self.run_continuous()
    }

    /// Drive the practice loop from `Build` until it reaches `Done`.
    pub fn run_continuous(&mut self) -> Result<()> {
        let mut state = DrillState::Build;
        while state != DrillState::Done {
            state = self.step(state)?;
        }
        tracing::info!(
            engagements = self.state.engagements().len(),
            exercises = self.state.exercises().len(),
            "practice loop finished"
        );
        Ok(())
    }

    /// Perform the work of `state` and return the state to move to.
    pub fn step(&mut self, state: DrillState) -> Result<DrillState> {
        tracing::debug!(?state, "drill step");
        match state {
            DrillState::Build => {
                if self.generate_exercises()? == 0 {
                    writeln!(self.out, "{NO_EXERCISES}")?;
                    Ok(DrillState::Done)
                } else {
                    Ok(DrillState::Present)
                }
            }
            DrillState::Present => {
                self.present_exercises()?;
                Ok(DrillState::Evaluate)
            }
            DrillState::Evaluate => {
                writeln!(self.out, "{EVALUATING}")?;
                self.evaluate_performance()?;
                Ok(DrillState::AskContinue)
            }
            DrillState::AskContinue => {
                if read_confirmation(&mut self.input, &mut self.out, CONTINUE_PROMPT)? {
                    Ok(DrillState::Build)
                } else {
                    Ok(DrillState::Done)
                }
            }
            DrillState::Done => Ok(DrillState::Done),
        }
    }

    /// Work through every exercise generated so far. Nothing is logged.
    pub fn present_exercises(&mut self) -> Result<()> {
        for idx in 0..self.state.exercises().len() {
            let exercise = self.state.exercises()[idx];
            self.ask(&exercise.expression(), exercise.answer)?;
        }
        Ok(())
    }

    /// Show one problem, wait for a number, time it and give feedback.
    pub(crate) fn ask(&mut self, expression: &str, correct_answer: f64) -> Result<Answer> {
        self.maybe_refresh()?;

        let started = self.clock.now();
        writeln!(self.out, "Solve: {expression}")?;
        let value = read_number(&mut self.input, &mut self.out)?;
        let elapsed_secs = self
            .clock
            .now()
            .saturating_duration_since(started)
            .as_secs_f64();

        let is_correct = within_tolerance(value, correct_answer, self.config.tolerance);
        if is_correct {
            writeln!(self.out, "Correct!")?;
        } else {
            writeln!(self.out, "Incorrect. The correct answer is {correct_answer:.2}")?;
        }

        Ok(Answer {
            value,
            elapsed_secs,
            is_correct,
        })
    }

    fn maybe_refresh(&mut self) -> Result<()> {
        if self.refresh.poll(self.clock.now()) {
            self.sink.refresh(&self.state.snapshot())?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::input::ScriptedSource;
    use crate::problem::{generate_problem, Operation, Problem};
    use crate::runtime::SteppingClock;
    use crate::telemetry::RecordingSink;

    pub const SEED: u64 = 2024;

    pub type TestDrill = Drill<StdRng, ScriptedSource, Vec<u8>, SteppingClock, RecordingSink>;

    pub fn test_drill(config: DrillConfig, answers: Vec<String>) -> TestDrill {
        Drill::new(
            config,
            StdRng::seed_from_u64(SEED),
            ScriptedSource::new(answers),
            Vec::new(),
            SteppingClock::new(Duration::from_secs(2)),
            RecordingSink::default(),
        )
    }

    /// Mirror of the generator stream the drill will see for the same seed
    pub fn mirror_rng() -> StdRng {
        StdRng::seed_from_u64(SEED)
    }

    /// The problems one evaluation round draws, in quiz order
    pub fn battery(rng: &mut StdRng, rounds: usize) -> Vec<Problem> {
        Operation::ALL
            .iter()
            .flat_map(|op| (0..rounds).map(move |_| *op))
            .map(|op| generate_problem(op, rng).unwrap())
            .collect()
    }

    pub fn right(answer: f64) -> String {
        format!("{answer}")
    }

    pub fn wrong(answer: f64) -> String {
        format!("{}", answer + 1.0)
    }

    pub fn output_text(drill: &TestDrill) -> String {
        String::from_utf8(drill.output().clone()).unwrap()
    }
}
