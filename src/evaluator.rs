use std::io::Write;

use rand::Rng;

use crate::drill::{Answer, Drill};
use crate::error::Result;
use crate::input::LineSource;
use crate::problem::{generate_problem, Operation};
use crate::runtime::Clock;
use crate::session::{EngagementRecord, OperationStats, PerformanceSummary};
use crate::telemetry::TelemetrySink;
use crate::util::{nominal_average, percentage};

/// Running totals for one operation within an evaluation round
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OperationTally {
    pub correct: usize,
    pub total_secs: f64,
}

impl OperationTally {
    pub fn record(&mut self, answer: &Answer) {
        self.total_secs += answer.elapsed_secs;
        if answer.is_correct {
            self.correct += 1;
        }
    }

    /// Both figures are over the configured round count, even if a round
    /// was skipped.
    pub fn finish(&self, rounds: usize) -> OperationStats {
        OperationStats {
            accuracy: percentage(self.correct, rounds),
            average_time_secs: nominal_average(self.total_secs, rounds),
        }
    }
}

impl<R, S, W, C, T> Drill<R, S, W, C, T>
where
    R: Rng,
    S: LineSource,
    W: Write,
    C: Clock,
    T: TelemetrySink,
{
    /// Run the full quiz battery and refresh the summary for all operations.
    ///
    /// Every answered question is appended to the engagement log, and the
    /// whole log is exported once the battery is done.
    pub fn evaluate_performance(&mut self) -> Result<PerformanceSummary> {
        let rounds = self.config.rounds;

        for operation in Operation::ALL {
            let mut tally = OperationTally::default();

            for _ in 0..rounds {
                let Some(problem) = generate_problem(operation, &mut self.rng) else {
                    tracing::warn!(%operation, "skipping problem with no valid answer");
                    continue;
                };

                let answer = self.ask(&problem.expression(), problem.correct_answer())?;
                tally.record(&answer);
                self.state.record_engagement(EngagementRecord::new(
                    &problem,
                    answer.value,
                    answer.elapsed_secs,
                    answer.is_correct,
                ));
            }

            let stats = tally.finish(rounds);
            tracing::info!(
                %operation,
                accuracy = stats.accuracy,
                average_time_secs = stats.average_time_secs,
                "operation scored"
            );
            self.state.set_stats(operation, stats);
        }

        self.sink.export_engagements(self.state.engagements())?;
        Ok(self.state.summary().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrillConfig;
    use crate::drill::testing::*;

    #[test]
    fn test_tally_accuracy_is_exact_for_every_score() {
        for c in 0..=10 {
            let tally = OperationTally { correct: c, total_secs: 0.0 };
            assert_eq!(tally.finish(10).accuracy, c as f64 * 10.0);
        }
    }

    #[test]
    fn test_tally_average_uses_nominal_round_count() {
        let mut tally = OperationTally::default();
        for _ in 0..8 {
            tally.record(&Answer { value: 1.0, elapsed_secs: 2.5, is_correct: true });
        }
        let stats = tally.finish(10);
        assert_eq!(stats.average_time_secs, 2.0);
        assert_eq!(stats.accuracy, 80.0);
    }

    #[test]
    fn test_accuracy_follows_correct_count() {
        for c in 0..=10usize {
            let mut mirror = mirror_rng();
            let mut seen = 0;
            let answers = battery(&mut mirror, 10)
                .iter()
                .map(|p| {
                    if p.operation() == Operation::Multiplication {
                        seen += 1;
                        if seen <= c {
                            return right(p.correct_answer());
                        }
                        return wrong(p.correct_answer());
                    }
                    right(p.correct_answer())
                })
                .collect();

            let mut drill = test_drill(DrillConfig::default(), answers);
            let summary = drill.evaluate_performance().unwrap();

            assert_eq!(summary.get(Operation::Multiplication).accuracy, c as f64 * 10.0);
            assert_eq!(summary.get(Operation::Addition).accuracy, 100.0);
        }
    }

    #[test]
    fn test_records_every_answer_and_exports_log() {
        let mut mirror = mirror_rng();
        let problems = battery(&mut mirror, 10);
        let answers = problems.iter().map(|p| wrong(p.correct_answer())).collect();
        let mut drill = test_drill(DrillConfig::default(), answers);

        let summary = drill.evaluate_performance().unwrap();

        let log = drill.state().engagements();
        assert_eq!(log.len(), 40);
        for (record, problem) in log.iter().zip(&problems) {
            assert_eq!(record.operand_a, problem.operand_a());
            assert_eq!(record.operand_b, problem.operand_b());
            assert_eq!(record.operation, problem.operation());
            assert_eq!(record.user_answer, problem.correct_answer() + 1.0);
            assert_eq!(record.elapsed_seconds, 2.0);
            assert!(!record.is_correct);
        }
        for (_, stats) in summary.iter() {
            assert_eq!(stats.accuracy, 0.0);
            assert_eq!(stats.average_time_secs, 2.0);
        }
        assert_eq!(drill.sink().last_engagements(), log);
    }

    #[test]
    fn test_log_accumulates_across_rounds() {
        let mut mirror = mirror_rng();
        let mut answers: Vec<String> = battery(&mut mirror, 3)
            .iter()
            .map(|p| right(p.correct_answer()))
            .collect();
        answers.extend(battery(&mut mirror, 3).iter().map(|p| right(p.correct_answer())));

        let config = DrillConfig { rounds: 3, ..DrillConfig::default() };
        let mut drill = test_drill(config, answers);

        drill.evaluate_performance().unwrap();
        drill.evaluate_performance().unwrap();

        assert_eq!(drill.state().engagements().len(), 24);
        assert_eq!(drill.sink().engagement_exports[0].len(), 12);
        assert_eq!(drill.sink().engagement_exports[1].len(), 24);
    }

    #[test]
    fn test_invalid_answers_are_not_counted_as_attempts() {
        let mut mirror = mirror_rng();
        let mut answers = Vec::new();
        for p in battery(&mut mirror, 1) {
            answers.push("?".to_string());
            answers.push(right(p.correct_answer()));
        }
        let config = DrillConfig { rounds: 1, ..DrillConfig::default() };
        let mut drill = test_drill(config, answers);

        let summary = drill.evaluate_performance().unwrap();

        assert_eq!(drill.state().engagements().len(), 4);
        assert!(summary.iter().all(|(_, s)| s.accuracy == 100.0));
    }
}
