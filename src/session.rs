use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::problem::{format_expression, Operation, Problem};

/// One answered quiz question. Never changed after it is logged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementRecord {
    #[serde(rename = "Operand1")]
    pub operand_a: u32,
    #[serde(rename = "Operand2")]
    pub operand_b: u32,
    #[serde(rename = "Operation")]
    pub operation: Operation,
    #[serde(rename = "UserAnswer")]
    pub user_answer: f64,
    #[serde(rename = "CorrectAnswer")]
    pub correct_answer: f64,
    #[serde(rename = "TimeTaken")]
    pub elapsed_seconds: f64,
    #[serde(rename = "IsCorrect")]
    pub is_correct: bool,
    #[serde(skip)]
    pub answered_at: DateTime<Local>,
}

impl EngagementRecord {
    pub fn new(problem: &Problem, user_answer: f64, elapsed_seconds: f64, is_correct: bool) -> Self {
        Self {
            operand_a: problem.operand_a(),
            operand_b: problem.operand_b(),
            operation: problem.operation(),
            user_answer,
            correct_answer: problem.correct_answer(),
            elapsed_seconds: elapsed_seconds.max(0.0),
            is_correct,
            answered_at: Local::now(),
        }
    }
}

/// A generated practice problem for a weak operation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExerciseRecord {
    #[serde(rename = "Operand1")]
    pub operand_a: u32,
    #[serde(rename = "Operand2")]
    pub operand_b: u32,
    #[serde(rename = "Operation")]
    pub operation: Operation,
    #[serde(rename = "Answer")]
    pub answer: f64,
}

impl ExerciseRecord {
    pub fn expression(&self) -> String {
        format_expression(self.operand_a, self.operand_b, self.operation)
    }
}

impl From<&Problem> for ExerciseRecord {
    fn from(p: &Problem) -> Self {
        Self {
            operand_a: p.operand_a(),
            operand_b: p.operand_b(),
            operation: p.operation(),
            answer: p.correct_answer(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OperationStats {
    /// Percentage in `[0, 100]`
    pub accuracy: f64,
    pub average_time_secs: f64,
}

/// Latest accuracy and speed per operation; all four keys are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    stats: BTreeMap<Operation, OperationStats>,
}

impl Default for PerformanceSummary {
    fn default() -> Self {
        Self {
            stats: Operation::ALL
                .iter()
                .map(|op| (*op, OperationStats::default()))
                .collect(),
        }
    }
}

impl PerformanceSummary {
    pub fn get(&self, operation: Operation) -> OperationStats {
        self.stats.get(&operation).copied().unwrap_or_default()
    }

    pub fn set(&mut self, operation: Operation, stats: OperationStats) {
        self.stats.insert(operation, stats);
    }

    /// Entries in quiz order
    pub fn iter(&self) -> impl Iterator<Item = (Operation, OperationStats)> + '_ {
        self.stats.iter().map(|(op, s)| (*op, *s))
    }

    /// Operations whose accuracy is strictly below `threshold`
    pub fn weak_operations(&self, threshold: f64) -> Vec<Operation> {
        self.iter()
            .filter(|(_, s)| s.accuracy < threshold)
            .map(|(op, _)| op)
            .collect()
    }
}

/// Everything a drill run accumulates.
///
/// Both logs only ever grow for the lifetime of the value; the summary is
/// overwritten operation by operation on every evaluation round.
#[derive(Debug, Default)]
pub struct SessionState {
    engagements: Vec<EngagementRecord>,
    exercises: Vec<ExerciseRecord>,
    summary: PerformanceSummary,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_engagement(&mut self, record: EngagementRecord) {
        self.engagements.push(record);
    }

    pub fn add_exercise(&mut self, exercise: ExerciseRecord) {
        self.exercises.push(exercise);
    }

    pub fn set_stats(&mut self, operation: Operation, stats: OperationStats) {
        self.summary.set(operation, stats);
    }

    pub fn engagements(&self) -> &[EngagementRecord] {
        &self.engagements
    }

    pub fn exercises(&self) -> &[ExerciseRecord] {
        &self.exercises
    }

    pub fn summary(&self) -> &PerformanceSummary {
        &self.summary
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            engagements: &self.engagements,
            exercises: &self.exercises,
            summary: &self.summary,
        }
    }
}

/// Read-only view handed to telemetry sinks and the dashboard
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot<'a> {
    pub engagements: &'a [EngagementRecord],
    pub exercises: &'a [ExerciseRecord],
    pub summary: &'a PerformanceSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_default_has_all_operations() {
        let summary = PerformanceSummary::default();
        let ops: Vec<Operation> = summary.iter().map(|(op, _)| op).collect();
        assert_eq!(ops, Operation::ALL.to_vec());
        assert!(summary.iter().all(|(_, s)| s == OperationStats::default()));
    }

    #[test]
    fn test_weak_operations_threshold_is_strict() {
        let mut summary = PerformanceSummary::default();
        summary.set(Operation::Addition, OperationStats { accuracy: 50.0, average_time_secs: 1.0 });
        summary.set(Operation::Subtraction, OperationStats { accuracy: 40.0, average_time_secs: 1.0 });
        summary.set(Operation::Multiplication, OperationStats { accuracy: 90.0, average_time_secs: 1.0 });
        summary.set(Operation::Division, OperationStats { accuracy: 49.9, average_time_secs: 1.0 });

        assert_eq!(
            summary.weak_operations(50.0),
            vec![Operation::Subtraction, Operation::Division]
        );
    }

    #[test]
    fn test_engagement_record_from_problem() {
        let problem = Problem::new(7, 2, Operation::Division).unwrap();
        let record = EngagementRecord::new(&problem, 3.49, 1.25, false);

        assert_eq!(record.operand_a, 7);
        assert_eq!(record.operand_b, 2);
        assert_eq!(record.operation, Operation::Division);
        assert_eq!(record.correct_answer, 3.5);
        assert_eq!(record.elapsed_seconds, 1.25);
        assert!(!record.is_correct);
    }

    #[test]
    fn test_exercise_record_expression() {
        let problem = Problem::new(12, 4, Operation::Multiplication).unwrap();
        let exercise = ExerciseRecord::from(&problem);
        assert_eq!(exercise.expression(), "12 * 4");
        assert_eq!(exercise.answer, 48.0);
    }

    #[test]
    fn test_session_state_accumulates() {
        let mut state = SessionState::new();
        let problem = Problem::new(1, 2, Operation::Addition).unwrap();

        state.record_engagement(EngagementRecord::new(&problem, 3.0, 0.5, true));
        state.record_engagement(EngagementRecord::new(&problem, 4.0, 0.7, false));
        state.add_exercise(ExerciseRecord::from(&problem));

        let snap = state.snapshot();
        assert_eq!(snap.engagements.len(), 2);
        assert_eq!(snap.exercises.len(), 1);
        assert_eq!(snap.summary.get(Operation::Addition), OperationStats::default());
    }
}
