use crate::session::{EngagementRecord, PerformanceSummary};

/// X (seconds) and Y (user answer) bounds for the engagement scatter.
///
/// The time axis always spans at least one second; the answer axis always
/// includes zero so negative answers stay on screen.
pub fn compute_scatter_bounds(records: &[EngagementRecord]) -> ([f64; 2], [f64; 2]) {
    let mut max_time: f64 = 1.0;
    let mut min_answer: f64 = 0.0;
    let mut max_answer: f64 = 1.0;

    for r in records {
        max_time = max_time.max(r.elapsed_seconds);
        min_answer = min_answer.min(r.user_answer);
        max_answer = max_answer.max(r.user_answer);
    }

    ([0.0, max_time.ceil()], [min_answer.floor(), max_answer.ceil()])
}

/// Upper bound for the average-time line, at least one second
pub fn compute_time_bound(summary: &PerformanceSummary) -> f64 {
    summary
        .iter()
        .map(|(_, s)| s.average_time_secs)
        .fold(1.0_f64, f64::max)
        .ceil()
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Operation, Problem};
    use crate::session::OperationStats;

    fn record(answer: f64, secs: f64) -> EngagementRecord {
        let p = Problem::new(1, 1, Operation::Subtraction).unwrap();
        EngagementRecord::new(&p, answer, secs, false)
    }

    #[test]
    fn test_scatter_bounds_empty() {
        assert_eq!(compute_scatter_bounds(&[]), ([0.0, 1.0], [0.0, 1.0]));
    }

    #[test]
    fn test_scatter_bounds_cover_negative_answers() {
        let records = [record(-42.5, 3.2), record(120.0, 0.4)];
        assert_eq!(compute_scatter_bounds(&records), ([0.0, 4.0], [-43.0, 120.0]));
    }

    #[test]
    fn test_time_bound() {
        let mut summary = PerformanceSummary::default();
        assert_eq!(compute_time_bound(&summary), 1.0);

        summary.set(Operation::Division, OperationStats { accuracy: 10.0, average_time_secs: 6.3 });
        assert_eq!(compute_time_bound(&summary), 7.0);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
        assert_eq!(format_label(-3.0), "-3");
    }
}
