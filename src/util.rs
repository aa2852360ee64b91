// Ulps of subtraction noise absorbed at the boundary:
// 3.5 - 3.49 == 0.009999999999999787 must still count as exactly 0.01 off.
const NOISE_ULPS: f64 = 4.0;

/// Strict tolerance check: a difference of exactly `tolerance` is wrong.
///
/// Only rounding noise on the operands' scale is treated as "on the boundary";
/// any genuinely smaller difference is accepted.
pub fn within_tolerance(user_answer: f64, correct_answer: f64, tolerance: f64) -> bool {
    let scale = user_answer.abs().max(correct_answer.abs()).max(1.0);
    let noise = f64::EPSILON * scale * NOISE_ULPS;
    (user_answer - correct_answer).abs() < tolerance - noise
}

/// `count` out of `total` as a percentage in `[0, 100]`.
pub fn percentage(count: usize, total: usize) -> f64 {
    match total {
        positive if positive > 0 => (count as f64 * 100.0) / total as f64,
        _ => 0.0,
    }
}

/// Average over a nominal count rather than the number of samples taken.
pub fn nominal_average(total: f64, nominal_count: usize) -> f64 {
    match nominal_count {
        positive if positive > 0 => total / nominal_count as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_tolerance_exact() {
        assert!(within_tolerance(82.0, 82.0, 0.01));
    }

    #[test]
    fn test_within_tolerance_boundary_is_excluded() {
        assert!(!within_tolerance(3.49, 3.5, 0.01));
        assert!(!within_tolerance(1.01, 1.0, 0.01));
        assert!(!within_tolerance(0.0, 0.01, 0.01));
    }

    #[test]
    fn test_within_tolerance_just_inside() {
        assert!(within_tolerance(3.5099, 3.5, 0.01));
        assert!(within_tolerance(3.4901, 3.5, 0.01));
        assert!(within_tolerance(0.33, 1.0 / 3.0, 0.01));
    }

    #[test]
    fn test_within_tolerance_accepts_differences_just_under() {
        assert!(within_tolerance(3.5099999999, 3.5, 0.01));
        assert!(within_tolerance(3.4900000001, 3.5, 0.01));
        assert!(within_tolerance(100.0099999, 100.0, 0.01));
        assert!(!within_tolerance(100.01, 100.0, 0.01));
    }

    #[test]
    fn test_within_tolerance_negative_answers() {
        assert!(within_tolerance(-7.0, -7.0, 0.01));
        assert!(!within_tolerance(7.0, -7.0, 0.01));
    }

    #[test]
    fn test_percentage_is_exact_for_ten_rounds() {
        for c in 0..=10 {
            assert_eq!(percentage(c, 10), c as f64 * 10.0);
        }
    }

    #[test]
    fn test_percentage_empty_total() {
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_nominal_average() {
        assert_eq!(nominal_average(25.0, 10), 2.5);
        assert_eq!(nominal_average(0.0, 10), 0.0);
        assert_eq!(nominal_average(3.0, 0), 0.0);
    }
}
