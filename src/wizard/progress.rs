//! Wizard header progress calculation.

/// How far into the sequence the user is, counting the question on screen.
///
/// This is a navigation-position indicator: moving forward without
/// answering still advances it. The answer-count `progress` stored on the
/// document after a sync is computed separately by the gateway client, and
/// the two must not be conflated.
pub fn wizard_progress(current_question: usize, total_questions: usize) -> f64 {
    if total_questions == 0 {
        return 0.0;
    }
    ((current_question + 1) as f64 / total_questions as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_is_zero() {
        assert_eq!(wizard_progress(0, 0), 0.0);
        assert_eq!(wizard_progress(5, 0), 0.0);
    }

    #[test]
    fn counts_the_question_on_screen() {
        assert_eq!(wizard_progress(0, 4), 25.0);
        assert_eq!(wizard_progress(1, 4), 50.0);
        assert_eq!(wizard_progress(3, 4), 100.0);
    }

    #[test]
    fn monotonically_non_decreasing_in_position() {
        let total = 7;
        let mut previous = 0.0;
        for position in 0..total {
            let current = wizard_progress(position, total);
            assert!(current >= previous);
            previous = current;
        }
    }
}
