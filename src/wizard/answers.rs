//! Position-indexed answer buffering and translation to identity-keyed form.
//!
//! While a wizard session is open, answers are keyed by the question's
//! ordinal in the currently loaded sequence — the buffer can exist before
//! the full question list is known. Ordinals are not stable across
//! template edits, so the buffer is translated to a question-id-keyed map
//! before it is treated as durable truth.

use crate::api::models::Question;
use std::collections::{BTreeMap, HashMap};

/// In-progress answers keyed by ordinal position. Only meaningful alongside
/// the question sequence that produced the ordinals.
pub type AnswerBuffer = BTreeMap<usize, String>;

/// Translate a position-indexed buffer into the identity-keyed answer map.
///
/// Ordinals with no entry in `questions` (the sequence shrank since the
/// answer was typed) cannot be attributed to a question and are dropped;
/// that is not an error.
pub fn answers_by_question_id(
    buffer: &AnswerBuffer,
    questions: &[Question],
) -> HashMap<String, String> {
    buffer
        .iter()
        .filter_map(|(ordinal, value)| {
            questions
                .get(*ordinal)
                .map(|question| (question.id.clone(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            domain: "Safety".to_string(),
            risk_type: "Operational".to_string(),
            iso_reference: "ISO 14971".to_string(),
        }
    }

    #[test]
    fn maps_ordinals_to_question_ids() {
        let questions = vec![question("q-a"), question("q-b"), question("q-c")];
        let buffer: AnswerBuffer =
            [(0, "first".to_string()), (2, "third".to_string())].into();

        let map = answers_by_question_id(&buffer, &questions);

        assert_eq!(map.len(), 2);
        assert_eq!(map["q-a"], "first");
        assert_eq!(map["q-c"], "third");
    }

    #[test]
    fn drops_ordinals_past_the_sequence() {
        let questions = vec![question("q-a")];
        let buffer: AnswerBuffer =
            [(0, "kept".to_string()), (7, "orphaned".to_string())].into();

        let map = answers_by_question_id(&buffer, &questions);

        assert_eq!(map.len(), 1);
        assert_eq!(map["q-a"], "kept");
    }

    #[test]
    fn empty_buffer_yields_empty_map() {
        let questions = vec![question("q-a")];
        assert!(answers_by_question_id(&AnswerBuffer::new(), &questions).is_empty());
    }
}
