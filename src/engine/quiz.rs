//! Quiz engine
//!
//! Ten answer slots with overwrite semantics, a one-way submit, and a
//! topic-supplied pass threshold. Submission without a reset in between
//! is a no-op, never an error.

use serde::{Deserialize, Serialize};

use crate::consts::QUIZ_LEN;
use crate::engine::progress::AnswerId;
use crate::topic::Question;

/// Result of a quiz submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub score: u8,
    pub total: u8,
    pub passed: bool,
}

/// Holds the ten question/answer slots and the submitted score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizEngine {
    answers: [Option<AnswerId>; QUIZ_LEN],
    submitted: bool,
    score: u8,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEngine {
    pub fn new() -> Self {
        Self {
            answers: [const { None }; QUIZ_LEN],
            submitted: false,
            score: 0,
        }
    }

    /// Record (or replace) the answer for one question. Answers are frozen
    /// once the quiz has been submitted; out-of-range indices are ignored.
    pub fn set_answer(&mut self, question_index: usize, option_id: &str) -> bool {
        if self.submitted {
            log::debug!("answer after submission ignored (question {question_index})");
            return false;
        }
        let Some(slot) = self.answers.get_mut(question_index) else {
            log::debug!("question index {question_index} out of range");
            return false;
        };
        *slot = Some(option_id.to_owned());
        true
    }

    /// The recorded answer for one question, if any
    pub fn answer(&self, question_index: usize) -> Option<&str> {
        self.answers.get(question_index)?.as_deref()
    }

    /// Number of answered slots
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// True iff no slot is unset
    pub fn all_answered(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Score from the last submission (0 until submitted)
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Whether the last submission met the threshold
    pub fn passed(&self, pass_threshold: u8) -> bool {
        self.submitted && self.score >= pass_threshold
    }

    /// Grade the answers against the questions' correct options and freeze
    /// the quiz. One-way: returns `None` (no-op) if already submitted or if
    /// any slot is still unset.
    pub fn submit(&mut self, questions: &[Question], pass_threshold: u8) -> Option<QuizOutcome> {
        if self.submitted {
            log::debug!("quiz already submitted, ignoring");
            return None;
        }
        if !self.all_answered() {
            log::debug!(
                "quiz submit with {}/{} answered, ignoring",
                self.answered_count(),
                QUIZ_LEN
            );
            return None;
        }

        let score = questions
            .iter()
            .zip(self.answers.iter())
            .filter(|(q, a)| q.correct_option() == a.as_deref())
            .count()
            .min(u8::MAX as usize) as u8;

        self.score = score;
        self.submitted = true;

        let total = questions.len().min(u8::MAX as usize) as u8;
        let outcome = QuizOutcome {
            score,
            total,
            passed: score >= pass_threshold,
        };
        log::info!(
            "quiz submitted: {}/{} ({})",
            outcome.score,
            outcome.total,
            if outcome.passed { "passed" } else { "failed" }
        );
        Some(outcome)
    }

    /// Clear all answers, the score, and the submitted flag. The only way
    /// to make the quiz submittable again.
    pub fn reset(&mut self) {
        self.answers = [const { None }; QUIZ_LEN];
        self.submitted = false;
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics;
    use proptest::prelude::*;

    fn questions() -> Vec<Question> {
        topics::disk::topic().questions
    }

    fn correct_id(q: &Question) -> String {
        q.correct_option().expect("well-formed question").to_owned()
    }

    fn wrong_id(q: &Question) -> String {
        q.options
            .iter()
            .find(|o| !o.is_correct)
            .expect("question has a wrong option")
            .id
            .clone()
    }

    #[test]
    fn test_all_correct_scores_ten() {
        let questions = questions();
        let mut quiz = QuizEngine::new();
        for (i, q) in questions.iter().enumerate() {
            quiz.set_answer(i, &correct_id(q));
        }
        let outcome = quiz.submit(&questions, 7).expect("submits");
        assert_eq!(outcome.score, 10);
        assert!(outcome.passed);
    }

    #[test]
    fn test_incomplete_submit_is_noop() {
        let questions = questions();
        let mut quiz = QuizEngine::new();
        quiz.set_answer(0, &correct_id(&questions[0]));
        assert!(!quiz.all_answered());
        assert!(quiz.submit(&questions, 7).is_none());
        assert!(!quiz.is_submitted());
    }

    #[test]
    fn test_resubmit_is_noop() {
        let questions = questions();
        let mut quiz = QuizEngine::new();
        for (i, q) in questions.iter().enumerate() {
            quiz.set_answer(i, &correct_id(q));
        }
        assert!(quiz.submit(&questions, 7).is_some());
        assert!(quiz.submit(&questions, 7).is_none());
        assert_eq!(quiz.score(), 10);
    }

    #[test]
    fn test_answers_frozen_after_submit() {
        let questions = questions();
        let mut quiz = QuizEngine::new();
        for (i, q) in questions.iter().enumerate() {
            quiz.set_answer(i, &wrong_id(q));
        }
        quiz.submit(&questions, 7).expect("submits");
        assert_eq!(quiz.score(), 0);
        assert!(!quiz.set_answer(0, &correct_id(&questions[0])));
        assert_eq!(quiz.answer(0), Some(wrong_id(&questions[0]).as_str()));
    }

    #[test]
    fn test_overwrite_before_submit() {
        let questions = questions();
        let mut quiz = QuizEngine::new();
        quiz.set_answer(0, &wrong_id(&questions[0]));
        quiz.set_answer(0, &correct_id(&questions[0]));
        for (i, q) in questions.iter().enumerate().skip(1) {
            quiz.set_answer(i, &wrong_id(q));
        }
        let outcome = quiz.submit(&questions, 7).expect("submits");
        assert_eq!(outcome.score, 1);
        assert!(!outcome.passed);
    }

    #[test]
    fn test_pass_threshold_boundary() {
        let questions = questions();
        for (num_correct, expect_pass) in [(6u8, false), (7u8, true)] {
            let mut quiz = QuizEngine::new();
            for (i, q) in questions.iter().enumerate() {
                if i < num_correct as usize {
                    quiz.set_answer(i, &correct_id(q));
                } else {
                    quiz.set_answer(i, &wrong_id(q));
                }
            }
            let outcome = quiz.submit(&questions, 7).expect("submits");
            assert_eq!(outcome.score, num_correct);
            assert_eq!(outcome.passed, expect_pass);
            assert_eq!(quiz.passed(7), expect_pass);
        }
    }

    #[test]
    fn test_reset_allows_resubmission() {
        let questions = questions();
        let mut quiz = QuizEngine::new();
        for (i, q) in questions.iter().enumerate() {
            quiz.set_answer(i, &wrong_id(q));
        }
        quiz.submit(&questions, 7).expect("submits");

        quiz.reset();
        assert!(!quiz.is_submitted());
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.answered_count(), 0);

        for (i, q) in questions.iter().enumerate() {
            quiz.set_answer(i, &correct_id(q));
        }
        let outcome = quiz.submit(&questions, 7).expect("resubmits after reset");
        assert_eq!(outcome.score, 10);
    }

    proptest! {
        /// The score depends only on the final answer per slot, never on
        /// the order the answers were entered in.
        #[test]
        fn prop_score_invariant_under_entry_order(
            order in proptest::collection::vec(0usize..10, 10..40),
        ) {
            let questions = questions();

            // Reference: answer in index order, correct on even indices
            let final_answer = |i: usize| -> String {
                if i % 2 == 0 { correct_id(&questions[i]) } else { wrong_id(&questions[i]) }
            };

            let mut reference = QuizEngine::new();
            for i in 0..10 {
                reference.set_answer(i, &final_answer(i));
            }

            // Shuffled: scribble arbitrary interim answers, then settle each
            // slot on the same final answer in an arbitrary order
            let mut shuffled = QuizEngine::new();
            for &i in &order {
                shuffled.set_answer(i, &wrong_id(&questions[i]));
            }
            let mut settle: Vec<usize> = (0..10).collect();
            settle.rotate_left(order.len() % 10);
            for &i in &settle {
                shuffled.set_answer(i, &final_answer(i));
            }

            let a = reference.submit(&questions, 7).expect("reference submits");
            let b = shuffled.submit(&questions, 7).expect("shuffled submits");
            prop_assert_eq!(a.score, b.score);
        }
    }
}
