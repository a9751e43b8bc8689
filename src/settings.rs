use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::bank::QuestionBank;

/// Quiz generation settings, finalized by the settings step before a session
/// starts. Consumed by `session::draw_questions` and `QuizSession::new`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Settings {
    pub number_of_questions: usize,
    pub shuffle_questions: bool,
    pub shuffle_answers: bool,
    pub show_answer_after_each: bool,
    pub selected_titles: HashSet<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            number_of_questions: 1,
            shuffle_questions: true,
            shuffle_answers: true,
            show_answer_after_each: true,
            selected_titles: HashSet::new(),
        }
    }
}

impl Settings {
    /// Settings that select every title and the whole question pool.
    pub fn for_bank(bank: &QuestionBank) -> Self {
        Settings {
            number_of_questions: bank.len(),
            selected_titles: bank.titles().iter().cloned().collect(),
            ..Default::default()
        }
    }
}
