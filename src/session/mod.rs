use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::bank::{Label, Question};
use crate::error::QuizError;

pub mod shuffle;

pub use self::shuffle::{draw_questions, shuffle_options};

#[cfg(test)]
mod tests;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
enum Phase {
    Answering,
    Checked,
    Submitted(ScoreSummary),
}

/// Final session score: exact set-equality per question, no partial credit,
/// with a per-title breakdown.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub score: usize,
    pub total: usize,
    pub by_topic: BTreeMap<String, TopicScore>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TopicScore {
    pub score: usize,
    pub total: usize,
}

impl ScoreSummary {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.score as f32 / self.total as f32 * 100.0).round() as u32
    }

    pub fn appraisal(&self) -> &'static str {
        match self.percent() {
            100 => "Perfect score! Congratulations!",
            80..=99 => "Great job! You did excellently!",
            60..=79 => "Good effort! You're on the right track.",
            40..=59 => "Not bad, but there's room for improvement.",
            _ => "Keep practicing, you'll get better!",
        }
    }
}

/// What the learner gets to see right after checking a question, when the
/// show-answer-after-each policy is on.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback<'a> {
    pub is_correct: bool,
    pub correct_answer: &'a BTreeSet<Label>,
    pub explanation: &'a str,
}

/// One entry of the post-submission review sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewEntry<'a> {
    pub question: &'a Question,
    pub selected: &'a BTreeSet<Label>,
}

/// One learner's attempt at a fixed ordered question sequence. The host owns
/// the single mutable slot; every operation runs to completion and leaves the
/// session in a consistent state.
///
/// The question sequence must not be empty; `draw_questions` never produces
/// one.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct QuizSession {
    questions: Vec<Question>,
    selections: Vec<BTreeSet<Label>>,
    current_index: usize,
    phase: Phase,
    show_answer_after_each: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, show_answer_after_each: bool) -> QuizSession {
        let selections = vec![BTreeSet::new(); questions.len()];
        QuizSession {
            questions,
            selections,
            current_index: 0,
            phase: Phase::Answering,
            show_answer_after_each,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn current_selection(&self) -> &BTreeSet<Label> {
        &self.selections[self.current_index]
    }

    pub fn is_checked(&self) -> bool {
        self.phase == Phase::Checked
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, Phase::Submitted(_))
    }

    /// Raw progress percentage. Derived from the 0-based index, so it tops
    /// out at `(N-1)/N × 100` while the last question is on screen.
    pub fn progress(&self) -> f32 {
        self.current_index as f32 / self.questions.len() as f32 * 100.0
    }

    /// Selects or toggles an option on the current question. Single-select
    /// questions replace the previous choice; multi-select questions toggle,
    /// capped at the correct-answer cardinality. Frozen once the question is
    /// checked or the session submitted.
    pub fn select_answer(&mut self, label: Label) -> Result<(), QuizError> {
        if self.phase != Phase::Answering {
            return Ok(());
        }
        if label.index() >= self.current_question().options.len() {
            return Err(QuizError::UnknownLabel { label });
        }

        let cardinality = self.current_question().cardinality();
        let selection = &mut self.selections[self.current_index];
        if cardinality == 1 {
            selection.clear();
            selection.insert(label);
        } else if selection.contains(&label) {
            selection.remove(&label);
        } else if selection.len() < cardinality {
            selection.insert(label);
        } else {
            return Err(QuizError::TooManySelections { limit: cardinality });
        }
        Ok(())
    }

    /// Locks the current question and reveals its overlay. Requires the
    /// selection count to match the correct-answer cardinality exactly.
    pub fn check(&mut self) -> Result<(), QuizError> {
        if self.phase != Phase::Answering {
            return Ok(());
        }
        let expected = self.current_question().cardinality();
        let selected = self.current_selection().len();
        if selected != expected {
            return Err(QuizError::WrongSelectionCount { expected, selected });
        }
        self.phase = Phase::Checked;
        Ok(())
    }

    /// While answering, behaves as `check`. While checked, advances to the
    /// next question, or submits when the last question is checked.
    pub fn next(&mut self) -> Result<(), QuizError> {
        if self.phase == Phase::Answering {
            return self.check();
        }
        if self.phase == Phase::Checked {
            if self.current_index + 1 < self.questions.len() {
                self.current_index += 1;
                self.phase = Phase::Answering;
            } else {
                self.phase = Phase::Submitted(self.compute_score());
            }
        }
        Ok(())
    }

    /// Moves back one question, keeping its recorded selection. Always lands
    /// in the answering phase.
    pub fn previous(&mut self) {
        if self.is_submitted() || self.current_index == 0 {
            return;
        }
        self.current_index -= 1;
        self.phase = Phase::Answering;
    }

    /// Restarts the attempt over the same question sequence: clears every
    /// selection, the score and the position. No re-shuffle.
    pub fn reset(&mut self) {
        for selection in &mut self.selections {
            selection.clear();
        }
        self.current_index = 0;
        self.phase = Phase::Answering;
    }

    /// The correctness overlay for the current question, available after
    /// `check` when the show-answer-after-each policy is on.
    pub fn feedback(&self) -> Option<Feedback> {
        if self.phase != Phase::Checked || !self.show_answer_after_each {
            return None;
        }
        let question = self.current_question();
        Some(Feedback {
            is_correct: *self.current_selection() == question.answer,
            correct_answer: &question.answer,
            explanation: &question.explanation,
        })
    }

    /// The final score, present once submitted.
    pub fn score(&self) -> Option<&ScoreSummary> {
        match &self.phase {
            Phase::Submitted(summary) => Some(summary),
            _ => None,
        }
    }

    /// The per-question review sequence, present once submitted.
    pub fn review(&self) -> Option<Vec<ReviewEntry>> {
        if !self.is_submitted() {
            return None;
        }
        Some(
            self.questions
                .iter()
                .zip(&self.selections)
                .map(|(question, selected)| ReviewEntry { question, selected })
                .collect(),
        )
    }

    fn compute_score(&self) -> ScoreSummary {
        let mut score = 0;
        let mut by_topic: BTreeMap<String, TopicScore> = BTreeMap::new();
        for (question, selection) in self.questions.iter().zip(&self.selections) {
            let topic = by_topic.entry(question.title.clone()).or_default();
            topic.total += 1;
            if *selection == question.answer {
                topic.score += 1;
                score += 1;
            }
        }
        ScoreSummary {
            score,
            total: self.questions.len(),
            by_topic,
        }
    }
}
