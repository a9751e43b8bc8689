use std::collections::BTreeSet;

use super::*;
use crate::bank::QuestionKind;

struct SessionBuilder {
    questions: Vec<Question>,
    show_answer_after_each: bool,
}

impl SessionBuilder {
    fn new() -> Self {
        SessionBuilder {
            questions: Vec::new(),
            show_answer_after_each: true,
        }
    }

    fn question(mut self, title: &str, options: &[&str], answer: &[char]) -> Self {
        self.questions.push(Question {
            title: title.to_owned(),
            prompt: format!("Question {}", self.questions.len() + 1),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: labels(answer),
            explanation: "Because.".to_owned(),
            kind: QuestionKind::MultipleChoice,
        });
        self
    }

    fn hide_answers(mut self) -> Self {
        self.show_answer_after_each = false;
        self
    }

    fn build(self) -> QuizSession {
        QuizSession::new(self.questions, self.show_answer_after_each)
    }
}

fn labels(letters: &[char]) -> BTreeSet<Label> {
    letters
        .iter()
        .filter_map(|l| Label::from_letter(*l))
        .collect()
}

fn label(letter: char) -> Label {
    Label::from_letter(letter).unwrap()
}

fn three_question_session() -> QuizSession {
    SessionBuilder::new()
        .question("Maths", &["a", "b", "c", "d"], &['A'])
        .question("Maths", &["a", "b", "c", "d"], &['A', 'B'])
        .question("English", &["a", "b", "c", "d"], &['C'])
        .build()
}

fn answer_and_advance(session: &mut QuizSession, letters: &[char]) {
    for letter in letters {
        session.select_answer(label(*letter)).unwrap();
    }
    session.next().unwrap(); // check
    session.next().unwrap(); // advance or submit
}

#[test]
fn starts_answering_the_first_question() {
    let session = three_question_session();
    assert_eq!(session.current_index(), 0);
    assert!(!session.is_checked());
    assert!(!session.is_submitted());
    assert!(session.current_selection().is_empty());
    assert!(session.score().is_none());
}

#[test]
fn single_select_replaces_previous_choice() {
    let mut session = three_question_session();
    session.select_answer(label('A')).unwrap();
    session.select_answer(label('B')).unwrap();
    assert_eq!(*session.current_selection(), labels(&['B']));
}

#[test]
fn multi_select_toggles_labels() {
    let mut session = three_question_session();
    answer_and_advance(&mut session, &['A']);

    session.select_answer(label('A')).unwrap();
    session.select_answer(label('C')).unwrap();
    assert_eq!(*session.current_selection(), labels(&['A', 'C']));

    session.select_answer(label('C')).unwrap();
    assert_eq!(*session.current_selection(), labels(&['A']));
}

#[test]
fn selection_never_exceeds_cardinality() {
    let mut session = three_question_session();
    answer_and_advance(&mut session, &['A']);

    session.select_answer(label('A')).unwrap();
    session.select_answer(label('B')).unwrap();
    match session.select_answer(label('C')) {
        Err(QuizError::TooManySelections { limit: 2 }) => (),
        other => panic!("expected TooManySelections, got {:?}", other),
    }
    assert_eq!(*session.current_selection(), labels(&['A', 'B']));
}

#[test]
fn rejects_labels_outside_the_option_range() {
    let mut session = three_question_session();
    match session.select_answer(label('E')) {
        Err(QuizError::UnknownLabel { label }) => assert_eq!(label.letter(), 'E'),
        other => panic!("expected UnknownLabel, got {:?}", other),
    }
    assert!(session.current_selection().is_empty());
}

#[test]
fn check_requires_exact_selection_count() {
    let mut session = three_question_session();
    match session.check() {
        Err(QuizError::WrongSelectionCount {
            expected: 1,
            selected: 0,
        }) => (),
        other => panic!("expected WrongSelectionCount, got {:?}", other),
    }
    assert!(!session.is_checked());

    session.select_answer(label('A')).unwrap();
    session.check().unwrap();
    assert!(session.is_checked());
}

#[test]
fn check_on_multi_select_requires_full_cardinality() {
    let mut session = three_question_session();
    answer_and_advance(&mut session, &['A']);

    session.select_answer(label('A')).unwrap();
    match session.check() {
        Err(QuizError::WrongSelectionCount {
            expected: 2,
            selected: 1,
        }) => (),
        other => panic!("expected WrongSelectionCount, got {:?}", other),
    }
}

#[test]
fn selection_is_frozen_after_check() {
    let mut session = three_question_session();
    session.select_answer(label('A')).unwrap();
    session.check().unwrap();

    session.select_answer(label('B')).unwrap();
    assert_eq!(*session.current_selection(), labels(&['A']));
    session.check().unwrap();
    assert!(session.is_checked());
}

#[test]
fn next_checks_then_advances() {
    let mut session = three_question_session();
    session.select_answer(label('A')).unwrap();

    session.next().unwrap();
    assert!(session.is_checked());
    assert_eq!(session.current_index(), 0);

    session.next().unwrap();
    assert!(!session.is_checked());
    assert_eq!(session.current_index(), 1);
}

#[test]
fn next_while_answering_can_fail_like_check() {
    let mut session = three_question_session();
    assert!(session.next().is_err());
    assert_eq!(session.current_index(), 0);
}

#[test]
fn next_on_last_checked_question_submits() {
    let mut session = three_question_session();
    answer_and_advance(&mut session, &['A']);
    answer_and_advance(&mut session, &['B', 'A']);
    answer_and_advance(&mut session, &['A']);

    assert!(session.is_submitted());
    let score = session.score().unwrap();
    assert_eq!(score.score, 2);
    assert_eq!(score.total, 3);
}

#[test]
fn scoring_is_set_equality_per_topic() {
    let mut session = three_question_session();
    answer_and_advance(&mut session, &['A']);
    answer_and_advance(&mut session, &['B', 'A']);
    answer_and_advance(&mut session, &['A']);

    let score = session.score().unwrap();
    assert_eq!(
        score.by_topic.get("Maths"),
        Some(&TopicScore { score: 2, total: 2 })
    );
    assert_eq!(
        score.by_topic.get("English"),
        Some(&TopicScore { score: 0, total: 1 })
    );
}

#[test]
fn submitted_session_is_frozen() {
    let mut session = three_question_session();
    answer_and_advance(&mut session, &['A']);
    answer_and_advance(&mut session, &['A', 'B']);
    answer_and_advance(&mut session, &['C']);
    assert!(session.is_submitted());

    let index = session.current_index();
    session.select_answer(label('D')).unwrap();
    session.next().unwrap();
    session.previous();
    assert!(session.is_submitted());
    assert_eq!(session.current_index(), index);
    assert_eq!(*session.current_selection(), labels(&['C']));
}

#[test]
fn previous_preserves_selection_and_unchecks() {
    let mut session = three_question_session();
    session.select_answer(label('B')).unwrap();
    session.next().unwrap();
    session.next().unwrap();
    assert_eq!(session.current_index(), 1);

    session.previous();
    assert_eq!(session.current_index(), 0);
    assert!(!session.is_checked());
    assert_eq!(*session.current_selection(), labels(&['B']));
}

#[test]
fn previous_from_checked_state_unchecks() {
    let mut session = three_question_session();
    answer_and_advance(&mut session, &['A']);
    session.select_answer(label('A')).unwrap();
    session.select_answer(label('B')).unwrap();
    session.check().unwrap();
    assert!(session.is_checked());

    session.previous();
    assert_eq!(session.current_index(), 0);
    assert!(!session.is_checked());
}

#[test]
fn previous_at_first_question_does_nothing() {
    let mut session = three_question_session();
    session.previous();
    assert_eq!(session.current_index(), 0);
    assert!(!session.is_checked());
}

#[test]
fn reset_returns_to_initial_state() {
    let mut session = three_question_session();
    answer_and_advance(&mut session, &['A']);
    answer_and_advance(&mut session, &['A', 'B']);
    answer_and_advance(&mut session, &['C']);
    assert!(session.is_submitted());

    session.reset();
    assert_eq!(session.current_index(), 0);
    assert!(!session.is_checked());
    assert!(!session.is_submitted());
    assert!(session.score().is_none());
    assert!(session.selections.iter().all(|s| s.is_empty()));
    assert_eq!(session.total_questions(), 3);
}

#[test]
fn reset_is_idempotent() {
    let mut session = three_question_session();
    answer_and_advance(&mut session, &['A']);

    session.reset();
    let once = session.clone();
    session.reset();
    assert_eq!(session.current_index(), once.current_index());
    assert_eq!(session.selections, once.selections);
    assert_eq!(session.phase, once.phase);
}

#[test]
fn progress_tops_out_below_one_hundred() {
    let mut session = three_question_session();
    assert_eq!(session.progress(), 0.0);

    answer_and_advance(&mut session, &['A']);
    assert_eq!(session.current_index(), 1);
    assert!((session.progress() - 100.0 / 3.0).abs() < 0.001);

    answer_and_advance(&mut session, &['A', 'B']);
    assert_eq!(session.current_index(), 2);
    assert!((session.progress() - 200.0 / 3.0).abs() < 0.001);

    // Submitting does not move the index
    answer_and_advance(&mut session, &['C']);
    assert!(session.is_submitted());
    assert!((session.progress() - 200.0 / 3.0).abs() < 0.001);
}

#[test]
fn feedback_appears_after_check() {
    let mut session = three_question_session();
    assert!(session.feedback().is_none());

    session.select_answer(label('A')).unwrap();
    session.check().unwrap();
    let feedback = session.feedback().unwrap();
    assert!(feedback.is_correct);
    assert_eq!(*feedback.correct_answer, labels(&['A']));
    assert_eq!(feedback.explanation, "Because.");
}

#[test]
fn feedback_reports_incorrect_selection() {
    let mut session = three_question_session();
    session.select_answer(label('B')).unwrap();
    session.check().unwrap();
    assert!(!session.feedback().unwrap().is_correct);
}

#[test]
fn feedback_is_hidden_when_policy_is_off() {
    let mut session = SessionBuilder::new()
        .question("Maths", &["a", "b"], &['A'])
        .hide_answers()
        .build();
    session.select_answer(label('A')).unwrap();
    session.check().unwrap();
    assert!(session.feedback().is_none());
}

#[test]
fn review_is_available_after_submission() {
    let mut session = three_question_session();
    assert!(session.review().is_none());

    answer_and_advance(&mut session, &['A']);
    answer_and_advance(&mut session, &['A', 'B']);
    answer_and_advance(&mut session, &['D']);

    let review = session.review().unwrap();
    assert_eq!(review.len(), 3);
    assert_eq!(*review[0].selected, labels(&['A']));
    assert_eq!(*review[1].selected, labels(&['A', 'B']));
    assert_eq!(*review[2].selected, labels(&['D']));
    assert_eq!(review[2].question.answer, labels(&['C']));
}

#[test]
fn percent_and_appraisal_tiers() {
    let summary = |score, total| ScoreSummary {
        score,
        total,
        by_topic: BTreeMap::new(),
    };
    assert_eq!(summary(3, 3).percent(), 100);
    assert_eq!(summary(3, 3).appraisal(), "Perfect score! Congratulations!");
    assert_eq!(summary(4, 5).appraisal(), "Great job! You did excellently!");
    assert_eq!(
        summary(3, 5).appraisal(),
        "Good effort! You're on the right track."
    );
    assert_eq!(
        summary(2, 5).appraisal(),
        "Not bad, but there's room for improvement."
    );
    assert_eq!(
        summary(0, 5).appraisal(),
        "Keep practicing, you'll get better!"
    );
    assert_eq!(summary(2, 3).percent(), 67);
}
