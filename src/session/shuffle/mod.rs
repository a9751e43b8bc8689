use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

use crate::bank::{Label, Question, QuestionBank};
use crate::error::QuizError;
use crate::settings::Settings;


/// Draws the final ordered question sequence for a session: filters the bank
/// by selected titles, applies the shuffle policies and truncates to the
/// requested count. Truncation happens after shuffling so the shuffle also
/// chooses which questions appear.
pub fn draw_questions<R: Rng>(
    bank: &QuestionBank,
    settings: &Settings,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError> {
    let mut questions: Vec<Question> = bank
        .questions()
        .iter()
        .filter(|q| settings.selected_titles.contains(&q.title))
        .cloned()
        .collect();
    if questions.is_empty() {
        return Err(QuizError::NoTitlesSelected);
    }

    if settings.shuffle_questions {
        questions.shuffle(rng);
    }
    if settings.shuffle_answers {
        questions = questions.iter().map(|q| shuffle_options(q, rng)).collect();
    }

    questions.truncate(settings.number_of_questions.max(1));
    Ok(questions)
}

/// Returns a copy of `question` with uniformly permuted options and a
/// recomputed answer set: each correct label follows its option text to the
/// text's new position. Correct option texts are invariant under relabeling.
/// When two options share the same text, the first occurrence claims the
/// label.
pub fn shuffle_options<R: Rng>(question: &Question, rng: &mut R) -> Question {
    let mut options = question.options.clone();
    options.shuffle(rng);

    let answer: BTreeSet<Label> = question
        .answer
        .iter()
        .map(|label| {
            let text = &question.options[label.index()];
            let new_index = options
                .iter()
                .position(|option| option == text)
                .expect("permuted options contain every original option");
            Label::from_index(new_index).expect("option count is unchanged by permutation")
        })
        .collect();

    Question {
        options,
        answer,
        ..question.clone()
    }
}
