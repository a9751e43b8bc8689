use thiserror::Error;

use crate::bank::Label;

/// Errors surfaced to the host application. Display strings double as the
/// user-facing message texts; every variant is recoverable by retrying or
/// correcting the input.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("The CSV could not be read: {0}")]
    SourceUnavailable(#[from] csv::Error),

    #[error(
        "No questions found in the CSV. The format might be incorrect. Please check again or use our template."
    )]
    EmptyResultSet,

    #[error("No questions selected. Please check at least one quiz title.")]
    NoTitlesSelected,

    #[error("This question needs exactly {expected} answer(s), you selected {selected}.")]
    WrongSelectionCount { expected: usize, selected: usize },

    #[error("You already selected {limit} answer(s). Deselect one before picking another.")]
    TooManySelections { limit: usize },

    #[error("There is no option {label} for this question.")]
    UnknownLabel { label: Label },
}
