pub mod bank;
pub mod error;
pub mod session;
pub mod settings;

pub use self::bank::{
    split_options, BankSummary, DecodeOptions, Label, Question, QuestionBank, QuestionKind,
    RawRecord,
};
pub use self::error::QuizError;
pub use self::session::{
    draw_questions, shuffle_options, Feedback, QuizSession, ReviewEntry, ScoreSummary, TopicScore,
};
pub use self::settings::Settings;
