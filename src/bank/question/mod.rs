use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::bank::options::split_options;


lazy_static! {
    static ref ANSWER_REGEX: Regex = Regex::new(r"^[A-Z](\|[A-Z])*$").unwrap();
    static ref CLASS_ATTRIBUTE_REGEX: Regex = Regex::new(r#"\s*class="[^"]*""#).unwrap();
}

/// A question-local option identifier. The option at position `i` is labeled
/// with the `i`-th uppercase letter: A is the first option, B the second, etc.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Label(u8);

impl Label {
    pub const MAX_OPTIONS: usize = 26;

    pub fn from_index(index: usize) -> Option<Label> {
        if index < Self::MAX_OPTIONS {
            Some(Label(index as u8))
        } else {
            None
        }
    }

    pub fn from_letter(letter: char) -> Option<Label> {
        if ('A'..='Z').contains(&letter) {
            Some(Label(letter as u8 - b'A'))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Question-kind discriminator. `mc` and the historical `mc14` token both
/// mean multiple choice; anything else rejects the row.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QuestionKind {
    MultipleChoice,
}

impl FromStr for QuestionKind {
    type Err = ();

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "mc" | "mc14" => Ok(QuestionKind::MultipleChoice),
            _ => Err(()),
        }
    }
}

/// One CSV row as read from the source. Every column is optional so that
/// short or partially filled rows still deserialize; validation happens in
/// `Question::from_record`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(rename = "Quiz title", default)]
    pub title: Option<String>,
    #[serde(rename = "HTML of the question", default)]
    pub question: Option<String>,
    #[serde(rename = "Answer", default)]
    pub answer: Option<String>,
    #[serde(rename = "Options, separated by |", default)]
    pub options: Option<String>,
    #[serde(rename = "HTML of the explanation to the answer", default)]
    pub explanation: Option<String>,
    #[serde(rename = "Question type", default)]
    pub kind: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct DecodeOptions {
    /// Remove every `class="…"` attribute from question and explanation
    /// markup before validation.
    pub strip_class_attributes: bool,
}

/// Why a row was dropped. Rejections are counted and logged, never raised.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RejectReason {
    MissingTitle,
    MissingQuestion,
    MissingExplanation,
    UnknownQuestionType,
    MalformedAnswer,
    NoOptions,
    TooManyOptions,
    AnswerOutOfRange,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            RejectReason::MissingTitle => "missing quiz title",
            RejectReason::MissingQuestion => "missing question text",
            RejectReason::MissingExplanation => "missing explanation text",
            RejectReason::UnknownQuestionType => "unrecognized question type",
            RejectReason::MalformedAnswer => "malformed answer value",
            RejectReason::NoOptions => "no options",
            RejectReason::TooManyOptions => "more than 26 options",
            RejectReason::AnswerOutOfRange => "answer outside the option range",
        };
        write!(f, "{}", description)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Question {
    pub title: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: BTreeSet<Label>,
    pub explanation: String,
    pub kind: QuestionKind,
}

impl Question {
    pub fn from_record(
        record: &RawRecord,
        decode_options: &DecodeOptions,
    ) -> Result<Question, RejectReason> {
        let title =
            non_empty(record.title.as_deref()).ok_or(RejectReason::MissingTitle)?;
        let prompt = clean_markup(record.question.as_deref(), decode_options)
            .ok_or(RejectReason::MissingQuestion)?;
        let explanation = clean_markup(record.explanation.as_deref(), decode_options)
            .ok_or(RejectReason::MissingExplanation)?;

        let kind = record
            .kind
            .as_deref()
            .map(str::trim)
            .and_then(|t| QuestionKind::from_str(t).ok())
            .ok_or(RejectReason::UnknownQuestionType)?;

        let answer = parse_answer(record.answer.as_deref())?;

        let options = split_options(record.options.as_deref().unwrap_or(""));
        if options.is_empty() {
            return Err(RejectReason::NoOptions);
        }
        if options.len() > Label::MAX_OPTIONS {
            return Err(RejectReason::TooManyOptions);
        }
        if answer.iter().any(|label| label.index() >= options.len()) {
            return Err(RejectReason::AnswerOutOfRange);
        }

        Ok(Question {
            title,
            prompt,
            options,
            answer,
            explanation,
            kind,
        })
    }

    /// Number of labels in the correct-answer set. 1 means single select,
    /// more means multi select.
    pub fn cardinality(&self) -> usize {
        self.answer.len()
    }

    /// Per-question instruction copy shown above the option list.
    pub fn instruction(&self) -> String {
        match self.cardinality() {
            1 => "Choose 1 answer from the available options".to_owned(),
            n => format!("Choose {} answers from the available options", n),
        }
    }

    /// The labels valid for this question, in display order.
    pub fn labels(&self) -> impl Iterator<Item = Label> {
        (0..self.options.len()).filter_map(Label::from_index)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn clean_markup(value: Option<&str>, decode_options: &DecodeOptions) -> Option<String> {
    let raw = value?;
    if decode_options.strip_class_attributes {
        let stripped = CLASS_ATTRIBUTE_REGEX.replace_all(raw, "");
        non_empty(Some(stripped.as_ref()))
    } else {
        non_empty(Some(raw))
    }
}

fn parse_answer(value: Option<&str>) -> Result<BTreeSet<Label>, RejectReason> {
    let raw = value
        .map(str::trim)
        .ok_or(RejectReason::MalformedAnswer)?;
    if !ANSWER_REGEX.is_match(raw) {
        return Err(RejectReason::MalformedAnswer);
    }

    let mut labels = BTreeSet::new();
    for letter in raw.split('|') {
        let label = letter
            .chars()
            .next()
            .and_then(Label::from_letter)
            .ok_or(RejectReason::MalformedAnswer)?;
        if !labels.insert(label) {
            // Repeated labels are a grammar violation
            return Err(RejectReason::MalformedAnswer);
        }
    }
    Ok(labels)
}
