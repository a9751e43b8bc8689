use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

pub mod options;
pub mod question;

pub use self::options::split_options;
pub use self::question::{
    DecodeOptions, Label, Question, QuestionKind, RawRecord, RejectReason,
};

use crate::error::QuizError;


const TEMPLATE_CSV: &str = include_str!("../../assets/template.csv");

/// The validated question collection handed to the settings step: accepted
/// questions in input order plus the distinct quiz titles in first-occurrence
/// order.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
    titles: Vec<String>,
}

/// Outcome of one ingestion pass over a row sequence.
#[derive(Clone, Debug)]
pub struct BankSummary {
    pub bank: QuestionBank,
    pub rejected: usize,
}

impl BankSummary {
    /// The success toast text shown after a CSV check.
    pub fn message(&self) -> String {
        format!("CSV checked: {} question(s) found.", self.bank.len())
    }
}

impl QuestionBank {
    /// Decodes every record, dropping malformed rows. Total: always returns a
    /// (possibly empty) bank plus the rejection count.
    pub fn from_records<I>(records: I, decode_options: &DecodeOptions) -> BankSummary
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut questions = Vec::new();
        let mut rejected = 0;
        for (row_number, record) in records.into_iter().enumerate() {
            match Question::from_record(&record, decode_options) {
                Ok(question) => questions.push(question),
                Err(reason) => {
                    debug!("Rejected row {}: {}", row_number + 1, reason);
                    rejected += 1;
                }
            }
        }

        let titles = questions.iter().map(|q| q.title.clone()).unique().collect();
        BankSummary {
            bank: QuestionBank { questions, titles },
            rejected,
        }
    }

    /// Reads a CSV row sequence from `reader`. Rows the CSV reader cannot
    /// deserialize count as rejections; an underlying I/O failure aborts with
    /// `SourceUnavailable`; zero accepted rows is `EmptyResultSet`.
    pub fn read_from<R: io::Read>(
        reader: R,
        decode_options: &DecodeOptions,
    ) -> Result<BankSummary, QuizError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let mut records = Vec::new();
        let mut unreadable = 0;
        for record in csv_reader.deserialize::<RawRecord>() {
            match record {
                Ok(record) => records.push(record),
                Err(error) => {
                    if error.is_io_error() {
                        return Err(QuizError::SourceUnavailable(error));
                    }
                    debug!("Skipped unreadable CSV row: {}", error);
                    unreadable += 1;
                }
            }
        }

        let mut summary = Self::from_records(records, decode_options);
        summary.rejected += unreadable;
        if summary.bank.is_empty() {
            warn!("No valid rows in CSV source ({} rejected)", summary.rejected);
            return Err(QuizError::EmptyResultSet);
        }
        Ok(summary)
    }

    pub fn load<P: AsRef<Path>>(
        path: P,
        decode_options: &DecodeOptions,
    ) -> Result<BankSummary, QuizError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::read_from(file, decode_options)
    }

    /// The embedded sample deck with basic maths and English questions, for
    /// hosts that want to offer a demo quiz when no file was provided.
    pub fn template(decode_options: &DecodeOptions) -> Result<BankSummary, QuizError> {
        Self::read_from(TEMPLATE_CSV.as_bytes(), decode_options)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
