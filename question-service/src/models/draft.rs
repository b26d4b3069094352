//! Candidate payloads and the single validation rule shared by create, bulk
//! create and update.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::question::{Question, Subject};

pub const CHOICE_COUNT: usize = 4;
pub const MIN_ANSWER_INDEX: i64 = 0;
pub const MAX_ANSWER_INDEX: i64 = 3;

/// The first constraint a candidate violates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Path `{0}` is required.")]
    Required(&'static str),

    #[error("`{0}` is not a valid enum value for path `subject`.")]
    UnknownSubject(String),

    #[error("You must provide exactly 4 answer options")]
    ChoiceCount(usize),

    #[error("Cast to integer failed for value `{0}` at path `answerIndex`.")]
    AnswerIndexNotInteger(String),

    #[error("Path `answerIndex` ({0}) is less than minimum allowed value (0).")]
    AnswerIndexTooSmall(i64),

    #[error("Path `answerIndex` ({0}) is more than maximum allowed value (3).")]
    AnswerIndexTooLarge(i64),
}

impl ValidationError {
    /// Wire name of the offending field.
    pub fn path(&self) -> &'static str {
        match self {
            ValidationError::Required(path) => path,
            ValidationError::UnknownSubject(_) => "subject",
            ValidationError::ChoiceCount(_) => "choices",
            ValidationError::AnswerIndexNotInteger(_)
            | ValidationError::AnswerIndexTooSmall(_)
            | ValidationError::AnswerIndexTooLarge(_) => "answerIndex",
        }
    }

    pub fn message(&self) -> String {
        format!("Question validation failed: {}: {}", self.path(), self)
    }
}

impl From<ValidationError> for service_core::error::AppError {
    fn from(err: ValidationError) -> Self {
        service_core::error::AppError::ValidationError(err.message())
    }
}

/// An unvalidated create or update body. Every field is optional so the same
/// type serves full and partial payloads; JSON type mismatches fail at decode.
///
/// Each field has three states: `None` when absent, `Some(None)` for an
/// explicit `null`, `Some(Some(v))` for a value. Only absent fields fall back
/// to stored values on update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(default, deserialize_with = "present")]
    pub subject: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub choices: Option<Option<Vec<String>>>,
    /// Any JSON number; integrality is checked by `validate`.
    #[serde(default, deserialize_with = "present")]
    pub answer_index: Option<Option<f64>>,
    /// An explicit `null` clears the explanation on update.
    #[serde(default, deserialize_with = "present")]
    pub explanation: Option<Option<String>>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A candidate that satisfies every field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuestion {
    pub subject: Subject,
    pub text: String,
    pub choices: Vec<String>,
    pub answer_index: i32,
    pub explanation: Option<String>,
}

impl QuestionDraft {
    /// Check fields in declaration order and stop at the first violation.
    /// Absent and `null` fields are both missing.
    ///
    /// `answerIndex` is only range-checked; with exactly four choices that
    /// range is also the set of valid indices.
    pub fn validate(self) -> Result<ValidQuestion, ValidationError> {
        let subject = self
            .subject
            .flatten()
            .ok_or(ValidationError::Required("subject"))?
            .parse::<Subject>()?;

        let text = match self.text.flatten() {
            Some(text) if !text.is_empty() => text,
            _ => return Err(ValidationError::Required("text")),
        };

        let choices = self
            .choices
            .flatten()
            .ok_or(ValidationError::Required("choices"))?;
        if choices.len() != CHOICE_COUNT {
            return Err(ValidationError::ChoiceCount(choices.len()));
        }

        let raw_index = self
            .answer_index
            .flatten()
            .ok_or(ValidationError::Required("answerIndex"))?;
        if raw_index.fract() != 0.0 {
            return Err(ValidationError::AnswerIndexNotInteger(raw_index.to_string()));
        }
        let answer_index = raw_index as i64;
        if answer_index < MIN_ANSWER_INDEX {
            return Err(ValidationError::AnswerIndexTooSmall(answer_index));
        }
        if answer_index > MAX_ANSWER_INDEX {
            return Err(ValidationError::AnswerIndexTooLarge(answer_index));
        }

        Ok(ValidQuestion {
            subject,
            text,
            choices,
            answer_index: answer_index as i32,
            explanation: self.explanation.flatten(),
        })
    }

    /// Overlay this patch on a stored question. Fields absent from the patch
    /// keep their stored values, explicit `null`s are carried through, and
    /// the result still has to pass `validate`.
    pub fn merge_onto(self, existing: &Question) -> QuestionDraft {
        QuestionDraft {
            subject: self
                .subject
                .or_else(|| Some(Some(existing.subject.as_str().to_string()))),
            text: self.text.or_else(|| Some(Some(existing.text.clone()))),
            choices: self
                .choices
                .or_else(|| Some(Some(existing.choices.clone()))),
            answer_index: self
                .answer_index
                .or(Some(Some(f64::from(existing.answer_index)))),
            explanation: self
                .explanation
                .or_else(|| Some(existing.explanation.clone())),
        }
    }
}
