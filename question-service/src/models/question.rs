use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::draft::ValidationError;

/// The closed set of subjects a question may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Governance,
    #[serde(rename = "Financial Management")]
    FinancialManagement,
    Operations,
    Communications,
    #[serde(rename = "Human Resources")]
    HumanResources,
    #[serde(rename = "Risk Management")]
    RiskManagement,
}

impl Subject {
    pub const ALL: [Subject; 6] = [
        Subject::Governance,
        Subject::FinancialManagement,
        Subject::Operations,
        Subject::Communications,
        Subject::HumanResources,
        Subject::RiskManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Governance => "Governance",
            Subject::FinancialManagement => "Financial Management",
            Subject::Operations => "Operations",
            Subject::Communications => "Communications",
            Subject::HumanResources => "Human Resources",
            Subject::RiskManagement => "Risk Management",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = ValidationError;

    /// Exact, case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSubject(s.to_string()))
    }
}

/// A persisted question, as stored in the `questions` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub subject: Subject,
    pub text: String,
    pub choices: Vec<String>,
    #[serde(deserialize_with = "whole_number")]
    pub answer_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Accept any BSON number with no fractional part; documents written by other
/// clients may hold `answerIndex` as a double.
fn whole_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(de::Error::custom(format!(
            "answerIndex must be a whole number, got {}",
            value
        )));
    }
    Ok(value as i32)
}

/// JSON shape returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub subject: Subject,
    pub text: String,
    pub choices: Vec<String>,
    pub answer_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        Self {
            id: q.id.to_hex(),
            subject: q.subject,
            text: q.text,
            choices: q.choices,
            answer_index: q.answer_index,
            explanation: q.explanation,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

/// Parse a path id; anything that is not a 24-hex ObjectId cannot match a record.
pub fn parse_question_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

/// Current time at the store's millisecond precision, so values read back
/// compare equal to the ones returned on write.
pub fn store_now() -> DateTime<Utc> {
    mongodb::bson::DateTime::now().to_chrono()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_wire_names_round_trip() {
        for subject in Subject::ALL {
            let json = serde_json::to_string(&subject).unwrap();
            assert_eq!(json, format!("\"{}\"", subject.as_str()));
            assert_eq!(subject.as_str().parse::<Subject>().unwrap(), subject);
        }
    }

    #[test]
    fn test_subject_parse_is_case_sensitive() {
        assert!("governance".parse::<Subject>().is_err());
        assert!("Nonexistent".parse::<Subject>().is_err());
        assert_eq!(
            "Risk Management".parse::<Subject>().unwrap(),
            Subject::RiskManagement
        );
    }

    #[test]
    fn test_parse_question_id_rejects_malformed() {
        assert!(parse_question_id("not-an-id").is_none());
        assert!(parse_question_id("123").is_none());
        let id = ObjectId::new();
        assert_eq!(parse_question_id(&id.to_hex()), Some(id));
    }

    fn stored_document(answer_index: mongodb::bson::Bson) -> mongodb::bson::Document {
        mongodb::bson::doc! {
            "_id": ObjectId::new(),
            "subject": "Operations",
            "text": "Stored elsewhere",
            "choices": ["A", "B", "C", "D"],
            "answerIndex": answer_index,
            "createdAt": mongodb::bson::DateTime::now(),
            "updatedAt": mongodb::bson::DateTime::now(),
        }
    }

    #[test]
    fn test_stored_answer_index_accepts_int_and_double() {
        for value in [
            mongodb::bson::Bson::Int32(2),
            mongodb::bson::Bson::Int64(2),
            mongodb::bson::Bson::Double(2.0),
        ] {
            let question: Question =
                mongodb::bson::from_document(stored_document(value)).unwrap();
            assert_eq!(question.answer_index, 2);
        }
    }

    #[test]
    fn test_stored_fractional_answer_index_rejected() {
        let result =
            mongodb::bson::from_document::<Question>(stored_document(mongodb::bson::Bson::Double(1.5)));
        assert!(result.is_err());
    }

    #[test]
    fn test_response_uses_camel_case_and_hex_id() {
        let now = store_now();
        let question = Question {
            id: ObjectId::new(),
            subject: Subject::HumanResources,
            text: "Who signs contracts?".to_string(),
            choices: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            answer_index: 2,
            explanation: None,
            created_at: now,
            updated_at: now,
        };
        let hex = question.id.to_hex();

        let json = serde_json::to_value(QuestionResponse::from(question)).unwrap();
        assert_eq!(json["_id"], hex);
        assert_eq!(json["subject"], "Human Resources");
        assert_eq!(json["answerIndex"], 2);
        assert!(json.get("explanation").is_none());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
