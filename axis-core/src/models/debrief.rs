use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Effective,
    Ineffective,
}

impl Rating {
    pub fn from_effective(effective: bool) -> Self {
        if effective {
            Rating::Effective
        } else {
            Rating::Ineffective
        }
    }
}

/// Question index -> rating. Unrated questions have no entry.
///
/// Serializes as a JSON object keyed by the decimal index.
pub type QuestionRatingMap = BTreeMap<usize, Rating>;

/// Body of `POST /debrief/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebriefSubmission {
    pub what_ai_got_wrong: String,
    pub key_insights: String,
    pub questions_that_worked: Vec<String>,
    pub surprises: String,
    pub sector: String,
    pub company_name: String,
    pub interviewee_name: String,
    pub interviewee_title: String,
    pub interview_date: String,
    pub question_ratings: QuestionRatingMap,
    pub completed_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interview_duration_seconds: Option<u64>,
}
