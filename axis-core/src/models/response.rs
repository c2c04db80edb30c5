use serde::{Deserialize, Serialize};

use super::session::FactCorrection;

/// The interviewee's review of one fact. `accurate: None` means not yet reviewed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactResponse {
    pub fact: String,
    pub accurate: Option<bool>,
    #[serde(default)]
    pub correction: String,
}

impl FactResponse {
    pub fn unreviewed(fact: impl Into<String>) -> Self {
        Self {
            fact: fact.into(),
            accurate: None,
            correction: String::new(),
        }
    }
}

/// A question offered on the microsite and whether the interviewee wants it asked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionInterest {
    pub text: String,
    pub selected: bool,
}

/// Body of `POST /interviewee[/{id}]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervieweeSubmission {
    pub corrections: Vec<FactCorrection>,
    pub fact_responses: Vec<FactResponse>,
    pub selected_questions: Vec<String>,
    pub question_interests: Vec<QuestionInterest>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub wildcard: String,
}
