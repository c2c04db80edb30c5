use serde::{Deserialize, Serialize};

/// Self-contained data behind an interviewee microsite link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervieweePayload {
    pub company: String,
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub questions: Vec<PayloadQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadQuestion {
    pub text: String,
}

impl From<&str> for PayloadQuestion {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}
