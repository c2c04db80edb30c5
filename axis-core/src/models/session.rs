use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status the backend reports once the interviewee has submitted the microsite.
pub const STATUS_INTERVIEWEE_RESPONDED: &str = "interviewee_responded";

/// Snapshot of one interview as returned by `GET /brief/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewSession {
    pub interview_id: String,
    pub company_name: String,
    pub sector: String,
    pub interviewee_name: String,
    pub interviewee_title: String,
    pub brief: String,
    pub questions: Vec<Question>,
    /// Knowledge-graph pre-fill, category -> field -> value.
    pub schema: Value,
    pub interviewee_email: String,
    pub debrief_completed: bool,

    pub status: String,
    pub created_at: String,
    /// Facts shown to the interviewee for confirmation.
    pub facts: Vec<String>,
    pub interviewee_questions: Vec<String>,
    pub interviewee_corrections: Vec<FactCorrection>,
    pub interviewee_selected_questions: Vec<String>,
    pub interviewee_wildcard: String,
    pub responded_at: String,
}

impl InterviewSession {
    pub fn interviewee_responded(&self) -> bool {
        self.status == STATUS_INTERVIEWEE_RESPONDED
    }

    /// Fold a newer poll result into this snapshot.
    ///
    /// `debrief_completed` never goes from true back to false.
    pub fn merge(&mut self, newer: InterviewSession) {
        let completed = self.debrief_completed || newer.debrief_completed;
        *self = newer;
        self.debrief_completed = completed;
    }
}

/// One interview question. Display order is the rating key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "QuestionRepr")]
pub struct Question {
    pub question_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_if_vague: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_if_deep: Option<String>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            question_text: text.into(),
            ..Default::default()
        }
    }
}

// Early pipeline versions emitted questions as bare strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionRepr {
    Text(String),
    Full {
        #[serde(default, alias = "question", alias = "text")]
        question_text: String,
        #[serde(default)]
        rationale: Option<String>,
        #[serde(default)]
        follow_up_if_vague: Option<String>,
        #[serde(default)]
        follow_up_if_deep: Option<String>,
    },
}

impl From<QuestionRepr> for Question {
    fn from(repr: QuestionRepr) -> Self {
        match repr {
            QuestionRepr::Text(text) => Question::new(text),
            QuestionRepr::Full {
                question_text,
                rationale,
                follow_up_if_vague,
                follow_up_if_deep,
            } => Question {
                question_text,
                rationale: rationale.filter(|s| !s.is_empty()),
                follow_up_if_vague: follow_up_if_vague.filter(|s| !s.is_empty()),
                follow_up_if_deep: follow_up_if_deep.filter(|s| !s.is_empty()),
            },
        }
    }
}

/// A fact the interviewee marked inaccurate, with their fix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactCorrection {
    pub original: String,
    pub correction: String,
}
