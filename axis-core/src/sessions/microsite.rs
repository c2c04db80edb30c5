//! Interviewee microsite.
//!
//! Two entry points:
//! - `/interviewee?data=<token>`: everything comes from the token, the answer
//!   goes to `POST /interviewee` with no interview id attached
//! - `/i/{id}`: facts and questions are fetched from `GET /brief/{id}` and the
//!   answer goes to `POST /interviewee/{id}`
//!
//! Partially reviewed fact lists are accepted; the backend stores whatever it gets.

use crate::backend::Backend;
use crate::codec;
use crate::error::AxisError;
use crate::models::{
    FactCorrection, FactResponse, InterviewSession, IntervieweePayload, IntervieweeSubmission,
    QuestionInterest,
};

pub const DEFAULT_COMPANY: &str = "Your Organization";

#[derive(Debug, Clone, PartialEq)]
pub struct Microsite {
    interview_id: Option<String>,
    company: String,
    facts: Vec<FactResponse>,
    questions: Vec<QuestionInterest>,
    wildcard: String,
    submitted: bool,
}

fn company_or_default(company: &str) -> String {
    if company.trim().is_empty() {
        DEFAULT_COMPANY.to_string()
    } else {
        company.to_string()
    }
}

impl Microsite {
    pub fn from_payload(payload: IntervieweePayload) -> Self {
        Self {
            interview_id: None,
            company: company_or_default(&payload.company),
            facts: payload.facts.into_iter().map(FactResponse::unreviewed).collect(),
            questions: payload
                .questions
                .into_iter()
                .map(|q| QuestionInterest {
                    text: q.text,
                    selected: false,
                })
                .collect(),
            wildcard: String::new(),
            submitted: false,
        }
    }

    /// Open the self-contained microsite. A bad token is a `Decode` error for
    /// the page to render, never a panic.
    pub fn from_token(token: &str) -> Result<Self, AxisError> {
        codec::decode(token).map(Self::from_payload)
    }

    pub fn from_session(session: &InterviewSession) -> Self {
        Self {
            interview_id: Some(session.interview_id.clone()),
            company: company_or_default(&session.company_name),
            facts: session
                .facts
                .iter()
                .cloned()
                .map(FactResponse::unreviewed)
                .collect(),
            questions: session
                .interviewee_questions
                .iter()
                .map(|text| QuestionInterest {
                    text: text.clone(),
                    selected: false,
                })
                .collect(),
            wildcard: String::new(),
            submitted: false,
        }
    }

    /// Load the `/i/{id}` page.
    pub async fn load(backend: &Backend, interview_id: &str) -> Result<Self, AxisError> {
        let mut session = backend.fetch_brief(interview_id).await?;
        session.interview_id = interview_id.to_string();
        Ok(Self::from_session(&session))
    }

    pub fn interview_id(&self) -> Option<&str> {
        self.interview_id.as_deref()
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn facts(&self) -> &[FactResponse] {
        &self.facts
    }

    pub fn questions(&self) -> &[QuestionInterest] {
        &self.questions
    }

    pub fn wildcard(&self) -> &str {
        &self.wildcard
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn unreviewed_count(&self) -> usize {
        self.facts.iter().filter(|f| f.accurate.is_none()).count()
    }

    fn fact_mut(&mut self, index: usize) -> Result<&mut FactResponse, AxisError> {
        self.facts
            .get_mut(index)
            .ok_or_else(|| AxisError::validation("facts", format!("No fact #{}", index + 1)))
    }

    pub fn review_fact(&mut self, index: usize, accurate: bool) -> Result<(), AxisError> {
        self.fact_mut(index)?.accurate = Some(accurate);
        Ok(())
    }

    pub fn correct_fact(&mut self, index: usize, correction: impl Into<String>) -> Result<(), AxisError> {
        self.fact_mut(index)?.correction = correction.into();
        Ok(())
    }

    /// Flip interest in a question; returns the new selection state.
    pub fn toggle_question(&mut self, index: usize) -> Result<bool, AxisError> {
        let question = self
            .questions
            .get_mut(index)
            .ok_or_else(|| AxisError::validation("questions", format!("No question #{}", index + 1)))?;
        question.selected = !question.selected;
        Ok(question.selected)
    }

    pub fn set_wildcard(&mut self, text: impl Into<String>) {
        self.wildcard = text.into();
    }

    pub fn submission(&self) -> IntervieweeSubmission {
        IntervieweeSubmission {
            corrections: self
                .facts
                .iter()
                .filter(|f| f.accurate == Some(false))
                .map(|f| FactCorrection {
                    original: f.fact.clone(),
                    correction: f.correction.clone(),
                })
                .collect(),
            fact_responses: self.facts.clone(),
            selected_questions: self
                .questions
                .iter()
                .filter(|q| q.selected)
                .map(|q| q.text.clone())
                .collect(),
            question_interests: self.questions.clone(),
            wildcard: self.wildcard.trim().to_string(),
        }
    }

    pub async fn submit(&mut self, backend: &Backend) -> Result<(), AxisError> {
        if self.submitted {
            return Err(AxisError::validation(
                "microsite",
                "Your responses were already sent",
            ));
        }

        let submission = self.submission();
        backend
            .submit_interviewee(self.interview_id.as_deref(), &submission)
            .await?;

        tracing::info!(
            interview_id = ?self.interview_id,
            corrections = submission.corrections.len(),
            selected = submission.selected_questions.len(),
            unreviewed = self.unreviewed_count(),
            "Interviewee response submitted"
        );
        self.submitted = true;
        Ok(())
    }
}
