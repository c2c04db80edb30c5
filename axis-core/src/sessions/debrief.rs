//! Post-interview debrief.
//!
//! Merges the interviewer's reflections with the co-pilot ratings into one
//! `POST /debrief/{id}`. Once the server accepts it the session is terminal.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::backend::Backend;
use crate::error::AxisError;
use crate::models::{DebriefSubmission, QuestionRatingMap};
use crate::sessions::intake::IntervieweeMeta;

pub const INTERVIEW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Free-text fields the interviewer fills in after the interview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebriefForm {
    pub what_ai_got_wrong: String,
    pub key_insights: String,
    pub questions_that_worked: Vec<String>,
    pub surprises: String,
    /// Schema as completed after the interview; `null` if left untouched.
    pub completed_schema: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebriefState {
    #[default]
    Editing,
    Submitted,
}

impl DebriefForm {
    pub fn validate(&self) -> Result<(), AxisError> {
        if self.key_insights.trim().is_empty() {
            return Err(AxisError::validation(
                "key_insights",
                "Please add your key insights before submitting",
            ));
        }
        Ok(())
    }
}

/// Assemble the submission body. Validation is the caller's job.
pub fn build_submission(
    form: &DebriefForm,
    meta: &IntervieweeMeta,
    ratings: &QuestionRatingMap,
    interview_duration_seconds: Option<u64>,
    now: DateTime<Utc>,
) -> DebriefSubmission {
    DebriefSubmission {
        what_ai_got_wrong: form.what_ai_got_wrong.clone(),
        key_insights: form.key_insights.trim().to_string(),
        questions_that_worked: form
            .questions_that_worked
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect(),
        surprises: form.surprises.clone(),
        sector: meta.sector.clone(),
        company_name: meta.company_name.clone(),
        interviewee_name: meta.interviewee_name.clone(),
        interviewee_title: meta.interviewee_title.clone(),
        interview_date: now.format(INTERVIEW_DATE_FORMAT).to_string(),
        question_ratings: ratings.clone(),
        completed_schema: form.completed_schema.clone(),
        interview_duration_seconds,
    }
}

/// Validate and POST. No request is made when validation fails.
pub async fn submit(
    backend: &Backend,
    interview_id: &str,
    form: &DebriefForm,
    meta: &IntervieweeMeta,
    ratings: &QuestionRatingMap,
    interview_duration_seconds: Option<u64>,
) -> Result<(), AxisError> {
    form.validate()?;

    let submission = build_submission(form, meta, ratings, interview_duration_seconds, Utc::now());
    backend.submit_debrief(interview_id, &submission).await?;

    tracing::info!(
        interview_id = %interview_id,
        ratings = ratings.len(),
        "Debrief submitted"
    );
    Ok(())
}
