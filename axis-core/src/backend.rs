//! Typed client for the AXIS backend endpoints.
//!
//! | Method | Path                        | Returns         |
//! |--------|-----------------------------|-----------------|
//! | POST   | /scrape                     | scraped_content |
//! | POST   | /generate                   | interview_id    |
//! | GET    | /brief/{id}                 | InterviewSession|
//! | POST   | /interviewee[/{id}]         | ack             |
//! | POST   | /debrief/{id}               | ack             |

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::error::AxisError;
use crate::http::HttpClient;
use crate::models::{DebriefSubmission, InterviewSession, IntervieweeSubmission};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapeRequest {
    pub company_name: String,
    pub company_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewee_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    scraped_content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateRequest {
    pub company_name: String,
    pub scraped_content: String,
    pub tamu_notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewee_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    interview_id: Option<String>,
}

/// Cheap to clone; all clones share one `HttpClient`.
#[derive(Clone)]
pub struct Backend {
    http: Arc<dyn HttpClient>,
}

impl Backend {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Returns the scraped text, or `None` when the scraper produced nothing usable.
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<Option<String>, AxisError> {
        let raw = self.http.post("/scrape", &serde_json::to_value(request)?).await?;
        let response: ScrapeResponse = envelope::unwrap_as(raw)?;
        Ok(response.scraped_content.filter(|s| !s.trim().is_empty()))
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<String, AxisError> {
        let raw = self
            .http
            .post("/generate", &serde_json::to_value(request)?)
            .await?;
        let response: GenerateResponse = envelope::unwrap_as(raw)?;
        response
            .interview_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AxisError::Decode("generate response has no interview_id".to_string()))
    }

    pub async fn fetch_brief(&self, interview_id: &str) -> Result<InterviewSession, AxisError> {
        let raw = self.http.get(&format!("/brief/{}", interview_id)).await?;
        let mut session: InterviewSession = envelope::unwrap_as(raw)?;
        if session.interview_id.is_empty() {
            session.interview_id = interview_id.to_string();
        }
        Ok(session)
    }

    /// Without an id the submission goes to the token microsite endpoint.
    pub async fn submit_interviewee(
        &self,
        interview_id: Option<&str>,
        submission: &IntervieweeSubmission,
    ) -> Result<Value, AxisError> {
        let path = match interview_id {
            Some(id) => format!("/interviewee/{}", id),
            None => "/interviewee".to_string(),
        };
        self.http.post(&path, &serde_json::to_value(submission)?).await
    }

    pub async fn submit_debrief(
        &self,
        interview_id: &str,
        submission: &DebriefSubmission,
    ) -> Result<Value, AxisError> {
        self.http
            .post(
                &format!("/debrief/{}", interview_id),
                &serde_json::to_value(submission)?,
            )
            .await
    }
}
