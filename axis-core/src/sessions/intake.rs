//! Session intake: company details in, interview id out.
//!
//! Runs the two-step pipeline `POST /scrape` -> `POST /generate` and hands off
//! to the brief dashboard. A missing scrape result never blocks generation;
//! the pipeline substitutes `"Company: {name}"`.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use crate::backend::{Backend, GenerateRequest, ScrapeRequest};
use crate::error::AxisError;
use crate::ports::{Navigator, Route};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeForm {
    pub company_name: String,
    pub company_url: String,
    pub interviewee_name: String,
    pub interviewee_title: String,
    pub sector: String,
    pub notes: String,
}

/// Interviewee details entered at intake, carried to the dashboard so it can
/// show them before the backend echoes them back. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervieweeMeta {
    pub company_name: String,
    pub interviewee_name: String,
    pub interviewee_title: String,
    pub sector: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionHandoff {
    pub interview_id: String,
    pub meta: IntervieweeMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStage {
    Idle,
    Scraping,
    Generating,
    Done,
}

impl IntakeStage {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => IntakeStage::Scraping,
            2 => IntakeStage::Generating,
            3 => IntakeStage::Done,
            _ => IntakeStage::Idle,
        }
    }
}

pub fn fallback_scraped_content(company_name: &str) -> String {
    format!("Company: {}", company_name)
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

pub struct Intake {
    backend: Backend,
    navigator: Arc<dyn Navigator>,
    in_flight: AtomicBool,
    stage: AtomicU8,
}

// Clears the in-flight flag however the pipeline exits.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Intake {
    pub fn new(backend: Backend, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            backend,
            navigator,
            in_flight: AtomicBool::new(false),
            stage: AtomicU8::new(IntakeStage::Idle as u8),
        }
    }

    pub fn stage(&self) -> IntakeStage {
        IntakeStage::from_u8(self.stage.load(Ordering::SeqCst))
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn set_stage(&self, stage: IntakeStage) {
        self.stage.store(stage as u8, Ordering::SeqCst);
    }

    /// Scrape, generate, and navigate to the new brief.
    ///
    /// The form is borrowed so the caller still holds it for editing if this fails.
    pub async fn generate(&self, form: &IntakeForm) -> Result<SessionHandoff, AxisError> {
        let company_name = form.company_name.trim();
        if company_name.is_empty() {
            return Err(AxisError::validation(
                "company_name",
                "Please enter a company name",
            ));
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AxisError::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let result = self.run_pipeline(company_name, form).await;
        match &result {
            Ok(handoff) => {
                self.set_stage(IntakeStage::Done);
                self.navigator.navigate(Route::Brief {
                    id: handoff.interview_id.clone(),
                });
            }
            Err(e) => {
                self.set_stage(IntakeStage::Idle);
                tracing::error!(company = %company_name, error = %e, "Brief generation failed");
            }
        }
        result
    }

    async fn run_pipeline(
        &self,
        company_name: &str,
        form: &IntakeForm,
    ) -> Result<SessionHandoff, AxisError> {
        let interviewee_name = non_empty(&form.interviewee_name);
        let interviewee_title = non_empty(&form.interviewee_title);
        let sector = non_empty(&form.sector);

        self.set_stage(IntakeStage::Scraping);
        tracing::info!(company = %company_name, "Scraping company data");

        let scrape = ScrapeRequest {
            company_name: company_name.to_string(),
            company_url: form.company_url.trim().to_string(),
            interviewee_name: interviewee_name.clone(),
            interviewee_title: interviewee_title.clone(),
            sector: sector.clone(),
        };
        let scraped_content = match self.backend.scrape(&scrape).await? {
            Some(content) => content,
            None => {
                tracing::warn!(company = %company_name, "Scrape returned no content, using fallback");
                fallback_scraped_content(company_name)
            }
        };

        self.set_stage(IntakeStage::Generating);
        tracing::info!(company = %company_name, "Generating interview brief");

        let generate = GenerateRequest {
            company_name: company_name.to_string(),
            scraped_content,
            tamu_notes: form.notes.clone(),
            interviewee_name: interviewee_name.clone(),
            interviewee_title: interviewee_title.clone(),
            sector: sector.clone(),
        };
        let interview_id = self.backend.generate(&generate).await?;

        tracing::info!(interview_id = %interview_id, "Brief generated");

        Ok(SessionHandoff {
            interview_id,
            meta: IntervieweeMeta {
                company_name: company_name.to_string(),
                interviewee_name: interviewee_name.unwrap_or_default(),
                interviewee_title: interviewee_title.unwrap_or_default(),
                sector: sector.unwrap_or_default(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ReqwestHttpClient;
    use crate::ports::RecordingNavigator;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn intake(server_uri: &str) -> (Intake, Arc<RecordingNavigator>) {
        let http = ReqwestHttpClient::with_base_url(server_uri, Duration::from_secs(5)).unwrap();
        let nav = Arc::new(RecordingNavigator::new());
        (Intake::new(Backend::new(Arc::new(http)), nav.clone()), nav)
    }

    #[tokio::test]
    async fn test_blank_company_name_makes_no_requests() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (intake, nav) = intake(&server.uri());
        for name in ["", "   ", "\t\n"] {
            let form = IntakeForm {
                company_name: name.to_string(),
                ..Default::default()
            };
            let err = intake.generate(&form).await.unwrap_err();
            assert!(err.is_validation(), "got {:?}", err);
        }
        assert!(nav.routes().is_empty());
        assert_eq!(intake.stage(), IntakeStage::Idle);
    }

    #[tokio::test]
    async fn test_interviewee_metadata_forwarded_and_handed_off() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .and(body_partial_json(json!({
                "company_name": "Acme Corp",
                "company_url": "https://acme.example",
                "interviewee_name": "Dana Reyes",
                "sector": "energy"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "scraped_content": "Acme builds rockets." })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(body_partial_json(json!({
                "scraped_content": "Acme builds rockets.",
                "tamu_notes": "Ask about internships",
                "interviewee_title": "COO"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "interview_id": "xyz789" })))
            .expect(1)
            .mount(&server)
            .await;

        let (intake, nav) = intake(&server.uri());
        let form = IntakeForm {
            company_name: "  Acme Corp ".into(),
            company_url: "https://acme.example".into(),
            interviewee_name: "Dana Reyes".into(),
            interviewee_title: "COO".into(),
            sector: "energy".into(),
            notes: "Ask about internships".into(),
        };
        let handoff = intake.generate(&form).await.unwrap();

        assert_eq!(handoff.interview_id, "xyz789");
        assert_eq!(handoff.meta.company_name, "Acme Corp");
        assert_eq!(handoff.meta.interviewee_title, "COO");
        assert_eq!(nav.last(), Some(Route::Brief { id: "xyz789".into() }));
        assert_eq!(intake.stage(), IntakeStage::Done);
        assert!(!intake.is_pending());
    }

    #[tokio::test]
    async fn test_scrape_failure_leaves_intake_editable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "message": "Bad gateway" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (intake, nav) = intake(&server.uri());
        let form = IntakeForm {
            company_name: "Acme Corp".into(),
            ..Default::default()
        };
        let err = intake.generate(&form).await.unwrap_err();

        assert!(matches!(err, AxisError::Server { status: 502, .. }));
        assert!(nav.routes().is_empty());
        assert!(!intake.is_pending(), "a failed run must release the in-flight flag");
        assert_eq!(intake.stage(), IntakeStage::Idle);
    }

    #[tokio::test]
    async fn test_concurrent_generate_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "scraped_content": "slow" }))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "interview_id": "one" })))
            .expect(1)
            .mount(&server)
            .await;

        let (intake, _nav) = intake(&server.uri());
        let form = IntakeForm {
            company_name: "Acme Corp".into(),
            ..Default::default()
        };

        let (first, second) = tokio::join!(intake.generate(&form), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            intake.generate(&form).await
        });

        assert_eq!(first.unwrap().interview_id, "one");
        assert!(matches!(second, Err(AxisError::Busy)));
    }
}
