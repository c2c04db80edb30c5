//! Co-pilot walkthrough feeding the debrief submission.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axis_core::{BriefTab, CoPilotState, DebriefForm, DebriefState};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_three_question_walkthrough_ratings_reach_debrief() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brief/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interview_id": "abc123",
            "company_name": "Acme Corp",
            "sector": "aerospace",
            "interviewee_name": "Dana Reyes",
            "interviewee_title": "COO",
            "questions": [
                { "question_text": "How do you hire?", "follow_up_if_vague": "Last hire?" },
                { "question_text": "What is your biggest risk?" },
                { "question_text": "Where are you expanding?" }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/debrief/abc123"))
        .and(body_partial_json(json!({
            "key_insights": "Hiring is the bottleneck",
            "company_name": "Acme Corp",
            "sector": "aerospace",
            "interviewee_name": "Dana Reyes",
            "interviewee_title": "COO",
            "question_ratings": { "0": "effective", "1": "ineffective", "2": "effective" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut session, _nav) = common::brief_session(&server, "abc123");
    session.load().await.unwrap();

    let completions = Arc::new(AtomicUsize::new(0));
    let c = completions.clone();
    let mut copilot = session.enter_copilot().unwrap().on_complete(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });

    for effective in [true, false, true] {
        assert!(copilot.rate(effective));
        copilot.next();
    }
    assert_eq!(copilot.state(), CoPilotState::Complete);
    copilot.next();
    assert_eq!(completions.load(Ordering::SeqCst), 1);

    session.exit_copilot(copilot);
    assert_eq!(session.tab(), BriefTab::Debrief);

    let form = DebriefForm {
        key_insights: "Hiring is the bottleneck".into(),
        questions_that_worked: vec!["How do you hire?".into()],
        ..Default::default()
    };
    session.submit_debrief(&form).await.unwrap();
    assert_eq!(session.debrief_state(), DebriefState::Submitted);
}
