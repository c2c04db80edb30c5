//! Polling behavior of the brief dashboard.

mod common;

use std::time::Duration;

use axis_core::Banner;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn brief(completed: bool) -> serde_json::Value {
    json!({
        "interview_id": "abc123",
        "company_name": "Acme Corp",
        "status": "brief_ready",
        "debrief_completed": completed
    })
}

async fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

#[tokio::test]
async fn test_poll_picks_up_completion_without_manual_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brief/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(brief(false)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/brief/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(brief(true)))
        .mount(&server)
        .await;

    let (mut session, _nav) = common::brief_session(&server, "abc123");
    session.load().await.unwrap();
    assert_eq!(session.banner(), None);

    session.start_polling(Duration::from_millis(50));

    assert!(
        wait_for(|| session.banner() == Some(Banner::DebriefCompleted)).await,
        "completion banner should appear after the next poll"
    );
    assert!(session.is_completed());
}

#[tokio::test]
async fn test_completion_never_regresses_across_polls() {
    let server = MockServer::start().await;
    // Completed first, then a stale replica answers with the old state
    Mock::given(method("GET"))
        .and(path("/brief/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(brief(true)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/brief/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(brief(false)))
        .mount(&server)
        .await;

    let (session, _nav) = common::brief_session(&server, "abc123");
    assert!(session.load().await.unwrap().debrief_completed);
    assert!(session.load().await.unwrap().debrief_completed);
    assert_eq!(session.banner(), Some(Banner::DebriefCompleted));
}

#[tokio::test]
async fn test_poller_stops_fetching_once_completed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brief/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(brief(true)))
        .expect(1)
        .mount(&server)
        .await;

    let (mut session, _nav) = common::brief_session(&server, "abc123");
    session.load().await.unwrap();
    session.start_polling(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(200)).await;
    // MockServer verifies `expect(1)` on drop
}

#[tokio::test]
async fn test_dropping_session_tears_down_poller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brief/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(brief(false)))
        .expect(0)
        .mount(&server)
        .await;

    let (mut session, _nav) = common::brief_session(&server, "abc123");
    session.start_polling(Duration::from_millis(100));
    drop(session);
    tokio::time::sleep(Duration::from_millis(300)).await;
}
