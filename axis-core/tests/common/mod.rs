#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axis_core::{Backend, BriefSession, MemoryClipboard, RecordingNavigator, ReqwestHttpClient};
use wiremock::MockServer;

pub fn backend(server: &MockServer) -> Backend {
    let http = ReqwestHttpClient::with_base_url(&server.uri(), Duration::from_secs(5))
        .expect("Failed to create test client");
    Backend::new(Arc::new(http))
}

pub fn brief_session(server: &MockServer, id: &str) -> (BriefSession, Arc<RecordingNavigator>) {
    let nav = Arc::new(RecordingNavigator::new());
    let session = BriefSession::new(
        id,
        backend(server),
        nav.clone(),
        Arc::new(MemoryClipboard::new()),
    );
    (session, nav)
}
