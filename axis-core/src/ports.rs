//! Platform capabilities the session components depend on.
//!
//! A browser shell, the CLI and the tests each provide their own adapters;
//! the in-memory ones below double as test fixtures.

use std::sync::Mutex;

use crate::error::AxisError;

/// The four screens of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Intake,
    /// `/brief/:id`: interviewer dashboard
    Brief { id: String },
    /// `/i/:id`: interviewee page backed by a server lookup
    IntervieweeInfo { id: String },
    /// `/interviewee?data=<token>`: self-contained microsite
    Microsite { token: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Intake => "/".to_string(),
            Route::Brief { id } => format!("/brief/{}", urlencoding::encode(id)),
            Route::IntervieweeInfo { id } => format!("/i/{}", urlencoding::encode(id)),
            Route::Microsite { token } => {
                format!("/interviewee?data={}", urlencoding::encode(token))
            }
        }
    }

    /// Absolute link under `origin`, e.g. `https://axis.example.edu`.
    pub fn link(&self, origin: &str) -> String {
        format!("{}{}", origin.trim_end_matches('/'), self.path())
    }

    /// Parse a path (with optional query). Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Intake),
            ["brief", id] => Some(Route::Brief {
                id: decode_component(id)?,
            }),
            ["i", id] => Some(Route::IntervieweeInfo {
                id: decode_component(id)?,
            }),
            ["interviewee"] => {
                let token = query?
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("data="))?;
                Some(Route::Microsite {
                    token: decode_component(token)?,
                })
            }
            _ => None,
        }
    }
}

fn decode_component(s: &str) -> Option<String> {
    let decoded = urlencoding::decode(s).ok()?.into_owned();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), AxisError>;
}

/// Records every navigation in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(path = %route.path(), "navigate");
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}

/// Holds the most recently copied text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), AxisError> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| AxisError::validation("clipboard", "clipboard is unavailable"))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}
