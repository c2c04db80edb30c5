use thiserror::Error;

#[derive(Error, Debug)]
pub enum AxisError {
    #[error("Validation error: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("A generate request is already in flight")]
    Busy,

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AxisError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Classify a non-2xx HTTP status. `message` is whatever the server body
    /// offered; `status_text` is the canonical reason phrase.
    pub fn from_status(status: u16, message: Option<String>, status_text: &str) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| status_text.to_string());

        if (400..500).contains(&status) {
            Self::Client { status, message }
        } else {
            Self::Server { status, message }
        }
    }

    /// Text for the blocking notification shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Network(_) => {
                "Could not reach the AXIS backend. Check your connection and try again.".to_string()
            }
            Self::Client { message, .. } => message.clone(),
            Self::Server { status, .. } => format!(
                "Something went wrong on the server (HTTP {}). Check the backend logs.",
                status
            ),
            Self::Decode(_) => "This link is invalid or incomplete.".to_string(),
            Self::Busy => "Already working on it. Please wait.".to_string(),
            Self::Config(e) => format!("Configuration problem: {}", e),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<serde_json::Error> for AxisError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
