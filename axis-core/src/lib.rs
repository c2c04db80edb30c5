pub mod backend;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod models;
pub mod ports;
pub mod sessions;
pub mod timer;

pub use backend::Backend;
pub use config::AxisConfig;
pub use envelope::Envelope;
pub use error::AxisError;
pub use http::{HttpClient, ReqwestHttpClient};
pub use ports::{Clipboard, MemoryClipboard, Navigator, RecordingNavigator, Route};
pub use sessions::brief::{Banner, BriefSession, BriefTab};
pub use sessions::copilot::{CoPilot, CoPilotOutcome, CoPilotState, FollowUp};
pub use sessions::debrief::{DebriefForm, DebriefState};
pub use sessions::intake::{Intake, IntakeForm, IntakeStage, IntervieweeMeta, SessionHandoff};
pub use sessions::microsite::Microsite;
pub use timer::ScheduledTask;
