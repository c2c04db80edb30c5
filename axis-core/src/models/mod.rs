pub mod debrief;
pub mod payload;
pub mod response;
pub mod schema;
pub mod session;

pub use debrief::{DebriefSubmission, QuestionRatingMap, Rating};
pub use payload::{IntervieweePayload, PayloadQuestion};
pub use response::{FactResponse, IntervieweeSubmission, QuestionInterest};
pub use schema::{SchemaField, SchemaSection};
pub use session::{FactCorrection, InterviewSession, Question};
