//! Interviewee payload codec
//!
//! Packs a subset of an interview (company, up to five facts, up to five
//! questions) into a token that can sit directly in `/interviewee?data=<token>`.
//! The token is URL-safe base64 (no padding) over the payload JSON, so the
//! microsite needs no server lookup to render.
//!
//! Tokens carry no identity or signature. Anyone holding the link can answer.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::error::AxisError;
use crate::models::{InterviewSession, IntervieweePayload, PayloadQuestion};

pub const MAX_FACTS: usize = 5;
pub const MAX_QUESTIONS: usize = 5;

/// Item caps applied when deriving a payload from a session.
#[derive(Debug, Clone, Copy)]
pub struct PayloadLimits {
    pub max_facts: usize,
    pub max_questions: usize,
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            max_facts: MAX_FACTS,
            max_questions: MAX_QUESTIONS,
        }
    }
}

impl PayloadLimits {
    /// Clamp configured values to the codec's hard caps.
    pub fn new(max_facts: usize, max_questions: usize) -> Self {
        Self {
            max_facts: max_facts.min(MAX_FACTS),
            max_questions: max_questions.min(MAX_QUESTIONS),
        }
    }
}

/// Build the lossy interviewee subset of a session.
///
/// Questions come from the interviewee-facing list when the backend produced
/// one, otherwise from the interviewer's questions.
pub fn payload_from_session(session: &InterviewSession, limits: PayloadLimits) -> IntervieweePayload {
    let facts = session
        .facts
        .iter()
        .filter(|f| !f.trim().is_empty())
        .take(limits.max_facts)
        .cloned()
        .collect();

    let questions = if session.interviewee_questions.is_empty() {
        session
            .questions
            .iter()
            .map(|q| q.question_text.as_str())
            .filter(|t| !t.trim().is_empty())
            .take(limits.max_questions)
            .map(PayloadQuestion::from)
            .collect()
    } else {
        session
            .interviewee_questions
            .iter()
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .take(limits.max_questions)
            .map(PayloadQuestion::from)
            .collect()
    };

    IntervieweePayload {
        company: session.company_name.clone(),
        facts,
        questions,
    }
}

pub fn encode(session: &InterviewSession, limits: PayloadLimits) -> Result<String, AxisError> {
    encode_payload(&payload_from_session(session, limits))
}

pub fn encode_payload(payload: &IntervieweePayload) -> Result<String, AxisError> {
    check_limits(payload)?;
    let json = serde_json::to_vec(payload)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode(token: &str) -> Result<IntervieweePayload, AxisError> {
    let bytes = decode_bytes(token.trim())?;
    let payload: IntervieweePayload = serde_json::from_slice(&bytes)
        .map_err(|e| AxisError::Decode(format!("token is not an interviewee payload: {}", e)))?;
    check_limits(&payload)?;
    Ok(payload)
}

// Links shared before the URL-safe switch used the standard alphabet, with or without padding.
fn decode_bytes(token: &str) -> Result<Vec<u8>, AxisError> {
    if token.is_empty() {
        return Err(AxisError::Decode("empty token".to_string()));
    }
    let unpadded = token.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .or_else(|_| STANDARD_NO_PAD.decode(unpadded))
        .map_err(|e| AxisError::Decode(format!("token is not base64: {}", e)))
}

fn check_limits(payload: &IntervieweePayload) -> Result<(), AxisError> {
    if payload.facts.len() > MAX_FACTS || payload.questions.len() > MAX_QUESTIONS {
        return Err(AxisError::Decode(format!(
            "payload carries {} facts and {} questions (max {} facts, {} questions)",
            payload.facts.len(),
            payload.questions.len(),
            MAX_FACTS,
            MAX_QUESTIONS
        )));
    }
    Ok(())
}
