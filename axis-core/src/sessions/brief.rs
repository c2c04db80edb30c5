//! Brief session: the interviewer's dashboard for one interview.
//!
//! Owns the latest `GET /brief/{id}` snapshot, the selected tab, the poller
//! that watches for the interviewee's response and the debrief, and the
//! question ratings shared between the co-pilot and the debrief.
//!
//! Snapshots only ever move forward: once `debrief_completed` is seen it sticks,
//! even if a slower, older poll lands afterwards.

use std::borrow::Cow;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::Backend;
use crate::codec::{self, PayloadLimits};
use crate::error::AxisError;
use crate::models::{schema, InterviewSession, QuestionRatingMap, SchemaSection};
use crate::ports::{Clipboard, Navigator, Route};
use crate::sessions::copilot::CoPilot;
use crate::sessions::debrief::{self, DebriefForm, DebriefState};
use crate::sessions::intake::{IntervieweeMeta, SessionHandoff};
use crate::timer::ScheduledTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BriefTab {
    #[default]
    Brief,
    Schema,
    Email,
    Debrief,
}

impl BriefTab {
    pub const ALL: [BriefTab; 4] = [
        BriefTab::Brief,
        BriefTab::Schema,
        BriefTab::Email,
        BriefTab::Debrief,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BriefTab::Brief => "Full Brief",
            BriefTab::Schema => "Schema",
            BriefTab::Email => "Interviewee Email",
            BriefTab::Debrief => "Debrief",
        }
    }
}

/// Status banner shown above the tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    DebriefCompleted,
    IntervieweeResponded {
        corrections: usize,
        selected_questions: usize,
        wildcard: bool,
    },
}

#[derive(Debug, Default)]
struct SnapshotState {
    snapshot: Option<InterviewSession>,
    last_alert: Option<String>,
}

type SharedState = Arc<Mutex<SnapshotState>>;

// Shared by `load` and the poller so both apply the same merge rule.
async fn refresh(
    backend: &Backend,
    interview_id: &str,
    state: &SharedState,
) -> Result<InterviewSession, AxisError> {
    match backend.fetch_brief(interview_id).await {
        Ok(fresh) => {
            let mut guard = lock(state);
            let merged = match guard.snapshot.take() {
                Some(mut current) => {
                    current.merge(fresh);
                    current
                }
                None => fresh,
            };
            guard.snapshot = Some(merged.clone());
            guard.last_alert = None;
            Ok(merged)
        }
        Err(e) => {
            lock(state).last_alert = Some(e.user_message());
            Err(e)
        }
    }
}

fn lock(state: &SharedState) -> std::sync::MutexGuard<'_, SnapshotState> {
    // A panic while holding the lock cannot leave the snapshot half-written
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct BriefSession {
    interview_id: String,
    backend: Backend,
    navigator: Arc<dyn Navigator>,
    clipboard: Arc<dyn Clipboard>,
    limits: PayloadLimits,
    handoff: Option<IntervieweeMeta>,
    state: SharedState,
    tab: BriefTab,
    ratings: QuestionRatingMap,
    copilot_active: bool,
    copilot_elapsed: Option<u64>,
    debrief: DebriefState,
    poller: Option<ScheduledTask>,
}

impl BriefSession {
    pub fn new(
        interview_id: impl Into<String>,
        backend: Backend,
        navigator: Arc<dyn Navigator>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            interview_id: interview_id.into(),
            backend,
            navigator,
            clipboard,
            limits: PayloadLimits::default(),
            handoff: None,
            state: Arc::new(Mutex::new(SnapshotState::default())),
            tab: BriefTab::default(),
            ratings: QuestionRatingMap::new(),
            copilot_active: false,
            copilot_elapsed: None,
            debrief: DebriefState::default(),
            poller: None,
        }
    }

    /// Open the session straight from intake, keeping the entered metadata.
    pub fn from_handoff(
        handoff: SessionHandoff,
        backend: Backend,
        navigator: Arc<dyn Navigator>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        let mut session = Self::new(handoff.interview_id, backend, navigator, clipboard);
        session.handoff = Some(handoff.meta);
        session
    }

    pub fn with_limits(mut self, limits: PayloadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn interview_id(&self) -> &str {
        &self.interview_id
    }

    // ========================================================================
    // Loading and polling
    // ========================================================================

    /// Fetch and merge the latest snapshot. On failure the previous snapshot stays.
    pub async fn load(&self) -> Result<InterviewSession, AxisError> {
        let result = refresh(&self.backend, &self.interview_id, &self.state).await;
        if let Err(e) = &result {
            tracing::warn!(interview_id = %self.interview_id, error = %e, "Brief load failed");
        }
        result
    }

    /// Re-load every `period` until the debrief is completed. Replaces any
    /// running poller.
    pub fn start_polling(&mut self, period: Duration) {
        let backend = self.backend.clone();
        let interview_id = self.interview_id.clone();
        let state = self.state.clone();

        tracing::info!(
            interview_id = %interview_id,
            interval_secs = period.as_secs_f64(),
            "Polling for brief updates"
        );

        self.poller = Some(ScheduledTask::every(period, move || {
            let backend = backend.clone();
            let interview_id = interview_id.clone();
            let state = state.clone();
            async move {
                let completed = lock(&state)
                    .snapshot
                    .as_ref()
                    .is_some_and(|s| s.debrief_completed);
                if completed {
                    return;
                }
                if let Err(e) = refresh(&backend, &interview_id, &state).await {
                    tracing::warn!(interview_id = %interview_id, error = %e, "Poll failed");
                }
            }
        }));
    }

    pub fn stop_polling(&mut self) {
        self.poller = None;
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| p.is_active())
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    pub fn snapshot(&self) -> Option<InterviewSession> {
        lock(&self.state).snapshot.clone()
    }

    /// Message from the most recent failed load, cleared by the next success.
    pub fn last_alert(&self) -> Option<String> {
        lock(&self.state).last_alert.clone()
    }

    pub fn is_completed(&self) -> bool {
        self.debrief == DebriefState::Submitted
            || lock(&self.state)
                .snapshot
                .as_ref()
                .is_some_and(|s| s.debrief_completed)
    }

    pub fn banner(&self) -> Option<Banner> {
        if self.is_completed() {
            return Some(Banner::DebriefCompleted);
        }
        let guard = lock(&self.state);
        let snapshot = guard.snapshot.as_ref()?;
        if snapshot.interviewee_responded() {
            Some(Banner::IntervieweeResponded {
                corrections: snapshot.interviewee_corrections.len(),
                selected_questions: snapshot.interviewee_selected_questions.len(),
                wildcard: !snapshot.interviewee_wildcard.trim().is_empty(),
            })
        } else {
            None
        }
    }

    /// Company and interviewee details, preferring the server's values.
    pub fn meta(&self) -> IntervieweeMeta {
        let fallback = self.handoff.clone().unwrap_or_default();
        let guard = lock(&self.state);
        let Some(s) = guard.snapshot.as_ref() else {
            return fallback;
        };
        let pick = |server: &str, local: String| {
            if server.trim().is_empty() {
                local
            } else {
                server.to_string()
            }
        };
        IntervieweeMeta {
            company_name: pick(&s.company_name, fallback.company_name),
            interviewee_name: pick(&s.interviewee_name, fallback.interviewee_name),
            interviewee_title: pick(&s.interviewee_title, fallback.interviewee_title),
            sector: pick(&s.sector, fallback.sector),
        }
    }

    pub fn schema_view(&self) -> Vec<SchemaSection> {
        lock(&self.state)
            .snapshot
            .as_ref()
            .map(|s| schema::sections(&s.schema))
            .unwrap_or_default()
    }

    pub fn email(&self) -> Option<String> {
        lock(&self.state)
            .snapshot
            .as_ref()
            .map(|s| s.interviewee_email.clone())
            .filter(|e| !e.trim().is_empty())
    }

    pub fn tab(&self) -> BriefTab {
        self.tab
    }

    /// Pure presentation state; never fetches.
    pub fn select_tab(&mut self, tab: BriefTab) {
        self.tab = tab;
    }

    // ========================================================================
    // Interviewee links
    // ========================================================================

    /// `/i/{id}`: server-backed interviewee page.
    pub fn info_link(&self, origin: &str) -> String {
        Route::IntervieweeInfo {
            id: self.interview_id.clone(),
        }
        .link(origin)
    }

    /// `/interviewee?data=<token>`: self-contained microsite.
    pub fn microsite_link(&self, origin: &str) -> Result<String, AxisError> {
        let guard = lock(&self.state);
        let snapshot = guard
            .snapshot
            .as_ref()
            .ok_or_else(|| AxisError::validation("brief", "The brief has not loaded yet"))?;
        let token = codec::encode(snapshot, self.limits)?;
        Ok(Route::Microsite { token }.link(origin))
    }

    pub fn copy_microsite_link(&self, origin: &str) -> Result<String, AxisError> {
        let link = self.microsite_link(origin)?;
        self.clipboard.write_text(&link)?;
        Ok(link)
    }

    // ========================================================================
    // Co-pilot
    // ========================================================================

    /// Start a walkthrough over the loaded questions. Ratings from an earlier
    /// visit carry over; hand the co-pilot back with `exit_copilot`.
    pub fn enter_copilot(&mut self) -> Result<CoPilot, AxisError> {
        if self.copilot_active {
            return Err(AxisError::validation("copilot", "The co-pilot is already running"));
        }
        let questions = lock(&self.state)
            .snapshot
            .as_ref()
            .map(|s| s.questions.clone())
            .unwrap_or_default();

        if questions.is_empty() {
            return Err(AxisError::validation(
                "questions",
                "This brief has no questions to walk through yet",
            ));
        }

        let mut copilot = CoPilot::new(questions, std::mem::take(&mut self.ratings))?;
        copilot.start_clock();
        self.copilot_active = true;
        Ok(copilot)
    }

    pub fn exit_copilot(&mut self, copilot: CoPilot) {
        let outcome = copilot.exit();
        self.ratings = outcome.ratings;
        self.copilot_active = false;
        if outcome.completed {
            self.copilot_elapsed = Some(outcome.elapsed_secs);
            self.tab = BriefTab::Debrief;
        }
    }

    pub fn ratings(&self) -> &QuestionRatingMap {
        &self.ratings
    }

    // ========================================================================
    // Debrief
    // ========================================================================

    pub fn debrief_state(&self) -> DebriefState {
        self.debrief
    }

    /// POST the debrief with the session's ratings. The form is only borrowed,
    /// so a failed submission leaves the caller's input intact.
    pub async fn submit_debrief(&mut self, form: &DebriefForm) -> Result<(), AxisError> {
        if self.debrief == DebriefState::Submitted {
            return Err(AxisError::validation("debrief", "This debrief was already submitted"));
        }
        if self.copilot_active {
            return Err(AxisError::validation(
                "copilot",
                "Leave the co-pilot before submitting the debrief",
            ));
        }

        // A form without its own schema sends the brief's, as pre-filled on the tab
        let schema = lock(&self.state)
            .snapshot
            .as_ref()
            .map(|s| s.schema.clone())
            .filter(|schema| !schema.is_null());
        let form = match schema {
            Some(schema) if form.completed_schema.is_null() => Cow::Owned(DebriefForm {
                completed_schema: schema,
                ..form.clone()
            }),
            _ => Cow::Borrowed(form),
        };

        let meta = self.meta();
        debrief::submit(
            &self.backend,
            &self.interview_id,
            &form,
            &meta,
            &self.ratings,
            self.copilot_elapsed,
        )
        .await?;

        self.debrief = DebriefState::Submitted;
        if let Some(s) = lock(&self.state).snapshot.as_mut() {
            s.debrief_completed = true;
        }
        self.stop_polling();
        Ok(())
    }

    /// Drop all local state and return to intake. Server data is untouched.
    pub fn reset(self) {
        tracing::info!(interview_id = %self.interview_id, "Session reset");
        self.navigator.navigate(Route::Intake);
    }
}
