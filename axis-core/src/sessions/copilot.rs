//! Live co-pilot: walk the question list during the interview.
//!
//! `Active(i)` for each question, then `Complete`. Ratings are in-memory only
//! until the debrief is submitted. The clock ticks once a second from the
//! moment the clock is started until exit or completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AxisError;
use crate::models::{Question, QuestionRatingMap, Rating};
use crate::timer::ScheduledTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoPilotState {
    Active(usize),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Vague,
    Deep,
}

type CompletionCallback = Box<dyn FnMut() + Send>;

pub struct CoPilot {
    questions: Vec<Question>,
    state: CoPilotState,
    follow_up: Option<FollowUp>,
    ratings: QuestionRatingMap,
    elapsed: Arc<AtomicU64>,
    clock: Option<ScheduledTask>,
    on_complete: Option<CompletionCallback>,
}

impl std::fmt::Debug for CoPilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoPilot")
            .field("questions", &self.questions.len())
            .field("state", &self.state)
            .field("ratings", &self.ratings)
            .field("elapsed", &self.elapsed_secs())
            .finish()
    }
}

impl CoPilot {
    /// `ratings` carries over from an earlier visit in the same brief session.
    pub fn new(questions: Vec<Question>, ratings: QuestionRatingMap) -> Result<Self, AxisError> {
        if questions.is_empty() {
            return Err(AxisError::validation(
                "questions",
                "This brief has no questions to walk through yet",
            ));
        }
        Ok(Self {
            questions,
            state: CoPilotState::Active(0),
            follow_up: None,
            ratings,
            elapsed: Arc::new(AtomicU64::new(0)),
            clock: None,
            on_complete: None,
        })
    }

    /// Invoked once, on the transition into `Complete`.
    pub fn on_complete(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Start the elapsed clock. Requires a tokio runtime.
    pub fn start_clock(&mut self) {
        if self.clock.is_some() || self.is_complete() {
            return;
        }
        let elapsed = self.elapsed.clone();
        self.clock = Some(ScheduledTask::every(Duration::from_secs(1), move || {
            let elapsed = elapsed.clone();
            async move {
                elapsed.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    fn stop_clock(&mut self) {
        self.clock = None;
    }

    pub fn state(&self) -> CoPilotState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == CoPilotState::Complete
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            CoPilotState::Active(i) => Some(i),
            CoPilotState::Complete => None,
        }
    }

    pub fn current(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.questions.get(i))
    }

    /// Reveal a follow-up prompt for the current question, if it has one.
    pub fn show_follow_up(&mut self, kind: FollowUp) -> Option<&str> {
        let index = self.current_index()?;
        let question = &self.questions[index];
        let text = match kind {
            FollowUp::Vague => question.follow_up_if_vague.as_deref(),
            FollowUp::Deep => question.follow_up_if_deep.as_deref(),
        };
        if text.is_some() {
            self.follow_up = Some(kind);
        }
        text
    }

    pub fn follow_up_shown(&self) -> Option<FollowUp> {
        self.follow_up
    }

    /// Advance; from the last question this completes the walkthrough.
    pub fn next(&mut self) -> CoPilotState {
        let CoPilotState::Active(index) = self.state else {
            return self.state;
        };

        self.follow_up = None;
        if index + 1 < self.questions.len() {
            self.state = CoPilotState::Active(index + 1);
        } else {
            self.state = CoPilotState::Complete;
            self.stop_clock();
            tracing::info!(
                rated = self.ratings.len(),
                elapsed_secs = self.elapsed_secs(),
                "Co-pilot walkthrough complete"
            );
            if let Some(mut callback) = self.on_complete.take() {
                callback();
            }
        }
        self.state
    }

    /// Rate the current question; re-rating overwrites. No-op once complete.
    pub fn rate(&mut self, effective: bool) -> bool {
        match self.current_index() {
            Some(index) => {
                self.ratings.insert(index, Rating::from_effective(effective));
                true
            }
            None => false,
        }
    }

    pub fn ratings(&self) -> &QuestionRatingMap {
        &self.ratings
    }

    pub fn rating(&self, index: usize) -> Option<Rating> {
        self.ratings.get(&index).copied()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    /// `MM:SS`, minutes uncapped.
    pub fn elapsed_display(&self) -> String {
        let secs = self.elapsed_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Leave the walkthrough, complete or not, handing the ratings back.
    pub fn exit(mut self) -> CoPilotOutcome {
        self.stop_clock();
        CoPilotOutcome {
            completed: self.is_complete(),
            elapsed_secs: self.elapsed_secs(),
            ratings: std::mem::take(&mut self.ratings),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoPilotOutcome {
    pub completed: bool,
    pub elapsed_secs: u64,
    pub ratings: QuestionRatingMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                question_text: format!("Question {i}"),
                follow_up_if_vague: Some(format!("Can you give an example for {i}?")),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_empty_question_list_rejected() {
        let err = CoPilot::new(vec![], QuestionRatingMap::new()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rerating_last_write_wins() {
        let mut copilot = CoPilot::new(questions(3), QuestionRatingMap::new()).unwrap();
        copilot.next();
        assert!(copilot.rate(true));
        assert!(copilot.rate(false));

        assert_eq!(copilot.ratings().len(), 1);
        assert_eq!(copilot.rating(1), Some(Rating::Ineffective));
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let mut copilot = CoPilot::new(questions(2), QuestionRatingMap::new())
            .unwrap()
            .on_complete(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });

        assert_eq!(copilot.next(), CoPilotState::Active(1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(copilot.next(), CoPilotState::Complete);
        assert_eq!(copilot.next(), CoPilotState::Complete);
        assert_eq!(copilot.next(), CoPilotState::Complete);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!copilot.rate(true), "rating after completion is ignored");
    }

    #[test]
    fn test_next_clears_follow_up() {
        let mut copilot = CoPilot::new(questions(2), QuestionRatingMap::new()).unwrap();
        assert_eq!(
            copilot.show_follow_up(FollowUp::Vague),
            Some("Can you give an example for 0?")
        );
        assert_eq!(copilot.follow_up_shown(), Some(FollowUp::Vague));
        // No deep follow-up on this question; the shown hint is unchanged
        assert_eq!(copilot.show_follow_up(FollowUp::Deep), None);
        assert_eq!(copilot.follow_up_shown(), Some(FollowUp::Vague));

        copilot.next();
        assert_eq!(copilot.follow_up_shown(), None);
    }

    #[test]
    fn test_exit_keeps_ratings_without_completing() {
        let mut earlier = QuestionRatingMap::new();
        earlier.insert(2, Rating::Effective);

        let mut copilot = CoPilot::new(questions(3), earlier).unwrap();
        copilot.rate(false);
        let outcome = copilot.exit();

        assert!(!outcome.completed);
        assert_eq!(outcome.ratings.get(&0), Some(&Rating::Ineffective));
        assert_eq!(outcome.ratings.get(&2), Some(&Rating::Effective));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_counts_seconds_and_stops_on_completion() {
        let mut copilot = CoPilot::new(questions(1), QuestionRatingMap::new()).unwrap();
        copilot.start_clock();

        tokio::time::sleep(Duration::from_millis(65_500)).await;
        assert_eq!(copilot.elapsed_secs(), 65);
        assert_eq!(copilot.elapsed_display(), "01:05");

        copilot.next();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(copilot.elapsed_secs(), 65, "clock stops at completion");
    }
}
