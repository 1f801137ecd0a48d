//! Focus session state machine.
//!
//! The controller is a plain synchronous state machine. It does not use
//! internal threads - the caller forwards clock ticks via `tick()` and
//! environment signals via `report_violation()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Focusing -> (Violation | Completed) -> Idle (explicit reset)
//! ```
//!
//! No other transition is legal; illegal calls are silent no-ops that
//! return `None`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::guard::{EnvironmentGuard, NullGuard};
use crate::events::{Event, ViolationTrigger};

/// Shortest session the controller accepts (1 minute).
pub const MIN_DURATION_SECS: u64 = 60;
/// Longest session the controller accepts (60 minutes).
pub const MAX_DURATION_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Focusing,
    /// The session was aborted by leaving the app or by force exit.
    /// Terminal for this session instance.
    Violation,
    /// The countdown ran to zero. Terminal for this session instance.
    Completed,
}

/// Core session state machine.
///
/// Owns the single live Session and the environment guard. Guard failures
/// are logged and swallowed here; they never block a transition.
pub struct SessionController {
    guard: Box<dyn EnvironmentGuard>,
    state: SessionState,
    session_id: Option<Uuid>,
    total_secs: u64,
    remaining_secs: u64,
    quote: Option<String>,
    wake_lock_held: bool,
}

impl SessionController {
    pub fn new(guard: Box<dyn EnvironmentGuard>) -> Self {
        Self {
            guard,
            state: SessionState::Idle,
            session_id: None,
            total_secs: 0,
            remaining_secs: 0,
            quote: None,
            wake_lock_held: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn quote(&self) -> Option<&str> {
        self.quote.as_deref()
    }

    /// 0.0 .. 1.0 elapsed fraction of the session.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.total_secs - self.remaining_secs) as f64 / self.total_secs as f64
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            session_id: self.session_id,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress: self.progress(),
            quote: self.quote.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a focus session. Valid only from Idle with a duration in
    /// [`MIN_DURATION_SECS`]..=[`MAX_DURATION_SECS`].
    ///
    /// Protections are strictly best-effort: fullscreen and wake-lock
    /// failures are logged and the transition proceeds regardless. The
    /// returned event carries the context string for the asynchronous
    /// quote fetch -- the transition is never gated on the quote.
    pub fn start(&mut self, duration_secs: u64) -> Option<Event> {
        if self.state != SessionState::Idle {
            tracing::debug!(state = ?self.state, "start rejected: session already live");
            return None;
        }
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&duration_secs) {
            tracing::debug!(duration_secs, "start rejected: duration out of range");
            return None;
        }

        if self.guard.supports_fullscreen() {
            if let Err(e) = self.guard.enter_fullscreen() {
                tracing::warn!(error = %e, "fullscreen enter failed");
            }
        } else {
            tracing::debug!("fullscreen capability absent");
        }

        let quote_context = quote_context(duration_secs);

        if self.guard.supports_wake_lock() {
            match self.guard.acquire_wake_lock() {
                Ok(()) => self.wake_lock_held = true,
                Err(e) => tracing::warn!(error = %e, "wake lock acquire failed"),
            }
        } else {
            tracing::debug!("wake lock capability absent");
        }

        let session_id = Uuid::new_v4();
        self.session_id = Some(session_id);
        self.total_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.quote = None;
        self.state = SessionState::Focusing;

        Some(Event::SessionStarted {
            session_id,
            duration_secs,
            quote_context,
            at: Utc::now(),
        })
    }

    /// Abort the running session. The single entry point for both the
    /// visibility watcher and the manual force-exit gesture; calling it
    /// while not Focusing is a no-op.
    pub fn report_violation(&mut self, trigger: ViolationTrigger) -> Option<Event> {
        if self.state != SessionState::Focusing {
            return None;
        }
        let session_id = self.session_id?;
        self.release_protections();
        self.state = SessionState::Violation;
        Some(Event::SessionViolated {
            session_id,
            remaining_secs: self.remaining_secs,
            trigger,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second. Forwarded from the clock once
    /// per second while Focusing; ticks in any other state change nothing.
    ///
    /// Returns `Some(Event::SessionCompleted)` when the countdown reaches
    /// zero -- the sole path to the Completed state.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != SessionState::Focusing {
            return None;
        }
        let session_id = self.session_id?;
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.release_protections();
        self.state = SessionState::Completed;
        Some(Event::SessionCompleted {
            session_id,
            duration_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    /// Return to Idle from a terminal state, clearing the session.
    /// Tolerated (as a no-op) from Idle; rejected while Focusing.
    pub fn reset(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Violation | SessionState::Completed => {
                self.session_id = None;
                self.total_secs = 0;
                self.remaining_secs = 0;
                self.quote = None;
                self.state = SessionState::Idle;
                Some(Event::SessionReset { at: Utc::now() })
            }
            _ => None,
        }
    }

    /// Record a resolved catalyst quote.
    ///
    /// Late results are discarded: the id must match the live session and
    /// the state must still be Focusing, otherwise `None`.
    pub fn resolve_quote(&mut self, session_id: Uuid, text: impl Into<String>) -> Option<Event> {
        if self.state != SessionState::Focusing || self.session_id != Some(session_id) {
            tracing::debug!(%session_id, "discarding quote for ended session");
            return None;
        }
        let quote = text.into();
        self.quote = Some(quote.clone());
        Some(Event::QuoteReady {
            session_id,
            quote,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn release_protections(&mut self) {
        if self.wake_lock_held {
            if let Err(e) = self.guard.release_wake_lock() {
                tracing::warn!(error = %e, "wake lock release failed");
            }
            self.wake_lock_held = false;
        }
        if let Err(e) = self.guard.exit_fullscreen() {
            tracing::warn!(error = %e, "fullscreen exit failed");
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(Box::new(NullGuard))
    }
}

/// Context string handed to the quote provider, derived from the duration.
fn quote_context(duration_secs: u64) -> String {
    format!("{} minute session", duration_secs / 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focusing(duration_secs: u64) -> SessionController {
        let mut ctl = SessionController::default();
        assert!(ctl.start(duration_secs).is_some());
        ctl
    }

    #[test]
    fn start_enters_focusing_with_full_remaining() {
        let mut ctl = SessionController::default();
        let event = ctl.start(600).expect("start from idle");
        assert_eq!(ctl.state(), SessionState::Focusing);
        assert_eq!(ctl.remaining_secs(), 600);
        assert_eq!(ctl.total_secs(), 600);
        match event {
            Event::SessionStarted {
                duration_secs,
                quote_context,
                ..
            } => {
                assert_eq!(duration_secs, 600);
                assert_eq!(quote_context, "10 minute session");
            }
            other => panic!("expected SessionStarted, got {other:?}"),
        }
    }

    #[test]
    fn start_rejects_out_of_range_durations() {
        let mut ctl = SessionController::default();
        assert!(ctl.start(0).is_none());
        assert!(ctl.start(59).is_none());
        assert!(ctl.start(3601).is_none());
        assert_eq!(ctl.state(), SessionState::Idle);
    }

    #[test]
    fn start_while_focusing_is_rejected() {
        let mut ctl = focusing(300);
        assert!(ctl.start(600).is_none());
        assert_eq!(ctl.remaining_secs(), 300);
    }

    #[test]
    fn countdown_completes_after_exactly_duration_ticks() {
        let mut ctl = focusing(600);
        for _ in 0..599 {
            assert!(ctl.tick().is_none());
        }
        assert_eq!(ctl.state(), SessionState::Focusing);
        assert_eq!(ctl.remaining_secs(), 1);

        let event = ctl.tick().expect("final tick completes");
        assert!(matches!(event, Event::SessionCompleted { .. }));
        assert_eq!(ctl.state(), SessionState::Completed);
        assert_eq!(ctl.remaining_secs(), 0);

        // No tick has effect after Completed.
        assert!(ctl.tick().is_none());
        assert_eq!(ctl.remaining_secs(), 0);
    }

    #[test]
    fn violation_freezes_remaining_and_halts_ticks() {
        let mut ctl = focusing(300);
        for _ in 0..10 {
            ctl.tick();
        }
        let event = ctl
            .report_violation(ViolationTrigger::Hidden)
            .expect("violation while focusing");
        match event {
            Event::SessionViolated { remaining_secs, .. } => assert_eq!(remaining_secs, 290),
            other => panic!("expected SessionViolated, got {other:?}"),
        }
        assert_eq!(ctl.state(), SessionState::Violation);

        for _ in 0..10 {
            assert!(ctl.tick().is_none());
        }
        assert_eq!(ctl.remaining_secs(), 290);
    }

    #[test]
    fn violation_outside_focusing_is_noop() {
        let mut ctl = SessionController::default();
        assert!(ctl.report_violation(ViolationTrigger::Hidden).is_none());
        assert_eq!(ctl.state(), SessionState::Idle);

        let mut ctl = focusing(60);
        ctl.report_violation(ViolationTrigger::ForceExit);
        // Second report must not double-transition.
        assert!(ctl.report_violation(ViolationTrigger::Hidden).is_none());
        assert_eq!(ctl.state(), SessionState::Violation);
    }

    #[test]
    fn reset_returns_to_idle_and_clears_session() {
        let mut ctl = focusing(120);
        ctl.report_violation(ViolationTrigger::Hidden);
        assert!(ctl.reset().is_some());
        assert_eq!(ctl.state(), SessionState::Idle);
        assert_eq!(ctl.remaining_secs(), 0);
        assert_eq!(ctl.total_secs(), 0);
        assert!(ctl.quote().is_none());
        assert!(ctl.session_id().is_none());

        // A fresh start behaves identically to a first session.
        assert!(ctl.start(60).is_some());
        assert_eq!(ctl.remaining_secs(), 60);
        assert!(ctl.reset().is_none(), "reset must be rejected while focusing");
    }

    #[test]
    fn reset_from_idle_is_noop() {
        let mut ctl = SessionController::default();
        assert!(ctl.reset().is_none());
        assert_eq!(ctl.state(), SessionState::Idle);
    }

    #[test]
    fn quote_applies_only_to_the_live_focusing_session() {
        let mut ctl = SessionController::default();
        let id = match ctl.start(60) {
            Some(Event::SessionStarted { session_id, .. }) => session_id,
            other => panic!("expected SessionStarted, got {other:?}"),
        };
        assert!(ctl.resolve_quote(id, "Begin.").is_some());
        assert_eq!(ctl.quote(), Some("Begin."));

        // Stale id: discarded.
        assert!(ctl.resolve_quote(Uuid::new_v4(), "stale").is_none());
        assert_eq!(ctl.quote(), Some("Begin."));

        // After the session ends: discarded.
        ctl.report_violation(ViolationTrigger::Hidden);
        assert!(ctl.resolve_quote(id, "late").is_none());
    }

    #[test]
    fn progress_is_elapsed_over_total() {
        let mut ctl = focusing(100);
        assert_eq!(ctl.progress(), 0.0);
        for _ in 0..25 {
            ctl.tick();
        }
        assert!((ctl.progress() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_is_zero_when_idle() {
        let ctl = SessionController::default();
        assert_eq!(ctl.progress(), 0.0);
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let mut ctl = focusing(300);
        ctl.tick();
        match ctl.snapshot() {
            Event::StateSnapshot {
                state,
                remaining_secs,
                total_secs,
                quote,
                ..
            } => {
                assert_eq!(state, SessionState::Focusing);
                assert_eq!(remaining_secs, 299);
                assert_eq!(total_secs, 300);
                assert!(quote.is_none());
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }
}
