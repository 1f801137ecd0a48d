use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::SessionState;

/// What caused a focus session to be aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationTrigger {
    /// The app/terminal lost visibility while the session was running.
    Hidden,
    /// The user fired the deliberate double-activation force-exit gesture.
    ForceExit,
}

/// Every state change in the session lifecycle produces an Event.
/// The presentation layer renders from these; `--json` mode prints them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        duration_secs: u64,
        /// Context string handed to the quote provider for this session.
        quote_context: String,
        at: DateTime<Utc>,
    },
    /// The session was aborted before the countdown reached zero.
    SessionViolated {
        session_id: Uuid,
        /// Seconds that were still on the clock, frozen at abort time.
        remaining_secs: u64,
        trigger: ViolationTrigger,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. The only path to the Completed state.
    SessionCompleted {
        session_id: Uuid,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// The catalyst quote resolved while the session was still running.
    QuoteReady {
        session_id: Uuid,
        quote: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        session_id: Option<Uuid>,
        remaining_secs: u64,
        total_secs: u64,
        /// 0.0 .. 1.0 elapsed fraction of the session.
        progress: f64,
        quote: Option<String>,
        at: DateTime<Utc>,
    },
}
