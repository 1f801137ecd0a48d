//! # Zenlock Core Library
//!
//! Core business logic for Zenlock, a locked focus-session timer. The CLI
//! binary is a thin presentation layer over this library.
//!
//! ## Architecture
//!
//! - **Session Controller**: a synchronous state machine
//!   (`Idle -> Focusing -> Violation | Completed -> Idle`) driven by
//!   external clock ticks and environment signals
//! - **Session Clock**: 1 Hz tick driver over a tokio interval
//! - **Environment Guard**: best-effort platform protections (fullscreen,
//!   wake lock) behind a trait so platforms and tests can substitute
//! - **Quotes**: async motivational-quote collaborator with fixed
//!   fallbacks, backed by Gemini or an offline pool
//! - **Storage**: TOML configuration and OS-keyring credential storage
//!
//! ## Key Components
//!
//! - [`SessionController`]: the state machine
//! - [`SessionClock`]: tick source
//! - [`EnvironmentGuard`]: platform capability trait
//! - [`QuoteProvider`]: quote collaborator trait
//! - [`Config`]: application configuration

pub mod error;
pub mod events;
pub mod quotes;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, QuoteError, ValidationError};
pub use events::{Event, ViolationTrigger};
pub use quotes::{CannedQuotes, GeminiQuotes, QuoteProvider};
pub use session::{
    EnvironmentGuard, NullGuard, SessionClock, SessionController, SessionState,
    MAX_DURATION_SECS, MIN_DURATION_SECS,
};
pub use storage::Config;
