mod clock;
mod controller;
mod guard;

pub use clock::SessionClock;
pub use controller::{SessionController, SessionState, MAX_DURATION_SECS, MIN_DURATION_SECS};
pub use guard::{EnvironmentGuard, NullGuard};
