//! Best-effort platform protections for a focus session.
//!
//! Every capability here is optional: a missing or denied capability must
//! never abort the session itself. The controller probes `supports_*`
//! before calling, logs any failure, and carries on.

/// Platform capability surface consumed during a focus session.
///
/// Implementations live at the platform edge (the CLI provides a terminal
/// guard); [`NullGuard`] is the capability-free stand-in used in tests and
/// unguarded runs.
pub trait EnvironmentGuard: Send {
    /// Whether a fullscreen takeover is available at all.
    fn supports_fullscreen(&self) -> bool {
        true
    }

    /// Whether a screen wake lock is available at all.
    fn supports_wake_lock(&self) -> bool {
        true
    }

    /// Enter fullscreen. May fail (denied, capability absent); the failure
    /// must not propagate past the controller.
    fn enter_fullscreen(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Leave fullscreen. Calling while not fullscreen is a no-op.
    fn exit_fullscreen(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Acquire a screen wake lock.
    fn acquire_wake_lock(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Release the wake lock. Releasing a lock not held is a no-op.
    fn release_wake_lock(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Guard with every capability absent. All operations succeed as no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGuard;

impl EnvironmentGuard for NullGuard {
    fn supports_fullscreen(&self) -> bool {
        false
    }

    fn supports_wake_lock(&self) -> bool {
        false
    }

    fn enter_fullscreen(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn acquire_wake_lock(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn release_wake_lock(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
