//! Terminal rendition of the environment guard.
//!
//! Fullscreen maps to the crossterm alternate screen; the wake lock is an
//! OS sleep-inhibitor child process held for the life of the session. Both
//! stay best-effort: a missing inhibitor binary or a denied terminal
//! capability degrades the session, never aborts it.

use std::io;
use std::process::{Child, Command, Stdio};

use crossterm::{cursor, execute, terminal};
use zenlock_core::EnvironmentGuard;

pub struct TerminalGuard {
    fullscreen_enabled: bool,
    wake_lock_enabled: bool,
    in_alternate_screen: bool,
    inhibitor: Option<Child>,
}

impl TerminalGuard {
    pub fn new(fullscreen_enabled: bool, wake_lock_enabled: bool) -> Self {
        Self {
            fullscreen_enabled,
            wake_lock_enabled,
            in_alternate_screen: false,
            inhibitor: None,
        }
    }

    #[cfg(target_os = "macos")]
    fn spawn_inhibitor() -> io::Result<Child> {
        Command::new("caffeinate")
            .arg("-di")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }

    #[cfg(target_os = "linux")]
    fn spawn_inhibitor() -> io::Result<Child> {
        Command::new("systemd-inhibit")
            .args([
                "--what=idle:sleep",
                "--who=zenlock",
                "--why=focus session",
                "sleep",
                "infinity",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    fn spawn_inhibitor() -> io::Result<Child> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "no sleep inhibitor available on this platform",
        ))
    }
}

impl EnvironmentGuard for TerminalGuard {
    fn supports_fullscreen(&self) -> bool {
        self.fullscreen_enabled
    }

    fn supports_wake_lock(&self) -> bool {
        self.wake_lock_enabled
    }

    fn enter_fullscreen(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.in_alternate_screen {
            return Ok(());
        }
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        self.in_alternate_screen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.in_alternate_screen {
            return Ok(());
        }
        execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
        self.in_alternate_screen = false;
        Ok(())
    }

    fn acquire_wake_lock(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.inhibitor.is_some() {
            return Ok(());
        }
        self.inhibitor = Some(Self::spawn_inhibitor()?);
        Ok(())
    }

    fn release_wake_lock(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(mut child) = self.inhibitor.take() {
            child.kill().ok();
            child.wait().ok();
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.release_wake_lock().ok();
        self.exit_fullscreen().ok();
    }
}
