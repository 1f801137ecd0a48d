//! The live focus session: wires the controller to the clock, the terminal
//! guard, the focus watcher, and the quote fetch.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Subcommand;
use crossterm::event::{self, KeyCode, KeyEventKind};
use crossterm::{cursor, queue, style, terminal};
use tokio::sync::mpsc;

use zenlock_core::{
    quotes, Config, Event, QuoteProvider, SessionClock, SessionController, SessionState,
    ValidationError, ViolationTrigger, MAX_DURATION_SECS, MIN_DURATION_SECS,
};

use crate::guard::TerminalGuard;
use crate::views;

/// Window within which a second exit-key press confirms a force exit.
const FORCE_EXIT_WINDOW: Duration = Duration::from_millis(1500);

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a locked focus session
    Start {
        /// Session length in minutes (1-60); config default when omitted
        #[arg(short, long)]
        minutes: Option<u64>,
        /// Skip the fullscreen terminal takeover
        #[arg(long)]
        no_fullscreen: bool,
        /// Skip the OS sleep inhibitor
        #[arg(long)]
        no_wake_lock: bool,
        /// Emit lifecycle events as JSON lines instead of drawing views
        #[arg(long)]
        json: bool,
    },
    /// Print the quick-pick duration presets
    Presets,
}

/// Signals forwarded from the blocking terminal-event reader.
enum InputSignal {
    /// The terminal lost focus -- the visibility violation trigger.
    Hidden,
    /// An exit-intent key (Esc, q, Ctrl+C).
    ExitKey,
    /// Any other key press.
    Other,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Start {
            minutes,
            no_fullscreen,
            no_wake_lock,
            json,
        } => {
            let cfg = Config::load_or_default();
            let minutes = minutes.unwrap_or(cfg.session.default_minutes);
            if !json {
                for line in views::setup(minutes, &cfg.session.presets) {
                    println!("{line}");
                }
            }

            let rt = tokio::runtime::Runtime::new()?;
            setup_terminal()?;
            let result = rt.block_on(session_loop(
                &cfg,
                minutes,
                no_fullscreen || json,
                no_wake_lock,
                json,
            ));
            restore_terminal();
            result
        }
        SessionAction::Presets => {
            let cfg = Config::load_or_default();
            for preset in &cfg.session.presets {
                println!("{preset}m");
            }
            Ok(())
        }
    }
}

async fn session_loop(
    cfg: &Config,
    minutes: u64,
    no_fullscreen: bool,
    no_wake_lock: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let guard = TerminalGuard::new(
        cfg.guard.fullscreen && !no_fullscreen,
        cfg.guard.wake_lock && !no_wake_lock,
    );
    let mut controller = SessionController::new(Box::new(guard));

    let duration_secs = minutes.saturating_mul(60);
    let Some(started) = controller.start(duration_secs) else {
        return Err(ValidationError::DurationOutOfRange {
            secs: duration_secs,
            min_secs: MIN_DURATION_SECS,
            max_secs: MAX_DURATION_SECS,
        }
        .into());
    };
    emit(&started, json)?;
    let (session_id, quote_context) = match &started {
        Event::SessionStarted {
            session_id,
            quote_context,
            ..
        } => (*session_id, quote_context.clone()),
        other => return Err(format!("unexpected start event: {other:?}").into()),
    };

    // Quote fetch runs detached; the controller discards a late result.
    let provider: Arc<dyn QuoteProvider> = Arc::from(quotes::provider_from_environment(cfg));
    let (quote_tx, mut quote_rx) = mpsc::channel::<String>(1);
    tokio::spawn(async move {
        let quote = provider.quote(&quote_context).await;
        let _ = quote_tx.send(quote).await;
    });

    let (input_tx, mut input_rx) = mpsc::channel::<InputSignal>(16);
    spawn_input_reader(input_tx);

    let (mut clock, mut ticks) = SessionClock::new();
    clock.start();

    let mut exit_armed_at: Option<Instant> = None;
    let mut redraw = !json;

    let ended = loop {
        if redraw {
            draw_focus(&controller, cfg, exit_armed_at.is_some())?;
            redraw = false;
        }
        tokio::select! {
            Some(()) = ticks.recv() => {
                if let Some(done) = controller.tick() {
                    break done;
                }
                if exit_armed_at.is_some_and(|t| t.elapsed() > FORCE_EXIT_WINDOW) {
                    exit_armed_at = None;
                }
                redraw = !json;
            }
            Some(quote) = quote_rx.recv() => {
                if let Some(ready) = controller.resolve_quote(session_id, quote) {
                    emit(&ready, json)?;
                    redraw = !json;
                }
            }
            Some(signal) = input_rx.recv() => {
                match signal {
                    InputSignal::Hidden => {
                        if let Some(violated) = controller.report_violation(ViolationTrigger::Hidden) {
                            break violated;
                        }
                    }
                    InputSignal::ExitKey => {
                        match exit_armed_at {
                            Some(armed) if armed.elapsed() <= FORCE_EXIT_WINDOW => {
                                if let Some(violated) =
                                    controller.report_violation(ViolationTrigger::ForceExit)
                                {
                                    break violated;
                                }
                            }
                            _ => {
                                exit_armed_at = Some(Instant::now());
                                redraw = !json;
                            }
                        }
                    }
                    InputSignal::Other => {}
                }
            }
            else => {
                return Err("session channels closed unexpectedly".into());
            }
        }
    };
    clock.stop();
    emit(&ended, json)?;

    // The controller already left the alternate screen; the terminal view
    // lands in the regular buffer, like the original's overlay screens.
    if !json {
        let lines = match controller.state() {
            SessionState::Violation => views::violation(),
            SessionState::Completed => views::completed(),
            _ => Vec::new(),
        };
        let mut out = io::stdout();
        for line in &lines {
            queue!(out, style::Print(line), style::Print("\r\n"))?;
        }
        out.flush()?;
        wait_for_key(&mut input_rx).await;
    }

    if let Some(reset) = controller.reset() {
        emit(&reset, json)?;
    }
    Ok(())
}

fn emit(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}\r", serde_json::to_string(event)?);
    }
    Ok(())
}

fn draw_focus(
    controller: &SessionController,
    cfg: &Config,
    exit_armed: bool,
) -> io::Result<()> {
    let lines = views::focusing(
        controller.remaining_secs(),
        controller.progress(),
        controller.quote(),
        &cfg.guard.emergency_number,
        exit_armed,
    );
    let mut out = io::stdout();
    queue!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    for line in &lines {
        queue!(out, style::Print(line), style::Print("\r\n"))?;
    }
    out.flush()
}

/// Blocking reader for terminal events, forwarded into the async loop.
/// Lives for the rest of the process; the channel closing ends it.
fn spawn_input_reader(tx: mpsc::Sender<InputSignal>) {
    std::thread::spawn(move || loop {
        let signal = match event::read() {
            Ok(event::Event::FocusLost) => InputSignal::Hidden,
            Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => InputSignal::ExitKey,
                KeyCode::Char('c')
                    if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                {
                    InputSignal::ExitKey
                }
                _ => InputSignal::Other,
            },
            Ok(_) => continue,
            Err(_) => break,
        };
        if tx.blocking_send(signal).is_err() {
            break;
        }
    });
}

async fn wait_for_key(input_rx: &mut mpsc::Receiver<InputSignal>) {
    while let Some(signal) = input_rx.recv().await {
        if matches!(signal, InputSignal::ExitKey | InputSignal::Other) {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), event::EnableFocusChange)
}

fn restore_terminal() {
    crossterm::execute!(io::stdout(), event::DisableFocusChange).ok();
    terminal::disable_raw_mode().ok();
}
