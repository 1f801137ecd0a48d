//! Pure per-state renders for the terminal presentation.
//!
//! Each state gets one function producing the lines to draw; nothing here
//! touches the terminal or the state machine.

const BAR_WIDTH: usize = 40;

/// Pre-flight banner printed before the fullscreen takeover.
pub fn setup(minutes: u64, presets: &[u64]) -> Vec<String> {
    let presets = presets
        .iter()
        .map(|p| format!("{p}m"))
        .collect::<Vec<_>>()
        .join(" / ");
    vec![
        "ZENLOCK".into(),
        "Uninterrupted focus starts now.".into(),
        String::new(),
        format!("Entering focus mode: {minutes} minutes (presets: {presets})"),
        "Locked mode takes over the terminal. Emergency calls remain accessible.".into(),
    ]
}

/// The live focus view, redrawn once per tick.
pub fn focusing(
    remaining_secs: u64,
    progress: f64,
    quote: Option<&str>,
    emergency_number: &str,
    exit_armed: bool,
) -> Vec<String> {
    let catalyst = quote.unwrap_or("Generating focus catalyst...");
    let exit_hint = if exit_armed {
        "press the exit key again to confirm force exit"
    } else {
        "double-press Esc to force exit"
    };
    vec![
        String::new(),
        "  DEEP WORK SESSION".into(),
        String::new(),
        format!("  {}", format_clock(remaining_secs)),
        String::new(),
        format!("  {}", progress_bar(progress)),
        String::new(),
        format!("  \"{catalyst}\""),
        String::new(),
        format!("  EMERGENCY CALL: {emergency_number}"),
        format!("  {exit_hint}"),
    ]
}

pub fn violation() -> Vec<String> {
    vec![
        String::new(),
        "  FOCUS BROKEN".into(),
        "  The integrity of your session was compromised by leaving the application.".into(),
        String::new(),
        "  Press any key to retry.".into(),
    ]
}

pub fn completed() -> Vec<String> {
    vec![
        String::new(),
        "  SESSION COMPLETE".into(),
        "  You mastered your focus. Reward yourself with a short break.".into(),
        String::new(),
        "  Press any key to return.".into(),
    ]
}

/// `M:SS` with zero-padded seconds.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn progress_bar(progress: f64) -> String {
    let filled = (progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    let mut bar = String::with_capacity(BAR_WIDTH + 2);
    bar.push('[');
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar.push(']');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(3599), "59:59");
    }

    #[test]
    fn focusing_shows_placeholder_until_quote_arrives() {
        let lines = focusing(300, 0.0, None, "112", false);
        assert!(lines.iter().any(|l| l.contains("Generating focus catalyst")));

        let lines = focusing(300, 0.0, Some("Begin."), "112", false);
        assert!(lines.iter().any(|l| l.contains("Begin.")));
        assert!(!lines.iter().any(|l| l.contains("Generating")));
    }

    #[test]
    fn emergency_line_is_always_present() {
        for armed in [false, true] {
            let lines = focusing(10, 0.9, None, "911", armed);
            assert!(lines.iter().any(|l| l.contains("EMERGENCY CALL: 911")));
        }
    }

    #[test]
    fn progress_bar_fills_with_elapsed_fraction() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(40)));
        assert_eq!(progress_bar(1.0), format!("[{}]", "#".repeat(40)));
        let half = progress_bar(0.5);
        assert_eq!(half.matches('#').count(), 20);
    }
}
