use std::fmt::Write as _;
use std::io::Write;

use crate::app::{StopwatchApp, APP_NAME};
use crate::error::AppResult;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const DARK_STYLE: &str = "\x1b[97;40m";
const LIGHT_STYLE: &str = "\x1b[30;47m";
const RESET_STYLE: &str = "\x1b[0m";

/// Renders the whole board as plain text. `wall_clock` goes in the header.
pub fn render(app: &StopwatchApp, wall_clock: &str) -> String {
    let mut text = String::new();
    let mode = if app.dark { "dark" } else { "light" };
    writeln!(text, "{}  [{}]  {}", APP_NAME, mode, wall_clock).ok();
    writeln!(text).ok();

    if app.help_visible {
        writeln!(text, "{}", app.help_text()).ok();
        writeln!(text).ok();
    }

    if app.stopwatches.is_empty() {
        writeln!(text, "  (no stopwatches, a to add one)").ok();
    }
    for (i, sw) in app.stopwatches.iter().enumerate() {
        let buttons: Vec<String> = sw
            .visible_buttons()
            .iter()
            .map(|action| format!("[ {:<5} ]", action.label()))
            .collect();
        let marker = if sw.timer.is_ticking() { '>' } else { ' ' };
        writeln!(
            text,
            "{} {:>2}  {:<22} {}",
            marker,
            i + 1,
            buttons.join(" "),
            app.display_of(sw.timer.id())
        )
        .ok();
    }

    writeln!(text).ok();
    if let Some(status) = &app.status {
        writeln!(text, "{}", status).ok();
    }
    write!(text, "a=add  s=remove  d=dark  <n>=start/stop  h=help  q=quit\n> ").ok();
    text
}

pub fn draw<W: Write>(out: &mut W, app: &StopwatchApp) -> AppResult<()> {
    let wall_clock = chrono::Local::now().format("%H:%M:%S").to_string();
    let style = if app.dark { DARK_STYLE } else { LIGHT_STYLE };
    write!(out, "{}{}{}{}", CLEAR_SCREEN, style, render(app, &wall_clock), RESET_STYLE)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Command;
    use crate::config::AppConfig;
    use crate::timer::testing::RecordingSink;
    use std::sync::Arc;
    use timer_core::ManualClock;

    fn test_app(initial: usize) -> StopwatchApp {
        let config = AppConfig {
            tick_rate_hz: 1,
            initial_stopwatches: initial,
            dark: true,
        };
        StopwatchApp::new(
            config,
            Arc::new(ManualClock::new()),
            Arc::new(RecordingSink::default()),
        )
        .unwrap()
    }

    #[test]
    fn test_render_board() {
        let mut app = test_app(2);
        app.handle_command(Command::Toggle { number: 1 }).unwrap();
        let id = app.stopwatches.iter().next().unwrap().timer.id();
        app.on_display_update(id, "00:00:03.25");

        let text = render(&app, "12:00:00");
        assert!(text.starts_with("Stopwatches  [dark]  12:00:00"));
        let rows: Vec<&str> = text.lines().skip(2).take(2).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with('>'));
        assert!(rows[0].contains("[ Stop  ]"));
        assert!(rows[0].ends_with("00:00:03.25"));
        assert!(rows[1].contains("[ Start ] [ Reset ]"));
        assert!(rows[1].ends_with("00:00:00.00"));
    }

    #[test]
    fn test_render_empty_and_status() {
        let mut app = test_app(0);
        app.handle_command(Command::RemoveStopwatch).unwrap();
        app.handle_command(Command::ToggleDark).unwrap();
        let text = render(&app, "08:30:00");
        assert!(text.contains("[light]"));
        assert!(text.contains("no stopwatches"));
        assert!(!text.contains("No stopwatch to remove"));
    }

    #[test]
    fn test_draw_writes_styled_frame() {
        let app = test_app(1);
        let mut out = Vec::new();
        draw(&mut out, &app).unwrap();
        let frame = String::from_utf8(out).unwrap();
        assert!(frame.starts_with(CLEAR_SCREEN));
        assert!(frame.ends_with(RESET_STYLE));
        assert!(frame.contains("00:00:00.00"));
    }
}
