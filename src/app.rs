use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use timer_core::ClockSource;

use crate::collection::TimerCollection;
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::stopwatch::{Stopwatch, UserAction};
use crate::timer::{DisplaySink, Timer, TimerId};

pub const APP_NAME: &str = "Stopwatches";

const HELP_TEXT: &str = "\
Commands
  a            add a stopwatch
  s            remove the last stopwatch
  d            toggle dark mode
  <n> start    start stopwatch n
  <n> stop     stop stopwatch n
  <n> reset    reset stopwatch n
  <n>          press start/stop on stopwatch n
  h, ?         show this help
  q            quit";

#[derive(Debug)]
pub enum AppEvent {
    Input(String),
    InputClosed,
    Display { id: TimerId, text: String },
}

/// Forwards timer display updates into the main event loop.
pub struct ChannelSink {
    conn: Mutex<Sender<AppEvent>>,
}

impl ChannelSink {
    pub fn new(conn: Sender<AppEvent>) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl DisplaySink for ChannelSink {
    fn publish(&self, id: TimerId, text: &str) {
        if let Ok(conn) = self.conn.lock() {
            conn.send(AppEvent::Display {
                id,
                text: text.to_string(),
            })
            .ok();
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AddStopwatch,
    RemoveStopwatch,
    ToggleDark,
    Action { number: usize, action: UserAction },
    Toggle { number: usize },
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Command::Empty;
    };
    let second = words.next();
    if words.next().is_some() {
        return Command::Unknown(line.trim().to_string());
    }

    match (first, second) {
        ("a", None) => Command::AddStopwatch,
        ("s", None) => Command::RemoveStopwatch,
        ("d", None) => Command::ToggleDark,
        ("h" | "?", None) => Command::Help,
        ("q", None) => Command::Quit,
        (number, action) => {
            let Ok(number) = number.parse::<usize>() else {
                return Command::Unknown(line.trim().to_string());
            };
            match action {
                None | Some("go") | Some("toggle") => Command::Toggle { number },
                Some("start") => Command::Action { number, action: UserAction::Start },
                Some("stop") => Command::Action { number, action: UserAction::Stop },
                Some("reset") => Command::Action { number, action: UserAction::Reset },
                Some(other) => match UserAction::from_button_id(other) {
                    Some(action) => Command::Action { number, action },
                    None => Command::Unknown(line.trim().to_string()),
                },
            }
        }
    }
}

pub struct StopwatchApp {
    config: AppConfig,
    clock: Arc<dyn ClockSource>,
    sink: Arc<dyn DisplaySink>,
    pub stopwatches: TimerCollection,
    displays: HashMap<TimerId, String>,
    pub dark: bool,
    pub help_visible: bool,
    pub status: Option<String>,
}

impl StopwatchApp {
    pub fn new(
        config: AppConfig,
        clock: Arc<dyn ClockSource>,
        sink: Arc<dyn DisplaySink>,
    ) -> AppResult<Self> {
        let mut app = Self {
            dark: config.dark,
            config,
            clock,
            sink,
            stopwatches: TimerCollection::new(),
            displays: HashMap::new(),
            help_visible: false,
            status: None,
        };
        for _ in 0..app.config.initial_stopwatches {
            app.add_stopwatch()?;
        }
        log::info!("{} ready with {} stopwatches", APP_NAME, app.stopwatches.len());
        Ok(app)
    }

    pub fn add_stopwatch(&mut self) -> AppResult<()> {
        let timer = Timer::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.sink),
            self.config.tick_period(),
        )?;
        self.displays.insert(timer.id(), timer.display());
        self.stopwatches.append(Stopwatch::new(timer));
        Ok(())
    }

    pub fn remove_stopwatch(&mut self) {
        let last_id = self.stopwatches.last().map(|sw| sw.timer.id());
        if self.stopwatches.remove_last() {
            if let Some(id) = last_id {
                self.displays.remove(&id);
            }
        } else {
            self.status = Some("No stopwatch to remove".to_string());
        }
    }

    /// Records a published display string. Updates from timers that have
    /// already been removed are dropped.
    pub fn on_display_update(&mut self, id: TimerId, text: &str) {
        if let Some(shown) = self.displays.get_mut(&id) {
            shown.clear();
            shown.push_str(text);
        }
    }

    pub fn display_of(&self, id: TimerId) -> &str {
        self.displays.get(&id).map(String::as_str).unwrap_or("00:00:00.00")
    }

    pub fn help_text(&self) -> &'static str {
        HELP_TEXT
    }

    /// Returns `false` when the app should quit.
    pub fn handle_command(&mut self, command: Command) -> AppResult<bool> {
        self.status = None;
        if command != Command::Help {
            self.help_visible = false;
        }

        match command {
            Command::AddStopwatch => self.add_stopwatch()?,
            Command::RemoveStopwatch => self.remove_stopwatch(),
            Command::ToggleDark => self.dark = !self.dark,
            Command::Help => self.help_visible = !self.help_visible,
            Command::Quit => return Ok(false),
            Command::Empty => {}
            Command::Action { number, action } => match self.stopwatch_mut(number) {
                Some(sw) => sw.handle_action(action),
                None => self.no_such_stopwatch(number),
            },
            Command::Toggle { number } => match self.stopwatch_mut(number) {
                Some(sw) => {
                    sw.toggle();
                }
                None => self.no_such_stopwatch(number),
            },
            Command::Unknown(line) => {
                log::warn!("unknown command: {:?}", line);
                self.status = Some(format!("Unknown command '{}', h for help", line));
            }
        }
        Ok(true)
    }

    fn stopwatch_mut(&mut self, number: usize) -> Option<&mut Stopwatch> {
        number
            .checked_sub(1)
            .and_then(|index| self.stopwatches.get_mut(index))
    }

    fn no_such_stopwatch(&mut self, number: usize) {
        self.status = Some(format!(
            "No stopwatch {} (have {})",
            number,
            self.stopwatches.len()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::testing::RecordingSink;
    use std::sync::mpsc;
    use std::time::Duration;
    use timer_core::ManualClock;

    fn test_app(initial: usize) -> (StopwatchApp, ManualClock, Arc<RecordingSink>) {
        let clock = ManualClock::new();
        let sink = Arc::new(RecordingSink::default());
        let config = AppConfig {
            tick_rate_hz: 1,
            initial_stopwatches: initial,
            dark: true,
        };
        let app = StopwatchApp::new(config, Arc::new(clock.clone()), sink.clone()).unwrap();
        (app, clock, sink)
    }

    #[test]
    fn test_parse_bindings() {
        assert_eq!(parse_command("a"), Command::AddStopwatch);
        assert_eq!(parse_command(" s "), Command::RemoveStopwatch);
        assert_eq!(parse_command("d"), Command::ToggleDark);
        assert_eq!(parse_command("?"), Command::Help);
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command(""), Command::Empty);
    }

    #[test]
    fn test_parse_stopwatch_actions() {
        assert_eq!(parse_command("2"), Command::Toggle { number: 2 });
        assert_eq!(parse_command("2 go"), Command::Toggle { number: 2 });
        assert_eq!(
            parse_command("1 start"),
            Command::Action { number: 1, action: UserAction::Start }
        );
        assert_eq!(
            parse_command("3 reset-button"),
            Command::Action { number: 3, action: UserAction::Reset }
        );
        assert_eq!(parse_command("1 lap"), Command::Unknown("1 lap".to_string()));
        assert_eq!(parse_command("x stop"), Command::Unknown("x stop".to_string()));
        assert_eq!(parse_command("1 stop now"), Command::Unknown("1 stop now".to_string()));
    }

    #[test]
    fn test_starts_with_configured_stopwatches() {
        let (app, _, _) = test_app(3);
        assert_eq!(app.stopwatches.len(), 3);
        for sw in app.stopwatches.iter() {
            assert_eq!(app.display_of(sw.timer.id()), "00:00:00.00");
        }
    }

    #[test]
    fn test_add_and_remove() {
        let (mut app, _, _) = test_app(0);
        assert!(app.handle_command(Command::AddStopwatch).unwrap());
        assert!(app.handle_command(Command::AddStopwatch).unwrap());
        assert_eq!(app.stopwatches.len(), 2);

        app.handle_command(Command::RemoveStopwatch).unwrap();
        app.handle_command(Command::RemoveStopwatch).unwrap();
        assert!(app.stopwatches.is_empty());
        assert!(app.displays.is_empty());

        app.handle_command(Command::RemoveStopwatch).unwrap();
        assert!(app.stopwatches.is_empty());
        assert!(app.status.is_some());
    }

    #[test]
    fn test_actions_reach_the_right_stopwatch() {
        let (mut app, clock, sink) = test_app(2);
        let second = app.stopwatches.iter().nth(1).unwrap().timer.id();

        app.handle_command(parse_command("2 start")).unwrap();
        clock.advance(Duration::from_millis(10_500));
        app.handle_command(parse_command("2 stop")).unwrap();

        let (id, text) = sink.last().unwrap();
        assert_eq!(id, second);
        assert_eq!(text, "00:00:10.50");
        app.on_display_update(id, &text);
        assert_eq!(app.display_of(second), "00:00:10.50");
        let first = app.stopwatches.iter().next().unwrap().timer.id();
        assert_eq!(app.display_of(first), "00:00:00.00");
    }

    #[test]
    fn test_out_of_range_stopwatch() {
        let (mut app, _, _) = test_app(1);
        app.handle_command(parse_command("0 start")).unwrap();
        assert!(app.status.is_some());
        app.handle_command(parse_command("2")).unwrap();
        assert_eq!(app.status.as_deref(), Some("No stopwatch 2 (have 1)"));
        assert!(!app.stopwatches.any_running());
    }

    #[test]
    fn test_toggle_dark_and_quit() {
        let (mut app, _, _) = test_app(0);
        app.handle_command(Command::ToggleDark).unwrap();
        assert!(!app.dark);
        assert!(!app.handle_command(Command::Quit).unwrap());
    }

    #[test]
    fn test_help_toggles() {
        let (mut app, _, _) = test_app(0);
        app.handle_command(Command::Help).unwrap();
        assert!(app.help_visible);
        app.handle_command(Command::Empty).unwrap();
        assert!(!app.help_visible);
    }

    #[test]
    fn test_update_for_removed_timer_ignored() {
        let (mut app, _, _) = test_app(1);
        let id = app.stopwatches.last().unwrap().timer.id();
        app.remove_stopwatch();
        app.on_display_update(id, "00:00:01.00");
        assert!(app.displays.is_empty());
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (conn, events) = mpsc::channel();
        let sink = ChannelSink::new(conn);
        sink.publish(7, "00:00:01.00");
        match events.try_recv().unwrap() {
            AppEvent::Display { id, text } => {
                assert_eq!(id, 7);
                assert_eq!(text, "00:00:01.00");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
