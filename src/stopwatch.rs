use crate::timer::Timer;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UserAction {
    Start,
    Stop,
    Reset,
}

impl UserAction {
    pub fn button_id(self) -> &'static str {
        match self {
            UserAction::Start => "start-button",
            UserAction::Stop => "stop-button",
            UserAction::Reset => "reset-button",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UserAction::Start => "Start",
            UserAction::Stop => "Stop",
            UserAction::Reset => "Reset",
        }
    }

    pub fn from_button_id(id: &str) -> Option<Self> {
        match id {
            "start-button" => Some(UserAction::Start),
            "stop-button" => Some(UserAction::Stop),
            "reset-button" => Some(UserAction::Reset),
            _ => None,
        }
    }
}

/// One timer plus the start/stop/reset buttons that drive it.
pub struct Stopwatch {
    pub timer: Timer,
    started: bool,
}

impl Stopwatch {
    pub fn new(timer: Timer) -> Self {
        Self {
            timer,
            started: false,
        }
    }

    pub fn handle_action(&mut self, action: UserAction) {
        match action {
            UserAction::Start => {
                self.started = true;
                self.timer.start();
            }
            UserAction::Stop => {
                self.started = false;
                self.timer.stop();
            }
            UserAction::Reset => self.timer.reset(),
        }
        log::debug!(
            "timer {}: {} pressed, now {:?}",
            self.timer.id(),
            action.button_id(),
            self.timer.state()
        );
    }

    /// Presses whichever of start/stop is currently shown.
    pub fn toggle(&mut self) -> UserAction {
        let action = if self.is_started() {
            UserAction::Stop
        } else {
            UserAction::Start
        };
        self.handle_action(action);
        action
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Buttons shown, in order. Reset is hidden while started.
    pub fn visible_buttons(&self) -> &'static [UserAction] {
        if self.started {
            &[UserAction::Stop]
        } else {
            &[UserAction::Start, UserAction::Reset]
        }
    }
}
