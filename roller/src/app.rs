//! Main application state and logic

use ratatui::layout::Rect;
use roller_core::{RollOutcome, RollSession, RollerConfig};

use crate::ui::theme::RollerTheme;

/// The two on-screen controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    #[default]
    Roll,
    Reset,
}

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::Roll => "Roll Dice",
            Button::Reset => "Reset",
        }
    }

    fn other(self) -> Button {
        match self {
            Button::Roll => Button::Reset,
            Button::Reset => Button::Roll,
        }
    }
}

/// Main application state
pub struct App {
    pub session: RollSession,

    // UI state
    pub theme: RollerTheme,
    pub focused: Button,
    show_help: bool,
    viewport: Rect,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Create a new application around a roll session
    pub fn new(session: RollSession) -> Self {
        Self {
            session,
            theme: RollerTheme::default(),
            focused: Button::default(),
            show_help: false,
            viewport: Rect::default(),
            status_message: Some("Press r to roll, ? for help".to_string()),
            should_quit: false,
        }
    }

    pub fn from_config(config: &RollerConfig) -> Self {
        Self::new(RollSession::new(config))
    }

    /// Roll the die
    pub fn roll(&mut self) {
        match self.session.roll() {
            RollOutcome::Started => self.clear_status(),
            RollOutcome::Queued => {
                let queued = self.session.state().queued();
                self.set_status(format!("Queued ({queued} waiting)"));
            }
            RollOutcome::Rejected => self.set_status("Still rolling..."),
        }
    }

    /// Zero the roll counter
    pub fn reset(&mut self) {
        self.session.reset();
        self.set_status("Counter reset");
    }

    /// Press whichever button has focus
    pub fn activate(&mut self, button: Button) {
        self.focused = button;
        match button {
            Button::Roll => self.roll(),
            Button::Reset => self.reset(),
        }
    }

    pub fn activate_focused(&mut self) {
        self.activate(self.focused);
    }

    pub fn cycle_focus(&mut self) {
        self.focused = self.focused.other();
    }

    /// Tick for animations and scheduled results
    pub fn tick(&mut self) {
        for record in self.session.tick() {
            self.set_status(format!(
                "Rolled a {} ({})",
                record.face, record.background.name
            ));
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Record the terminal area of the last frame (for mouse hit testing)
    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Stop in-flight sounds before the terminal is restored
    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }
}

/// App with a seeded session and a mock sound player
#[cfg(test)]
pub(crate) fn test_app(policy: roller_core::RollPolicy) -> App {
    let config = RollerConfig::new().with_seed(8).with_policy(policy);
    App::new(RollSession::with_player(
        &config,
        std::sync::Arc::new(roller_core::MockSoundPlayer::new()),
    ))
}
