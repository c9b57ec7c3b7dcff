//! Event handling for the roller TUI

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::app::{App, Button};
use crate::ui::layout::RollerLayout;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event: a left click on a button presses it
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return EventResult::Continue;
    }

    if app.show_help() {
        app.close_help();
        return EventResult::NeedsRedraw;
    }

    let layout = RollerLayout::calculate(app.viewport());
    let position = Position::new(mouse.column, mouse.row);

    if layout.roll_button.contains(position) {
        app.activate(Button::Roll);
        EventResult::NeedsRedraw
    } else if layout.reset_button.contains(position) {
        app.activate(Button::Reset);
        EventResult::NeedsRedraw
    } else {
        EventResult::Continue
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.show_help() {
        return handle_help_key(app, key);
    }

    match key.code {
        // Controls
        KeyCode::Char('r') | KeyCode::Char(' ') => {
            app.activate(Button::Roll);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('0') | KeyCode::Backspace => {
            app.activate(Button::Reset);
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.activate_focused();
            EventResult::NeedsRedraw
        }

        // Focus
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down | KeyCode::Char('j')
        | KeyCode::Char('k') => {
            app.cycle_focus();
            EventResult::NeedsRedraw
        }

        // Help
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        // Quit
        KeyCode::Char('q') | KeyCode::Esc => EventResult::Quit,

        _ => EventResult::Continue,
    }
}

/// Handle key when the help overlay is open
fn handle_help_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.close_help();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;
    use roller_core::{Phase, RollPolicy};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[tokio::test]
    async fn test_r_rolls() {
        let mut app = test_app(RollPolicy::Reject);
        assert_eq!(handle_event(&mut app, key(KeyCode::Char('r'))), EventResult::NeedsRedraw);
        assert_eq!(app.session.state().phase(), Phase::Rolling);
    }

    #[tokio::test]
    async fn test_key_release_ignored() {
        let mut app = test_app(RollPolicy::Reject);
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(handle_event(&mut app, release), EventResult::Continue);
        assert_eq!(app.session.state().phase(), Phase::Idle);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app(RollPolicy::Reject);
        assert_eq!(handle_event(&mut app, key(KeyCode::Char('q'))), EventResult::Quit);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(handle_event(&mut app, ctrl_c), EventResult::Quit);
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut app = test_app(RollPolicy::Reject);
        handle_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help());

        // 'r' does nothing while help is open
        assert_eq!(handle_event(&mut app, key(KeyCode::Char('r'))), EventResult::Continue);
        assert_eq!(app.session.state().phase(), Phase::Idle);

        handle_event(&mut app, key(KeyCode::Esc));
        assert!(!app.show_help());
    }

    #[test]
    fn test_tab_moves_focus() {
        let mut app = test_app(RollPolicy::Reject);
        assert_eq!(app.focused, Button::Roll);
        handle_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focused, Button::Reset);
        handle_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.focused, Button::Roll);
    }

    #[tokio::test]
    async fn test_click_buttons() {
        let mut app = test_app(RollPolicy::Reject);
        let area = Rect::new(0, 0, 60, 30);
        app.set_viewport(area);
        let layout = RollerLayout::calculate(area);

        let roll = layout.roll_button;
        handle_event(&mut app, click(roll.x + 1, roll.y + 1));
        assert_eq!(app.session.state().phase(), Phase::Rolling);

        let reset = layout.reset_button;
        handle_event(&mut app, click(reset.x + 1, reset.y + 1));
        assert_eq!(app.focused, Button::Reset);
        assert_eq!(app.status_message(), Some("Counter reset"));

        assert_eq!(handle_event(&mut app, click(0, 0)), EventResult::Continue);
    }
}
