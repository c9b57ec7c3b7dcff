//! Render orchestration for the roller TUI

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Button};
use crate::ui::layout::{centered_rect_fixed, RollerLayout};
use crate::ui::widgets::{ButtonWidget, DieFaceWidget};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let state = app.session.state();

    // Full-bleed background in the current palette color
    frame.render_widget(
        Block::default().style(app.theme.screen_style(state.background())),
        area,
    );

    let layout = RollerLayout::calculate(area);

    frame.render_widget(
        Paragraph::new("Dice Roller")
            .style(app.theme.title_style())
            .alignment(Alignment::Center),
        layout.title_area,
    );

    let die = DieFaceWidget::new(state.face().value(), &app.theme)
        .angle(app.session.displayed_angle())
        .spinning(app.session.is_spinning());
    frame.render_widget(die, layout.die_area);

    frame.render_widget(
        Paragraph::new(format!("Rolls: {}", state.roll_count()))
            .style(app.theme.counter_style())
            .alignment(Alignment::Center),
        layout.counter_area,
    );

    for (button, button_area) in [
        (Button::Roll, layout.roll_button),
        (Button::Reset, layout.reset_button),
    ] {
        let widget = ButtonWidget::new(button, &app.theme).focused(app.focused == button);
        frame.render_widget(widget, button_area);
    }

    render_status_bar(frame, app, layout.status_bar);

    if app.show_help() {
        render_help_overlay(frame, app, area);
    }
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.session.state();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.phase()),
            app.theme.status_style().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("│ {} ", state.policy()), app.theme.status_style()),
    ];
    if state.queued() > 0 {
        spans.push(Span::styled(
            format!("│ +{} queued ", state.queued()),
            app.theme.status_style(),
        ));
    }
    if let Some(message) = app.status_message() {
        spans.push(Span::styled(
            format!("│ {message}"),
            app.theme.status_style(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(40, 14, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            " Dice Roller - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  r / Space     Roll the die"),
        Line::from("  0 / Bksp      Reset the counter"),
        Line::from("  Tab / ↑ / ↓   Move focus"),
        Line::from("  Enter         Press focused button"),
        Line::from("  Mouse click   Press a button"),
        Line::from("  ? / F1        Toggle this help"),
        Line::from("  q / Esc       Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to close",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use roller_core::{PaletteColor, RollPolicy};

    fn draw(app: &App) -> Buffer {
        let backend = TestBackend::new(40, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn screen_text(buf: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_initial_screen() {
        let app = test_app(RollPolicy::Reject);
        let buf = draw(&app);
        let text = screen_text(&buf);

        assert!(text.contains("Dice Roller"));
        assert!(text.contains("Rolls: 0"));
        assert!(text.contains("Roll Dice"));
        assert!(text.contains("Reset"));
        assert!(text.contains("idle"));

        let initial = app.theme.background(PaletteColor::initial());
        assert_eq!(buf[(0, 0)].bg, initial);
    }

    #[test]
    fn test_focus_marker_follows_focus() {
        let mut app = test_app(RollPolicy::Reject);
        assert!(screen_text(&draw(&app)).contains("› Roll Dice ‹"));

        app.cycle_focus();
        let text = screen_text(&draw(&app));
        assert!(text.contains("› Reset ‹"));
        assert!(!text.contains("› Roll Dice ‹"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = test_app(RollPolicy::Reject);
        app.toggle_help();
        let text = screen_text(&draw(&app));
        assert!(text.contains("Dice Roller - Help"));
        assert!(text.contains("Reset the counter"));
    }
}
