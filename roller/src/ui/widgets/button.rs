//! Push button widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Padding, Paragraph, Widget},
};

use crate::app::Button;
use crate::ui::theme::RollerTheme;

/// A filled, labelled button; the focused one gets `›` `‹` markers
pub struct ButtonWidget<'a> {
    button: Button,
    focused: bool,
    theme: &'a RollerTheme,
}

impl<'a> ButtonWidget<'a> {
    pub fn new(button: Button, theme: &'a RollerTheme) -> Self {
        Self {
            button,
            focused: false,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for ButtonWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.theme.button_style(self.button, self.focused);
        let label = if self.focused {
            format!("› {} ‹", self.button.label())
        } else {
            self.button.label().to_string()
        };

        let block = Block::default().style(style).padding(Padding::vertical(1));
        Paragraph::new(Line::from(label))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn middle_row(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, 1)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_label_centered() {
        let theme = RollerTheme::default();
        let area = Rect::new(0, 0, 16, 3);
        let mut buf = Buffer::empty(area);
        ButtonWidget::new(Button::Roll, &theme).render(area, &mut buf);
        assert_eq!(middle_row(&buf).trim(), "Roll Dice");
        assert_eq!(buf[(0, 0)].bg, theme.roll_button);
    }

    #[test]
    fn test_focus_markers() {
        let theme = RollerTheme::default();
        let area = Rect::new(0, 0, 16, 3);
        let mut buf = Buffer::empty(area);
        ButtonWidget::new(Button::Reset, &theme)
            .focused(true)
            .render(area, &mut buf);
        assert_eq!(middle_row(&buf).trim(), "› Reset ‹");
        assert_eq!(buf[(15, 2)].bg, theme.reset_button);
    }
}
