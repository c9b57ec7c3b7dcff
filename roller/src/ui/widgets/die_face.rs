//! Rotating die face widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Paragraph, Widget},
};

use roller_core::{face_image, quarter_turns};

use crate::ui::theme::RollerTheme;

/// Widget drawing the die for a face value at a rotation angle
pub struct DieFaceWidget<'a> {
    face: u8,
    angle: f64,
    spinning: bool,
    theme: &'a RollerTheme,
}

impl<'a> DieFaceWidget<'a> {
    pub fn new(face: u8, theme: &'a RollerTheme) -> Self {
        Self {
            face,
            angle: 0.0,
            spinning: false,
            theme,
        }
    }

    /// Rotation in degrees; only `angle mod 360` matters
    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn spinning(mut self, spinning: bool) -> Self {
        self.spinning = spinning;
        self
    }

    fn lines(&self) -> Vec<String> {
        let image = face_image(self.face).rotated(quarter_turns(self.angle));
        if self.spinning {
            image.to_spinning_lines(self.angle)
        } else {
            image.to_lines()
        }
    }
}

impl Widget for DieFaceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.theme.die_style(self.spinning);
        let lines: Vec<Line> = self.lines().into_iter().map(Line::from).collect();

        Paragraph::new(lines)
            .style(style)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn draw(widget: DieFaceWidget<'_>) -> Buffer {
        let area = Rect::new(0, 0, 9, 5);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf
    }

    #[test]
    fn test_renders_face_three() {
        let theme = RollerTheme::default();
        let buf = draw(DieFaceWidget::new(3, &theme));
        assert_eq!(row(&buf, 0), "┌───────┐");
        assert_eq!(row(&buf, 1), "│ ●     │");
        assert_eq!(row(&buf, 2), "│   ●   │");
        assert_eq!(row(&buf, 3), "│     ● │");
    }

    #[test]
    fn test_quarter_turn_rotates_pips() {
        let theme = RollerTheme::default();
        let buf = draw(DieFaceWidget::new(3, &theme).angle(450.0));
        assert_eq!(row(&buf, 1), "│     ● │");
        assert_eq!(row(&buf, 3), "│ ●     │");
    }

    #[test]
    fn test_unmapped_face_draws_one() {
        let theme = RollerTheme::default();
        let buf = draw(DieFaceWidget::new(9, &theme));
        assert_eq!(row(&buf, 1), "│       │");
        assert_eq!(row(&buf, 2), "│   ●   │");
    }

    #[test]
    fn test_spinner_while_spinning() {
        let theme = RollerTheme::default();
        let buf = draw(DieFaceWidget::new(1, &theme).angle(100.0).spinning(true));
        assert_eq!(row(&buf, 0), "┌───-───┐");
    }
}
