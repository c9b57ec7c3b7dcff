//! Color theme and styling for the roller TUI

use ratatui::style::{Color, Modifier, Style};
use roller_core::PaletteColor;

use crate::app::Button;

/// Roller UI color theme
#[derive(Debug, Clone)]
pub struct RollerTheme {
    // Text on the pastel background
    pub foreground: Color,
    pub status_text: Color,

    // Buttons
    pub button_text: Color,
    pub roll_button: Color,
    pub reset_button: Color,

    // Die
    pub die_body: Color,
    pub die_pips: Color,

    // Overlay chrome
    pub border: Color,
    pub border_focused: Color,
}

impl Default for RollerTheme {
    fn default() -> Self {
        Self {
            foreground: Color::Black,
            status_text: Color::DarkGray,

            button_text: Color::White,
            roll_button: Color::Rgb(0x4c, 0xaf, 0x50),
            reset_button: Color::Rgb(0xff, 0x63, 0x47),

            die_body: Color::White,
            die_pips: Color::Black,

            border: Color::DarkGray,
            border_focused: Color::Cyan,
        }
    }
}

impl RollerTheme {
    /// Terminal color for a palette entry
    pub fn background(&self, color: PaletteColor) -> Color {
        let (r, g, b) = color.rgb;
        Color::Rgb(r, g, b)
    }

    /// Base style for the full-bleed screen
    pub fn screen_style(&self, color: PaletteColor) -> Style {
        Style::default()
            .bg(self.background(color))
            .fg(self.foreground)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }

    pub fn counter_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Style for a button face
    pub fn button_style(&self, button: Button, focused: bool) -> Style {
        let fill = match button {
            Button::Roll => self.roll_button,
            Button::Reset => self.reset_button,
        };
        let style = Style::default().bg(fill).fg(self.button_text);
        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Style for the die; dimmed slightly while spinning
    pub fn die_style(&self, spinning: bool) -> Style {
        let style = Style::default().bg(self.die_body).fg(self.die_pips);
        if spinning {
            style.add_modifier(Modifier::DIM)
        } else {
            style.add_modifier(Modifier::BOLD)
        }
    }

    pub fn status_style(&self) -> Style {
        Style::default().fg(self.status_text)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_uses_palette_rgb() {
        let theme = RollerTheme::default();
        let pink = PaletteColor::from_hex("#ffb6c1").unwrap();
        assert_eq!(theme.background(pink), Color::Rgb(0xff, 0xb6, 0xc1));
    }

    #[test]
    fn test_button_colors() {
        let theme = RollerTheme::default();
        assert_eq!(theme.button_style(Button::Roll, false).bg, Some(theme.roll_button));
        assert_eq!(theme.button_style(Button::Reset, false).bg, Some(theme.reset_button));
        assert!(theme
            .button_style(Button::Roll, true)
            .add_modifier
            .contains(Modifier::BOLD));
    }
}
