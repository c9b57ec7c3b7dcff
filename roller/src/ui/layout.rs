//! Layout calculations for the roller TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const DIE_WIDTH: u16 = 9;
pub const DIE_HEIGHT: u16 = 5;
pub const BUTTON_WIDTH: u16 = 16;
pub const BUTTON_HEIGHT: u16 = 3;

/// Screen areas, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollerLayout {
    pub title_area: Rect,
    pub die_area: Rect,
    pub counter_area: Rect,
    pub roll_button: Rect,
    pub reset_button: Rect,
    pub status_bar: Rect,
}

impl RollerLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(1),             // Title
                Constraint::Length(1),
                Constraint::Length(DIE_HEIGHT),    // Die
                Constraint::Length(1),
                Constraint::Length(1),             // Counter
                Constraint::Length(1),
                Constraint::Length(BUTTON_HEIGHT), // Roll Dice
                Constraint::Length(1),
                Constraint::Length(BUTTON_HEIGHT), // Reset
                Constraint::Fill(1),
                Constraint::Length(1),             // Status bar
            ])
            .split(area);

        Self {
            title_area: chunks[1],
            die_area: center_horizontal(chunks[3], DIE_WIDTH),
            counter_area: chunks[5],
            roll_button: center_horizontal(chunks[7], BUTTON_WIDTH),
            reset_button: center_horizontal(chunks[9], BUTTON_WIDTH),
            status_bar: chunks[11],
        }
    }
}

/// Narrow `area` to `width` columns, centered
pub fn center_horizontal(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, area.y, width, area.height)
}

/// Calculate fixed-size centered popup
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
