//! UI module for the roller TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;
