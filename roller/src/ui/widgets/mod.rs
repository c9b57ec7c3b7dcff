//! TUI widgets for the roller

pub mod button;
pub mod die_face;

pub use button::ButtonWidget;
pub use die_face::DieFaceWidget;
