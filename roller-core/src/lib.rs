//! Dice roller engine.
//!
//! This crate provides:
//! - A single-die roll state machine with explicit time and randomness
//! - Die face images and rotation by quarter turns
//! - An eased spin animation sampled per frame
//! - Roll sound playback with scoped clip release
//!
//! # Quick Start
//!
//! ```ignore
//! use roller_core::{RollSession, RollerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RollerConfig::new().with_muted(true);
//!     let mut session = RollSession::new(&config);
//!
//!     session.roll();
//!     let landed = session.wait_idle().await;
//!     println!("rolled {}", landed[0].face);
//! }
//! ```

pub mod anim;
pub mod config;
pub mod dice;
pub mod faces;
pub mod headless;
pub mod palette;
#[cfg(feature = "playback")]
pub mod playback;
pub mod session;
pub mod sound;
pub mod testing;
pub mod widget;

// Primary public API
pub use anim::{Ease, Tween};
pub use config::{ConfigError, RollerConfig};
pub use dice::{rng_from_seed, DiceError, Face};
pub use faces::{face_image, quarter_turns, FaceImage};
pub use headless::{HeadlessRoll, HeadlessRoller};
pub use palette::{PaletteColor, PALETTE};
pub use session::RollSession;
pub use sound::{
    ClipInfo, DecodedClip, Silent, SoundError, SoundGuard, SoundHandle, SoundPlayer, TerminalBell,
};
pub use testing::{CountingPlayer, MockSoundPlayer, StateHarness};
#[cfg(feature = "playback")]
pub use playback::SpeakerPlayer;
pub use widget::{Phase, RollOutcome, RollPolicy, RollRecord, RollerSnapshot, RollerState};
