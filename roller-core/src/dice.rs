//! Single-die draws.
//!
//! The roller only ever throws one six-sided die. [`Face`] keeps the value
//! inside `1..=6` by construction, so the rest of the engine never has to
//! re-check it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for face construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Face value out of range: {0} (expected 1-6)")]
    FaceOutOfRange(u8),
}

/// The value showing on top of the die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// The face shown before the first roll.
    pub const ONE: Face = Face(1);

    /// Build a face, returning `None` outside `1..=6`.
    pub fn new(value: u8) -> Option<Face> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Face(value))
    }

    /// Draw a face uniformly from `1..=6`.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Face {
        Face(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// All six faces in ascending order.
    pub fn all() -> impl Iterator<Item = Face> {
        (Self::MIN..=Self::MAX).map(Face)
    }
}

impl Default for Face {
    fn default() -> Self {
        Face::ONE
    }
}

impl TryFrom<u8> for Face {
    type Error = DiceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Face::new(value).ok_or(DiceError::FaceOutOfRange(value))
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> u8 {
        face.0
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the roller's random source.
///
/// A fixed seed makes a whole session reproducible; otherwise the generator
/// is seeded from OS entropy.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
