//! Roller configuration.
//!
//! Everything has a sensible default; the environment (and, in the binary,
//! command-line flags) can override individual settings.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::Level;

use crate::anim::Ease;
use crate::widget::{RollPolicy, ROLL_DELAY, SPIN_DURATION};

/// Default location of the roll sound clip.
pub const DEFAULT_SOUND_PATH: &str = "assets/dice-roll.wav";

pub const ENV_SOUND: &str = "DICE_ROLLER_SOUND";
pub const ENV_MUTE: &str = "DICE_ROLLER_MUTE";
pub const ENV_SEED: &str = "DICE_ROLLER_SEED";
pub const ENV_POLICY: &str = "DICE_ROLLER_POLICY";
pub const ENV_EASE: &str = "DICE_ROLLER_EASE";
pub const ENV_LOG: &str = "DICE_ROLLER_LOG";

/// Error type for configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid roll policy: {0} (expected reject, queue or overlap)")]
    InvalidPolicy(String),
    #[error("Invalid easing: {0}")]
    InvalidEase(String),
    #[error("Invalid seed: {0} (expected an unsigned integer)")]
    InvalidSeed(String),
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
    #[error("Invalid boolean for {key}: {value}")]
    InvalidFlag { key: &'static str, value: String },
}

/// Configuration for a roller session.
#[derive(Debug, Clone, PartialEq)]
pub struct RollerConfig {
    /// Clip played on every roll.
    pub sound_path: PathBuf,
    /// Skip sound playback entirely.
    pub muted: bool,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
    pub policy: RollPolicy,
    pub ease: Ease,
    pub roll_delay: Duration,
    pub spin_duration: Duration,
    pub log_level: Level,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            sound_path: PathBuf::from(DEFAULT_SOUND_PATH),
            muted: false,
            seed: None,
            policy: RollPolicy::default(),
            ease: Ease::default(),
            roll_delay: ROLL_DELAY,
            spin_duration: SPIN_DURATION,
            log_level: Level::INFO,
        }
    }
}

impl RollerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, starting from the defaults.
    ///
    /// Unset and empty variables keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_SOUND) {
            config.sound_path = PathBuf::from(path);
        }
        if let Some(value) = get(ENV_MUTE) {
            config.muted = parse_flag(ENV_MUTE, &value)?;
        }
        if let Some(value) = get(ENV_SEED) {
            config.seed = Some(parse_seed(&value)?);
        }
        if let Some(value) = get(ENV_POLICY) {
            config.policy = parse_policy(&value)?;
        }
        if let Some(value) = get(ENV_EASE) {
            config.ease = parse_ease(&value)?;
        }
        if let Some(value) = get(ENV_LOG) {
            config.log_level = parse_level(&value)?;
        }

        Ok(config)
    }

    pub fn with_sound_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sound_path = path.into();
        self
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: RollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_roll_delay(mut self, delay: Duration) -> Self {
        self.roll_delay = delay;
        self
    }

    pub fn with_spin_duration(mut self, duration: Duration) -> Self {
        self.spin_duration = duration;
        self
    }

    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }
}

pub fn parse_policy(value: &str) -> Result<RollPolicy, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidPolicy(value.to_string()))
}

pub fn parse_ease(value: &str) -> Result<Ease, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEase(value.to_string()))
}

pub fn parse_seed(value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidSeed(value.to_string()))
}

pub fn parse_level(value: &str) -> Result<Level, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidLevel(value.to_string()))
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
