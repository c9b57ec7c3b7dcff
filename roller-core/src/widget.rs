//! The roller widget state machine.
//!
//! [`RollerState`] owns everything the screen shows and exposes pure update
//! functions. Time and randomness are passed in by the caller, so the whole
//! roll lifecycle can be driven from tests without a terminal or a runtime.
//!
//! A roll has two halves: [`RollerState::roll`] starts the spin and schedules
//! the result, and [`RollerState::advance`] applies every scheduled result
//! whose delay has elapsed.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::anim::{Ease, Tween};
use crate::config::RollerConfig;
use crate::dice::Face;
use crate::palette::PaletteColor;

/// Delay between pressing roll and the new face appearing.
pub const ROLL_DELAY: Duration = Duration::from_millis(500);

/// Length of the spin animation.
pub const SPIN_DURATION: Duration = Duration::from_millis(500);

/// Rotation added by every roll.
pub const DEGREES_PER_ROLL: f64 = 360.0;

/// Whether a result is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Rolling,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => f.write_str("idle"),
            Phase::Rolling => f.write_str("rolling"),
        }
    }
}

/// What to do with a roll requested while another is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollPolicy {
    /// Ignore the request.
    #[default]
    Reject,
    /// Run it once the pending roll lands.
    Queue,
    /// Start it immediately; every pending result applies in firing order.
    Overlap,
}

impl fmt::Display for RollPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollPolicy::Reject => f.write_str("reject"),
            RollPolicy::Queue => f.write_str("queue"),
            RollPolicy::Overlap => f.write_str("overlap"),
        }
    }
}

impl FromStr for RollPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(RollPolicy::Reject),
            "queue" => Ok(RollPolicy::Queue),
            "overlap" => Ok(RollPolicy::Overlap),
            other => Err(format!("unknown roll policy '{other}'")),
        }
    }
}

/// Result of asking for a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollOutcome {
    /// Spin started and a result is scheduled.
    Started,
    /// Waiting behind the pending roll.
    Queued,
    /// Ignored because a roll is pending.
    Rejected,
}

/// A completed roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollRecord {
    /// 1-based count of completed rolls since startup (unaffected by reset).
    pub sequence: u64,
    pub face: Face,
    pub background: PaletteColor,
    /// Counter value right after this roll.
    pub roll_count: u64,
}

/// What [`RollerState::advance`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advance {
    pub completed: Vec<RollRecord>,
    /// Queued rolls that started; each needs its sound played.
    pub started: u32,
}

/// Serializable view of the widget at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollerSnapshot {
    pub face: u8,
    pub roll_count: u64,
    pub background: String,
    pub rotation_angle: f64,
    pub displayed_angle: f64,
    pub phase: Phase,
    pub queued: u32,
}

/// All state behind the roller screen.
#[derive(Debug, Clone)]
pub struct RollerState {
    face: Face,
    roll_count: u64,
    background: PaletteColor,
    rotation_angle: f64,
    spin: Option<Tween>,
    pending: VecDeque<Instant>,
    queued: u32,
    completed: u64,
    last_roll: Option<RollRecord>,

    policy: RollPolicy,
    ease: Ease,
    roll_delay: Duration,
    spin_duration: Duration,
}

impl Default for RollerState {
    fn default() -> Self {
        Self::new(RollPolicy::default())
    }
}

impl RollerState {
    /// Fresh state with the standard timings.
    pub fn new(policy: RollPolicy) -> Self {
        Self {
            face: Face::ONE,
            roll_count: 0,
            background: PaletteColor::initial(),
            rotation_angle: 0.0,
            spin: None,
            pending: VecDeque::new(),
            queued: 0,
            completed: 0,
            last_roll: None,
            policy,
            ease: Ease::default(),
            roll_delay: ROLL_DELAY,
            spin_duration: SPIN_DURATION,
        }
    }

    pub fn from_config(config: &RollerConfig) -> Self {
        Self::new(config.policy)
            .with_ease(config.ease)
            .with_timing(config.roll_delay, config.spin_duration)
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_timing(mut self, roll_delay: Duration, spin_duration: Duration) -> Self {
        self.roll_delay = roll_delay;
        self.spin_duration = spin_duration;
        self
    }

    /// Request a roll at `now`.
    pub fn roll(&mut self, now: Instant) -> RollOutcome {
        if !self.pending.is_empty() {
            match self.policy {
                RollPolicy::Reject => {
                    tracing::debug!("roll rejected, result still pending");
                    return RollOutcome::Rejected;
                }
                RollPolicy::Queue => {
                    self.queued += 1;
                    tracing::debug!(queued = self.queued, "roll queued");
                    return RollOutcome::Queued;
                }
                RollPolicy::Overlap => {}
            }
        }

        self.start_roll(now);
        RollOutcome::Started
    }

    fn start_roll(&mut self, now: Instant) {
        let from = self.displayed_angle(now);
        self.rotation_angle += DEGREES_PER_ROLL;
        self.spin = Some(Tween::new(
            from,
            self.rotation_angle,
            now,
            self.spin_duration,
            self.ease,
        ));
        self.pending.push_back(now + self.roll_delay);
        tracing::debug!(
            target_angle = self.rotation_angle,
            pending = self.pending.len(),
            "roll started"
        );
    }

    /// Apply every scheduled result due at or before `now`, in scheduling order.
    pub fn advance<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Advance {
        let mut advance = Advance::default();

        while let Some(&due) = self.pending.front() {
            if due > now {
                break;
            }
            self.pending.pop_front();
            advance.completed.push(self.complete_roll(rng));

            if self.pending.is_empty() && self.queued > 0 {
                self.queued -= 1;
                self.start_roll(due);
                advance.started += 1;
            }
        }

        advance
    }

    fn complete_roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RollRecord {
        self.face = Face::roll(rng);
        self.roll_count += 1;
        self.background = PaletteColor::random(rng);
        self.completed += 1;

        let record = RollRecord {
            sequence: self.completed,
            face: self.face,
            background: self.background,
            roll_count: self.roll_count,
        };
        tracing::debug!(
            face = record.face.value(),
            count = record.roll_count,
            background = record.background.hex,
            "roll completed"
        );
        self.last_roll = Some(record);
        record
    }

    /// Zero the roll counter. Face, background and angle are left alone.
    pub fn reset(&mut self) {
        self.roll_count = 0;
    }

    /// Angle the die should be drawn at, in degrees (not wrapped).
    pub fn displayed_angle(&self, now: Instant) -> f64 {
        self.spin
            .as_ref()
            .map_or(self.rotation_angle, |spin| spin.sample(now))
    }

    /// True while the spin animation is still moving.
    pub fn is_spinning(&self, now: Instant) -> bool {
        self.spin.as_ref().is_some_and(|spin| !spin.is_finished(now))
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_empty() {
            Phase::Idle
        } else {
            Phase::Rolling
        }
    }

    /// When the earliest pending result lands.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.front().copied()
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn roll_count(&self) -> u64 {
        self.roll_count
    }

    pub fn background(&self) -> PaletteColor {
        self.background
    }

    /// Accumulated target rotation: 360 x rolls started.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn queued(&self) -> u32 {
        self.queued
    }

    pub fn policy(&self) -> RollPolicy {
        self.policy
    }

    pub fn last_roll(&self) -> Option<&RollRecord> {
        self.last_roll.as_ref()
    }

    pub fn snapshot(&self, now: Instant) -> RollerSnapshot {
        RollerSnapshot {
            face: self.face.value(),
            roll_count: self.roll_count,
            background: self.background.hex.to_string(),
            rotation_angle: self.rotation_angle,
            displayed_angle: self.displayed_angle(now),
            phase: self.phase(),
            queued: self.queued,
        }
    }
}
