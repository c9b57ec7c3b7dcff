//! Rotation animation.
//!
//! The die spin is a plain interpolation the render step samples every frame:
//! a [`Tween`] holds the endpoints and timing, an [`Ease`] shapes progress.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Timing curve applied to tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    #[default]
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
}

impl Ease {
    pub const ALL: [Ease; 7] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
    ];

    /// Map linear progress `t` to eased progress. `t` is clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "in-quad",
            Self::OutQuad => "out-quad",
            Self::InOutQuad => "in-out-quad",
            Self::InCubic => "in-cubic",
            Self::OutCubic => "out-cubic",
            Self::InOutCubic => "in-out-cubic",
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Ease::ALL
            .into_iter()
            .find(|e| e.name() == wanted)
            .ok_or_else(|| format!("unknown easing '{s}'"))
    }
}

/// A value moving from `from` to `to` over `duration`, starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: Instant, duration: Duration, ease: Ease) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            ease,
        }
    }

    /// Linear progress in `[0, 1]` at `now`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Interpolated value at `now`.
    pub fn sample(&self, now: Instant) -> f64 {
        let t = self.ease.apply(self.progress(now));
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn end(&self) -> Instant {
        self.start + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_ease_endpoints() {
        for ease in Ease::ALL {
            assert!((ease.apply(0.0)).abs() < EPS, "{ease} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < EPS, "{ease} at 1");
            assert!((ease.apply(-3.0)).abs() < EPS, "{ease} clamps below");
            assert!((ease.apply(4.0) - 1.0).abs() < EPS, "{ease} clamps above");
        }
    }

    #[test]
    fn test_ease_monotonic() {
        for ease in Ease::ALL {
            let mut previous = 0.0;
            for step in 0..=100 {
                let value = ease.apply(f64::from(step) / 100.0);
                assert!(value + EPS >= previous, "{ease} decreased at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_in_out_midpoint() {
        assert!((Ease::InOutQuad.apply(0.5) - 0.5).abs() < EPS);
        assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < EPS);
        assert!((Ease::Linear.apply(0.25) - 0.25).abs() < EPS);
    }

    #[test]
    fn test_parse_ease() {
        assert_eq!("linear".parse::<Ease>(), Ok(Ease::Linear));
        assert_eq!("In_Out_Cubic".parse::<Ease>(), Ok(Ease::InOutCubic));
        assert!("bouncy".parse::<Ease>().is_err());
        for ease in Ease::ALL {
            assert_eq!(ease.to_string().parse::<Ease>(), Ok(ease));
        }
    }

    #[test]
    fn test_tween_sampling() {
        let start = Instant::now();
        let tween = Tween::new(0.0, 360.0, start, Duration::from_millis(500), Ease::Linear);

        assert_eq!(tween.sample(start), 0.0);
        assert!((tween.sample(start + Duration::from_millis(250)) - 180.0).abs() < EPS);
        assert_eq!(tween.sample(start + Duration::from_millis(500)), 360.0);
        assert_eq!(tween.sample(start + Duration::from_secs(10)), 360.0);
        assert!(!tween.is_finished(start + Duration::from_millis(499)));
        assert!(tween.is_finished(start + Duration::from_millis(500)));
        assert_eq!(tween.end(), start + Duration::from_millis(500));
    }

    #[test]
    fn test_tween_before_start_holds_origin() {
        let now = Instant::now();
        let tween = Tween::new(
            90.0,
            450.0,
            now + Duration::from_secs(1),
            Duration::from_millis(500),
            Ease::OutCubic,
        );
        assert_eq!(tween.sample(now), 90.0);
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let now = Instant::now();
        let tween = Tween::new(0.0, 360.0, now, Duration::ZERO, Ease::InOutQuad);
        assert_eq!(tween.sample(now), 360.0);
        assert!(tween.is_finished(now));
    }
}
