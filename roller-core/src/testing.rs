//! Testing utilities for the roller.
//!
//! This module provides tools for unit and integration tests:
//! - `MockSoundPlayer` for counting sound lifecycle calls and injecting failures
//! - `StateHarness` for driving `RollerState` on a synthetic clock
//! - `CountingPlayer` for counting releases of a real player
//! - `wav_bytes` for building in-memory WAV clips

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::rngs::StdRng;

use crate::dice::rng_from_seed;
use crate::sound::{SoundError, SoundHandle, SoundPlayer};
use crate::widget::{Advance, RollOutcome, RollPolicy, RollerState};

/// A sound player that records calls instead of making noise.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    fail_load: bool,
    fail_play: bool,
    play_duration: Duration,
    loads: AtomicUsize,
    plays: AtomicUsize,
    unloads: AtomicUsize,
}

impl MockSoundPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `load` fails with an I/O error.
    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Every `play` fails after the clip loaded.
    pub fn failing_play(mut self) -> Self {
        self.fail_play = true;
        self
    }

    /// Make `play` take this long (on the tokio clock).
    pub fn with_play_duration(mut self, duration: Duration) -> Self {
        self.play_duration = duration;
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn unloads(&self) -> usize {
        self.unloads.load(Ordering::SeqCst)
    }

    /// Clips loaded and not yet released.
    pub fn outstanding(&self) -> usize {
        self.loads().saturating_sub(self.unloads())
    }
}

#[async_trait]
impl SoundPlayer for MockSoundPlayer {
    async fn load(&self, path: &Path) -> Result<SoundHandle, SoundError> {
        if self.fail_load {
            return Err(SoundError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock load failure"),
            });
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(SoundHandle::new(path, self.play_duration))
    }

    async fn play(&self, handle: &SoundHandle) -> Result<(), SoundError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.fail_play {
            return Err(SoundError::Playback("mock play failure".to_string()));
        }
        if !handle.duration().is_zero() {
            tokio::time::sleep(handle.duration()).await;
        }
        Ok(())
    }

    fn unload(&self, _handle: &SoundHandle) {
        self.unloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// Drives a `RollerState` on a synthetic clock with a seeded RNG.
pub struct StateHarness {
    pub state: RollerState,
    rng: StdRng,
    now: Instant,
}

impl StateHarness {
    pub fn new(policy: RollPolicy) -> Self {
        Self::with_state(RollerState::new(policy))
    }

    pub fn with_state(state: RollerState) -> Self {
        Self {
            state,
            rng: rng_from_seed(Some(0x0d1ce)),
            now: Instant::now(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn roll(&mut self) -> RollOutcome {
        self.state.roll(self.now)
    }

    /// Move the clock forward and apply whatever became due.
    pub fn advance_by(&mut self, elapsed: Duration) -> Advance {
        self.now += elapsed;
        self.state.advance(self.now, &mut self.rng)
    }

    /// Roll and wait out the delay.
    pub fn roll_to_completion(&mut self) -> Advance {
        self.roll();
        let mut total = Advance::default();
        while let Some(due) = self.state.next_due() {
            let step = due.saturating_duration_since(self.now);
            let advance = self.advance_by(step);
            total.completed.extend(advance.completed);
            total.started += advance.started;
        }
        total
    }
}

/// Wraps another player and counts loads and releases.
pub struct CountingPlayer {
    inner: Arc<dyn SoundPlayer>,
    loads: AtomicUsize,
    unloads: AtomicUsize,
}

impl CountingPlayer {
    pub fn new(inner: Arc<dyn SoundPlayer>) -> Self {
        Self {
            inner,
            loads: AtomicUsize::new(0),
            unloads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn unloads(&self) -> usize {
        self.unloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SoundPlayer for CountingPlayer {
    async fn load(&self, path: &Path) -> Result<SoundHandle, SoundError> {
        let handle = self.inner.load(path).await?;
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }

    async fn play(&self, handle: &SoundHandle) -> Result<(), SoundError> {
        self.inner.play(handle).await
    }

    fn unload(&self, handle: &SoundHandle) {
        self.inner.unload(handle);
        self.unloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// Build an in-memory PCM WAV clip of `frames` frames of silence.
pub fn wav_bytes(
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    frames: u32,
) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for _ in 0..frames * u32::from(channels) {
        writer.write_sample(0i32)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Phase;

    #[test]
    fn test_harness_roll_to_completion() {
        let mut harness = StateHarness::new(RollPolicy::Reject);
        let advance = harness.roll_to_completion();
        assert_eq!(advance.completed.len(), 1);
        assert_eq!(harness.state.phase(), Phase::Idle);
        assert_eq!(harness.state.roll_count(), 1);
    }

    #[test]
    fn test_harness_drains_queue() {
        let mut harness = StateHarness::new(RollPolicy::Queue);
        harness.roll();
        harness.roll();
        harness.roll();
        let advance = harness.roll_to_completion();
        // The final call queues a fourth roll behind the first.
        assert_eq!(advance.completed.len(), 4);
        assert_eq!(advance.started, 3);
        assert_eq!(harness.state.rotation_angle(), 1440.0);
    }

    #[test]
    fn test_wav_bytes_layout() {
        let bytes = wav_bytes(8000, 1, 8, 10).unwrap();
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.spec().bits_per_sample, 8);
        assert_eq!(reader.duration(), 10);
    }

    #[tokio::test]
    async fn test_counting_player_forwards() {
        let mock = Arc::new(MockSoundPlayer::new());
        let counting = CountingPlayer::new(mock.clone());

        let handle = counting.load(Path::new("roll.wav")).await.unwrap();
        counting.play(&handle).await.unwrap();
        counting.unload(&handle);

        assert_eq!((counting.loads(), counting.unloads()), (1, 1));
        assert_eq!((mock.loads(), mock.plays(), mock.unloads()), (1, 1, 1));
    }
}
