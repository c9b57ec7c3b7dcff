//! Roll session: the widget state wired to a clock, an RNG and a sound player.
//!
//! The UI loop calls [`RollSession::roll`] on input and [`RollSession::tick`]
//! every frame. Sounds run as spawned tasks that own their clip; the session
//! only tracks them so teardown can abort whatever is still playing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::rngs::StdRng;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::config::RollerConfig;
use crate::dice::rng_from_seed;
use crate::sound::{play_roll_sound, Silent, SoundPlayer};
use crate::widget::{RollOutcome, RollRecord, RollerSnapshot, RollerState};

/// A running roller.
pub struct RollSession {
    state: RollerState,
    rng: StdRng,
    player: Arc<dyn SoundPlayer>,
    clip: PathBuf,
    sounds: JoinSet<()>,
}

impl RollSession {
    /// Create a session with the player the configuration asks for.
    pub fn new(config: &RollerConfig) -> Self {
        let player: Arc<dyn SoundPlayer> = if config.muted {
            Arc::new(Silent)
        } else {
            default_player()
        };
        Self::with_player(config, player)
    }

    /// Create a session with a specific sound player.
    pub fn with_player(config: &RollerConfig, player: Arc<dyn SoundPlayer>) -> Self {
        Self {
            state: RollerState::from_config(config),
            rng: rng_from_seed(config.seed),
            player,
            clip: config.sound_path.clone(),
            sounds: JoinSet::new(),
        }
    }

    fn now() -> std::time::Instant {
        Instant::now().into_std()
    }

    /// Request a roll. Starts the sound if the roll started.
    pub fn roll(&mut self) -> RollOutcome {
        let outcome = self.state.roll(Self::now());
        if outcome == RollOutcome::Started {
            self.spawn_sound();
        }
        outcome
    }

    /// Apply due results, start sounds for queued rolls that began, and reap
    /// finished sound tasks.
    pub fn tick(&mut self) -> Vec<RollRecord> {
        let advance = self.state.advance(Self::now(), &mut self.rng);
        for _ in 0..advance.started {
            self.spawn_sound();
        }
        self.reap_sounds();
        advance.completed
    }

    pub fn reset(&mut self) {
        self.state.reset();
        tracing::debug!("roll counter reset");
    }

    /// Sleep until no result is pending, applying results as they land.
    pub async fn wait_idle(&mut self) -> Vec<RollRecord> {
        let mut completed = self.tick();
        while let Some(due) = self.state.next_due() {
            tokio::time::sleep_until(Instant::from_std(due)).await;
            completed.extend(self.tick());
        }
        completed
    }

    /// Wait for every in-flight sound to finish.
    pub async fn finish_sounds(&mut self) {
        while let Some(result) = self.sounds.join_next().await {
            Self::log_sound_exit(result);
        }
    }

    /// Abort in-flight sounds. Their clips are released as the tasks drop.
    pub fn shutdown(&mut self) {
        if !self.sounds.is_empty() {
            tracing::debug!(active = self.sounds.len(), "aborting sounds");
        }
        self.sounds.abort_all();
    }

    pub fn state(&self) -> &RollerState {
        &self.state
    }

    pub fn snapshot(&self) -> RollerSnapshot {
        self.state.snapshot(Self::now())
    }

    /// Current spin angle for rendering.
    pub fn displayed_angle(&self) -> f64 {
        self.state.displayed_angle(Self::now())
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning(Self::now())
    }

    pub fn active_sounds(&self) -> usize {
        self.sounds.len()
    }

    pub fn clip(&self) -> &Path {
        &self.clip
    }

    fn spawn_sound(&mut self) {
        let player = Arc::clone(&self.player);
        let clip = self.clip.clone();
        self.sounds.spawn(play_roll_sound(player, clip));
    }

    fn reap_sounds(&mut self) {
        while let Some(result) = self.sounds.try_join_next() {
            Self::log_sound_exit(result);
        }
    }

    fn log_sound_exit(result: Result<(), tokio::task::JoinError>) {
        if let Err(e) = result {
            if e.is_panic() {
                tracing::warn!(error = %e, "sound task panicked");
            }
        }
    }
}

impl Drop for RollSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(feature = "playback")]
fn default_player() -> Arc<dyn SoundPlayer> {
    Arc::new(crate::playback::SpeakerPlayer::new())
}

#[cfg(not(feature = "playback"))]
fn default_player() -> Arc<dyn SoundPlayer> {
    Arc::new(crate::sound::TerminalBell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSoundPlayer;
    use crate::widget::{Phase, RollPolicy};
    use std::time::Duration;

    fn session_with(policy: RollPolicy, mock: &Arc<MockSoundPlayer>) -> RollSession {
        let config = RollerConfig::new().with_seed(11).with_policy(policy);
        RollSession::with_player(&config, mock.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn test_roll_lands_after_delay() {
        let mock = Arc::new(MockSoundPlayer::new());
        let mut session = session_with(RollPolicy::Reject, &mock);

        assert_eq!(session.roll(), RollOutcome::Started);
        assert!(session.tick().is_empty());

        tokio::time::advance(Duration::from_millis(499)).await;
        assert!(session.tick().is_empty());
        assert_eq!(session.state().phase(), Phase::Rolling);

        tokio::time::advance(Duration::from_millis(1)).await;
        let landed = session.tick();
        assert_eq!(landed.len(), 1);
        assert_eq!(session.state().roll_count(), 1);
        assert_eq!(session.state().rotation_angle(), 360.0);
        assert_eq!(session.state().phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_idle() {
        let mock = Arc::new(MockSoundPlayer::new());
        let mut session = session_with(RollPolicy::Queue, &mock);

        session.roll();
        session.roll();
        let landed = session.wait_idle().await;
        assert_eq!(landed.len(), 2);
        assert_eq!(session.state().roll_count(), 2);
        assert_eq!(session.state().phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_started_roll_plays_once() {
        let mock = Arc::new(MockSoundPlayer::new());
        let mut session = session_with(RollPolicy::Queue, &mock);

        session.roll();
        session.roll();
        session.wait_idle().await;
        session.finish_sounds().await;

        assert_eq!(mock.loads(), 2);
        assert_eq!(mock.plays(), 2);
        assert_eq!(mock.outstanding(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_roll_plays_nothing() {
        let mock = Arc::new(MockSoundPlayer::new());
        let mut session = session_with(RollPolicy::Reject, &mock);

        session.roll();
        assert_eq!(session.roll(), RollOutcome::Rejected);
        session.wait_idle().await;
        session.finish_sounds().await;
        assert_eq!(mock.loads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_releases_playing_clip() {
        let mock = Arc::new(MockSoundPlayer::new().with_play_duration(Duration::from_secs(5)));
        let mut session = session_with(RollPolicy::Reject, &mock);

        session.roll();
        // Let the sound task load and start playing.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(mock.loads(), 1);
        assert_eq!(mock.outstanding(), 1);

        session.shutdown();
        session.finish_sounds().await;
        assert_eq!(mock.outstanding(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_is_immediate() {
        let mock = Arc::new(MockSoundPlayer::new());
        let mut session = session_with(RollPolicy::Reject, &mock);
        for _ in 0..3 {
            session.roll();
            session.wait_idle().await;
        }
        assert_eq!(session.state().roll_count(), 3);
        session.reset();
        assert_eq!(session.snapshot().roll_count, 0);
        assert_eq!(session.snapshot().rotation_angle, 1080.0);
    }
}
