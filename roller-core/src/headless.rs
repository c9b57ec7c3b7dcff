//! Headless roller for scripted use.
//!
//! Wraps a [`RollSession`] so every roll runs to completion before the next
//! command, which keeps output deterministic for a given seed.

use crate::config::RollerConfig;
use crate::faces::face_image;
use crate::session::RollSession;
use crate::widget::{RollOutcome, RollRecord, RollerSnapshot};

/// Result of a headless roll command.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessRoll {
    Landed(RollRecord),
    Busy,
    Queued,
}

/// A roller without a screen.
pub struct HeadlessRoller {
    session: RollSession,
}

impl HeadlessRoller {
    pub fn new(config: &RollerConfig) -> Self {
        Self {
            session: RollSession::new(config),
        }
    }

    pub fn from_session(session: RollSession) -> Self {
        Self { session }
    }

    /// Roll and wait for the result to land.
    pub async fn roll(&mut self) -> HeadlessRoll {
        match self.session.roll() {
            RollOutcome::Rejected => HeadlessRoll::Busy,
            RollOutcome::Queued => HeadlessRoll::Queued,
            RollOutcome::Started => match self.session.wait_idle().await.pop() {
                Some(record) => HeadlessRoll::Landed(record),
                // wait_idle only returns once the scheduled result applied
                None => HeadlessRoll::Busy,
            },
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn snapshot(&self) -> RollerSnapshot {
        self.session.snapshot()
    }

    /// Die art plus a one-line summary.
    pub fn status_lines(&self) -> Vec<String> {
        let snapshot = self.session.snapshot();
        let mut lines = face_image(snapshot.face).to_lines();
        lines.push(format!(
            "face={} count={} color={} angle={} phase={}",
            snapshot.face,
            snapshot.roll_count,
            snapshot.background,
            snapshot.rotation_angle,
            snapshot.phase
        ));
        lines
    }

    pub fn session(&self) -> &RollSession {
        &self.session
    }

    /// Let in-flight sounds finish before exiting.
    pub async fn finish(&mut self) {
        self.session.finish_sounds().await;
    }
}
