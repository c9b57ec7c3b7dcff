//! Roll sound playback.
//!
//! A [`SoundPlayer`] loads a clip, plays it to completion and releases it.
//! [`SoundGuard`] ties release to scope: the clip is unloaded exactly once,
//! whether playback finished, failed, or the task playing it was aborted.
//!
//! Sound is decoration. [`play_roll_sound`] logs and swallows every failure
//! so a missing or broken clip never affects a roll.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CodecParameters, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Error type for loading and playing clips.
#[derive(Debug, Error)]
pub enum SoundError {
    #[error("Failed to read clip {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode clip: {0}")]
    Decode(String),
    #[error("Unsupported clip format: {0}")]
    UnsupportedFormat(String),
    #[error("Playback failed: {0}")]
    Playback(String),
}

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// A loaded clip.
#[derive(Debug, PartialEq, Eq)]
pub struct SoundHandle {
    id: u64,
    path: PathBuf,
    duration: Duration,
}

impl SoundHandle {
    pub fn new(path: impl Into<PathBuf>, duration: Duration) -> Self {
        Self {
            id: NEXT_HANDLE.fetch_add(1, Ordering::Relaxed),
            path: path.into(),
            duration,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Playing time of the clip.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Something that can play the roll sound.
#[async_trait]
pub trait SoundPlayer: Send + Sync {
    /// Load a clip and return a handle to it.
    async fn load(&self, path: &Path) -> Result<SoundHandle, SoundError>;

    /// Play a loaded clip. Resolves when playback has finished.
    async fn play(&self, handle: &SoundHandle) -> Result<(), SoundError>;

    /// Release a loaded clip.
    fn unload(&self, handle: &SoundHandle);
}

/// A loaded clip that is released when dropped.
pub struct SoundGuard {
    player: Arc<dyn SoundPlayer>,
    handle: SoundHandle,
}

impl SoundGuard {
    /// Load `path` through `player`.
    pub async fn acquire(player: Arc<dyn SoundPlayer>, path: &Path) -> Result<Self, SoundError> {
        let handle = player.load(path).await?;
        tracing::debug!(id = handle.id(), "sound loaded");
        Ok(Self { player, handle })
    }

    pub fn handle(&self) -> &SoundHandle {
        &self.handle
    }

    pub async fn play(&self) -> Result<(), SoundError> {
        self.player.play(&self.handle).await
    }
}

impl Drop for SoundGuard {
    fn drop(&mut self) {
        self.player.unload(&self.handle);
        tracing::debug!(id = self.handle.id(), "sound released");
    }
}

/// Load, play and release the roll sound. Failures are logged, never returned.
#[tracing::instrument(skip(player), fields(clip = %path.display()))]
pub async fn play_roll_sound(player: Arc<dyn SoundPlayer>, path: PathBuf) {
    let guard = match SoundGuard::acquire(player, &path).await {
        Ok(guard) => guard,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load roll sound");
            return;
        }
    };

    match guard.play().await {
        Ok(()) => tracing::debug!("roll sound finished"),
        Err(e) => tracing::warn!(error = %e, "failed to play roll sound"),
    }
}

/// Stream parameters of a decodable clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipInfo {
    pub channels: u16,
    pub sample_rate: u32,
    /// Zero when the container does not say.
    pub bits_per_sample: u32,
    pub frames: u64,
}

impl ClipInfo {
    /// Read the stream parameters of a clip without decoding its samples.
    pub fn probe(bytes: Vec<u8>) -> Result<Self, SoundError> {
        let format = open_clip(bytes)?;
        let track = format
            .default_track()
            .ok_or_else(|| SoundError::UnsupportedFormat("no audio track".to_string()))?;
        Self::from_params(&track.codec_params)
    }

    fn from_params(params: &CodecParameters) -> Result<Self, SoundError> {
        let sample_rate = params
            .sample_rate
            .filter(|&rate| rate > 0)
            .ok_or_else(|| SoundError::UnsupportedFormat("missing sample rate".to_string()))?;
        let channels = params
            .channels
            .map(|channels| channels.count())
            .filter(|&count| count > 0)
            .ok_or_else(|| SoundError::UnsupportedFormat("missing channel layout".to_string()))?;
        let frames = params
            .n_frames
            .ok_or_else(|| SoundError::UnsupportedFormat("unknown clip length".to_string()))?;

        Ok(Self {
            channels: u16::try_from(channels).unwrap_or(u16::MAX),
            sample_rate,
            bits_per_sample: params.bits_per_sample.unwrap_or_default(),
            frames,
        })
    }

    /// Playing time of the clip.
    pub fn duration(&self) -> Duration {
        Duration::from_nanos(self.frames * 1_000_000_000 / u64::from(self.sample_rate))
    }
}

/// A clip decoded to interleaved `f32` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClip {
    pub info: ClipInfo,
    pub samples: Vec<f32>,
}

impl DecodedClip {
    pub fn decode(bytes: Vec<u8>) -> Result<Self, SoundError> {
        let mut format = open_clip(bytes)?;
        let track = format
            .default_track()
            .ok_or_else(|| SoundError::UnsupportedFormat("no audio track".to_string()))?;
        let track_id = track.id;
        let params = track.codec_params.clone();
        let info = ClipInfo::from_params(&params)?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(decode_error)?;

        let mut samples = Vec::new();
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break
                }
                Err(e) => return Err(decode_error(e)),
            };
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = decoder.decode(&packet).map_err(decode_error)?;
            let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
            buffer.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buffer.samples());
        }

        Ok(Self { info, samples })
    }
}

fn open_clip(bytes: Vec<u8>) -> Result<Box<dyn FormatReader>, SoundError> {
    let source = MediaSourceStream::new(Box::new(std::io::Cursor::new(bytes)), Default::default());
    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(decode_error)?;
    Ok(probed.format)
}

fn decode_error(err: SymphoniaError) -> SoundError {
    match err {
        SymphoniaError::Unsupported(what) => SoundError::UnsupportedFormat(what.to_string()),
        other => SoundError::Decode(other.to_string()),
    }
}

/// Rings the terminal bell for the length of the clip.
///
/// The bell goes to stderr, so stdout stays free for protocol output and
/// the TUI.
#[derive(Debug, Default)]
pub struct TerminalBell;

#[async_trait]
impl SoundPlayer for TerminalBell {
    async fn load(&self, path: &Path) -> Result<SoundHandle, SoundError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| SoundError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let info = ClipInfo::probe(bytes)?;
        tracing::info!(
            channels = info.channels,
            sample_rate = info.sample_rate,
            duration_ms = info.duration().as_millis() as u64,
            "loaded clip"
        );
        Ok(SoundHandle::new(path, info.duration()))
    }

    async fn play(&self, handle: &SoundHandle) -> Result<(), SoundError> {
        let mut stderr = tokio::io::stderr();
        stderr
            .write_all(b"\x07")
            .await
            .map_err(|e| SoundError::Playback(e.to_string()))?;
        stderr
            .flush()
            .await
            .map_err(|e| SoundError::Playback(e.to_string()))?;
        tokio::time::sleep(handle.duration()).await;
        Ok(())
    }

    fn unload(&self, handle: &SoundHandle) {
        tracing::info!(id = handle.id(), "unloaded clip");
    }
}

/// Player used when sound is muted.
#[derive(Debug, Default)]
pub struct Silent;

#[async_trait]
impl SoundPlayer for Silent {
    async fn load(&self, path: &Path) -> Result<SoundHandle, SoundError> {
        Ok(SoundHandle::new(path, Duration::ZERO))
    }

    async fn play(&self, _handle: &SoundHandle) -> Result<(), SoundError> {
        Ok(())
    }

    fn unload(&self, _handle: &SoundHandle) {}
}
