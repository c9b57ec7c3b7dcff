//! Speaker output for the roll clip.
//!
//! Clips are decoded once on load and kept until unloaded. Each `play` opens
//! a stream on the default output device for the length of the clip.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::sound::{DecodedClip, SoundError, SoundHandle, SoundPlayer};

/// Plays decoded clips through cpal.
#[derive(Debug, Default)]
pub struct SpeakerPlayer {
    clips: Mutex<HashMap<u64, Arc<DecodedClip>>>,
}

impl SpeakerPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clips loaded and not yet released.
    pub fn loaded(&self) -> usize {
        self.clips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn clip(&self, handle: &SoundHandle) -> Option<Arc<DecodedClip>> {
        self.clips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&handle.id())
            .cloned()
    }
}

#[async_trait]
impl SoundPlayer for SpeakerPlayer {
    async fn load(&self, path: &Path) -> Result<SoundHandle, SoundError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| SoundError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let clip = tokio::task::spawn_blocking(move || DecodedClip::decode(bytes))
            .await
            .map_err(|e| SoundError::Decode(e.to_string()))??;

        let handle = SoundHandle::new(path, clip.info.duration());
        tracing::info!(
            id = handle.id(),
            frames = clip.info.frames,
            sample_rate = clip.info.sample_rate,
            "decoded clip"
        );
        self.clips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.id(), Arc::new(clip));
        Ok(handle)
    }

    async fn play(&self, handle: &SoundHandle) -> Result<(), SoundError> {
        let clip = self
            .clip(handle)
            .ok_or_else(|| SoundError::Playback(format!("clip {} is not loaded", handle.id())))?;
        tokio::task::spawn_blocking(move || play_blocking(clip))
            .await
            .map_err(|e| SoundError::Playback(e.to_string()))?
    }

    fn unload(&self, handle: &SoundHandle) {
        self.clips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle.id());
        tracing::info!(id = handle.id(), "unloaded clip");
    }
}

fn playback_error(err: impl std::fmt::Display) -> SoundError {
    SoundError::Playback(err.to_string())
}

/// Hold an output stream open until the clip has played out.
fn play_blocking(clip: Arc<DecodedClip>) -> Result<(), SoundError> {
    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| SoundError::Playback("no output device".to_string()))?;
    let supported = device.default_output_config().map_err(playback_error)?;
    let config = supported.config();
    let duration = clip.info.duration();

    let stream = match supported.sample_format() {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, clip)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, clip)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, clip)?,
        other => {
            return Err(SoundError::UnsupportedFormat(format!(
                "output sample format {other:?}"
            )))
        }
    };

    stream.play().map_err(playback_error)?;
    std::thread::sleep(duration);
    Ok(())
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    clip: Arc<DecodedClip>,
) -> Result<Stream, SoundError>
where
    T: SizedSample + FromSample<f32>,
{
    let out_channels = usize::from(config.channels.max(1));
    let mut cursor = FrameCursor::new(&clip, config.sample_rate.0);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(out_channels) {
                    let source = cursor.next_frame();
                    for (channel, out) in frame.iter_mut().enumerate() {
                        *out = T::from_sample(clip_sample(&clip, source, channel));
                    }
                }
            },
            |err| tracing::warn!(error = %err, "audio output error"),
            None,
        )
        .map_err(playback_error)
}

/// Maps output frames onto clip frames (nearest neighbour).
#[derive(Debug)]
struct FrameCursor {
    clip_rate: u64,
    out_rate: u64,
    out_frame: u64,
}

impl FrameCursor {
    fn new(clip: &DecodedClip, out_rate: u32) -> Self {
        Self {
            clip_rate: u64::from(clip.info.sample_rate),
            out_rate: u64::from(out_rate.max(1)),
            out_frame: 0,
        }
    }

    fn next_frame(&mut self) -> usize {
        let source = self.out_frame * self.clip_rate / self.out_rate;
        self.out_frame += 1;
        usize::try_from(source).unwrap_or(usize::MAX)
    }
}

/// Sample for an output channel; extra output channels repeat the last
/// clip channel, and past the end is silence.
fn clip_sample(clip: &DecodedClip, frame: usize, channel: usize) -> f32 {
    let channels = usize::from(clip.info.channels.max(1));
    let channel = channel.min(channels - 1);
    frame
        .checked_mul(channels)
        .and_then(|start| clip.samples.get(start + channel))
        .copied()
        .unwrap_or(f32::EQUILIBRIUM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::ClipInfo;
    use crate::testing::wav_bytes;

    fn stereo_clip() -> DecodedClip {
        DecodedClip {
            info: ClipInfo {
                channels: 2,
                sample_rate: 8000,
                bits_per_sample: 16,
                frames: 2,
            },
            samples: vec![0.1, 0.2, 0.3, 0.4],
        }
    }

    #[test]
    fn test_cursor_resamples() {
        let clip = stereo_clip();
        let mut cursor = FrameCursor::new(&clip, 16000);
        let frames: Vec<usize> = (0..4).map(|_| cursor.next_frame()).collect();
        assert_eq!(frames, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_clip_sample_channels_and_end() {
        let clip = stereo_clip();
        assert_eq!(clip_sample(&clip, 1, 0), 0.3);
        assert_eq!(clip_sample(&clip, 1, 1), 0.4);
        // A third output channel repeats the right channel
        assert_eq!(clip_sample(&clip, 0, 2), 0.2);
        assert_eq!(clip_sample(&clip, 2, 0), 0.0);
    }

    #[tokio::test]
    async fn test_load_and_unload_track_clips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roll.wav");
        tokio::fs::write(&path, wav_bytes(8000, 1, 16, 800).unwrap())
            .await
            .unwrap();

        let player = SpeakerPlayer::new();
        let handle = player.load(&path).await.unwrap();
        assert_eq!(handle.duration(), std::time::Duration::from_millis(100));
        assert_eq!(player.loaded(), 1);

        player.unload(&handle);
        assert_eq!(player.loaded(), 0);
        assert!(matches!(
            player.play(&handle).await,
            Err(SoundError::Playback(_))
        ));
    }
}
