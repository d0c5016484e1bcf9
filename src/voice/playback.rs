//! Audio playback to the default output device
//!
//! Each narration opens the device fresh and tears it down once the stream
//! drains; nothing is shared between narrations.

use std::io::Cursor;
use std::sync::mpsc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate};
use minimp3::{Decoder, Frame};

use crate::{Error, Result};

/// Extra wait beyond the computed stream length before giving up
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Plays audio through the default output device, blocking until done
pub struct AudioPlayback {
    device: Device,
}

impl AudioPlayback {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns error if no output device is available
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        tracing::debug!(device = device.name().unwrap_or_default(), "audio output opened");
        Ok(Self { device })
    }

    /// Decode MP3 bytes and play them, blocking until playback completes
    ///
    /// # Errors
    ///
    /// Returns error if decoding fails or the device rejects the stream
    pub fn play_mp3(&self, mp3_data: &[u8]) -> Result<()> {
        let (samples, sample_rate) = decode_mp3(mp3_data)?;
        self.play_pcm(samples, sample_rate)
    }

    /// Play mono f32 samples at the given rate, blocking until done
    ///
    /// # Errors
    ///
    /// Returns error if the device has no config for the sample rate or
    /// the stream fails to start
    pub fn play_pcm(&self, samples: Vec<f32>, sample_rate: u32) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let config = self.output_config(sample_rate)?;
        let channels = config.channels as usize;

        #[allow(clippy::cast_precision_loss)]
        let stream_len = Duration::from_secs_f64(samples.len() as f64 / f64::from(sample_rate));

        // The callback signals once it has written the last sample; the
        // device buffer needs a moment after that to actually drain.
        let (done_tx, done_rx) = mpsc::channel::<()>();
        let mut pos = 0usize;
        let mut signalled = false;

        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let sample = samples.get(pos).copied().unwrap_or(0.0);
                        pos += 1;
                        for slot in frame {
                            *slot = sample;
                        }
                    }
                    if pos >= samples.len() && !signalled {
                        signalled = true;
                        let _ = done_tx.send(());
                    }
                },
                |e| tracing::warn!(error = %e, "audio stream error"),
                None,
            )
            .map_err(|e| Error::Audio(format!("failed to build stream: {e}")))?;

        stream
            .play()
            .map_err(|e| Error::Audio(format!("failed to start playback: {e}")))?;

        done_rx
            .recv_timeout(stream_len + DRAIN_GRACE)
            .map_err(|_| Error::Audio("playback stalled".to_string()))?;

        std::thread::sleep(Duration::from_millis(100));
        Ok(())
    }

    /// Pick an output config for the sample rate, preferring mono
    fn output_config(&self, sample_rate: u32) -> Result<cpal::StreamConfig> {
        let rate = SampleRate(sample_rate);
        let supported = self
            .device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .filter(|c| c.min_sample_rate() <= rate && c.max_sample_rate() >= rate)
            .min_by_key(cpal::SupportedStreamConfigRange::channels)
            .ok_or_else(|| {
                Error::Audio(format!("no output config supports {sample_rate} Hz"))
            })?;

        Ok(supported.with_sample_rate(rate).config())
    }
}

/// Decode MP3 bytes to mono f32 samples plus the stream's sample rate
fn decode_mp3(data: &[u8]) -> Result<(Vec<f32>, u32)> {
    let mut decoder = Decoder::new(Cursor::new(data));
    let mut samples = Vec::new();
    let mut sample_rate = 0u32;

    loop {
        match decoder.next_frame() {
            Ok(Frame {
                data,
                sample_rate: rate,
                channels,
                ..
            }) => {
                #[allow(clippy::cast_sign_loss)]
                {
                    sample_rate = rate as u32;
                }
                if channels <= 1 {
                    samples.extend(data.iter().map(|s| f32::from(*s) / 32768.0));
                } else {
                    // downmix to mono
                    for frame in data.chunks(channels) {
                        let sum: i32 = frame.iter().map(|s| i32::from(*s)).sum();
                        #[allow(clippy::cast_precision_loss)]
                        samples.push(sum as f32 / (channels as f32 * 32768.0));
                    }
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("mp3 decode failed: {e}"))),
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(Error::Audio("empty audio stream".to_string()));
    }

    Ok((samples, sample_rate))
}
