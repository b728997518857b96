//! PCM buffer types passed between the pipeline stages.
//!
//! Mono and multi-channel audio are distinct types rather than one
//! shape-checked array: [`AudioBuffer`] is what the decoder produces
//! (planar channels), [`MonoBuffer`] is what every stage after the downmix
//! operates on. Operations that only make sense on mono audio take a
//! `MonoBuffer` and cannot be handed the wrong shape.

pub mod codec;
pub mod normalize;
pub mod resample;

use crate::error::{Result, TokentuneError};

/// Decoded multi-channel audio: planar channels at a known sample rate.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// One `Vec<f32>` per channel, all of equal length.
    channels: Vec<Vec<f32>>,
    /// Sample rate in Hz (e.g. 16000, 44100, 48000).
    sample_rate: u32,
}

impl AudioBuffer {
    /// Build a buffer from planar channel data.
    ///
    /// # Errors
    /// `Shape` when there are no channels or the channels have unequal
    /// lengths.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(TokentuneError::Shape(
                "buffer must have at least one channel".into(),
            ));
        }
        let frames = channels[0].len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(TokentuneError::Shape(format!(
                "channels have unequal lengths: {:?}",
                channels.iter().map(Vec::len).collect::<Vec<_>>()
            )));
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub(crate) fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}

impl From<MonoBuffer> for AudioBuffer {
    fn from(mono: MonoBuffer) -> Self {
        Self {
            channels: vec![mono.samples],
            sample_rate: mono.sample_rate,
        }
    }
}

/// A contiguous block of mono PCM samples at a known sample rate.
///
/// Clips produced by the slicer are `MonoBuffer` values copied out of the
/// source: they own their samples and outlive the buffer they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoBuffer {
    /// Mono f32 samples, nominally in [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl MonoBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Returns the duration of this buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
