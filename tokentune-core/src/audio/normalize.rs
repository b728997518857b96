//! Mono-downmix, peak normalization, and RMS energy measurement.

use tracing::debug;

use crate::audio::{AudioBuffer, MonoBuffer};

/// Peaks below this are treated as silence and left untouched, so all-zero
/// or sub-noise-floor buffers never get blown up by a near-zero divisor.
pub const PEAK_EPS: f32 = 1e-8;

/// Added under the square root so the result stays strictly positive and
/// finite even for all-zero input.
pub const RMS_EPS: f64 = 1e-12;

/// Downmix a decoded buffer to mono by averaging across channels.
///
/// A single-channel buffer is moved out without copying.
pub fn to_mono(buffer: AudioBuffer) -> MonoBuffer {
    let sample_rate = buffer.sample_rate();
    let mut channels = buffer.into_channels();

    if channels.len() == 1 {
        return MonoBuffer::new(channels.swap_remove(0), sample_rate);
    }

    let frames = channels[0].len();
    let channel_count = channels.len() as f32;
    let mut mono = Vec::with_capacity(frames);
    for frame in 0..frames {
        let sum: f32 = channels.iter().map(|c| c[frame]).sum();
        mono.push(sum / channel_count);
    }

    debug!(channels = channels.len(), frames, "downmixed to mono");
    MonoBuffer::new(mono, sample_rate)
}

/// Scale every sample so the peak absolute amplitude equals `target_peak`.
///
/// Buffers whose peak is below [`PEAK_EPS`] pass through untouched;
/// silence is not amplified.
pub fn peak_normalize(samples: &mut [f32], target_peak: f32) {
    let peak = samples.iter().fold(0f32, |acc, s| acc.max(s.abs()));
    if peak < PEAK_EPS {
        return;
    }

    let gain = target_peak / peak;
    for sample in samples.iter_mut() {
        *sample *= gain;
    }
}

/// Root-mean-square energy: `sqrt(mean(x²) + eps)`.
///
/// Always strictly positive, so comparison against a silence threshold of
/// 0.0 keeps every clip.
pub fn rms(samples: &[f32]) -> f32 {
    let mean_sq = if samples.is_empty() {
        0.0
    } else {
        samples
            .iter()
            .map(|s| f64::from(*s) * f64::from(*s))
            .sum::<f64>()
            / samples.len() as f64
    };
    (mean_sq + RMS_EPS).sqrt() as f32
}
