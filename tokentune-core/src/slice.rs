//! Fixed-window clip slicing with hop.
//!
//! ## Windowing policy
//!
//! Start at sample 0 and emit `[start, start + clip_samples)` while the
//! full window fits, advancing by `hop_samples` each time. Windows overlap
//! when hop < clip. A trailing window shorter than `clip_samples` is never
//! emitted and never padded, so a buffer shorter than one clip yields
//! nothing.

use tracing::debug;

use crate::audio::MonoBuffer;
use crate::error::{Result, TokentuneError};

/// Split a mono buffer into fixed-length clips.
///
/// `clip_seconds` and `hop_seconds` are converted to sample counts by
/// rounding to the nearest integer at the buffer's own sample rate.
///
/// # Errors
/// `Config` when either duration rounds to zero samples (e.g. a 0.0001 s
/// clip at 8 kHz).
pub fn slice_clips(
    buffer: &MonoBuffer,
    clip_seconds: f64,
    hop_seconds: f64,
) -> Result<Vec<MonoBuffer>> {
    let clip_samples = seconds_to_samples(clip_seconds, buffer.sample_rate);
    let hop_samples = seconds_to_samples(hop_seconds, buffer.sample_rate);

    if clip_samples == 0 || hop_samples == 0 {
        return Err(TokentuneError::Config(format!(
            "clip ({clip_seconds} s) and hop ({hop_seconds} s) must each cover at least one sample at {} Hz",
            buffer.sample_rate
        )));
    }

    let total = buffer.samples.len();
    let mut clips = Vec::new();
    let mut start = 0usize;
    while start + clip_samples <= total {
        clips.push(MonoBuffer::new(
            buffer.samples[start..start + clip_samples].to_vec(),
            buffer.sample_rate,
        ));
        start += hop_samples;
    }

    debug!(
        clips = clips.len(),
        clip_samples,
        hop_samples,
        total_samples = total,
        "sliced buffer"
    );

    Ok(clips)
}

fn seconds_to_samples(seconds: f64, sample_rate: u32) -> usize {
    let samples = (seconds * f64::from(sample_rate)).round();
    if samples > 0.0 {
        samples as usize
    } else {
        0
    }
}
