//! Offline sample-rate conversion using a rubato `FastFixedIn` resampler.
//!
//! ## Design
//!
//! Recordings arrive at whatever rate they were captured at; training wants
//! one fixed rate. The whole buffer is available up front, so the converter
//! feeds rubato full chunks, flushes the remainder as a partial chunk, then
//! drains the resampler's delay line.
//!
//! When the source rate already equals the target, the buffer is returned
//! as-is — no rubato session is created at all.

use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::debug;

use crate::audio::MonoBuffer;
use crate::error::{Result, TokentuneError};

/// Input frame count fed to rubato per process call.
const CHUNK_SIZE: usize = 1024;

/// Convert a mono buffer to `target_rate`.
///
/// Output length is whatever rubato produces, approximately
/// `len * target_rate / source_rate`, never guaranteed exact.
///
/// # Errors
/// `Resample` if rubato fails to initialise or process.
pub fn resample(buffer: MonoBuffer, target_rate: u32) -> Result<MonoBuffer> {
    if buffer.sample_rate == target_rate {
        // Passthrough — bit-identical, no reallocation.
        return Ok(buffer);
    }

    let ratio = f64::from(target_rate) / f64::from(buffer.sample_rate);

    let mut resampler = FastFixedIn::<f32>::new(
        ratio,
        1.0, // fixed ratio — no dynamic adjustment
        PolynomialDegree::Cubic,
        CHUNK_SIZE,
        1, // mono
    )
    .map_err(|e| TokentuneError::Resample(format!("resampler init: {e}")))?;

    let max_out = resampler.output_frames_max();
    let mut output_buf = vec![vec![0f32; max_out]; 1];
    let mut out: Vec<f32> =
        Vec::with_capacity((buffer.samples.len() as f64 * ratio).ceil() as usize + max_out);

    let mut consumed = 0;
    while buffer.samples.len() - consumed >= CHUNK_SIZE {
        let input_slice = &buffer.samples[consumed..consumed + CHUNK_SIZE];
        let (_used, produced) = resampler
            .process_into_buffer(&[input_slice], &mut output_buf, None)
            .map_err(|e| TokentuneError::Resample(format!("resampler process: {e}")))?;
        out.extend_from_slice(&output_buf[0][..produced]);
        consumed += CHUNK_SIZE;
    }

    // Flush the remainder, then drain whatever the delay line still holds.
    let tail = &buffer.samples[consumed..];
    if !tail.is_empty() {
        let (_used, produced) = resampler
            .process_partial_into_buffer(Some(&[tail]), &mut output_buf, None)
            .map_err(|e| TokentuneError::Resample(format!("resampler flush: {e}")))?;
        out.extend_from_slice(&output_buf[0][..produced]);
    }
    let (_used, produced) = resampler
        .process_partial_into_buffer(Option::<&[&[f32]]>::None, &mut output_buf, None)
        .map_err(|e| TokentuneError::Resample(format!("resampler drain: {e}")))?;
    out.extend_from_slice(&output_buf[0][..produced]);

    debug!(
        from = buffer.sample_rate,
        to = target_rate,
        in_samples = buffer.samples.len(),
        out_samples = out.len(),
        "resampled buffer"
    );

    Ok(MonoBuffer::new(out, target_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_identity() {
        let samples: Vec<f32> = (0..480).map(|i| i as f32 * 0.001).collect();
        let buffer = MonoBuffer::new(samples.clone(), 16_000);
        let out = resample(buffer, 16_000).unwrap();
        assert_eq!(out.samples, samples);
        assert_eq!(out.sample_rate, 16_000);
    }

    #[test]
    fn downsample_48k_to_16k_scales_length() {
        let buffer = MonoBuffer::new(vec![0.0f32; 48_000], 48_000);
        let out = resample(buffer, 16_000).unwrap();
        assert_eq!(out.sample_rate, 16_000);
        // ~1 second of output; rubato's chunking and delay line shift the
        // exact count by up to one chunk's worth.
        let expected = 16_000i64;
        assert!(
            (out.samples.len() as i64 - expected).abs() <= CHUNK_SIZE as i64,
            "output len={} expected≈{}",
            out.samples.len(),
            expected
        );
    }

    #[test]
    fn upsample_8k_to_16k_scales_length() {
        let buffer = MonoBuffer::new(vec![0.0f32; 8_000], 8_000);
        let out = resample(buffer, 16_000).unwrap();
        assert_eq!(out.sample_rate, 16_000);
        let expected = 16_000i64;
        assert!(
            (out.samples.len() as i64 - expected).abs() <= 2 * CHUNK_SIZE as i64,
            "output len={} expected≈{}",
            out.samples.len(),
            expected
        );
    }

    #[test]
    fn input_shorter_than_one_chunk_still_produces_output() {
        let buffer = MonoBuffer::new(vec![0.5f32; 300], 48_000);
        let out = resample(buffer, 16_000).unwrap();
        assert!(!out.samples.is_empty());
    }
}
