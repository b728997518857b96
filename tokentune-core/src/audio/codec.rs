//! WAV decode/encode using hound.
//!
//! Decoding accepts float and integer PCM of any bit depth hound supports
//! and always yields `f32` samples; integer samples are scaled by the signed
//! maximum for their bit depth. Encoding writes 32-bit float WAV, so a
//! decoded clip round-trips without requantization.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::audio::AudioBuffer;
use crate::error::{Result, TokentuneError};

fn decode_err(path: &Path, e: impl std::fmt::Display) -> TokentuneError {
    TokentuneError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn encode_err(path: &Path, e: impl std::fmt::Display) -> TokentuneError {
    TokentuneError::Encode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Decode a WAV file into planar f32 channels.
///
/// # Errors
/// `Decode` when the file is unreadable, corrupt, or not a supported format.
pub fn decode(path: &Path) -> Result<AudioBuffer> {
    let mut reader = WavReader::open(path).map_err(|e| decode_err(path, e))?;
    let spec = reader.spec();
    let channel_count = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| decode_err(path, e))?,
        SampleFormat::Int => {
            if spec.bits_per_sample <= 16 {
                reader
                    .samples::<i16>()
                    .map(|s| s.map(|v| (v as f32) / (i16::MAX as f32)))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| decode_err(path, e))?
            } else {
                let max = ((1_i64 << (spec.bits_per_sample - 1)) - 1) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| (v as f32) / max))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| decode_err(path, e))?
            }
        }
    };

    let frames = interleaved.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frames); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    debug!(
        path = %path.display(),
        channels = channel_count,
        sample_rate = spec.sample_rate,
        frames,
        "decoded wav"
    );

    AudioBuffer::new(channels, spec.sample_rate)
}

/// Write a buffer as 32-bit float WAV, creating parent directories as
/// needed. An existing file at `path` is overwritten.
///
/// # Errors
/// `Encode` when the destination cannot be created or written.
pub fn encode(path: &Path, buffer: &AudioBuffer) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| encode_err(path, e))?;
    }

    let spec = WavSpec {
        channels: buffer.channel_count() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| encode_err(path, e))?;
    for frame in 0..buffer.frames() {
        for channel in buffer.channels() {
            writer
                .write_sample(channel[frame])
                .map_err(|e| encode_err(path, e))?;
        }
    }
    writer.finalize().map_err(|e| encode_err(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MonoBuffer;

    #[test]
    fn float_wav_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let samples: Vec<f32> = (0..480).map(|i| (i as f32 * 0.01).sin() * 0.5).collect();
        let buffer = AudioBuffer::from(MonoBuffer::new(samples.clone(), 16000));
        encode(&path, &buffer).unwrap();

        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.channel_count(), 1);
        assert_eq!(decoded.sample_rate(), 16000);
        assert_eq!(decoded.channels()[0], samples);
    }

    #[test]
    fn int16_wav_decodes_scaled_to_unit_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("int16.wav");

        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(i16::MAX).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(-i16::MAX).unwrap();
        writer.finalize().unwrap();

        let decoded = decode(&path).unwrap();
        let samples = &decoded.channels()[0];
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 1.0).abs() < 1e-6);
        assert_eq!(samples[1], 0.0);
        assert!((samples[2] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn stereo_wav_decodes_to_planar_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let left = vec![0.25f32; 100];
        let right = vec![-0.5f32; 100];
        let buffer = AudioBuffer::new(vec![left.clone(), right.clone()], 44100).unwrap();
        encode(&path, &buffer).unwrap();

        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.channels()[0], left);
        assert_eq!(decoded.channels()[1], right);
    }

    #[test]
    fn decode_missing_file_is_decode_error() {
        let err = decode(Path::new("/nonexistent/missing.wav"));
        assert!(matches!(err, Err(TokentuneError::Decode { .. })));
    }

    #[test]
    fn encode_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("clip.wav");

        let buffer = AudioBuffer::from(MonoBuffer::new(vec![0.1f32; 10], 16000));
        encode(&path, &buffer).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn encode_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");

        let first = AudioBuffer::from(MonoBuffer::new(vec![0.1f32; 100], 16000));
        let second = AudioBuffer::from(MonoBuffer::new(vec![0.2f32; 50], 16000));
        encode(&path, &first).unwrap();
        encode(&path, &second).unwrap();

        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.frames(), 50);
        assert!((decoded.channels()[0][0] - 0.2).abs() < 1e-6);
    }
}
