//! Sequential preprocessing pipeline.
//!
//! ## Stages (per run)
//!
//! ```text
//! 1. Reset manifest (fresh-start semantics)
//! 2. Discover *.wav inputs, sorted by path
//! 3. Per file: decode → to_mono → resample → peak_normalize → slice
//! 4. Per clip: rms gate → encode → manifest append
//! 5. Summary
//! ```
//!
//! Everything runs on the calling thread, one file at a time, one clip at a
//! time. The first error aborts the run; whatever clips and manifest lines
//! were already written stay on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    audio::{codec, normalize, resample},
    config::PreprocessConfig,
    error::{Result, TokentuneError},
    manifest::{self, ManifestRecord},
    slice,
};

/// Input files must carry this exact, case-sensitive suffix.
pub const INPUT_EXTENSION: &str = ".wav";

/// Name of the manifest file inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.jsonl";

/// Counters and locations reported after a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Source files decoded and sliced.
    pub files_processed: usize,
    /// Clips written to disk and recorded in the manifest.
    pub clips_accepted: usize,
    /// Clips dropped by the silence gate (no file, no manifest line).
    pub clips_skipped_silent: usize,
    /// Where the manifest lives. The file exists only if at least one
    /// record was written.
    pub manifest_path: PathBuf,
}

/// Run the full preprocessing pipeline over `input_dir`.
///
/// # Errors
/// `NoInput` when the input directory holds no `.wav` files; any decode,
/// resample, slice, encode, or IO failure propagates and aborts the run.
pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    config: &PreprocessConfig,
) -> Result<RunSummary> {
    // ── 1. Fresh-start manifest ───────────────────────────────────────────
    let manifest_path = output_dir.join(MANIFEST_FILE);
    if manifest_path.exists() {
        fs::remove_file(&manifest_path)?;
        debug!(path = %manifest_path.display(), "removed manifest from previous run");
    }

    // ── 2. Discover inputs ────────────────────────────────────────────────
    let wav_paths = discover_inputs(input_dir)?;
    info!(
        files = wav_paths.len(),
        input_dir = %input_dir.display(),
        "discovered input files"
    );

    // ── 3/4. Per file, per clip ───────────────────────────────────────────
    let mut summary = RunSummary {
        files_processed: 0,
        clips_accepted: 0,
        clips_skipped_silent: 0,
        manifest_path,
    };

    for wav_path in &wav_paths {
        process_file(wav_path, output_dir, config, &mut summary)?;
        summary.files_processed += 1;
    }

    // ── 5. Summary ────────────────────────────────────────────────────────
    info!(
        files_processed = summary.files_processed,
        clips_accepted = summary.clips_accepted,
        clips_skipped_silent = summary.clips_skipped_silent,
        manifest = %summary.manifest_path.display(),
        "preprocessing run complete"
    );

    Ok(summary)
}

/// Non-recursive listing of `.wav` files directly inside `input_dir`,
/// sorted by path for deterministic processing order.
fn discover_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut wav_paths = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(INPUT_EXTENSION))
            .unwrap_or(false);
        if matches {
            wav_paths.push(path);
        }
    }
    wav_paths.sort();

    if wav_paths.is_empty() {
        return Err(TokentuneError::NoInput {
            dir: input_dir.to_path_buf(),
        });
    }
    Ok(wav_paths)
}

fn process_file(
    wav_path: &Path,
    output_dir: &Path,
    config: &PreprocessConfig,
    summary: &mut RunSummary,
) -> Result<()> {
    let decoded = codec::decode(wav_path)?;
    let mono = normalize::to_mono(decoded);
    let mut waveform = resample::resample(mono, config.target_sr)?;
    normalize::peak_normalize(&mut waveform.samples, config.peak_target);

    // Clip-length math runs against the resampled rate the buffer now
    // carries, so a 44.1 kHz source sliced for 16 kHz output cannot end up
    // with windows sized for the wrong rate.
    let clips = slice::slice_clips(&waveform, config.clip_seconds, config.hop_seconds)?;

    info!(
        file = %wav_path.display(),
        duration_secs = waveform.duration_secs(),
        clips = clips.len(),
        "processing file"
    );

    let stem = wav_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();

    for (index, clip) in clips.into_iter().enumerate() {
        let clip_rms = normalize::rms(&clip.samples);
        if clip_rms < config.silence_rms_threshold {
            summary.clips_skipped_silent += 1;
            debug!(index, clip_rms, "dropping clip below silence threshold");
            continue;
        }

        let out_path = output_dir.join(format!("{stem}_clip{index:05}{INPUT_EXTENSION}"));
        let sample_rate = clip.sample_rate;
        codec::encode(&out_path, &clip.into())?;

        manifest::append(
            &summary.manifest_path,
            &ManifestRecord {
                clip_path: manifest::posix_path(&out_path),
                source_path: manifest::posix_path(wav_path),
                sample_rate,
                clip_seconds: config.clip_seconds,
                hop_seconds: config.hop_seconds,
                clip_rms,
            },
        )?;
        summary.clips_accepted += 1;
    }

    Ok(())
}
