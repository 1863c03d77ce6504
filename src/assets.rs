use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;
use walkdir::WalkDir;

use crate::config::SelectionPolicy;
use crate::error::{Result, CaprenderError};

/// Name used when sanitization leaves nothing of the original
const FALLBACK_NAME: &str = "video.mp4";

/// Map a filename onto the legal character set: ASCII letters, digits,
/// `.`, `_` and `-`. Whitespace and anything else collapses to `_`, runs
/// of `_` collapse to one. Idempotent.
pub fn sanitize_file_name(name: &str) -> String {
    // Non-breaking spaces show up in names pasted from browsers
    let name = name.replace('\u{a0}', " ");
    let name = name.trim();

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for ch in name.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-') {
            ch
        } else {
            '_'
        };
        if mapped == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        out.push(mapped);
    }

    if out.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        out
    }
}

/// Find the input video in the public directory.
pub fn locate_video(
    public_dir: &Path,
    extensions: &[String],
    policy: SelectionPolicy,
) -> Result<PathBuf> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(public_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) {
            if extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)) {
                candidates.push(entry.path().to_path_buf());
            }
        }
    }

    if candidates.is_empty() {
        return Err(CaprenderError::NotFound(format!(
            "no video file in {}",
            public_dir.display()
        )));
    }

    match policy {
        SelectionPolicy::Single => {
            if candidates.len() > 1 {
                return Err(CaprenderError::Ambiguous(format!(
                    "{} video files in {}, expected exactly one",
                    candidates.len(),
                    public_dir.display()
                )));
            }
            Ok(candidates.remove(0))
        }
        SelectionPolicy::Newest => {
            candidates.sort_by_key(|path| modified_time(path));
            // Non-empty after the check above
            candidates.pop().ok_or_else(|| {
                CaprenderError::NotFound(format!("no video file in {}", public_dir.display()))
            })
        }
    }
}

fn modified_time(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Rename the video (and its same-stem transcript sidecar, when present) to
/// the sanitized filename. Pre-existing destinations are deleted first;
/// the two renames are not transactional.
pub fn ensure_legal_name(video_path: &Path) -> Result<PathBuf> {
    let name = video_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CaprenderError::Config("Invalid video filename".to_string()))?;

    let sanitized = sanitize_file_name(name);
    if sanitized == name {
        return Ok(video_path.to_path_buf());
    }

    let new_path = video_path.with_file_name(&sanitized);
    if new_path.exists() {
        std::fs::remove_file(&new_path)?;
    }

    let old_sidecar = video_path.with_extension("json");
    if old_sidecar.exists() {
        let new_sidecar = new_path.with_extension("json");
        if new_sidecar.exists() {
            std::fs::remove_file(&new_sidecar)?;
        }
        std::fs::rename(&old_sidecar, &new_sidecar)?;
    }

    std::fs::rename(video_path, &new_path)?;
    info!("Renamed: {} -> {}", name, sanitized);
    Ok(new_path)
}

/// Same-stem transcript sidecar path for a video.
pub fn transcript_path(video_path: &Path) -> PathBuf {
    video_path.with_extension("json")
}

/// Verify that transcription produced a sidecar. The direct same-stem match
/// wins; otherwise any `.json` in the same directory whose stem starts with
/// the video stem is accepted.
pub fn verify_transcript(video_path: &Path) -> Result<PathBuf> {
    let direct = transcript_path(video_path);
    if direct.exists() {
        return Ok(direct);
    }

    let stem = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CaprenderError::Config("Invalid video filename".to_string()))?;
    let dir = video_path
        .parent()
        .ok_or_else(|| CaprenderError::Config("Invalid video path".to_string()))?;

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(candidate_stem) = path.file_stem().and_then(|s| s.to_str()) {
            if candidate_stem.starts_with(stem) {
                return Ok(path.to_path_buf());
            }
        }
    }

    Err(CaprenderError::NotFound(format!(
        "no transcript produced for {}",
        video_path.display()
    )))
}
