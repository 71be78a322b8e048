//! Warm-start persistence
//!
//! A finished run saves its final markup vector so the next run can start
//! from an already-settled cross-section instead of the analytic steady
//! state. Loading is best-effort: a missing file, unparseable contents, or
//! a length mismatch all fall back to the steady-state initialization at
//! the call site rather than failing the run.

use std::path::Path;

/// Load a warm-start markup vector if it exists and matches the panel size
///
/// Returns `None` (caller falls back to steady state) when the file is
/// missing, does not parse, has the wrong length, or holds a non-positive
/// markup.
pub fn load_warm_start(path: &Path, n_firms: usize) -> Option<Vec<f64>> {
    let text = std::fs::read_to_string(path).ok()?;
    let markups: Vec<f64> = serde_json::from_str(&text).ok()?;
    if markups.len() != n_firms {
        return None;
    }
    if markups.iter().any(|&m| !(m > 0.0) || !m.is_finite()) {
        return None;
    }
    Some(markups)
}

/// Atomically save the markup vector for future runs
///
/// Writes to a sibling temp file and renames over the target, so a crash
/// mid-write never leaves a truncated warm-start file.
pub fn save_warm_start(path: &Path, markups: &[f64]) -> std::io::Result<()> {
    let json = serde_json::to_string(markups)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)
}
