use super::types::Step;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of a saved step log inside its folder.
pub const STEPS_FILE: &str = "steps.json";

/// Interchange literal used when the log cannot be serialized.
pub const EMPTY_LOG_JSON: &str = "[]";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pretty-printed JSON of the step log, or `[]` if serialization fails.
pub fn steps_to_json(steps: &[Step]) -> String {
    match serde_json::to_string_pretty(steps) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(error = %err, "step log serialization failed, exporting empty array");
            EMPTY_LOG_JSON.to_string()
        }
    }
}

pub fn steps_from_json(json: &str) -> Result<Vec<Step>, StorageError> {
    Ok(serde_json::from_str(json)?)
}

/// Save the log as `steps.json` in `dir` and return the file's path.
pub fn write_steps(dir: &Path, steps: &[Step]) -> Result<PathBuf, StorageError> {
    let path = dir.join(STEPS_FILE);
    std::fs::write(&path, serde_json::to_vec_pretty(steps)?)?;
    tracing::debug!(path = %path.display(), steps = steps.len(), "step log saved");
    Ok(path)
}

pub fn read_steps(path: &Path) -> Result<Vec<Step>, StorageError> {
    let contents = std::fs::read_to_string(path)?;
    steps_from_json(&contents)
}
