use std::fs;
use std::io;
use std::path::Path;

use super::gbdt::GradientBoostedModel;

/// Failure while reading or writing the persisted artifact.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("artifact io failure: {0}")]
    Io(#[from] io::Error),
    #[error("artifact payload malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Read a previously persisted artifact. `Ok(None)` means nothing is stored
/// yet, which callers treat as a cue to train.
pub fn load(path: &Path) -> Result<Option<GradientBoostedModel>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    let model = serde_json::from_str(&raw)?;
    Ok(Some(model))
}

/// Persist the artifact, creating parent directories as needed.
pub fn save(path: &Path, model: &GradientBoostedModel) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let raw = serde_json::to_string(model)?;
    fs::write(path, raw)?;
    Ok(())
}
