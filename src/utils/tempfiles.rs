use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Sibling temp path used while writing `path`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.tmp"))
}

/// Write `bytes` to a temp file next to `path`, then rename over `path`.
/// Readers see either the old content or the new, never a partial write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, bytes)
        .with_context(|| format!("write temp file {}", temp_path.display()))?;
    fs::rename(&temp_path, path).with_context(|| {
        format!(
            "atomic rename ({} -> {})",
            temp_path.display(),
            path.display()
        )
    })
}
