//! Directory enumeration and critical-file classification.
//!
//! Walks the dist directory once per run and turns every regular file into
//! an [`UploadTarget`] carrying its remote key, content type and cache
//! policy. Targets are ephemeral: created here, discarded once their
//! outcome lands in the report.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::mime::resolve_content_type;

/// Entry documents must always be re-fetched by clients.
pub const CACHE_NO_CACHE: &str = "no-cache";

/// Everything else is fingerprinted build output and can be cached hard.
pub const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// One file scheduled for upload.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub local_path: PathBuf,
    /// Path under the dist root, `/`-separated on every host.
    pub relative_path: String,
    /// Remote object key: configured prefix + relative path.
    pub key: String,
    pub content_type: String,
    pub cache_control: &'static str,
}

/// Recursively list every regular file under `root` in a deterministic
/// order. Directories are traversed, not uploaded. Fails when `root` does
/// not exist.
pub fn enumerate(root: &Path, config: &DeployConfig) -> Result<Vec<UploadTarget>, DeployError> {
    if !root.is_dir() {
        error!(root = %root.display(), "dist directory does not exist; run the build first");
        return Err(DeployError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("dist directory {} does not exist", root.display()),
        )));
    }

    let mut targets = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        // Entries always live under `root`, so the prefix strip cannot fail.
        let relative_path = entry
            .path()
            .strip_prefix(root)
            .unwrap()
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let cache_control = if relative_path.contains(&config.entry_document) {
            CACHE_NO_CACHE
        } else {
            CACHE_IMMUTABLE
        };
        debug!(path = %relative_path, "Found upload target");
        targets.push(UploadTarget {
            local_path: entry.path().to_path_buf(),
            key: format!("{}{}", config.prefix, relative_path),
            content_type: resolve_content_type(entry.path()),
            cache_control,
            relative_path,
        });
    }

    info!(count = targets.len(), root = %root.display(), "Enumerated dist directory");
    Ok(targets)
}

/// Partition targets into the critical subset and the remainder, preserving
/// enumeration order within each partition. A target is critical when its
/// relative path contains any configured matcher name.
pub fn classify(
    targets: Vec<UploadTarget>,
    critical_names: &[String],
) -> (Vec<UploadTarget>, Vec<UploadTarget>) {
    targets.into_iter().partition(|target| {
        critical_names
            .iter()
            .any(|name| target.relative_path.contains(name.as_str()))
    })
}
