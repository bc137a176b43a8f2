//! ConfigProvider: adapts the process environment into an immutable
//! [`DeployConfig`].
//!
//! This is the only place environment variables are read. Presence checks
//! are the extent of the validation: non-anonymous mode requires both
//! secrets, the bucket is always required, and everything else has a
//! default or is optional.

use std::env;
use std::path::PathBuf;

use tracing::error;

use crate::config::{default_critical_names, DeployConfig, DEFAULT_BATCH_SIZE, DEFAULT_ENTRY_DOCUMENT};
use crate::error::DeployError;

/// Load `.env.production` when present, falling back to `.env.development`
/// and then a plain `.env`. Returns the file that was loaded, if any; real
/// environment variables always win over file contents.
pub fn load_env() -> Option<PathBuf> {
    for candidate in [".env.production", ".env.development"] {
        if let Ok(path) = dotenvy::from_filename(candidate) {
            return Some(path);
        }
    }
    dotenvy::dotenv().ok()
}

/// Read the `COS_*` environment into a [`DeployConfig`].
pub fn load_config() -> Result<DeployConfig, DeployError> {
    let anonymous = var("COS_ANONYMOUS").map(|v| v == "true").unwrap_or(false);
    let secret_id = var("COS_SECRET_ID");
    let secret_key = var("COS_SECRET_KEY");

    if !anonymous && (secret_id.is_none() || secret_key.is_none()) {
        error!("COS_SECRET_ID / COS_SECRET_KEY missing and COS_ANONYMOUS is not enabled");
        return Err(DeployError::Config(
            "COS_SECRET_ID and COS_SECRET_KEY must be set, or COS_ANONYMOUS=true".to_string(),
        ));
    }

    let bucket = var("COS_BUCKET").ok_or_else(|| {
        error!("COS_BUCKET missing in environment");
        DeployError::Config("COS_BUCKET must be set".to_string())
    })?;

    let config = DeployConfig {
        secret_id,
        secret_key,
        bucket,
        region: var("COS_REGION").unwrap_or_else(|| "ap-guangzhou".to_string()),
        prefix: DeployConfig::normalize_prefix(&var("COS_PREFIX").unwrap_or_default()),
        domain: var("COS_DOMAIN"),
        cdn_domain: var("COS_CDN_DOMAIN"),
        anonymous,
        batch_size: DEFAULT_BATCH_SIZE,
        critical_names: default_critical_names(),
        entry_document: DEFAULT_ENTRY_DOCUMENT.to_string(),
    };
    config.trace_loaded();
    Ok(config)
}

/// Empty values count as unset, matching how the env files are written.
fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
