//! Deployment pipeline: pre-flight, critical files first, then the rest in
//! bounded concurrent batches.
//!
//! The pipeline is generic over [`ObjectStore`] so integration tests can
//! drive it without a network. Per-file failures are values collected into
//! the [`DeployReport`]; only a failed pre-flight or a failed critical
//! upload aborts the run.

use std::path::Path;

use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::DeployConfig;
use crate::enumerate::{classify, enumerate};
use crate::error::DeployError;
use crate::store::ObjectStore;

/// Outcome of a full run.
#[derive(Debug, Serialize)]
pub struct DeployReport {
    /// Files found under the dist directory.
    pub total: usize,
    /// Remote keys uploaded successfully, criticals first.
    pub uploaded: Vec<String>,
    /// Non-critical files that failed, with their error messages.
    pub failures: Vec<UploadFailure>,
    pub site_url: String,
    pub cdn_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadFailure {
    pub path: String,
    pub error: String,
}

/// Reproduce the state of `dist_dir` in the store.
///
/// Critical files upload strictly sequentially before anything else; the
/// remainder goes out in `batch_size` concurrent chunks, each fully settled
/// before the next begins. A run with only non-critical failures still
/// returns `Ok` — callers decide what to do with the report's failure list.
pub async fn deploy<S>(
    store: &S,
    config: &DeployConfig,
    dist_dir: &Path,
) -> Result<DeployReport, DeployError>
where
    S: ObjectStore,
{
    info!(dist = %dist_dir.display(), bucket = %config.bucket, "Starting deployment");

    if config.anonymous {
        info!("Anonymous mode: skipping store access check");
    } else {
        match store.check_access().await {
            Ok(buckets) => info!(accessible = buckets.len(), "Store access check passed"),
            Err(e) => {
                error!(
                    error = %e,
                    "Store access check failed; COS_ANONYMOUS=true deploys without credentials"
                );
                return Err(DeployError::Config(format!(
                    "store access check failed: {e} (hint: set COS_ANONYMOUS=true for anonymous access)"
                )));
            }
        }
    }

    let targets = enumerate(dist_dir, config)?;
    let total = targets.len();
    let (critical, other) = classify(targets, &config.critical_names);
    info!(
        total,
        critical = critical.len(),
        other = other.len(),
        "Classified upload targets"
    );

    let mut uploaded: Vec<String> = Vec::with_capacity(total);
    let mut failures: Vec<UploadFailure> = Vec::new();

    // Critical files are load-order-sensitive: one at a time, in
    // enumeration order, and the first failure ends the run.
    for target in &critical {
        match store.put_object(target).await {
            Ok(_) => {
                info!(key = %target.key, "Uploaded critical file");
                uploaded.push(target.key.clone());
            }
            Err(e) => {
                error!(path = %target.relative_path, error = %e, "Critical upload failed, aborting run");
                return Err(DeployError::Store(e));
            }
        }
    }

    // Everything else in fixed-size batches: all puts in a batch issued
    // concurrently, the whole batch settled before the next one starts.
    // Failures mark the report and the run moves on.
    let mut done = 0usize;
    for batch in other.chunks(config.batch_size) {
        let results = join_all(batch.iter().map(|target| store.put_object(target))).await;
        for (target, result) in batch.iter().zip(results) {
            match result {
                Ok(_) => uploaded.push(target.key.clone()),
                Err(e) => {
                    warn!(path = %target.relative_path, error = %e, "Upload failed");
                    failures.push(UploadFailure {
                        path: target.relative_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        done += batch.len();
        info!(done, total = other.len(), "Batch settled");
    }

    let report = DeployReport {
        total,
        uploaded,
        failures,
        site_url: config.site_url(),
        cdn_url: config.cdn_url(),
    };
    info!(
        attempted = report.total,
        succeeded = report.uploaded.len(),
        failed = report.failures.len(),
        site_url = %report.site_url,
        "Deployment finished"
    );
    Ok(report)
}
