//! Object-store client abstraction and the Tencent COS implementation.
//!
//! [`ObjectStore`] is the seam between orchestration and transport: the
//! deploy pipeline is generic over it, and the integration tests drive it
//! with the exported mock. [`CosClient`] implements it against COS's
//! S3-compatible endpoint using virtual-host addressing
//! (`<bucket>.cos.<region>.myqcloud.com`).
//!
//! The client is stateless per call and safe to share across the concurrent
//! uploads of a batch; connection pooling is the SDK's concern.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DeployConfig;
use crate::enumerate::UploadTarget;
use crate::error::DeployError;

/// Transport or authorization failure surfaced by the store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("access check failed: {0}")]
    AccessCheck(String),
    #[error("put {key} failed: {message}")]
    Put { key: String, message: String },
}

/// Store metadata returned for a successful transfer.
#[derive(Debug, Clone)]
pub struct PutResponse {
    pub etag: Option<String>,
}

/// Async client for the deployment object store: one access probe per run
/// and one `put_object` per file.
///
/// Mocked in tests via `mockall`; the mock is exported under the default
/// `test-export-mocks` feature.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Pre-flight probe: list the accessible buckets to fail fast on bad
    /// credentials, before any file is transferred.
    async fn check_access(&self) -> Result<Vec<String>, StoreError>;

    /// Upload one file under `target.key` with its content type and cache
    /// policy, a public-read ACL and a permissive cross-origin header.
    async fn put_object(&self, target: &UploadTarget) -> Result<PutResponse, StoreError>;
}

/// S3-compatible client for Tencent COS.
pub struct CosClient {
    client: Client,
    bucket: String,
}

impl CosClient {
    /// Build a client from the deployment config. Anonymous mode produces
    /// an unsigned client; otherwise the config's static credentials sign
    /// every request.
    pub async fn new(config: &DeployConfig) -> Result<Self, DeployError> {
        let region = Region::new(config.region.clone());
        let endpoint_url = format!("https://cos.{}.myqcloud.com", config.region);

        let base = if config.anonymous {
            info!("Anonymous mode: building unsigned store client");
            aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .no_credentials()
                .load()
                .await
        } else {
            let (Some(id), Some(key)) = (config.secret_id.as_deref(), config.secret_key.as_deref())
            else {
                return Err(DeployError::Config(
                    "store credentials are required unless COS_ANONYMOUS=true".to_string(),
                ));
            };
            let credentials = Credentials::new(id, key, None, None, "cos-env");
            aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .credentials_provider(credentials)
                .load()
                .await
        };

        let s3_config = aws_sdk_s3::config::Builder::from(&base)
            .endpoint_url(endpoint_url)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for CosClient {
    async fn check_access(&self) -> Result<Vec<String>, StoreError> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| StoreError::AccessCheck(format!("{}", DisplayErrorContext(&e))))?;

        let buckets: Vec<String> = response
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect();
        info!(buckets = ?buckets, "Store access check passed");
        Ok(buckets)
    }

    async fn put_object(&self, target: &UploadTarget) -> Result<PutResponse, StoreError> {
        let body = ByteStream::from_path(&target.local_path)
            .await
            .map_err(|e| StoreError::Put {
                key: target.key.clone(),
                message: e.to_string(),
            })?;

        let response = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&target.key)
            .body(body)
            .content_type(&target.content_type)
            .cache_control(target.cache_control)
            .acl(ObjectCannedAcl::PublicRead)
            .customize()
            .mutate_request(|request| {
                // COS persists this on the object; S3's builder has no
                // first-class setter for it.
                request.headers_mut().insert("Access-Control-Allow-Origin", "*");
            })
            .send()
            .await
            .map_err(|e| StoreError::Put {
                key: target.key.clone(),
                message: format!("{}", DisplayErrorContext(&e)),
            })?;

        debug!(key = %target.key, "put_object succeeded");
        Ok(PutResponse {
            etag: response.e_tag().map(str::to_string),
        })
    }
}
