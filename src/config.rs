use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Non-critical uploads issued concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Relative path of the document visitors load first.
pub const DEFAULT_ENTRY_DOCUMENT: &str = "index.html";

/// Files matching any of these names upload to completion before anything
/// else; they are the ones a half-deployed site must not be missing.
pub fn default_critical_names() -> Vec<String> {
    vec![
        DEFAULT_ENTRY_DOCUMENT.to_string(),
        "manifest.json".to_string(),
        "service-worker.js".to_string(),
    ]
}

/// Immutable configuration for one deployment run.
///
/// Built once by [`crate::load_config`] and passed explicitly into
/// [`crate::deploy::deploy`]; nothing in the uploader mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: String,
    pub region: String,
    /// Key namespace; always empty or `/`-terminated.
    pub prefix: String,
    /// Replaces the bucket endpoint in the computed site URL when set.
    pub domain: Option<String>,
    pub cdn_domain: Option<String>,
    /// Skip the pre-flight probe and send unsigned requests.
    pub anonymous: bool,
    pub batch_size: usize,
    /// Substring matchers selecting the critical upload subset.
    pub critical_names: Vec<String>,
    pub entry_document: String,
}

impl DeployConfig {
    /// Key prefixes always end in `/` so keys join without surprises; an
    /// empty prefix stays empty.
    pub fn normalize_prefix(raw: &str) -> String {
        if raw.is_empty() || raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        }
    }

    /// Public URL of the entry document once deployed.
    pub fn site_url(&self) -> String {
        match &self.domain {
            Some(domain) => format!("https://{}/{}{}", domain, self.prefix, self.entry_document),
            None => format!(
                "https://{}.cos.{}.myqcloud.com/{}{}",
                self.bucket, self.region, self.prefix, self.entry_document
            ),
        }
    }

    /// CDN-fronted URL of the entry document, when a CDN domain is configured.
    pub fn cdn_url(&self) -> Option<String> {
        self.cdn_domain
            .as_ref()
            .map(|domain| format!("https://{}/{}{}", domain, self.prefix, self.entry_document))
    }

    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.bucket,
            region = %self.region,
            prefix = %self.prefix,
            secret_id = %mask(self.secret_id.as_deref()),
            secret_key = if self.secret_key.is_some() { "******" } else { "unset" },
            anonymous = self.anonymous,
            batch_size = self.batch_size,
            "Loaded deployment config"
        );
        debug!(
            critical = ?self.critical_names,
            entry = %self.entry_document,
            domain = ?self.domain,
            cdn_domain = ?self.cdn_domain,
            "Config details"
        );
    }
}

fn mask(value: Option<&str>) -> String {
    match value {
        Some(v) if v.len() > 5 => format!("{}...", v.chars().take(5).collect::<String>()),
        Some(_) => "***".to_string(),
        None => "unset".to_string(),
    }
}
