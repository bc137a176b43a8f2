//! CLI glue: argument parsing and the async entrypoint shared with
//! integration tests. All pipeline logic lives in [`crate::deploy`]; this
//! module only wires config, store client and report printing together.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{DeployConfig, DEFAULT_BATCH_SIZE};
use crate::deploy;
use crate::load_config::load_config;
use crate::store::CosClient;

/// CLI for cdn-deploy: publish a static build directory to COS behind a CDN.
#[derive(Parser)]
#[clap(
    name = "cdn-deploy",
    version,
    about = "Upload a static build directory to Tencent COS, critical files first"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload the dist directory to the configured bucket
    Deploy {
        /// Build output directory to upload
        #[clap(long, default_value = "./dist")]
        dist: PathBuf,

        /// Number of concurrent uploads per batch
        #[clap(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Print the final report as JSON
        #[clap(long)]
        json: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            dist,
            batch_size,
            json,
        } => {
            let config = DeployConfig {
                batch_size,
                ..load_config()?
            };
            let store = CosClient::new(&config).await?;
            let report = deploy::deploy(&store, &config, &dist).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Deployment complete: {}/{} files uploaded",
                    report.uploaded.len(),
                    report.total
                );
                for failure in &report.failures {
                    println!("  failed: {} ({})", failure.path, failure.error);
                }
                println!("Site: {}", report.site_url);
                if let Some(cdn) = &report.cdn_url {
                    println!("CDN:  {cdn}");
                }
            }
            Ok(())
        }
    }
}
