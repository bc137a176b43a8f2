use anyhow::Result;
use cdn_deploy::cli::{run, Cli};
use cdn_deploy::load_config::load_env;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Env files load before tracing init so RUST_LOG from a file applies.
    let env_file = load_env();
    tracing_subscriber::fmt::init();
    if let Some(file) = &env_file {
        tracing::info!(file = %file.display(), "Loaded environment file");
    }

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("Deployment CLI completed successfully"),
        Err(e) => tracing::error!(error = %e, "Deployment CLI exited with error"),
    }
    result
}
