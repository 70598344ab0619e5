use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use modules::config::Config;
use modules::firebase::Firebase;
use modules::server::{self, StartupImport};

mod modules;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    let startup_import = if config.skip_import {
        info!("Startup import disabled, serving only");
        None
    } else {
        let specs = config.import_specs()?;
        let firebase = Firebase::connect(&config.database_url, &config.credentials)
            .with_context(|| format!("Cannot connect to {}", config.database_url))?;
        info!("Connected to {}", firebase.database_url());
        Some(StartupImport::new(Arc::new(firebase), specs))
    };

    server::run(config.port, startup_import)
        .await
        .with_context(|| format!("Cannot serve on port {}", config.port))
}
