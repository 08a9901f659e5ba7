mod cli;
mod config;
mod routes;
mod upload;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pii_redactor::RedactionEngine;
use text_extract::CommandExtractor;

use crate::cli::Cli;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse CLI args.
    let cli = Cli::parse();

    // 2. Load config, then merge CLI overrides.
    let mut cfg = config::load(&cli.config)?;

    if let Some(ref listen) = cli.listen {
        cfg.server.listen_addr = listen.clone();
    }
    if let Some(ref dir) = cli.upload_dir {
        cfg.upload.dir = dir.clone();
    }

    // 3. Initialize structured logging.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!(
        config_file = %cli.config.display(),
        listen = %cfg.server.listen_addr,
        upload_dir = %cfg.upload.dir.display(),
        "invoice-scrub starting"
    );

    // 4. Compile the redaction engine once; it is shared by all requests.
    let engine = RedactionEngine::new().context("failed to compile redaction catalogue")?;
    info!(rules = engine.rule_count(), "redaction engine ready");

    // 5. Wire the extraction collaborator.
    let extractor = CommandExtractor::new(
        cfg.extraction.pdftotext_bin.clone(),
        cfg.extraction.tesseract_bin.clone(),
    );

    // 6. Make sure the upload directory exists before accepting traffic.
    tokio::fs::create_dir_all(&cfg.upload.dir)
        .await
        .with_context(|| {
            format!(
                "failed to create upload directory: {}",
                cfg.upload.dir.display()
            )
        })?;

    // 7. Build the router and serve.
    let state = AppState {
        engine: Arc::new(engine),
        extractor: Arc::new(extractor),
        upload_dir: cfg.upload.dir.clone(),
    };
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen_addr))?;

    info!(listen = %cfg.server.listen_addr, "serving PII redaction API");
    axum::serve(listener, app)
        .await
        .context("server exited with error")?;

    Ok(())
}
