mod cli;
mod commands;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use docqa_core::bootstrap::{AppBuilder, resolve_config_path};
use docqa_core::{Config, RagService};
use docqa_gateway::GatewayServer;
use docqa_memory::document::DocumentStats;
use tokio::sync::watch;

use crate::cli::{Cli, Command};
use crate::commands::ChunkOverrides;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("failed to load .env: {e}");
    }
    init_subscriber();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config);

    match cli.command {
        Command::Serve => {
            let builder = AppBuilder::new(config_path).await?;
            serve(builder).await
        }
        Command::Ingest => {
            let service = build_service(config_path).await?;
            let report = service.ingest().await.context("ingestion failed")?;
            println!(
                "Ingested {} document(s) into {} chunk(s)",
                report.documents, report.chunks
            );
            Ok(())
        }
        Command::SetupIndex => {
            let service = build_service(config_path).await?;
            service.setup_index().await.context("index setup failed")?;
            println!("Search index created successfully");
            Ok(())
        }
        Command::Ask { question, json } => {
            let service = build_service(config_path).await?;
            let answer = service.query(&question).await?;
            if json {
                println!("{}", commands::to_json(&answer)?);
            } else {
                println!("{}", commands::render_answer(&answer));
            }
            Ok(())
        }
        Command::Chunk {
            path,
            chunk_size,
            chunk_overlap,
            hard_cuts,
            json,
        } => {
            let config = Config::load(&config_path)?;
            let overrides = ChunkOverrides {
                chunk_size,
                chunk_overlap,
                hard_cuts,
            };
            let chunks = commands::chunk_path(&config, &path, overrides).await?;
            if json {
                println!("{}", commands::to_json(&chunks)?);
            } else {
                println!("{}", commands::render_chunks(&chunks));
            }
            Ok(())
        }
        Command::Sections {
            path,
            markers,
            json,
        } => {
            let config = Config::load(&config_path)?;
            let sections = commands::sections_of(&config, &path, &markers).await?;
            if json {
                println!("{}", commands::to_json(&sections)?);
            } else {
                println!("{}", commands::render_sections(&sections));
            }
            Ok(())
        }
        Command::Stats => {
            let config = Config::load(&config_path)?;
            let documents = commands::load_path(&config, &config.documents.path).await?;
            println!(
                "{}",
                commands::to_json(&DocumentStats::from_documents(&documents))?
            );
            Ok(())
        }
        Command::Config => {
            let service = build_service(config_path).await?;
            println!("{}", commands::to_json(&service.config_summary())?);
            Ok(())
        }
    }
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn build_service(config_path: std::path::PathBuf) -> anyhow::Result<RagService> {
    let builder = AppBuilder::new(config_path).await?;
    tracing::debug!(path = %builder.config_path().display(), "config loaded");
    Ok(builder.build_service()?)
}

async fn serve(builder: AppBuilder) -> anyhow::Result<()> {
    let gateway = builder.config().gateway.clone();
    let auth_token = builder
        .config()
        .secrets
        .gateway_token
        .as_ref()
        .map(|t| t.expose().to_owned());
    if auth_token.is_none() {
        tracing::warn!("DOCQA_GATEWAY_TOKEN not set, API is unauthenticated");
    }
    let service = Arc::new(builder.build_service()?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    GatewayServer::new(&gateway.bind, gateway.port, service, shutdown_rx)
        .with_auth(auth_token)
        .with_rate_limit(gateway.rate_limit)
        .with_max_body_size(gateway.max_body_size)
        .serve()
        .await?;
    Ok(())
}
