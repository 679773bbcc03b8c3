//! callstats-ingest - call-center report ingestion service
//!
//! `serve` (default) runs the HTTP service, `ingest` pushes local workbook
//! files through the same pipeline, `ledger` prints the submission ledger.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use callstats_common::config::{resolve_root_folder, FolderLayout, TomlConfig};
use callstats_ingest::services::{IngestPipeline, UploadedFile};
use callstats_ingest::AppState;

/// Command-line arguments for callstats-ingest
#[derive(Parser, Debug)]
#[command(name = "callstats-ingest")]
#[command(about = "Ingests monthly call-center report workbooks")]
#[command(version)]
struct Args {
    /// Root folder holding inbox/, archive/, error/ and the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides the config file)
    #[arg(short, long)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve,
    /// Ingest workbook files from disk
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print submitted filenames, one per line, or one entry's status
    Ledger {
        #[arg(long)]
        filename: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load_or_default(args.config.as_deref());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &config);
    let layout = FolderLayout::new(&root_folder);
    layout
        .ensure_directories()
        .with_context(|| format!("Failed to initialize root folder {}", root_folder.display()))?;
    info!("Root folder: {}", root_folder.display());

    let db = callstats_common::db::init_database(&layout.database)
        .await
        .context("Failed to open database")?;
    info!("Database: {}", layout.database.display());

    let pipeline = IngestPipeline::new(db.clone(), &layout);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let bind = args.bind.as_deref().unwrap_or(config.bind_address());
            serve(AppState::new(db, pipeline), bind).await
        }
        Command::Ingest { files } => ingest_files(&pipeline, &files).await,
        Command::Ledger { filename } => print_ledger(&pipeline, filename.as_deref()).await,
    }
}

async fn serve(state: AppState, bind: &str) -> Result<()> {
    let app = callstats_ingest::build_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;
    info!("Listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn ingest_files(pipeline: &IngestPipeline, files: &[PathBuf]) -> Result<()> {
    let mut failed = 0;

    for path in files {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let outcome = pipeline
            .ingest(UploadedFile::new(file_name(path), content))
            .await;

        if !outcome.is_success() {
            failed += 1;
        }
        println!("{}", outcome.message());
    }

    if failed > 0 {
        bail!("{} of {} files were not ingested", failed, files.len());
    }
    Ok(())
}

async fn print_ledger(pipeline: &IngestPipeline, filename: Option<&str>) -> Result<()> {
    let ledger = pipeline.ledger();

    match filename {
        Some(filename) => {
            let Some(entry) = ledger.status(filename).await? else {
                bail!("{} was never submitted", filename);
            };
            println!(
                "{}\t{}\t{}\t{}",
                entry.filename,
                entry.submitted_at,
                entry.state.as_str(),
                entry.reason.unwrap_or_default()
            );
        }
        None => print!("{}", ledger.export_lines().await?),
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
