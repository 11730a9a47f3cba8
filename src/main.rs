use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

use conf_site::cms::{ContentSource, Query};
use conf_site::schema::{DocumentType, SchemaRegistry};
use conf_site::web::{app_router, state, AppState};
use conf_site::{logging, metrics, Config};

#[derive(Parser)]
#[command(name = "conf_site")]
#[command(about = "Conference website backed by a hosted CMS")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        /// Overrides server.port and PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Query every document type once and print how many documents came back
    CheckCms,
    /// Validate a JSON document, or an array of documents, against a content schema
    Validate {
        /// Document type, e.g. conference or mapLocation
        doc_type: DocumentType,
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load_from(&cli.config).context("loading configuration")?;

    match cli.command {
        Commands::Serve { port } => serve(config, port).await,
        Commands::CheckCms => check_cms(&config).await,
        Commands::Validate { doc_type, file } => validate(doc_type, &file),
    }
}

async fn serve(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;
    metrics::init_metrics();

    let app_state = AppState::from_config(&config)?;
    let app = app_router(app_state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(addr = %bind_addr, "web server listening");
    println!("Site listening on {} (visit http://127.0.0.1:{})", bind_addr, config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to listen for shutdown signal: {}", e);
            }
            info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn check_cms(config: &Config) -> anyhow::Result<()> {
    config.validate()?;
    let source = state::content_source(config)?;
    println!("Checking CMS project '{}' dataset '{}'", config.cms.project_id, config.cms.dataset);

    let mut failures = 0;
    for doc_type in DocumentType::ALL {
        let started = Instant::now();
        let query = Query::new(doc_type.as_str()).project(["_id"]).fresh();
        match source.fetch(&query).await {
            Ok(result) => {
                let count = result.as_array().map_or(0, Vec::len);
                println!("  ✅ {:<22} {:>5} documents ({} ms)", doc_type, count, started.elapsed().as_millis());
            }
            Err(e) => {
                failures += 1;
                println!("  ❌ {:<22} {}", doc_type, e);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} document type(s) could not be queried");
    }
    println!("CMS connection OK");
    Ok(())
}

fn validate(doc_type: DocumentType, file: &PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content).context("parsing JSON")?;
    let documents = match value {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    let registry = SchemaRegistry::load()?;
    let mut invalid = 0;
    for (index, doc) in documents.iter().enumerate() {
        let label = doc.get("_id").and_then(|v| v.as_str()).map(str::to_string).unwrap_or_else(|| format!("#{index}"));
        let violations = registry.violations_as(doc_type, doc);
        if violations.is_empty() {
            println!("  ✅ {label}");
        } else {
            invalid += 1;
            println!("  ❌ {label}");
            for v in violations {
                println!("       - {v}");
            }
        }
    }

    if invalid > 0 {
        bail!("{invalid} of {} document(s) failed {doc_type} validation", documents.len());
    }
    println!("{} document(s) valid", documents.len());
    Ok(())
}
