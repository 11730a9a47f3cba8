//! Import content documents into the CMS.
//!
//! Every document is validated against its content schema first; nothing is
//! written if any document is invalid.
//!
//! Usage:
//!   migrate-content data/conferences.json --dry-run
//!   migrate-content export.ndjson --batch-size 25

use anyhow::{bail, Context};
use clap::Parser;
use conf_site::cms::CmsClient;
use conf_site::migration::{self, DEFAULT_BATCH_SIZE};
use conf_site::schema::SchemaRegistry;
use conf_site::{logging, Config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "migrate-content")]
#[command(about = "Validate and import content documents into the CMS")]
struct Args {
    /// JSON array, single document, or .ndjson export
    file: PathBuf,

    /// Validate only; do not write
    #[arg(long)]
    dry_run: bool,

    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();
    let args = Args::parse();

    let documents = migration::read_documents(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let registry = SchemaRegistry::load()?;
    let plan = migration::plan(&registry, documents);

    println!("📋 {} document(s) valid, {} rejected", plan.accepted.len(), plan.rejected.len());
    for rejected in &plan.rejected {
        println!("  ❌ {}", rejected.label);
        for problem in &rejected.problems {
            println!("       - {problem}");
        }
    }
    if !plan.rejected.is_empty() {
        bail!("fix the rejected documents before importing");
    }
    if args.dry_run {
        println!("Dry run: nothing written");
        return Ok(());
    }

    let config = Config::load_from(&args.config)?;
    if config.cms.token.is_none() {
        bail!("CMS_TOKEN is required to write documents");
    }
    let client = CmsClient::new(&config.cms)?;
    let written = migration::apply(&client, &plan.accepted, args.batch_size).await?;
    println!("✅ {written} document(s) written to dataset '{}'", config.cms.dataset);
    Ok(())
}
