use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod import;

#[derive(Debug, Parser)]
#[command(name = "shopstock")]
#[command(about = "Storefront catalog import pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import a catalog CSV and its product images into the store.
    Import(ImportArgs),
    /// Run pending database migrations.
    Migrate,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to the catalog CSV file.
    #[arg(long, default_value = "./catalog.csv")]
    pub file: PathBuf,

    /// Optional CSV of per-product image declarations.
    #[arg(long)]
    pub images_file: Option<PathBuf>,

    /// Root directory scanned for product image files.
    #[arg(long, default_value = "./images")]
    pub images_dir: PathBuf,

    /// Parse, classify, and plan without touching the database or storage.
    #[arg(long)]
    pub dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG wins; SHOPSTOCK_LOG_LEVEL is the configured default.
    let default_level =
        std::env::var("SHOPSTOCK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Import(args) => import::run_import(&args).await,
        Commands::Migrate => {
            let pool = shopstock_db::connect_pool_from_env().await?;
            let applied = shopstock_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
    }
}
