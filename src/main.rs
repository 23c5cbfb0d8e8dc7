use clap::{Parser, Subcommand};
use tracing::error;

use std::sync::Arc;

use ecom_warehouse::config::Config;
use ecom_warehouse::extract::parse_datetime;
use ecom_warehouse::logging;
use ecom_warehouse::pipeline::{IngestPipeline, IngestSummary, TransformPipeline, TransformSummary};
use ecom_warehouse::warehouse::{InMemoryWarehouse, Warehouse};

#[derive(Parser)]
#[command(name = "ecom_warehouse")]
#[command(about = "E-commerce analytics warehouse pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, validate and load raw records from the configured sources
    Ingest {
        /// Directory containing the source CSV files (overrides config)
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Run the transformation layers over the raw tables
    Transform {
        /// Evaluation date for activity classification (defaults to now)
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Run ingestion and transformation sequentially
    Run {
        /// Directory containing the source CSV files (overrides config)
        #[arg(long)]
        data_dir: Option<String>,
        /// Evaluation date for activity classification (defaults to now)
        #[arg(long)]
        as_of: Option<String>,
    },
}

fn print_ingest_summary(summary: &IngestSummary) {
    println!("\n📊 Ingestion results:");
    println!("   Tables processed: {}", summary.tables_processed);
    println!("   Rows loaded: {}", summary.rows_loaded);
    println!("   Rows rejected: {}", summary.rows_rejected);
    println!("   Duration: {} ms", summary.duration_ms);

    if !summary.errors.is_empty() {
        println!("\n⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("   - {}", error);
        }
    }
}

fn print_transform_summary(summary: &TransformSummary) {
    println!("\n📊 Transformation results:");
    println!(
        "   Staged: {} customers, {} products, {} orders",
        summary.staged_customers, summary.staged_products, summary.staged_orders
    );
    println!("   dim_customers: {}", summary.dim_customers);
    println!("   dim_products: {}", summary.dim_products);
    println!("   fct_orders: {}", summary.fct_orders);
    println!("   Duration: {} ms", summary.duration_ms);
}

fn resolve_as_of(arg: Option<String>) -> Result<chrono::DateTime<chrono::Utc>, String> {
    match arg {
        None => Ok(chrono::Utc::now()),
        Some(raw) => {
            parse_datetime(&raw).ok_or_else(|| format!("Unparseable --as-of value '{}'", raw))
        }
    }
}

async fn run_ingest(
    config: Config,
    warehouse: Arc<dyn Warehouse>,
) -> Result<IngestSummary, Box<dyn std::error::Error>> {
    let pipeline = IngestPipeline::new(config);
    let summary = pipeline.run(warehouse).await?;
    Ok(summary)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Ingest { data_dir } => {
            println!("🔄 Running ingestion...");
            if let Some(dir) = data_dir {
                config.ingest.data_dir = dir;
            }

            let warehouse: Arc<dyn Warehouse> = Arc::new(InMemoryWarehouse::new());
            let summary = run_ingest(config, warehouse).await?;
            print_ingest_summary(&summary);

            if !summary.errors.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Transform { as_of } => {
            println!("🔨 Running transformation...");
            let as_of = resolve_as_of(as_of).map_err(|e| {
                error!("{}", e);
                e
            })?;

            let warehouse: Arc<dyn Warehouse> = Arc::new(InMemoryWarehouse::new());
            let summary = TransformPipeline::run(warehouse, as_of).await?;
            print_transform_summary(&summary);
        }
        Commands::Run { data_dir, as_of } => {
            println!("🚀 Running full pipeline (ingestion + transformation)...");
            if let Some(dir) = data_dir {
                config.ingest.data_dir = dir;
            }
            let as_of = resolve_as_of(as_of).map_err(|e| {
                error!("{}", e);
                e
            })?;

            let warehouse: Arc<dyn Warehouse> = Arc::new(InMemoryWarehouse::new());

            println!("\n📥 Step 1: Running ingestion...");
            let ingest_summary = run_ingest(config, warehouse.clone()).await?;
            print_ingest_summary(&ingest_summary);

            println!("\n🔨 Step 2: Running transformation...");
            let transform_summary = TransformPipeline::run(warehouse, as_of).await?;
            print_transform_summary(&transform_summary);

            if ingest_summary.errors.is_empty() {
                println!("\n✅ Full pipeline completed successfully!");
            } else {
                println!("\n⚠️  Pipeline completed with ingestion errors");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
