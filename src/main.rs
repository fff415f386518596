//! Shelterdash CLI - load, serve, and check the animal shelter database

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shelterdash::store::AnimalStore;
use shelterdash::ui::{self, Icons};
use shelterdash::{config, loader, server};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "shelterdash")]
#[command(version = "0.1.0")]
#[command(about = "Animal shelter outcomes dashboard over a SQLite record store")]
#[command(long_about = r#"
Shelterdash keeps the AAC shelter outcomes dataset in a local SQLite
database and serves it as a web dashboard:
  • CSV bulk load with schema provisioning
  • Filterable results table, geo markers, and breed distribution
  • Database connectivity check

Example usage:
  shelterdash load --csv aac_shelter_outcomes.csv
  shelterdash serve --port 8050
  shelterdash check
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to shelterdash.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the outcomes CSV into the database, replacing its contents
    Load {
        /// Path to the CSV file
        #[arg(long)]
        csv: PathBuf,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Maximum number of rows to ingest
        #[arg(short, long, default_value_t = loader::DEFAULT_ROW_LIMIT)]
        limit: usize,
    },

    /// Serve the web dashboard
    Serve {
        /// Port to listen on (defaults to 8050)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Check database connectivity and show a data summary
    Check {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Load { csv, database, limit } => {
            let db_path = config::resolve_database(database, config.as_ref());
            config::ensure_db_dir(&db_path)?;
            let store = AnimalStore::open(&db_path);

            ui::header("Loading shelter outcomes");
            ui::status(Icons::DATABASE, "Database", &db_path.display().to_string());
            ui::status(Icons::STATS, "Row limit", &limit.to_string());

            let summary = loader::load_csv(&store, &csv, limit)?;
            ui::success(&format!(
                "Loaded {} of {} rows",
                summary.rows_inserted, summary.rows_read
            ));
        }

        Commands::Serve { port, database } => {
            let db_path = config::resolve_database(database, config.as_ref());
            let store = AnimalStore::open(&db_path);
            let port = port
                .or(config.as_ref().and_then(|c| c.port))
                .unwrap_or(8050);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::start_server(port, store))?;
        }

        Commands::Check { database } => {
            let db_path = config::resolve_database(database, config.as_ref());
            let store = AnimalStore::open(&db_path);

            ui::header("Database check");
            ui::status(Icons::DATABASE, "Database", &db_path.display().to_string());

            match store.count() {
                Ok(count) => {
                    ui::success("Connected successfully");
                    ui::info("Total rows", &count.to_string());
                }
                Err(e) => {
                    ui::error(&format!("Cannot reach database: {}", e));
                    std::process::exit(1);
                }
            }

            let mut sample = store.read(None)?;
            sample.truncate(5);
            if sample.is_empty() {
                println!("(no rows loaded yet)");
            } else {
                ui::section("Sample rows");
                println!("{}", ui::records_table(&sample));
            }

            let types = store.animal_types()?;
            ui::section("Animal types");
            println!("{}", types.join(", "));
        }
    }

    Ok(())
}
