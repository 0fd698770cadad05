//! Kinship CLI - run the registry server and inspect its database

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use kinship::config::{self, Config};
use kinship::Registry;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "kinship")]
#[command(version)]
#[command(about = "Registry of people and their relationships, served over HTTP")]
#[command(long_about = r#"
Kinship stores people and pairwise relationships between them and answers
"which relationship does this person take part in?" over HTTP.

Routes and port come from the environment (a .env file is read if present):
  ROUTE_PERSON_POST, ROUTE_PERSON_GET, ROUTE_RELATIONSHIP, ROUTE_CLEAN,
  ROUTE_RECOMMENDATIONS, PORT (default 5000), DATABASE_PATH

Example usage:
  kinship serve --port 8080
  kinship stats
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show how many persons and relationships are stored
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Delete every person and relationship
    Clean {
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
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let mut config = config::load_config(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok())?;

    match cli.command.unwrap_or(Commands::Serve { port: None, database: None }) {
        Commands::Serve { port, database } => {
            if let Some(port) = port {
                config.port = port;
            }
            override_database(&mut config, database);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(kinship::server::start_server(config))?;
        }
        Commands::Stats { database } => {
            override_database(&mut config, database);
            let registry = Registry::open(&config.database)?;
            print!("{}", registry.stats()?);
        }
        Commands::Clean { database } => {
            override_database(&mut config, database);
            let mut registry = Registry::open(&config.database)?;
            registry.reset_all()?;
            println!("Cleared {}", config.database.display());
        }
    }

    Ok(())
}

fn override_database(config: &mut Config, database: Option<PathBuf>) {
    if let Some(database) = database {
        config.database = database;
    }
}
