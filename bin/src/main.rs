//! sophist CLI - Statistical tables from the sophist.hse.ru catalog.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use sophist_lib::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "sophist")]
#[command(about = "Statistical tables from the sophist.hse.ru catalog", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Cache directory. Defaults to the platform cache directory.
    #[arg(long, env = "SOPHIST_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Catalog index URL
    #[arg(long, env = "SOPHIST_TABLES_URL", global = true)]
    tables_url: Option<String>,

    /// Neither read nor write the local cache
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List series published in the catalog
    List {
        /// Case-insensitive substring filter on the series name
        #[arg(short, long)]
        search: Option<String>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print or save one or more series tables
    Get {
        /// Series names (e.g., HHI_M_I, HHI_Q_I)
        #[arg(required = true)]
        names: Vec<String>,

        /// Fetch from the network even when a cached copy exists
        #[arg(short, long)]
        refresh: bool,

        /// Output format. Defaults to the output extension, or CSV.
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Output file for one series, or directory for several
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch a series and write it to a file
    Download {
        /// Series name
        name: String,

        /// Output file path. Defaults to <name>.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format. Defaults to the output extension, or CSV.
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// Show the columns and time span of a series
    Info {
        /// Series name
        name: String,
    },

    /// List cached series
    Cache,

    /// Remove every cached series
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    fn client(&self) -> Result<Sophist> {
        let mut config = SophistConfig::default()
            .with_verbose(self.verbose > 0)
            .with_persist(!self.no_cache)
            .with_cache_downloads(!self.no_cache);

        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir.clone());
        }
        if let Some(url) = &self.tables_url {
            config = config.with_tables_url(url.clone());
        }

        tracing::debug!(
            tables_url = %config.tables_url,
            cache_dir = %config.cache.dir.display(),
            "client configured"
        );
        Sophist::new(config).context("Failed to create HTTP client")
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command.take() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let sophist = cli.client()?;

    match command {
        Commands::List { search, json } => {
            commands::list::list_tables(&sophist, search.as_deref(), json).await
        }
        Commands::Get {
            names,
            refresh,
            format,
            output,
        } => commands::get::get(&sophist, &names, refresh, format, output, cli.quiet).await,
        Commands::Download {
            name,
            output,
            format,
        } => commands::download::download(&sophist, &name, output, format, cli.quiet).await,
        Commands::Info { name } => commands::info::show_info(&sophist, &name).await,
        Commands::Cache => commands::cache::show_cache(&sophist).await,
        Commands::Clear { yes } => commands::clear::clear(&sophist, yes).await,
    }
}
