//! interactions CLI
//!
//! Commands:
//! - `make`  — Generate a stub interaction (alias `make:interaction`)
//! - `demo`  — Run the bundled meters → miles interaction

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "interactions", about = "Validated command objects", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new interaction
    #[command(alias = "make:interaction")]
    Make {
        /// The name of the interaction
        name: String,

        /// Directory the file is written to
        #[arg(long, default_value = commands::make::DEFAULT_DIR)]
        dir: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Convert meters to miles through a validated interaction
    Demo {
        /// Distance in meters (JSON literal, anything else is taken as a string)
        meters: String,

        /// Print the raw result or fail with every validation error
        #[arg(long)]
        dangerous: bool,

        /// TOML config with message overrides
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Make { name, dir, force } => {
            let path = commands::make::run(&name, &dir, force)?;
            println!("Interaction created: {}", path.display());
        }
        Commands::Demo {
            meters,
            dangerous,
            config,
        } => commands::demo::run(&meters, dangerous, config.as_deref())?,
    }

    Ok(())
}
