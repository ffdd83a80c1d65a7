//! LedgerLink CLI
//!
//! Interactive shell over a registry of block chains, plus maintenance tools
//! for its save file.
//!
//! # Commands
//!
//! - `repl` - Interactive shell (the default)
//! - `inspect` - Display the saved registry
//! - `verify` - Check that the save file loads

mod commands;
mod error;
mod parse;
mod session;

use clap::{Parser, Subcommand, ValueEnum};
use commands::inspect::Format;
use error::CliResult;
use ledgerlink_core::{Registry, RegistryConfig, TopologyPolicy};
use ledgerlink_store::{load_registry, FileStore};
use session::Session;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// LedgerLink block chain shell.
#[derive(Parser)]
#[command(name = "ledgerlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the save file
    #[arg(global = true, short, long, default_value = "my_blockchain.save")]
    save_file: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Cursor handling when nodes are added or removed
    #[arg(global = true, long, value_enum, default_value_t = Policy::Eager)]
    topology_policy: Policy,

    /// Maximum number of nodes
    #[arg(global = true, long)]
    max_nodes: Option<usize>,

    /// Maximum number of blocks per node
    #[arg(global = true, long)]
    max_blocks: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive shell
    Repl,

    /// Display the saved registry
    Inspect {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Check that the save file loads
    Verify {
        /// Also fail if the registry is not synchronized
        #[arg(long)]
        strict: bool,
    },

    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Keep cursors when the node set changes (a later sync may repeat
    /// blocks a node already holds)
    Lazy,
    /// Clear every cursor when the node set changes
    Eager,
}

impl From<Policy> for TopologyPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Lazy => Self::Lazy,
            Policy::Eager => Self::Eager,
        }
    }
}

impl Cli {
    fn registry_config(&self) -> RegistryConfig {
        RegistryConfig::new()
            .topology_policy(self.topology_policy.into())
            .max_nodes(self.max_nodes)
            .max_blocks_per_node(self.max_blocks)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so the shell's stdout stays clean.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ledgerlink: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = cli.registry_config();
    let store = FileStore::new(&cli.save_file);
    let stdout = io::stdout();

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            let registry = match load_registry(&store, config.clone())? {
                Some(registry) => {
                    info!(path = %cli.save_file.display(), nodes = registry.len(), "loaded save file");
                    registry
                }
                None => Registry::with_config(config),
            };
            let mut session = Session::new(registry, store);
            commands::repl::run(
                &mut session,
                io::stdin().lock(),
                &mut stdout.lock(),
                &mut io::stderr(),
            )?;
        }
        Commands::Inspect { format } => {
            commands::inspect::run(&store, config, format, &mut stdout.lock())?;
        }
        Commands::Verify { strict } => {
            commands::verify::run(&store, config, strict, &mut stdout.lock())?;
        }
        Commands::Version => {
            println!("LedgerLink CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("LedgerLink Core v{}", ledgerlink_core::VERSION);
        }
    }

    Ok(())
}
