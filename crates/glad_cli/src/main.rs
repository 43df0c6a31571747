//! Global LAD CLI
//!
//! Diagnostic tools for captured Global LAD packet streams.
//!
//! # Commands
//!
//! - `dump` - Print every record in a stream
//! - `verify` - Count records and frame faults
//! - `version` - Show version information
//!
//! An input of `-` reads the stream from stdin.

mod commands;

use clap::{Parser, Subcommand};
use glad_stream::{ReconstructorConfig, StreamMode, DEFAULT_MAX_FRAME_LEN, DEFAULT_READ_SIZE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Global LAD stream tools.
#[derive(Parser)]
#[command(name = "glad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Bytes requested per read from the input
    #[arg(global = true, long, default_value_t = DEFAULT_READ_SIZE)]
    read_size: usize,

    /// Largest accepted frame length
    #[arg(global = true, long, default_value_t = DEFAULT_MAX_FRAME_LEN)]
    max_frame_len: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every record in a stream
    Dump {
        /// Stream file, or `-` for stdin
        input: PathBuf,

        /// The stream starts with verified counts
        #[arg(long)]
        verified: bool,

        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Count records and frame faults
    Verify {
        /// Stream file, or `-` for stdin
        input: PathBuf,

        /// The stream starts with verified counts
        #[arg(long)]
        verified: bool,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn stream_config(&self, verified: bool) -> ReconstructorConfig {
        let mode = if verified {
            StreamMode::Verified
        } else {
            StreamMode::Raw
        };
        ReconstructorConfig::new(mode)
            .with_read_size(self.read_size)
            .with_max_frame_len(self.max_frame_len)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Dump {
            input,
            verified,
            limit,
            format,
        } => {
            let config = cli.stream_config(*verified);
            commands::dump::run(input, config, *limit, format)?;
        }
        Commands::Verify { input, verified } => {
            let config = cli.stream_config(*verified);
            commands::verify::run(input, config)?;
        }
        Commands::Version => {
            println!("Global LAD CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Global LAD Core v{}", glad_core::VERSION);
        }
    }

    Ok(())
}
