//! assetpipe CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "assetpipe")]
#[command(version)]
#[command(about = "Asset filter pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a stylesheet source file to CSS via compass
    Compile {
        /// Input file
        input: String,

        /// Write output to FILE (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Compass plugin to require (repeatable, order preserved)
        #[arg(long = "require", value_name = "PLUGIN")]
        require: Vec<String>,

        /// Name or path of the compass executable
        #[arg(long)]
        compass_bin: Option<String>,

        /// Hard deadline for the compiler process, in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assetpipe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            require,
            compass_bin,
            timeout,
        } => commands::compile::execute(commands::compile::CompileArgs {
            input,
            output,
            require,
            compass_bin,
            timeout,
        }),
    }
}
