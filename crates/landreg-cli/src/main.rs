mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "landreg", about = "Satellite image co-registration and Landsat band stacking")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show Landsat MTL scene metadata and band table
    Info(commands::info::InfoArgs),
    /// Co-register a slave image onto a master by mutual information
    Register(commands::register::RegisterArgs),
    /// Stack the band files of a Landsat scene
    Stack(commands::stack::StackArgs),
    /// Print or save the default co-registration config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Register(args) => commands::register::run(args),
        Commands::Stack(args) => commands::stack::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
