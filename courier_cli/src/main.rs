use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::generate::GenerateArgs;
use crate::schedule::ScheduleArgs;

mod generate;
mod render;
mod schedule;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a set of packages onto a fleet of vehicles
    Schedule {
        #[command(flatten)]
        args: ScheduleArgs,
    },
    /// Generate a random scheduling problem file
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Schedule { args } => schedule::run(args).await?,
        Commands::Generate { args } => generate::run(args)?,
    }

    Ok(())
}
