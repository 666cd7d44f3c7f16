use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use courier_solver::json::ScheduleInput;
use courier_solver::scheduler::Scheduler;
use courier_travel::provider::TravelProvider;

use crate::render;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Provider {
    /// Straight-line travel estimates, no network access
    CrowFlies,
    /// The external directions service (requires DIRECTIONS_API_KEY)
    Directions,
    /// Skip travel reconciliation entirely
    None,
}

#[derive(Args)]
pub struct ScheduleArgs {
    /// The problem file to schedule
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Where to write the JSON report
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Generation budget override for the genetic passes
    #[arg(short = 'n', long)]
    generations: Option<u64>,

    /// Seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Provider::CrowFlies)]
    provider: Provider,
}

pub async fn run(args: ScheduleArgs) -> anyhow::Result<()> {
    let input = ScheduleInput::from_file(&args.input)?;
    let mut request = input.create_request(args.seed);
    if let Some(generations) = args.generations {
        request.profile.generations = generations;
    }

    let provider = match args.provider {
        Provider::CrowFlies => Some(TravelProvider::AsTheCrowFlies {
            speed_mph: request.estimate.average_speed_mph,
            distance_multiplier: request.estimate.distance_multiplier,
        }),
        Provider::Directions => Some(TravelProvider::directions_from_env()?),
        Provider::None => None,
    };

    let bar = ProgressBar::new_spinner();
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} ({elapsed})")?);
    bar.set_message(format!(
        "scheduling {} packages onto {} vehicles",
        request.packages.len(),
        request.vehicles.len()
    ));

    let mut scheduler = Scheduler::new();
    let progress_bar = bar.clone();
    scheduler.on_progress(move |generation, fitness| {
        progress_bar.set_message(format!(
            "generation {generation}: best fitness {fitness:.1}"
        ));
    });
    let outcome = scheduler.schedule(request, provider.as_ref()).await;
    bar.finish_and_clear();

    render::print_report(&outcome.report);

    if let Some(out) = args.out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&out, serde_json::to_string_pretty(&outcome.report)?)?;
        info!("report written to {:?}", out);
    }

    Ok(())
}
