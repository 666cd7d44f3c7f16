use std::path::PathBuf;

use clap::Args;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::info;

#[derive(Args)]
pub struct GenerateArgs {
    /// Number of packages to generate
    #[arg(short, long, default_value_t = 50)]
    packages: usize,

    /// Number of vehicles to generate
    #[arg(short, long, default_value_t = 4)]
    vehicles: usize,

    /// Output file
    #[arg(short, long)]
    out: PathBuf,

    #[arg(short, long)]
    seed: Option<u64>,
}

/// Scatters packages within roughly a 10 mile radius of a fixed depot.
pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let depot = [39.9612, -82.9988];
    let packages: Vec<_> = (0..args.packages)
        .map(|i| {
            let lat = depot[0] + rng.random_range(-0.15..0.15);
            let lng = depot[1] + rng.random_range(-0.15..0.15);
            json!({
                "recipient_address": format!("{} Generated Ave", i + 1),
                "coordinates": [lat, lng],
                "weight": rng.random_range(0.5..25.0),
                "volume": rng.random_range(0.1..4.0),
            })
        })
        .collect();

    let vehicles: Vec<_> = (0..args.vehicles)
        .map(|i| {
            json!({
                "registration": format!("VAN-{:03}", i + 1),
                "max_load": 500.0,
                "max_volume": 80.0,
            })
        })
        .collect();

    let problem = json!({
        "depot": depot,
        "packages": packages,
        "vehicles": vehicles,
    });

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.out, serde_json::to_string_pretty(&problem)?)?;
    info!(
        "wrote {} packages and {} vehicles to {:?}",
        args.packages, args.vehicles, args.out
    );

    Ok(())
}
