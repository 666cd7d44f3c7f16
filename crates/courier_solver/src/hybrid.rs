use std::sync::atomic::AtomicBool;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use courier_travel::provider::TravelProvider;

use crate::construction::{Construction, ConstructionContext, kmeans, round_robin};
use crate::genetic::{self, GeneticOutcome, ProgressHandler};
use crate::graph::Graph;
use crate::problem::schedule_profile::{Initialiser, Optimiser, ScheduleProfile, Strategy};
use crate::problem::travel_estimate::TravelEstimate;
use crate::problem::vehicle::Vehicle;
use crate::solution::report::CandidateReport;
use crate::solution::{EfficiencyScores, ScheduleReport, Solution};

/// Share of the naive single-route duration estimate assumed to be saved
/// by proper routing, used only for fleet pre-selection.
const ASSUMED_EFFICIENCY_GAIN: f64 = 0.5;

/// One scored contender produced by the orchestrator.
struct Candidate {
    initialiser: Initialiser,
    optimiser: Optimiser,
    solution: Solution,
    iterations: u64,
}

pub struct HybridOutcome {
    pub report: ScheduleReport,
    pub solution: Solution,
    /// Calibration derived from the winner's real travel data, for use by
    /// the next scheduling run. `None` when no route was reconciled.
    pub refined_estimate: Option<TravelEstimate>,
}

/// Runs the strategy the profile asks for. `Hybrid` builds both
/// initialisers, refines each with a genetic pass on its own thread and
/// keeps the candidate with the best overall efficiency; `Fixed` runs the
/// one pinned combination. Every candidate is reconciled against real
/// travel data when a provider is given.
pub async fn run(
    graph: &Graph,
    vehicles: &[Vehicle],
    profile: &ScheduleProfile,
    estimate: &TravelEstimate,
    provider: Option<&TravelProvider>,
    is_stopped: &AtomicBool,
    progress: Option<&ProgressHandler>,
    seed: Option<u64>,
) -> HybridOutcome {
    let base_seed = seed.unwrap_or_else(|| rand::rng().random());
    debug!(seed = base_seed, strategy = ?profile.strategy, "starting scheduling run");

    let fleet = select_fleet(graph, vehicles, profile, estimate);
    let ctx = ConstructionContext {
        graph,
        vehicles: &fleet,
        profile,
        estimate,
    };

    let mut candidates = match profile.strategy {
        Strategy::Hybrid => hybrid_candidates(&ctx, base_seed, is_stopped, progress),
        Strategy::Fixed {
            initialiser,
            optimiser,
        } => {
            let base = construct_with(&ctx, initialiser, base_seed);
            match optimiser {
                Optimiser::None => vec![candidate(initialiser, Optimiser::None, base)],
                Optimiser::Genetic => {
                    let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(1));
                    let outcome = genetic::optimise(&ctx, base, is_stopped, progress, &mut rng);
                    vec![refined(initialiser, outcome)]
                }
            }
        }
    };

    if let Some(provider) = provider {
        for entry in &mut candidates {
            reconcile(graph, &mut entry.solution, profile, provider).await;
        }
    }

    candidates.sort_by(|a, b| {
        EfficiencyScores::of(&b.solution, &fleet)
            .overall()
            .total_cmp(&EfficiencyScores::of(&a.solution, &fleet).overall())
    });
    let winner = candidates.remove(0);
    info!(
        initialiser = ?winner.initialiser,
        optimiser = ?winner.optimiser,
        scheduled = winner.solution.scheduled_package_count(),
        unassigned = winner.solution.unassigned().len(),
        "hybrid run selected a winner"
    );

    let other_solutions = candidates
        .into_iter()
        .map(|entry| {
            let scores = EfficiencyScores::of(&entry.solution, &fleet);
            CandidateReport {
                initialiser: entry.initialiser,
                optimiser: entry.optimiser,
                overall_efficiency: scores.overall(),
                scores,
            }
        })
        .collect();

    let report = ScheduleReport::build(
        graph,
        &winner.solution,
        &fleet,
        profile,
        estimate,
        winner.initialiser,
        winner.optimiser,
        winner.iterations,
        other_solutions,
    );

    let refined_estimate = derive_estimate(&winner.solution, profile);

    HybridOutcome {
        report,
        solution: winner.solution,
        refined_estimate,
    }
}

/// All four initialiser/optimiser combinations. The two genetic passes run
/// on their own threads with independent backlogs and random streams.
fn hybrid_candidates(
    ctx: &ConstructionContext<'_>,
    base_seed: u64,
    is_stopped: &AtomicBool,
    progress: Option<&ProgressHandler>,
) -> Vec<Candidate> {
    let ctx = *ctx;
    let round_robin_base = round_robin::construct(&ctx);
    let kmeans_base = kmeans::construct(&ctx, &mut SmallRng::seed_from_u64(base_seed));

    let (rr_refined, km_refined) = std::thread::scope(|scope| {
        let rr_input = round_robin_base.clone();
        let km_input = kmeans_base.clone();
        let rr_progress = progress.cloned();
        let km_progress = progress.cloned();

        let rr_handle = scope.spawn(move || {
            let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(1));
            genetic::optimise(&ctx, rr_input, is_stopped, rr_progress.as_ref(), &mut rng)
        });
        let km_handle = scope.spawn(move || {
            let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(2));
            genetic::optimise(&ctx, km_input, is_stopped, km_progress.as_ref(), &mut rng)
        });

        (join_pass(rr_handle), join_pass(km_handle))
    });

    vec![
        candidate(Initialiser::RoundRobin, Optimiser::None, round_robin_base),
        candidate(Initialiser::KMeans, Optimiser::None, kmeans_base),
        refined(Initialiser::RoundRobin, rr_refined),
        refined(Initialiser::KMeans, km_refined),
    ]
}

fn construct_with(
    ctx: &ConstructionContext<'_>,
    initialiser: Initialiser,
    base_seed: u64,
) -> Construction {
    match initialiser {
        Initialiser::RoundRobin => round_robin::construct(ctx),
        Initialiser::KMeans => kmeans::construct(ctx, &mut SmallRng::seed_from_u64(base_seed)),
    }
}

fn join_pass(handle: std::thread::ScopedJoinHandle<'_, GeneticOutcome>) -> GeneticOutcome {
    match handle.join() {
        Ok(outcome) => outcome,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn candidate(initialiser: Initialiser, optimiser: Optimiser, built: Construction) -> Candidate {
    Candidate {
        initialiser,
        optimiser,
        solution: built.solution,
        iterations: 0,
    }
}

fn refined(initialiser: Initialiser, outcome: GeneticOutcome) -> Candidate {
    Candidate {
        initialiser,
        optimiser: Optimiser::Genetic,
        solution: outcome.solution,
        iterations: outcome.generations_run,
    }
}

/// Minimum capacity-ordered fleet prefix projected to cover the pending
/// demand. A probe construction supplies the per-package duration
/// estimate the projection is based on.
fn select_fleet(
    graph: &Graph,
    vehicles: &[Vehicle],
    profile: &ScheduleProfile,
    estimate: &TravelEstimate,
) -> Vec<Vehicle> {
    if !profile.auto_vehicle_selection || vehicles.len() <= 1 {
        return vehicles.to_vec();
    }

    let probe_ctx = ConstructionContext {
        graph,
        vehicles,
        profile,
        estimate,
    };
    let probe = round_robin::construct(&probe_ctx);
    let scheduled = probe.solution.scheduled_package_count();
    let mins_per_package = if scheduled > 0 {
        probe.solution.total_duration_mins() / scheduled as f64
    } else {
        profile.delivery_time_mins
    };

    let demand_weight: f64 = graph
        .package_nodes()
        .map(|n| graph.node(n).weight())
        .sum();
    let demand_volume: f64 = graph
        .package_nodes()
        .map(|n| graph.node(n).volume())
        .sum();
    let projected_mins =
        graph.package_count() as f64 * mins_per_package * (1.0 - ASSUMED_EFFICIENCY_GAIN);

    let mut ordered = vehicles.to_vec();
    ordered.sort_by(|a, b| {
        (b.max_load() + b.max_volume()).total_cmp(&(a.max_load() + a.max_volume()))
    });

    let window_mins = profile.time_window_hours * 60.0;
    let mut fleet: Vec<Vehicle> = Vec::new();
    let (mut weight, mut volume, mut budget) = (0.0, 0.0, 0.0);
    for vehicle in ordered {
        if weight >= demand_weight && volume >= demand_volume && budget >= projected_mins {
            break;
        }
        weight += vehicle.max_load();
        volume += vehicle.max_volume();
        budget += window_mins;
        fleet.push(vehicle);
    }

    debug!(
        selected = fleet.len(),
        available = vehicles.len(),
        "fleet pre-selection finished"
    );
    fleet
}

/// Overwrites every route's metrics with real travel data. Provider
/// failures are logged and leave the Euclidean estimate in place.
async fn reconcile(
    graph: &Graph,
    solution: &mut Solution,
    profile: &ScheduleProfile,
    provider: &TravelProvider,
) {
    for route in solution.routes_mut() {
        if route.is_empty() {
            continue;
        }

        let stops: Vec<[f64; 2]> = route
            .stops()
            .iter()
            .map(|&stop| (&graph.node(stop).location()).into())
            .collect();

        match provider.route_travel(&stops).await {
            Ok(travel) => {
                let service_mins = route.package_count() as f64 * profile.delivery_time_mins;
                route.set_actual_travel(
                    travel.distance_miles,
                    travel.duration_mins + service_mins,
                );
            }
            Err(err) => {
                warn!(error = %err, "travel reconciliation failed, keeping estimate");
            }
        }
    }
}

/// Calibration for the next run, taken from reconciled routes: the ratio
/// of real to Euclidean distance and the observed driving speed. Service
/// minutes are stripped back out so the speed covers travel only.
fn derive_estimate(solution: &Solution, profile: &ScheduleProfile) -> Option<TravelEstimate> {
    let reconciled: Vec<_> = solution
        .used_routes()
        .filter(|route| route.actual_reconciled())
        .collect();
    if reconciled.is_empty() {
        return None;
    }

    let est_miles: f64 = reconciled.iter().map(|r| r.est_distance_miles()).sum();
    let actual_miles: f64 = reconciled.iter().map(|r| r.distance_miles()).sum();
    let travel_mins: f64 = reconciled
        .iter()
        .map(|r| r.duration_mins() - r.package_count() as f64 * profile.delivery_time_mins)
        .sum();
    if est_miles <= 0.0 || travel_mins <= 0.0 {
        return None;
    }

    Some(TravelEstimate {
        distance_multiplier: actual_miles / est_miles,
        average_speed_mph: actual_miles / (travel_mins / 60.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeMode;
    use crate::test_utils;

    #[tokio::test]
    async fn winner_beats_or_matches_every_alternative() {
        let graph = test_utils::line_graph(8, EdgeMode::Complete);
        let vehicles = test_utils::vehicles(2);
        let mut profile = test_utils::profile();
        profile.generations = 200;
        let estimate = TravelEstimate::default();
        let stop = AtomicBool::new(false);

        let outcome = run(
            &graph,
            &vehicles,
            &profile,
            &estimate,
            None,
            &stop,
            None,
            Some(17),
        )
        .await;

        assert_eq!(outcome.report.other_solutions.len(), 3);
        for other in &outcome.report.other_solutions {
            assert!(outcome.report.overall_efficiency >= other.overall_efficiency);
        }
        let mut sorted = outcome.report.other_solutions.clone();
        sorted.sort_by(|a, b| b.overall_efficiency.total_cmp(&a.overall_efficiency));
        assert!(
            outcome
                .report
                .other_solutions
                .iter()
                .zip(&sorted)
                .all(|(a, b)| a.overall_efficiency == b.overall_efficiency)
        );
        assert!(outcome.solution.conserves_packages(8));
        assert!(outcome.refined_estimate.is_none());
    }

    #[tokio::test]
    async fn auto_selection_trims_an_oversized_fleet() {
        let graph = test_utils::line_graph(3, EdgeMode::Complete);
        let vehicles = test_utils::vehicles(10);
        let mut profile = test_utils::profile();
        profile.auto_vehicle_selection = true;
        profile.generations = 50;
        let estimate = TravelEstimate::default();
        let stop = AtomicBool::new(false);

        let outcome = run(
            &graph,
            &vehicles,
            &profile,
            &estimate,
            None,
            &stop,
            None,
            Some(17),
        )
        .await;

        assert!(outcome.report.vehicles_available < 10);
        assert_eq!(outcome.report.scheduled_packages, 3);
    }

    #[tokio::test]
    async fn fixed_strategy_runs_the_pinned_combination_only() {
        let graph = test_utils::line_graph(6, EdgeMode::Complete);
        let vehicles = test_utils::vehicles(2);
        let mut profile = test_utils::profile();
        profile.strategy = Strategy::Fixed {
            initialiser: Initialiser::KMeans,
            optimiser: Optimiser::Genetic,
        };
        profile.generations = 100;
        let estimate = TravelEstimate::default();
        let stop = AtomicBool::new(false);

        let outcome = run(
            &graph,
            &vehicles,
            &profile,
            &estimate,
            None,
            &stop,
            None,
            Some(9),
        )
        .await;

        assert_eq!(outcome.report.initialiser, Initialiser::KMeans);
        assert_eq!(outcome.report.optimiser, Optimiser::Genetic);
        assert!(outcome.report.other_solutions.is_empty());
        assert!(outcome.solution.conserves_packages(6));
    }

    #[tokio::test]
    async fn degenerate_graph_returns_an_empty_schedule() {
        let graph = test_utils::line_graph(0, EdgeMode::Complete);
        let vehicles = test_utils::vehicles(2);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();
        let stop = AtomicBool::new(false);

        let outcome = run(
            &graph,
            &vehicles,
            &profile,
            &estimate,
            None,
            &stop,
            None,
            Some(1),
        )
        .await;

        assert_eq!(outcome.report.scheduled_packages, 0);
        assert_eq!(outcome.report.vehicles_used, 0);
    }
}
