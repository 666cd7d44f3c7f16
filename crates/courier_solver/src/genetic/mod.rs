pub mod crossover;
pub mod fitness;
pub mod insertion;
pub mod mutation;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, trace};

use crate::construction::{Construction, ConstructionContext};
use crate::queue::NodeQueue;
use crate::solution::Solution;

/// Invoked whenever the search finds a new best candidate, with the
/// generation index and its fitness. Shared across the parallel passes.
pub type ProgressHandler = Arc<Mutex<dyn FnMut(u64, f64) + Send + 'static>>;

pub const CROSSOVER_PROBABILITY: f64 = 0.8;
pub const MUTATION_PROBABILITY: f64 = 0.2;

/// Straggler insertion only starts after this share of the generation
/// budget, so the population has settled before the backlog is folded
/// back in.
pub const STRAGGLER_PHASE_FRACTION: f64 = 0.2;
pub const STRAGGLER_PROBABILITY: f64 = 0.2;

const HEARTBEAT_INTERVAL: u64 = 100;

#[derive(Debug)]
pub struct GeneticOutcome {
    pub solution: Solution,
    pub backlog: NodeQueue,
    pub generations_run: u64,
}

/// Evolves a constructed solution for the configured generation budget.
///
/// One generation clones the best candidate, applies crossover and
/// mutation, and keeps the offspring only on strict fitness improvement.
/// The stop flag is checked at every generation boundary; stopping early
/// returns the best candidate found so far.
pub fn optimise<R: Rng>(
    ctx: &ConstructionContext<'_>,
    construction: Construction,
    is_stopped: &AtomicBool,
    progress: Option<&ProgressHandler>,
    rng: &mut R,
) -> GeneticOutcome {
    let Construction {
        solution: mut best,
        mut backlog,
    } = construction;

    if best.routes().is_empty() {
        return GeneticOutcome {
            solution: best,
            backlog,
            generations_run: 0,
        };
    }

    for route in best.routes_mut() {
        route.update_measurements(ctx.graph, ctx.profile, ctx.estimate);
    }
    let mut best_fitness = fitness::total_fitness(&best, ctx.vehicles, ctx.profile);

    let budget = ctx.profile.generations;
    let straggler_start = (budget as f64 * STRAGGLER_PHASE_FRACTION) as u64;
    let mut generations_run = 0;

    for generation in 0..budget {
        if is_stopped.load(Ordering::Relaxed) {
            debug!(generation, "search stopped at generation boundary");
            break;
        }
        generations_run += 1;

        let mut offspring = best.clone();

        if rng.random_bool(CROSSOVER_PROBABILITY) {
            crossover::crossover(ctx, &mut offspring, rng);
        }

        let single_route = offspring.used_vehicle_count() <= 1;
        for idx in 0..offspring.routes().len() {
            if single_route || rng.random_bool(MUTATION_PROBABILITY) {
                mutation::mutate(ctx, &mut offspring.routes_mut()[idx], rng);
            }
        }

        let offspring_fitness = fitness::total_fitness(&offspring, ctx.vehicles, ctx.profile);
        if offspring_fitness < best_fitness {
            best = offspring;
            best_fitness = offspring_fitness;
            debug!(generation, fitness = best_fitness, "new best generation");
            if let Some(handler) = progress {
                (&mut *handler.lock())(generation, best_fitness);
            }
        } else if generation % HEARTBEAT_INTERVAL == 0 {
            trace!(generation, fitness = best_fitness, "search heartbeat");
        }

        if generation >= straggler_start
            && !backlog.is_empty()
            && rng.random_bool(STRAGGLER_PROBABILITY)
            && insertion::insert_straggler(ctx, &mut best, &mut backlog, rng)
        {
            // Insertion may raise the cost within its tolerance; the
            // selection baseline must follow it.
            best_fitness = fitness::total_fitness(&best, ctx.vehicles, ctx.profile);
        }
    }

    best.set_unassigned(backlog.iter().collect());
    GeneticOutcome {
        solution: best,
        backlog,
        generations_run,
    }
}
