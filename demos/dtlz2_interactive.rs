//! Interactive DTLZ2
//!
//! Runs RVEA on the three-objective DTLZ2 problem. A scripted decision
//! maker inspects the front at each checkpoint, asks for solutions with a
//! small first objective halfway through, and stops once the front is
//! dense enough.
//!
//! Set `RUST_LOG=rvea=debug` to see per-generation progress.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rvea::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Interactive RVEA on DTLZ2 ===\n");

    let mut rng = StdRng::seed_from_u64(42);

    let rvea = Rvea::builder()
        .population_size(91)
        .num_objectives(3)
        .lattice_resolution(12)
        .max_generations(200)
        .generations_per_interaction(25)
        .hypervolume_reference(vec![1.1, 1.1, 1.1])
        .build(Dtlz2::new(3))?;

    println!("Reference vectors: {}", rvea.reference_vectors().len());

    let mut checkpoint = |population: &Population, generation: usize| {
        let front = population.non_dominated_indices();
        println!(
            "Checkpoint at generation {:3}: {} rows, {} non-dominated",
            generation,
            population.len(),
            front.len()
        );

        if generation == 100 {
            println!("  -> preferring solutions with a small first objective");
            Decision::prefer_with_strength(vec![0.1, 0.7, 0.7], 0.4)
        } else if generation >= 150 && front.len() >= 80 {
            println!("  -> front is dense enough, stopping");
            Decision::Stop
        } else {
            Decision::Continue
        }
    };

    let result = rvea.run(&mut checkpoint, &mut rng)?;

    println!("\n=== Results ===");
    print!("{}", result.stats.summary());

    let front = result.pareto_objectives();
    println!("\nSample of the final front:");
    for objectives in front.iter().take(5) {
        let radius: f64 = objectives.iter().map(|f| f * f).sum::<f64>().sqrt();
        println!(
            "  f = [{:.3}, {:.3}, {:.3}]  |f| = {:.3}",
            objectives[0], objectives[1], objectives[2], radius
        );
    }

    Ok(())
}
