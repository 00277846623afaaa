//! End-to-end runs on benchmark problems

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rvea::prelude::*;

#[test]
fn zdt1_hypervolume_improves() {
    let mut rng = StdRng::seed_from_u64(42);
    let result = Rvea::builder()
        .population_size(20)
        .num_objectives(2)
        .lattice_resolution(10)
        .max_generations(50)
        .generations_per_interaction(10)
        .hypervolume_reference(vec![2.0, 10.0])
        .parallel_evaluation(false)
        .build(Zdt1::new(5))
        .unwrap()
        .run(&mut NoInteraction, &mut rng)
        .unwrap();

    assert_eq!(result.termination, TerminationReason::BudgetExhausted);
    assert_eq!(result.generations, 50);

    let history = result.stats.hypervolume_history();
    let (first_generation, first) = history[1];
    let (last_generation, last) = *history.last().unwrap();
    assert_eq!(first_generation, 1);
    assert_eq!(last_generation, 50);
    assert!(last > 0.0);
    assert!(last >= first);

    let front = result.pareto_objectives();
    assert!(!front.is_empty());
    assert!(front.len() <= result.reference_vectors.len());
    for decision in result.pareto_decisions() {
        assert!(Zdt1::new(5).bounds().contains_vec(&decision));
    }
}

#[test]
fn dtlz2_preference_biases_vectors() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut rvea = Rvea::builder()
        .population_size(40)
        .num_objectives(3)
        .lattice_resolution(6)
        .max_generations(40)
        .generations_per_interaction(5)
        .parallel_evaluation(false)
        .build(Dtlz2::new(3))
        .unwrap();

    for _ in 0..25 {
        rvea.step(&mut rng).unwrap();
        if rvea.at_chunk_boundary() {
            rvea.end_chunk(Decision::Continue).unwrap();
        }
    }
    assert_eq!(rvea.generation(), 25);

    let ideal = rvea.population().unwrap().ideal_point().unwrap();
    let point = vec![0.9, 0.1, 0.1];
    let offset: Vec<f64> = point.iter().zip(&ideal).map(|(p, z)| p - z).collect();
    let target = normalize(&offset).unwrap();

    let before = angle_between(&rvea.reference_vectors().mean_direction(), &target);
    // Same boundary: the preference goes through the adapt that closes the chunk
    rvea.end_chunk(Decision::prefer_with_strength(point, 0.6)).unwrap();
    let after = angle_between(&rvea.reference_vectors().mean_direction(), &target);
    assert!(after < before);

    for v in rvea.reference_vectors().values() {
        assert_relative_eq!(norm(v), 1.0, epsilon = 1e-10);
    }

    // The run carries on from the translated vectors
    let result = rvea.run(&mut NoInteraction, &mut rng).unwrap();
    assert_eq!(result.generations, 40);
    assert_eq!(result.stats.preferences_applied, 1);
}

#[test]
fn scheduled_preference_survives_adapt_on_skewed_ranges() {
    // f2 spans a hundred times the range of f1
    let problem = || {
        FnProblem::new(
            "skewed",
            MultiBounds::uniform(Bounds::unit(), 2),
            2,
            |x: &[f64]| vec![x[0], 100.0 * (1.0 - x[0]) + x[1]],
        )
    };
    let build = || {
        Rvea::builder()
            .population_size(20)
            .num_objectives(2)
            .lattice_resolution(10)
            .max_generations(10)
            .generations_per_interaction(5)
            .parallel_evaluation(false)
            .build(problem())
            .unwrap()
    };
    let preference = vec![1.0, 1.0];

    let plain = build()
        .run(&mut NoInteraction, &mut StdRng::seed_from_u64(21))
        .unwrap();
    let mut schedule =
        ScheduledDecisions::single(5, Decision::prefer_with_strength(preference, 0.8));
    let steered = build()
        .run(&mut schedule, &mut StdRng::seed_from_u64(21))
        .unwrap();
    assert_eq!(steered.stats.preferences_applied, 1);

    // Identical up to generation 5, then only the steered fan is bent
    let target = normalize(&[1.0, 1.0]).unwrap();
    let plain_angle = angle_between(&plain.reference_vectors.mean_direction(), &target);
    let steered_angle = angle_between(&steered.reference_vectors.mean_direction(), &target);
    assert!(steered_angle < plain_angle);
}

#[test]
fn infeasible_rows_ranked_by_violation() {
    let mut rng = StdRng::seed_from_u64(3);
    let problem = FnProblem::new(
        "always-infeasible",
        MultiBounds::uniform(Bounds::unit(), 3),
        2,
        |x: &[f64]| vec![x[1], 1.0 - x[2]],
    )
    .with_constraints(|x: &[f64], _objectives: &[f64]| 1.0 + x[0]);

    let mut population =
        Population::with_design(15, problem.bounds(), 2, InitialDesign::Random, &mut rng).unwrap();
    population.evaluate(&problem, 0).unwrap();
    assert_eq!(population.feasible_count(), 0);

    let fronts = population.non_dominated_fronts();
    let ranked: Vec<f64> = fronts
        .iter()
        .flatten()
        .map(|&i| population.violations()[i])
        .collect();
    assert_eq!(ranked.len(), 15);
    for pair in ranked.windows(2) {
        assert!(pair[0] < pair[1]);
    }

    let result = Rvea::builder()
        .population_size(15)
        .num_objectives(2)
        .lattice_resolution(4)
        .max_generations(10)
        .generations_per_interaction(5)
        .parallel_evaluation(false)
        .build(problem)
        .unwrap()
        .run(&mut NoInteraction, &mut rng)
        .unwrap();
    assert_eq!(result.population.feasible_count(), 0);
    assert!(!result.population.is_empty());
}

#[test]
fn binh_korn_front_is_feasible() {
    let mut rng = StdRng::seed_from_u64(11);
    let result = Rvea::builder()
        .population_size(30)
        .num_objectives(2)
        .lattice_resolution(15)
        .max_generations(30)
        .generations_per_interaction(10)
        .build(BinhKorn::new())
        .unwrap()
        .run(&mut NoInteraction, &mut rng)
        .unwrap();

    let population = &result.population;
    for i in population.non_dominated_indices() {
        assert_eq!(population.violations()[i], 0.0);
    }
}

#[test]
fn checkpoint_stop_ends_run_early() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut schedule = ScheduledDecisions::new(vec![
        (4, Decision::prefer(vec![0.2, 0.8])),
        (8, Decision::Stop),
    ]);
    let result = Rvea::builder()
        .population_size(16)
        .num_objectives(2)
        .lattice_resolution(8)
        .max_generations(30)
        .generations_per_interaction(4)
        .parallel_evaluation(false)
        .build(Zdt1::new(4))
        .unwrap()
        .run(&mut schedule, &mut rng)
        .unwrap();

    assert!(schedule.is_exhausted());
    assert_eq!(result.termination, TerminationReason::Stopped);
    assert_eq!(result.generations, 8);
    assert_eq!(result.stats.interactions, 2);
    assert_eq!(result.stats.preferences_applied, 1);
}

#[test]
fn config_from_json_drives_a_run() {
    let config = RveaConfig::from_json(
        r#"{
            "population_size": 12,
            "num_objectives": 2,
            "lattice_resolution": 6,
            "max_generations": 6,
            "generations_per_interaction": 3,
            "initial_design": "Random",
            "parallel_evaluation": false
        }"#,
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let result = Rvea::new(config, Zdt1::new(3))
        .unwrap()
        .run(&mut NoInteraction, &mut rng)
        .unwrap();
    assert_eq!(result.generations, 6);
    // 12 initial rows plus 12 offspring per generation
    assert_eq!(result.evaluations, 12 + 6 * 12);
}
