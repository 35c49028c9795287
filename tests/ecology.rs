mod common;

use common::{EngineBuilder, ScriptedRng, SpeciesBuilder};
use ecotick_core::catalog::Catalog;
use ecotick_core::config::EngineConfig;
use ecotick_core::engine::{tick, EngineState};

#[test]
fn test_producer_recovers_from_single_seed() {
    let survivors = (1..=20)
        .filter(|&seed| {
            let mut engine = EngineBuilder::new()
                .with_seed(seed)
                .with_species(
                    SpeciesBuilder::producer("moss")
                        .rates(0.0, 0.25, 0.01)
                        .start_pop(1)
                        .build(),
                )
                .build();
            engine.fast_forward(50);
            engine.population("moss") > 0
        })
        .count();
    assert!(survivors >= 17, "only {} of 20 runs survived", survivors);
}

#[test]
fn test_predation_removes_exactly_one_prey() {
    let mut wolf = SpeciesBuilder::consumer("wolf", &["sheep"])
        .rates(1.0, 0.0, 0.0)
        .metabolism(0.0)
        .start_pop(1)
        .build();
    wolf.eat_gain = 8.0;
    wolf.max_energy = 15.0;
    wolf.breed_threshold = 100.0;
    let sheep = SpeciesBuilder::producer("sheep")
        .rates(0.0, 0.0, 0.0)
        .start_pop(1)
        .build();
    let catalog = Catalog::new(vec![wolf.clone(), sheep]);
    let config = EngineConfig::default();

    let mut state = EngineState::seeded(&catalog, &config);
    state.populations.pool_mut("wolf").unwrap()[0].energy = 10.0;

    let mut rng = ScriptedRng::constant(0.5);
    let report = tick(&mut state, &catalog, &config, &mut rng);

    assert_eq!(state.populations.count("sheep"), 0);
    assert_eq!(report.get("sheep").unwrap().eaten, 1);
    assert_eq!(report.get("sheep").unwrap().deaths, 0);
    let energy = state.populations.pool("wolf")[0].energy;
    assert_eq!(energy, 10.0 + f64::min(wolf.eat_gain, wolf.max_energy - 10.0));
}

#[test]
fn test_failed_hunt_gains_nothing() {
    let mut wolf = SpeciesBuilder::consumer("wolf", &["sheep"])
        .rates(1.0, 0.0, 0.0)
        .metabolism(1.0)
        .start_pop(1)
        .build();
    wolf.breed_threshold = 100.0;
    let sheep = SpeciesBuilder::producer("sheep").start_pop(0).build();
    let catalog = Catalog::new(vec![wolf.clone(), sheep]);
    let config = EngineConfig::default();
    let mut state = EngineState::seeded(&catalog, &config);

    let mut rng = ScriptedRng::constant(0.5);
    tick(&mut state, &catalog, &config, &mut rng);

    // Death roll, eat roll, prey-species pick, prey-index pick (AlwaysDraw).
    assert_eq!(rng.draws(), 4);
    assert_eq!(
        state.populations.pool("wolf")[0].energy,
        wolf.max_energy - wolf.metabolism
    );
}

#[test]
fn test_consumer_with_starving_diet_never_migrates() {
    let fox = SpeciesBuilder::consumer("fox", &["vole"]).start_pop(0).build();
    let vole = SpeciesBuilder::producer("vole")
        .rates(0.0, 0.0, 0.0)
        .start_pop(10)
        .build();
    let catalog = Catalog::new(vec![fox, vole]);
    let config = EngineConfig {
        migration_chance: 1.0,
        ..Default::default()
    };
    let mut state = EngineState::seeded(&catalog, &config);

    // Every roll succeeds, so only the food gate can keep the fox out.
    let mut rng = ScriptedRng::constant(0.0);
    for _ in 0..100 {
        let report = tick(&mut state, &catalog, &config, &mut rng);
        assert_eq!(report.get("fox").unwrap().migrants, 0);
    }
    assert_eq!(state.populations.count("fox"), 0);
    assert_eq!(state.populations.count("vole"), 10);
}

#[test]
fn test_consumer_migrates_once_food_exceeds_threshold() {
    let fox = SpeciesBuilder::consumer("fox", &["vole"]).start_pop(0).build();
    let vole = SpeciesBuilder::producer("vole")
        .rates(0.0, 0.0, 0.0)
        .start_pop(11)
        .build();
    let catalog = Catalog::new(vec![fox, vole]);
    let config = EngineConfig {
        migration_chance: 1.0,
        ..Default::default()
    };
    let mut state = EngineState::seeded(&catalog, &config);
    let mut rng = ScriptedRng::constant(0.0);

    for t in 1..=10 {
        let report = tick(&mut state, &catalog, &config, &mut rng);
        let migrants = report.get("fox").unwrap().migrants;
        if t < 10 {
            assert_eq!(migrants, 0, "migration before interval at tick {}", t);
        } else {
            assert_eq!(migrants, 1);
        }
    }
}

#[test]
fn test_newborn_producers_start_at_half_energy() {
    let moss = SpeciesBuilder::producer("moss")
        .rates(0.0, 1.0, 0.0)
        .start_pop(1)
        .build();
    let catalog = Catalog::new(vec![moss.clone()]);
    let config = EngineConfig::default();
    let mut state = EngineState::seeded(&catalog, &config);
    let mut rng = ScriptedRng::constant(0.0);

    let report = tick(&mut state, &catalog, &config, &mut rng);
    assert_eq!(report.get("moss").unwrap().births, 1);
    let pool = state.populations.pool("moss");
    assert_eq!(pool[1].energy, moss.max_energy * 0.5);
    assert_eq!(pool[1].age, 0);
}

#[test]
fn test_breed_cost_policies() {
    use ecotick_core::config::BreedCostPolicy;

    let run = |policy: BreedCostPolicy| {
        let mut deer = SpeciesBuilder::consumer("deer", &["grass"])
            .rates(0.0, 1.0, 0.0)
            .metabolism(0.0)
            .start_pop(1)
            .build();
        deer.breed_threshold = 1.0;
        let grass = SpeciesBuilder::producer("grass").start_pop(0).build();
        let catalog = Catalog::new(vec![deer, grass]);
        let config = EngineConfig {
            breed_cost: policy,
            min_breed_factor: 0.0,
            consumer_capacity: 1.0,
            ..Default::default()
        };
        let mut state = EngineState::seeded(&catalog, &config);
        // Death roll survives, eat roll misses, breed roll succeeds, density
        // roll fails because the pool is already at capacity.
        let mut rng = ScriptedRng::new(vec![0.5, 0.5, 0.0, 0.5], 0.9);
        let report = tick(&mut state, &catalog, &config, &mut rng);
        assert_eq!(report.get("deer").unwrap().births, 0);
        state.populations.pool("deer")[0].energy
    };

    assert_eq!(run(BreedCostPolicy::OnBreedRoll), 15.0 * 0.7);
    assert_eq!(run(BreedCostPolicy::OnBirth), 15.0);
}
