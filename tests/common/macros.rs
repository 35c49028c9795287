/// Asserts the population of one species.
#[macro_export]
macro_rules! assert_population {
    ($engine:expr, $id:expr, $count:expr) => {
        assert_eq!(
            $engine.population($id),
            $count,
            "Population of {} mismatch",
            $id
        );
    };
}

/// Asserts that every individual's energy lies in `[0, max_energy]`.
#[macro_export]
macro_rules! assert_energy_bounded {
    ($engine:expr) => {
        for species in $engine.catalog().iter() {
            for ind in $engine.populations().pool(&species.id) {
                assert!(
                    ind.energy >= 0.0 && ind.energy <= species.max_energy,
                    "{} #{} energy {} outside [0, {}]",
                    species.id,
                    ind.id,
                    ind.energy,
                    species.max_energy
                );
            }
        }
    };
}

/// Asserts that two engines are in the same state.
#[macro_export]
macro_rules! assert_same_state {
    ($a:expr, $b:expr) => {
        assert_eq!($a.time(), $b.time(), "time mismatch");
        assert_eq!(
            $a.population_snapshot(),
            $b.population_snapshot(),
            "populations diverged"
        );
        assert_eq!($a.history(), $b.history(), "history diverged");
    };
}
