//! Periodic reintroduction of extinct species.
//!
//! Migration is the only way an empty pool refills. It runs on interval ticks
//! only and never touches a species that still has members.

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::population::Populations;
use crate::rng::RandomSource;
use ecotick_data::{Species, SpeciesId};
use std::collections::BTreeMap;

/// Whether migration runs on `time`. An interval of 0 disables it.
#[must_use]
pub fn is_due(time: u64, interval: u64) -> bool {
    interval > 0 && time % interval == 0
}

/// Producers always qualify. Consumers qualify only while some diet species
/// has more than `food_threshold` members.
#[must_use]
pub fn is_eligible(species: &Species, populations: &Populations, food_threshold: usize) -> bool {
    species.is_producer
        || species
            .diet
            .iter()
            .any(|prey| populations.count(prey) > food_threshold)
}

/// Runs one migration round over every empty pool in catalog order.
///
/// Returns the number of arrivals per species. Species with no arrivals are
/// omitted.
pub fn migrate<R: RandomSource>(
    catalog: &Catalog,
    populations: &mut Populations,
    config: &EngineConfig,
    rng: &mut R,
) -> BTreeMap<SpeciesId, u32> {
    let mut arrivals = BTreeMap::new();

    for species in catalog.iter() {
        if !populations.is_extinct(&species.id)
            || !is_eligible(species, populations, config.migration_food_threshold)
        {
            continue;
        }
        if !rng.chance(config.migration_chance) {
            continue;
        }

        let count = 1 + rng.pick(2);
        let max = species.max_energy;
        for _ in 0..count {
            let energy = max * 0.7 + rng.next_f64() * max * 0.3;
            populations.spawn(species, energy);
        }
        tracing::debug!(species = %species.id, count, "Migrants arrived");
        arrivals.insert(species.id.clone(), count as u32);
    }
    arrivals
}
