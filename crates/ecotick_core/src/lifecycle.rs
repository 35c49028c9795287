//! Per-individual lifecycle: aging, energy, death, feeding and reproduction.
//!
//! A species pool is walked back-to-front in place. Individuals removed ahead
//! of the cursor (prey taken from the hunter's own pool) shift the cursor so
//! each survivor is visited exactly once. Newborns are held aside and only
//! join the pool after the pass, so they are never processed in the tick they
//! are born.

use crate::config::{BreedCostPolicy, EngineConfig, HuntDrawPolicy};
use crate::population::Populations;
use crate::rng::RandomSource;
use ecotick_data::{Environment, Individual, Species, SpeciesId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Starvation,
    OldAge,
    Chance,
}

/// Tallies from one species pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassOutcome {
    pub births: u32,
    pub deaths: u32,
    /// Prey removed per prey species.
    pub eaten: BTreeMap<SpeciesId, u32>,
}

/// Producers photosynthesise; consumers burn `metabolism`.
pub fn update_energy(individual: &mut Individual, species: &Species, sunlight: f64) {
    let energy = if species.is_producer {
        individual.energy + species.photo_rate * sunlight
    } else {
        individual.energy - species.metabolism
    };
    individual.set_energy(energy, species.max_energy);
}

/// Death conditions in evaluation order. The random roll is only drawn when
/// the individual survived starvation and old age.
pub fn death_cause<R: RandomSource>(
    individual: &Individual,
    species: &Species,
    rng: &mut R,
) -> Option<DeathCause> {
    if individual.energy <= 0.0 {
        Some(DeathCause::Starvation)
    } else if individual.age > species.max_age {
        Some(DeathCause::OldAge)
    } else if rng.chance(species.death_rate) {
        Some(DeathCause::Chance)
    } else {
        None
    }
}

/// Breeding success multiplier that falls as the pool fills up.
#[must_use]
pub fn density_factor(size: usize, capacity: f64, floor: f64) -> f64 {
    (1.0 - size as f64 / capacity).max(floor)
}

fn failed_hunt<R: RandomSource>(policy: HuntDrawPolicy, rng: &mut R) {
    if policy == HuntDrawPolicy::AlwaysDraw {
        rng.pick(0);
    }
}

/// Removes one random individual from `prey`. Returns whether one was caught.
pub fn hunt<R: RandomSource>(
    prey: &mut Vec<Individual>,
    policy: HuntDrawPolicy,
    rng: &mut R,
) -> bool {
    if prey.is_empty() {
        failed_hunt(policy, rng);
        return false;
    }
    let j = rng.pick(prey.len());
    prey.remove(j);
    true
}

/// Hunt inside the pool being processed, never catching the hunter at
/// `*cursor`. Keeps `*cursor` pointing at the hunter.
fn hunt_own_pool<R: RandomSource>(
    pool: &mut Vec<Individual>,
    cursor: &mut usize,
    policy: HuntDrawPolicy,
    rng: &mut R,
) -> bool {
    let others = pool.len().saturating_sub(1);
    if others == 0 {
        failed_hunt(policy, rng);
        return false;
    }
    let k = rng.pick(others);
    let j = if k >= *cursor { k + 1 } else { k };
    pool.remove(j);
    if j < *cursor {
        *cursor -= 1;
    }
    true
}

/// Runs one tick's lifecycle for every individual of `species`.
pub fn process_species<R: RandomSource>(
    species: &Species,
    populations: &mut Populations,
    env: &Environment,
    config: &EngineConfig,
    rng: &mut R,
) -> PassOutcome {
    let mut outcome = PassOutcome::default();
    let mut pool = populations.take_pool(&species.id);
    let mut newborns: Vec<Individual> = Vec::new();
    let max_energy = species.max_energy;

    let mut i = pool.len();
    while i > 0 {
        i -= 1;

        pool[i].age += 1;
        update_energy(&mut pool[i], species, env.sunlight);

        if let Some(cause) = death_cause(&pool[i], species, rng) {
            let dead = pool.remove(i);
            tracing::trace!(species = %species.id, id = dead.id, age = dead.age, ?cause, "Died");
            outcome.deaths += 1;
            continue;
        }

        // Feeding
        if species.is_consumer() && !species.diet.is_empty() && rng.chance(species.eat_rate) {
            let prey_id = &species.diet[rng.pick(species.diet.len())];
            let caught = if *prey_id == species.id {
                hunt_own_pool(&mut pool, &mut i, config.hunt_draw, rng)
            } else {
                match populations.pool_mut(prey_id) {
                    Some(prey) => hunt(prey, config.hunt_draw, rng),
                    None => {
                        failed_hunt(config.hunt_draw, rng);
                        false
                    }
                }
            };
            if caught {
                *outcome.eaten.entry(prey_id.clone()).or_insert(0) += 1;
                let energy = pool[i].energy + species.eat_gain;
                pool[i].set_energy(energy, max_energy);
            }
        }

        // Reproduction
        let size = pool.len() + newborns.len();
        if species.is_producer {
            if rng.chance(species.breed_rate * env.sunlight)
                && rng.chance(density_factor(
                    size,
                    config.producer_capacity,
                    config.min_breed_factor,
                ))
            {
                newborns.push(
                    populations.new_individual(species, max_energy * config.producer_birth_energy),
                );
                outcome.births += 1;
            }
        } else if pool[i].energy > species.breed_threshold && rng.chance(species.breed_rate) {
            if config.breed_cost == BreedCostPolicy::OnBreedRoll {
                pool[i].energy *= config.breed_cost_factor;
            }
            if rng.chance(density_factor(
                size,
                config.consumer_capacity,
                config.min_breed_factor,
            )) {
                newborns.push(
                    populations.new_individual(species, max_energy * config.consumer_birth_energy),
                );
                outcome.births += 1;
                if config.breed_cost == BreedCostPolicy::OnBirth {
                    pool[i].energy *= config.breed_cost_factor;
                }
            }
        }
    }

    pool.extend(newborns);
    populations.restore_pool(&species.id, pool);
    outcome
}
