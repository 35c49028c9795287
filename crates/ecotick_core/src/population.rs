//! Per-species pools of individuals.

use crate::catalog::Catalog;
use ecotick_data::{Individual, Species, SpeciesId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Populations {
    pools: BTreeMap<SpeciesId, Vec<Individual>>,
    next_id: u64,
}

impl Populations {
    /// One empty pool per catalog species.
    #[must_use]
    pub fn empty(catalog: &Catalog) -> Self {
        let mut populations = Self::default();
        populations.ensure_pools(catalog);
        populations
    }

    /// Pools seeded with each species' `start_pop` at full energy.
    #[must_use]
    pub fn seeded(catalog: &Catalog) -> Self {
        let mut populations = Self::empty(catalog);
        for species in catalog.iter() {
            populations.add(species, species.start_pop);
        }
        populations
    }

    /// Adds an empty pool for any catalog species that lacks one.
    pub fn ensure_pools(&mut self, catalog: &Catalog) {
        for species in catalog.iter() {
            self.pools.entry(species.id.clone()).or_default();
        }
    }

    /// Appends `count` new individuals at full energy.
    pub fn add(&mut self, species: &Species, count: usize) {
        for _ in 0..count {
            self.spawn(species, species.max_energy);
        }
    }

    /// Appends one individual with the given energy, clamped to the species range.
    pub fn spawn(&mut self, species: &Species, energy: f64) -> u64 {
        let individual = self.new_individual(species, energy);
        let id = individual.id;
        self.pools
            .entry(species.id.clone())
            .or_default()
            .push(individual);
        id
    }

    /// Creates an individual with a fresh id without placing it in a pool.
    pub fn new_individual(&mut self, species: &Species, energy: f64) -> Individual {
        let mut individual = Individual::new(self.next_id, 0.0);
        individual.set_energy(energy, species.max_energy);
        self.next_id += 1;
        individual
    }

    #[must_use]
    pub fn count(&self, id: &str) -> usize {
        self.pools.get(id).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_extinct(&self, id: &str) -> bool {
        self.count(id) == 0
    }

    #[must_use]
    pub fn pool(&self, id: &str) -> &[Individual] {
        self.pools.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pool_mut(&mut self, id: &str) -> Option<&mut Vec<Individual>> {
        self.pools.get_mut(id)
    }

    /// Removes a pool for in-place processing. Pair with [`Self::restore_pool`].
    pub fn take_pool(&mut self, id: &str) -> Vec<Individual> {
        self.pools
            .get_mut(id)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn restore_pool(&mut self, id: &str, pool: Vec<Individual>) {
        self.pools.insert(id.to_string(), pool);
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    /// Sum of energy over one pool.
    #[must_use]
    pub fn biomass(&self, id: &str) -> f64 {
        self.pool(id).iter().map(|i| i.energy).sum()
    }

    #[must_use]
    pub fn total_biomass(&self) -> f64 {
        self.pools.values().flatten().map(|i| i.energy).sum()
    }

    /// Mean energy of a pool, 0 when empty.
    #[must_use]
    pub fn avg_energy(&self, id: &str) -> f64 {
        let n = self.count(id);
        if n == 0 {
            0.0
        } else {
            self.biomass(id) / n as f64
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpeciesId, &Vec<Individual>)> {
        self.pools.iter()
    }

    /// Owned copy of every pool, for observers.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<SpeciesId, Vec<Individual>> {
        self.pools.clone()
    }

    /// Population count per species.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<SpeciesId, usize> {
        self.pools
            .iter()
            .map(|(id, pool)| (id.clone(), pool.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_matches_start_pop() {
        let catalog = Catalog::default_catalog();
        let pops = Populations::seeded(&catalog);
        for s in catalog.iter() {
            assert_eq!(pops.count(&s.id), s.start_pop);
            assert!(pops.pool(&s.id).iter().all(|i| i.energy == s.max_energy));
        }
    }

    #[test]
    fn test_ids_are_unique_and_sequential() {
        let catalog = Catalog::default_catalog();
        let pops = Populations::seeded(&catalog);
        let mut ids: Vec<u64> = pops.iter().flat_map(|(_, p)| p.iter().map(|i| i.id)).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), pops.total());
    }

    #[test]
    fn test_spawn_clamps_energy() {
        let catalog = Catalog::default_catalog();
        let plant = catalog.get("plant").unwrap().clone();
        let mut pops = Populations::empty(&catalog);
        pops.spawn(&plant, 1000.0);
        assert_eq!(pops.pool("plant")[0].energy, plant.max_energy);
    }

    #[test]
    fn test_take_and_restore_pool() {
        let catalog = Catalog::default_catalog();
        let mut pops = Populations::seeded(&catalog);
        let pool = pops.take_pool("fox");
        assert_eq!(pool.len(), 3);
        assert_eq!(pops.count("fox"), 0);
        pops.restore_pool("fox", pool);
        assert_eq!(pops.count("fox"), 3);
    }

    #[test]
    fn test_unknown_species_reads_as_empty() {
        let pops = Populations::default();
        assert_eq!(pops.count("dragon"), 0);
        assert!(pops.pool("dragon").is_empty());
        assert_eq!(pops.avg_energy("dragon"), 0.0);
    }
}
