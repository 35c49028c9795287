use super::environment::Environment;
use super::species::SpeciesId;
use serde::{Deserialize, Serialize};

/// Per-species outcome of a single tick.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SpeciesTickReport {
    pub id: SpeciesId,
    /// Population at the end of the previous tick.
    pub prev_pop: usize,
    pub pop: usize,
    pub births: u32,
    /// Deaths from starvation, old age or the random death roll.
    pub deaths: u32,
    /// Individuals removed by predators during this tick.
    pub eaten: u32,
    /// Individuals reintroduced by migration during this tick.
    pub migrants: u32,
    pub avg_energy: f64,
    pub health_pct: f64,
}

impl SpeciesTickReport {
    #[must_use]
    pub fn net_change(&self) -> i64 {
        self.pop as i64 - self.prev_pop as i64
    }
}

/// Everything an observer needs to decide which messages to surface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    pub time: u64,
    pub environment: Environment,
    pub species: Vec<SpeciesTickReport>,
}

impl TickReport {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SpeciesTickReport> {
        self.species.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn total_births(&self) -> u32 {
        self.species.iter().map(|s| s.births).sum()
    }

    #[must_use]
    pub fn total_deaths(&self) -> u32 {
        self.species.iter().map(|s| s.deaths).sum()
    }
}
