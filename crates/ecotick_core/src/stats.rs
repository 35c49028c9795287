//! Derived per-species statistics for observers.

use crate::catalog::Catalog;
use crate::history::{CappedSeries, History, SpeciesSample};
use crate::population::Populations;
use ecotick_data::{Species, SpeciesId};
use serde::{Deserialize, Serialize};

/// Number of trailing samples used for averages, growth and trend.
pub const RECENT_WINDOW: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Stable,
    Falling,
}

impl Trend {
    #[must_use]
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.5 {
            Self::Rising
        } else if slope < -0.5 {
            Self::Falling
        } else {
            Self::Stable
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Rising => "↗",
            Self::Stable => "→",
            Self::Falling => "↘",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyStatus {
    Critical,
    Low,
    Good,
    Excellent,
}

impl EnergyStatus {
    #[must_use]
    pub fn classify(avg_energy: f64, species: &Species) -> Self {
        if avg_energy <= 1.0 {
            Self::Critical
        } else if avg_energy <= species.breed_threshold + 1.0 {
            Self::Low
        } else if avg_energy >= species.max_energy * 0.8 {
            Self::Excellent
        } else {
            Self::Good
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcologicalRole {
    Producer,
    /// Eats producers only.
    Herbivore,
    /// Eats both producers and consumers.
    Omnivore,
    /// Eats consumers only.
    Predator,
}

impl EcologicalRole {
    /// Dangling diet entries are ignored. A consumer whose diet resolves to
    /// nothing is reported as a predator.
    #[must_use]
    pub fn classify(species: &Species, catalog: &Catalog) -> Self {
        if species.is_producer {
            return Self::Producer;
        }
        let mut plants = false;
        let mut animals = false;
        for prey in species.diet.iter().filter_map(|id| catalog.get(id)) {
            if prey.is_producer {
                plants = true;
            } else {
                animals = true;
            }
        }
        match (plants, animals) {
            (true, false) => Self::Herbivore,
            (true, true) => Self::Omnivore,
            _ => Self::Predator,
        }
    }
}

/// `+`, `-` or `=` for a relative rate of change.
#[must_use]
pub fn rate_symbol(rate: f64) -> char {
    if rate > 0.1 {
        '+'
    } else if rate < -0.1 {
        '-'
    } else {
        '='
    }
}

/// Least-squares slope of the last [`RECENT_WINDOW`] values, 0 with fewer.
#[must_use]
pub fn trend_slope(values: &[f64]) -> f64 {
    if values.len() < RECENT_WINDOW {
        return 0.0;
    }
    let recent = &values[values.len() - RECENT_WINDOW..];
    let n = RECENT_WINDOW as f64;
    let (mut sx, mut sy, mut sxy, mut sx2) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in recent.iter().enumerate() {
        let x = i as f64;
        sx += x;
        sy += y;
        sxy += x * y;
        sx2 += x * x;
    }
    (n * sxy - sx * sy) / (n * sx2 - sx * sx)
}

/// `(last - first) / first` over the last [`RECENT_WINDOW`] values.
#[must_use]
pub fn growth_rate(values: &[f64]) -> f64 {
    if values.len() < RECENT_WINDOW {
        return 0.0;
    }
    let recent = &values[values.len() - RECENT_WINDOW..];
    let first = recent[0];
    if first == 0.0 {
        return 0.0;
    }
    (recent[RECENT_WINDOW - 1] - first) / first
}

fn recent_avg(series: &CappedSeries<SpeciesSample>, field: fn(&SpeciesSample) -> u32) -> f64 {
    let total: u32 = series.recent(RECENT_WINDOW).map(field).sum();
    f64::from(total) / RECENT_WINDOW as f64
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeciesStats {
    pub id: SpeciesId,
    pub role: EcologicalRole,
    pub pop: usize,
    pub avg_energy: f64,
    pub health_pct: f64,
    pub biomass: f64,
    pub energy_status: EnergyStatus,
    pub recent_births: f64,
    pub recent_deaths: f64,
    pub growth_rate: f64,
    pub trend: f64,
}

impl SpeciesStats {
    #[must_use]
    pub fn compute(
        species: &Species,
        catalog: &Catalog,
        populations: &Populations,
        history: &History,
    ) -> Self {
        let avg_energy = populations.avg_energy(&species.id);
        let health_pct = if species.max_energy > 0.0 {
            100.0 * avg_energy / species.max_energy
        } else {
            0.0
        };
        let pops: Vec<f64> = history
            .pop_series(&species.id)
            .into_iter()
            .map(|p| p as f64)
            .collect();
        let (recent_births, recent_deaths) = history
            .species(&species.id)
            .map(|s| (recent_avg(s, |x| x.births), recent_avg(s, |x| x.deaths)))
            .unwrap_or_default();

        Self {
            id: species.id.clone(),
            role: EcologicalRole::classify(species, catalog),
            pop: populations.count(&species.id),
            avg_energy,
            health_pct,
            biomass: populations.biomass(&species.id),
            energy_status: EnergyStatus::classify(avg_energy, species),
            recent_births,
            recent_deaths,
            growth_rate: growth_rate(&pops),
            trend: trend_slope(&pops),
        }
    }

    #[must_use]
    pub fn trend_direction(&self) -> Trend {
        Trend::from_slope(self.trend)
    }

    /// Stats for every catalog species, catalog order.
    #[must_use]
    pub fn all(catalog: &Catalog, populations: &Populations, history: &History) -> Vec<Self> {
        catalog
            .iter()
            .map(|s| Self::compute(s, catalog, populations, history))
            .collect()
    }
}
