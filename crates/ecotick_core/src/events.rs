//! Notable population changes derived from a [`TickReport`].
//!
//! The engine only reports numbers. Which of them deserve a message is decided
//! here, by thresholds in [`EventPolicy`].

use ecotick_data::{SpeciesId, SpeciesTickReport, TickReport};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EventPolicy {
    /// Growth ratio over the previous tick that counts as a surge.
    pub surge_ratio: f64,
    /// Shrink ratio below which a surviving population has collapsed.
    pub collapse_ratio: f64,
    /// Births in one tick above this count are a burst.
    pub birth_burst: u32,
    /// Deaths in one tick above this count are a die-off.
    pub die_off: u32,
}

impl Default for EventPolicy {
    fn default() -> Self {
        Self {
            surge_ratio: 1.5,
            collapse_ratio: 0.6,
            birth_burst: 2,
            die_off: 2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Extinction,
    Surge,
    Collapse,
    BirthBurst,
    DieOff,
    Arrival,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EcoEvent {
    pub time: u64,
    pub species: SpeciesId,
    pub kind: EventKind,
    pub prev_pop: usize,
    pub pop: usize,
    /// Births, deaths or migrants, depending on `kind`.
    pub count: u32,
}

impl fmt::Display for EcoEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.species;
        match self.kind {
            EventKind::Extinction => write!(f, "{s} went extinct"),
            EventKind::Surge => write!(f, "{s} surged {} → {}", self.prev_pop, self.pop),
            EventKind::Collapse => write!(f, "{s} collapsed {} → {}", self.prev_pop, self.pop),
            EventKind::BirthBurst => write!(f, "{s}: {} births", self.count),
            EventKind::DieOff => write!(f, "{s}: {} deaths", self.count),
            EventKind::Arrival => write!(f, "{} {s} migrated in", self.count),
        }
    }
}

impl EventPolicy {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.surge_ratio > 1.0, "Surge ratio must be greater than 1.0");
        anyhow::ensure!(
            self.collapse_ratio > 0.0 && self.collapse_ratio < 1.0,
            "Collapse ratio must be in (0.0, 1.0)"
        );
        Ok(())
    }

    /// Events for one species, in a fixed order.
    #[must_use]
    pub fn classify(&self, time: u64, report: &SpeciesTickReport) -> Vec<EcoEvent> {
        let prev = report.prev_pop;
        let pop = report.pop;
        let event = |kind, count| EcoEvent {
            time,
            species: report.id.clone(),
            kind,
            prev_pop: prev,
            pop,
            count,
        };

        let mut events = Vec::new();
        if report.migrants > 0 {
            events.push(event(EventKind::Arrival, report.migrants));
        }
        if prev > 0 {
            let (p, n) = (prev as f64, pop as f64);
            if pop == 0 {
                events.push(event(EventKind::Extinction, 0));
            } else if n > p * self.surge_ratio {
                events.push(event(EventKind::Surge, 0));
            } else if n < p * self.collapse_ratio {
                events.push(event(EventKind::Collapse, 0));
            }
        }
        if report.births > self.birth_burst {
            events.push(event(EventKind::BirthBurst, report.births));
        }
        if report.deaths > self.die_off {
            events.push(event(EventKind::DieOff, report.deaths));
        }
        events
    }

    /// Events for every species in the report, catalog order.
    #[must_use]
    pub fn detect(&self, report: &TickReport) -> Vec<EcoEvent> {
        report
            .species
            .iter()
            .flat_map(|s| self.classify(report.time, s))
            .collect()
    }
}
