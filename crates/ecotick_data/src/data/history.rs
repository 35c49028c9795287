use serde::{Deserialize, Serialize};

/// One per-species history entry, appended once per tick.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeciesSample {
    pub pop: usize,
    /// Mean energy of the living individuals (0 when extinct).
    pub energy: f64,
    pub births: u32,
    pub deaths: u32,
}

/// One global history entry, appended once per tick.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalSample {
    pub total_pop: usize,
    /// Sum of energy over every living individual.
    pub total_biomass: f64,
    pub producer_pop: usize,
    pub consumer_pop: usize,
}
