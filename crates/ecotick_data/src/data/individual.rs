use serde::{Deserialize, Serialize};

/// A single organism inside a species pool.
///
/// `id` is an opaque handle for presentation-side correlation. It is assigned
/// sequentially by the population store and has no effect on the simulation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Individual {
    pub id: u64,
    pub age: u64,
    pub energy: f64,
}

impl Individual {
    #[must_use]
    pub fn new(id: u64, energy: f64) -> Self {
        Self { id, age: 0, energy }
    }

    /// Sets energy, clamped into `[0, max_energy]`.
    pub fn set_energy(&mut self, energy: f64, max_energy: f64) {
        self.energy = energy.clamp(0.0, max_energy.max(0.0));
    }
}
