use crate::history::History;
use crate::population::Populations;
use crate::rng::RngState;
use ecotick_data::Environment;
use serde::{Deserialize, Serialize};

/// Full by-value copy of an engine, enough to resume it tick for tick.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EngineSnapshot {
    pub time: u64,
    pub rng: RngState,
    pub environment: Environment,
    pub populations: Populations,
    pub history: History,
}
