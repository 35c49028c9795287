//! # Ecotick Data
//!
//! Plain data types shared by the engine, the persistence layer and the host
//! program. Nothing in this crate draws random numbers or mutates state on its
//! own; behaviour lives in `ecotick_core`.

pub mod data;

pub use data::environment::{Environment, Season};
pub use data::history::{GlobalSample, SpeciesSample};
pub use data::individual::Individual;
pub use data::report::{SpeciesTickReport, TickReport};
pub use data::species::{Species, SpeciesId};
