//! Core data structures for the Ecotick simulation.

pub mod environment;
pub mod history;
pub mod individual;
pub mod report;
pub mod species;
