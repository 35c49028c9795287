//! # Ecotick
//!
//! Host program for the ecotick engine: wires the engine to a tokio
//! scheduler, snapshot persistence, the event log and a line-oriented
//! console.

pub mod app;
