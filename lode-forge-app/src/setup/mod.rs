//! Wiring between resolved settings and the generator: model preparation and
//! the generate / validate execution modes.

pub mod execution;
pub mod model;
