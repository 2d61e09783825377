//! Data models for the Ramadan app
//!
//! This module contains the core domain models organized by concern:
//! - Location: countries and the coordinates they are queried with
//! - Timing: iftar time cells and the per-country matrix
//! - Generation: persisted image generations

pub mod generation;
pub mod location;
pub mod timing;

// Re-export all public types for convenient access
pub use generation::Generation;
pub use location::Location;
pub use timing::{CountryTimes, IftarTable, MaghribTime, UNAVAILABLE};
