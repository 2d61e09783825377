//! Ramadan app backend
//!
//! Serves iftar (Maghrib) times for Arab capitals over the current Ramadan
//! season, fetched concurrently from the Aladhan API, plus a small character
//! image generation flow with MySQL-backed history.

pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod prayer_times;
pub mod season;
pub mod state;
pub mod web;

// Re-export core types for public API
pub use config::AppConfig;
pub use error::IftarError;
pub use models::{CountryTimes, IftarTable, Location, MaghribTime};
pub use prayer_times::{AladhanClient, IftarAggregator, IftarTimes, TimingsProvider};
pub use season::{DateRange, SeasonCalendar, SeasonWindow};
pub use state::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, IftarError>;
