//! Iftar (Maghrib) prayer times
//!
//! This module provides:
//! - the [`TimingsProvider`] seam over the external timings API
//! - an Aladhan HTTP client implementing it
//! - 12-hour formatting of the returned times
//! - the bounded fan-out aggregator producing a dense country x date table

pub mod aggregator;
pub mod aladhan;
pub mod format;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::Result;
use crate::models::Location;

pub use aggregator::{IftarAggregator, IftarTimes};
pub use aladhan::AladhanClient;
pub use format::{TimeLocale, clean_time, convert_to_12_hour};

/// Source of raw Maghrib times
#[async_trait]
pub trait TimingsProvider: Send + Sync {
    /// Raw Maghrib time for `location` on `date`, as returned upstream (e.g. `"18:05 (+03)"`)
    async fn maghrib(&self, location: &Location, date: NaiveDate) -> Result<String>;
}
