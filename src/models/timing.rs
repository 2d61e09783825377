//! Iftar time cells and the per-country result matrix

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Placeholder shown when no time could be obtained
pub const UNAVAILABLE: &str = "--:--";

/// Maghrib time for one (country, date) cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaghribTime {
    /// Localized 12-hour time, e.g. `6:05 م`
    Time(String),
    Unavailable,
}

impl MaghribTime {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, MaghribTime::Time(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            MaghribTime::Time(time) => time,
            MaghribTime::Unavailable => UNAVAILABLE,
        }
    }
}

impl fmt::Display for MaghribTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MaghribTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Times for one country keyed by `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTimes {
    pub times: BTreeMap<String, MaghribTime>,
    pub city: String,
}

impl CountryTimes {
    #[must_use]
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            times: BTreeMap::new(),
            city: city.into(),
        }
    }

    /// Number of cells holding a real time
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.times.values().filter(|t| t.is_available()).count()
    }
}

/// Country name to its times; dense over the requested dates
pub type IftarTable = BTreeMap<String, CountryTimes>;
