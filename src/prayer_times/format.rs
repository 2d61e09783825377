//! Time string cleanup and 12-hour formatting

use serde::{Deserialize, Serialize};

use crate::models::UNAVAILABLE;

/// Language of the AM/PM markers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeLocale {
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

impl TimeLocale {
    /// (AM marker, PM marker)
    #[must_use]
    pub fn markers(self) -> (&'static str, &'static str) {
        match self {
            TimeLocale::Arabic => ("ص", "م"),
            TimeLocale::English => ("AM", "PM"),
        }
    }
}

/// Strip the timezone suffix Aladhan appends, `"18:05 (+03)"` -> `"18:05"`
#[must_use]
pub fn clean_time(raw: &str) -> &str {
    let raw = raw.trim();
    let head = raw.split(' ').next().unwrap_or_default();
    head.split('+').next().unwrap_or_default().trim()
}

/// Convert `HH:MM` to a 12-hour string; malformed input is returned unchanged
#[must_use]
pub fn convert_to_12_hour(time_24h: &str, locale: TimeLocale) -> String {
    if time_24h.is_empty() || time_24h == UNAVAILABLE {
        return UNAVAILABLE.to_string();
    }

    let parts: Vec<&str> = time_24h.split(':').collect();
    let [hour, minute] = parts.as_slice() else {
        return time_24h.to_string();
    };
    let Ok(hour) = hour.trim().parse::<u32>() else {
        return time_24h.to_string();
    };

    let (am, pm) = locale.markers();
    match hour {
        0 => format!("12:{minute} {am}"),
        1..=11 => format!("{hour}:{minute} {am}"),
        12 => format!("12:{minute} {pm}"),
        13..=23 => format!("{}:{minute} {pm}", hour - 12),
        _ => time_24h.to_string(),
    }
}
