//! Country locations used for prayer time lookups

use serde::{Deserialize, Serialize};

/// A country queried for iftar times, represented by its capital
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Display name of the country (Arabic), unique key in responses
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// City the coordinates point at
    pub city: String,
}

impl Location {
    #[must_use]
    pub fn new(name: &str, latitude: f64, longitude: f64, city: &str) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            city: city.to_string(),
        }
    }
}

struct CountryEntry {
    name: &'static str,
    latitude: f64,
    longitude: f64,
    city: &'static str,
    featured: bool,
}

const fn country(
    name: &'static str,
    latitude: f64,
    longitude: f64,
    city: &'static str,
    featured: bool,
) -> CountryEntry {
    CountryEntry {
        name,
        latitude,
        longitude,
        city,
        featured,
    }
}

/// All Arab League countries; `featured` ones are served by the API
static ARAB_COUNTRIES: &[CountryEntry] = &[
    country("مصر", 30.0444, 31.2357, "Cairo", true),
    country("السعودية", 24.7136, 46.6753, "Riyadh", true),
    country("الإمارات", 24.4539, 54.3773, "Abu Dhabi", true),
    country("الكويت", 29.3759, 47.9774, "Kuwait City", true),
    country("قطر", 25.2854, 51.5310, "Doha", true),
    country("البحرين", 26.0667, 50.5577, "Manama", true),
    country("عمان", 23.5859, 58.4059, "Muscat", true),
    country("اليمن", 15.3694, 44.1910, "Sanaa", false),
    country("الأردن", 31.9539, 35.9106, "Amman", true),
    country("لبنان", 33.8938, 35.5018, "Beirut", true),
    country("سوريا", 33.5138, 36.2765, "Damascus", true),
    country("العراق", 33.3152, 44.3661, "Baghdad", true),
    country("فلسطين", 31.9522, 35.2332, "Jerusalem", true),
    country("السودان", 15.5007, 32.5599, "Khartoum", true),
    country("ليبيا", 32.8872, 13.1913, "Tripoli", true),
    country("تونس", 36.8065, 10.1815, "Tunis", true),
    country("الجزائر", 36.7538, 3.0588, "Algiers", true),
    country("المغرب", 33.9716, -6.8498, "Rabat", true),
    country("موريتانيا", 18.0735, -15.9582, "Nouakchott", false),
    country("جيبوتي", 11.8251, 42.5903, "Djibouti", false),
    country("الصومال", 2.0469, 45.3182, "Mogadishu", false),
    country("جزر القمر", -11.6455, 43.3333, "Moroni", false),
];

fn to_location(entry: &CountryEntry) -> Location {
    Location::new(entry.name, entry.latitude, entry.longitude, entry.city)
}

#[cfg(test)]
fn arab_countries() -> Vec<Location> {
    ARAB_COUNTRIES.iter().map(to_location).collect()
}

/// The countries whose iftar times are fetched for each request
#[must_use]
pub fn featured_countries() -> Vec<Location> {
    ARAB_COUNTRIES
        .iter()
        .filter(|c| c.featured)
        .map(to_location)
        .collect()
}
