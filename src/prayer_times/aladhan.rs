//! Aladhan timings API client
//!
//! One GET per (country, date): `{base_url}/v1/timings/{YYYY-MM-DD}` with the
//! coordinates and the calculation parameters as query string.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::TimingsProvider;
use crate::config::PrayerTimesConfig;
use crate::models::{Location, UNAVAILABLE};
use crate::season::format_date;
use crate::{IftarError, Result};

/// HTTP client for `api.aladhan.com`
#[derive(Debug, Clone)]
pub struct AladhanClient {
    client: Client,
    base_url: String,
    method: u8,
    school: u8,
}

#[derive(Debug, Deserialize)]
struct TimingsResponse {
    data: TimingsData,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: Timings,
}

#[derive(Debug, Deserialize)]
struct Timings {
    #[serde(rename = "Maghrib")]
    maghrib: Option<String>,
}

impl AladhanClient {
    /// Create a client from configuration
    pub fn new(config: &PrayerTimesConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("ramadan-app/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            method: config.method,
            school: config.school,
        })
    }

    fn timings_url(&self, date: NaiveDate) -> String {
        format!("{}/v1/timings/{}", self.base_url, format_date(date))
    }
}

#[async_trait]
impl TimingsProvider for AladhanClient {
    #[instrument(skip(self, location), fields(country = %location.name))]
    async fn maghrib(&self, location: &Location, date: NaiveDate) -> Result<String> {
        let response = self
            .client
            .get(self.timings_url(date))
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("method", self.method.to_string()),
                ("school", self.school.to_string()),
            ])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(IftarError::api(format!(
                "Aladhan returned status {}",
                response.status()
            )));
        }

        let body: TimingsResponse = response
            .json()
            .await
            .map_err(|e| IftarError::api(format!("Malformed Aladhan response: {e}")))?;

        match body.data.timings.maghrib {
            Some(time) if !time.trim().is_empty() && time != UNAVAILABLE => {
                debug!(raw = %time, "Received Maghrib time");
                Ok(time)
            }
            _ => Err(IftarError::api("Aladhan response has no Maghrib time")),
        }
    }
}
