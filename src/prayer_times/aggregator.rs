//! Bounded fan-out of Maghrib lookups over countries and dates
//!
//! Each country is one unit of work: its dates are fetched one after another,
//! while up to `max_concurrency` countries run at the same time. Every cell
//! of the resulting table is filled, with [`MaghribTime::Unavailable`]
//! standing in for lookups that failed.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::TimingsProvider;
use super::format::{TimeLocale, clean_time, convert_to_12_hour};
use crate::models::{CountryTimes, IftarTable, Location, MaghribTime};
use crate::season::{DateRange, format_date};
use crate::{IftarError, Result};

/// Iftar times for a date range, shaped as served by `/api/iftar-times`
#[derive(Debug, Clone, Serialize)]
pub struct IftarTimes {
    pub dates: Vec<String>,
    pub countries: IftarTable,
    pub start_date: String,
    pub end_date: String,
    pub total_days: usize,
}

/// Collects Maghrib times for many countries with bounded parallelism
#[derive(Clone)]
pub struct IftarAggregator {
    provider: Arc<dyn TimingsProvider>,
    max_concurrency: usize,
    locale: TimeLocale,
}

impl IftarAggregator {
    #[must_use]
    pub fn new(
        provider: Arc<dyn TimingsProvider>,
        max_concurrency: usize,
        locale: TimeLocale,
    ) -> Self {
        Self {
            provider,
            max_concurrency: max_concurrency.max(1),
            locale,
        }
    }

    /// Times for every country over the dates of `range`
    pub async fn fetch_range(&self, locations: &[Location], range: &DateRange) -> Result<IftarTimes> {
        let countries = self.collect(locations, &range.dates).await?;

        Ok(IftarTimes {
            dates: range.date_strings(),
            countries,
            start_date: format_date(range.start),
            end_date: format_date(range.end),
            total_days: range.dates.len(),
        })
    }

    /// Dense country x date table; fails only when not a single time was found
    #[instrument(skip_all, fields(countries = locations.len(), days = dates.len()))]
    pub async fn collect(&self, locations: &[Location], dates: &[NaiveDate]) -> Result<IftarTable> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let dates: Arc<[NaiveDate]> = Arc::from(dates);
        let mut join_set = JoinSet::new();

        for location in locations {
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&semaphore);
            let dates = Arc::clone(&dates);
            let location = location.clone();
            let locale = self.locale;

            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| IftarError::general(format!("Semaphore closed: {e}")))?;

                let times = fetch_country(provider.as_ref(), &location, &dates, locale).await;
                Ok::<_, IftarError>((location.name, times))
            });
        }

        let mut table = IftarTable::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok((name, times))) => {
                    table.entry(name).or_insert(times);
                }
                Ok(Err(e)) => warn!(error = %e, "Country lookup aborted"),
                Err(e) => warn!(error = %e, "Country lookup task failed"),
            }
        }

        // Countries whose task was lost get a full row of placeholders.
        for location in locations {
            let country = table
                .entry(location.name.clone())
                .or_insert_with(|| CountryTimes::new(location.city.clone()));
            for date in dates.iter() {
                country
                    .times
                    .entry(format_date(*date))
                    .or_insert(MaghribTime::Unavailable);
            }
        }

        let total_times: usize = table.values().map(CountryTimes::available_count).sum();
        info!(
            total_times,
            countries = table.len(),
            "Collected iftar times"
        );

        if total_times == 0 {
            return Err(IftarError::NoTimingsAvailable);
        }

        Ok(table)
    }
}

async fn fetch_country(
    provider: &dyn TimingsProvider,
    location: &Location,
    dates: &[NaiveDate],
    locale: TimeLocale,
) -> CountryTimes {
    let mut country = CountryTimes::new(location.city.clone());
    for date in dates {
        let time = fetch_cell(provider, location, *date, locale).await;
        country.times.insert(format_date(*date), time);
    }
    country
}

async fn fetch_cell(
    provider: &dyn TimingsProvider,
    location: &Location,
    date: NaiveDate,
    locale: TimeLocale,
) -> MaghribTime {
    match provider.maghrib(location, date).await {
        Ok(raw) => {
            let cleaned = clean_time(&raw);
            if cleaned.contains(':') {
                MaghribTime::Time(convert_to_12_hour(cleaned, locale))
            } else {
                debug!(country = %location.name, %date, raw = %raw, "Unusable Maghrib time");
                MaghribTime::Unavailable
            }
        }
        Err(e) => {
            warn!(country = %location.name, %date, error = %e, "Maghrib lookup failed");
            MaghribTime::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn locations(n: usize) -> Vec<Location> {
        (0..n)
            .map(|i| Location::new(&format!("country-{i}"), 20.0, 40.0, &format!("city-{i}")))
            .collect()
    }

    fn dates() -> Vec<NaiveDate> {
        vec![date("2026-02-18"), date("2026-02-19"), date("2026-02-20")]
    }

    fn aggregator(provider: impl TimingsProvider + 'static) -> IftarAggregator {
        IftarAggregator::new(Arc::new(provider), 25, TimeLocale::Arabic)
    }

    /// Answers with a fixed raw time, failing for chosen countries or dates
    struct ScriptedProvider {
        raw: &'static str,
        failing_country: Option<&'static str>,
        failing_date: Option<NaiveDate>,
    }

    impl ScriptedProvider {
        fn ok(raw: &'static str) -> Self {
            Self {
                raw,
                failing_country: None,
                failing_date: None,
            }
        }
    }

    #[async_trait]
    impl TimingsProvider for ScriptedProvider {
        async fn maghrib(&self, location: &Location, date: NaiveDate) -> Result<String> {
            if self.failing_country == Some(location.name.as_str())
                || self.failing_date == Some(date)
            {
                return Err(IftarError::api("status 500"));
            }
            Ok(self.raw.to_string())
        }
    }

    struct PanickingProvider {
        panics_for: &'static str,
    }

    #[async_trait]
    impl TimingsProvider for PanickingProvider {
        async fn maghrib(&self, location: &Location, _date: NaiveDate) -> Result<String> {
            if location.name == self.panics_for {
                panic!("unexpected payload");
            }
            Ok("18:05".to_string())
        }
    }

    /// Tracks how many lookups are in flight at once and their order
    #[derive(Default)]
    struct TrackingProvider {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: Mutex<Vec<(String, NaiveDate)>>,
    }

    #[async_trait]
    impl TimingsProvider for TrackingProvider {
        async fn maghrib(&self, location: &Location, date: NaiveDate) -> Result<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls
                .lock()
                .unwrap()
                .push((location.name.clone(), date));
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("17:48 (+03)".to_string())
        }
    }

    fn assert_dense(table: &IftarTable, locations: &[Location], dates: &[NaiveDate]) {
        assert_eq!(table.len(), locations.len());
        for location in locations {
            let country = &table[&location.name];
            assert_eq!(country.city, location.city);
            assert_eq!(country.times.len(), dates.len());
            for d in dates {
                assert!(country.times.contains_key(&format_date(*d)));
            }
        }
    }

    #[tokio::test]
    async fn test_all_cells_formatted() {
        let locations = locations(3);
        let dates = dates();
        let table = aggregator(ScriptedProvider::ok("18:05 (+03)"))
            .collect(&locations, &dates)
            .await
            .unwrap();

        assert_dense(&table, &locations, &dates);
        assert!(
            table
                .values()
                .flat_map(|c| c.times.values())
                .all(|t| t == &MaghribTime::Time("6:05 م".to_string()))
        );
    }

    #[tokio::test]
    async fn test_failing_country_is_kept_with_placeholders() {
        let locations = locations(4);
        let dates = dates();
        let provider = ScriptedProvider {
            failing_country: Some("country-2"),
            ..ScriptedProvider::ok("18:05")
        };
        let table = aggregator(provider).collect(&locations, &dates).await.unwrap();

        assert_dense(&table, &locations, &dates);
        assert!(
            table["country-2"]
                .times
                .values()
                .all(|t| *t == MaghribTime::Unavailable)
        );
        assert_eq!(table["country-1"].available_count(), 3);
    }

    #[tokio::test]
    async fn test_failing_date_only_affects_that_cell() {
        let locations = locations(2);
        let dates = dates();
        let provider = ScriptedProvider {
            failing_date: Some(date("2026-02-19")),
            ..ScriptedProvider::ok("18:05")
        };
        let table = aggregator(provider).collect(&locations, &dates).await.unwrap();

        for country in table.values() {
            assert_eq!(country.times["2026-02-19"], MaghribTime::Unavailable);
            assert_eq!(country.times["2026-02-18"].as_str(), "6:05 م");
            assert_eq!(country.times["2026-02-20"].as_str(), "6:05 م");
        }
    }

    #[tokio::test]
    async fn test_time_without_colon_is_unavailable() {
        let locations = locations(1);
        let dates = dates();
        let err = aggregator(ScriptedProvider::ok("sunset"))
            .collect(&locations, &dates)
            .await
            .unwrap_err();
        assert!(matches!(err, IftarError::NoTimingsAvailable));
    }

    #[tokio::test]
    async fn test_total_failure_is_an_error() {
        let locations = locations(5);
        let dates = dates();
        let result = aggregator(ScriptedProvider::ok("--"))
            .collect(&locations, &dates)
            .await;
        assert!(matches!(result, Err(IftarError::NoTimingsAvailable)));

        let empty = aggregator(ScriptedProvider::ok("18:05"))
            .collect(&[], &dates)
            .await;
        assert!(matches!(empty, Err(IftarError::NoTimingsAvailable)));
    }

    #[tokio::test]
    async fn test_panicking_country_is_backfilled() {
        let locations = locations(3);
        let dates = dates();
        let table = aggregator(PanickingProvider {
            panics_for: "country-0",
        })
        .collect(&locations, &dates)
        .await
        .unwrap();

        assert_dense(&table, &locations, &dates);
        assert_eq!(table["country-0"].available_count(), 0);
        assert_eq!(table["country-0"].city, "city-0");
        assert_eq!(table["country-1"].available_count(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_at_most_25_countries_in_flight() {
        let provider = Arc::new(TrackingProvider::default());
        let aggregator = IftarAggregator::new(provider.clone(), 25, TimeLocale::Arabic);
        let locations = locations(60);
        let dates = vec![date("2026-02-18"), date("2026-02-19")];

        let table = aggregator.collect(&locations, &dates).await.unwrap();

        assert_dense(&table, &locations, &dates);
        let max = provider.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 25, "max in flight was {max}");
        assert!(max > 1, "lookups never overlapped");
        assert_eq!(provider.calls.lock().unwrap().len(), 120);
    }

    #[tokio::test]
    async fn test_dates_fetched_in_order_within_country() {
        let provider = Arc::new(TrackingProvider::default());
        let aggregator = IftarAggregator::new(provider.clone(), 4, TimeLocale::English);
        let locations = locations(6);
        let dates = dates();

        let table = aggregator.collect(&locations, &dates).await.unwrap();
        assert_eq!(table["country-3"].times["2026-02-20"].as_str(), "5:48 PM");

        let calls = provider.calls.lock().unwrap();
        for location in &locations {
            let order: Vec<NaiveDate> = calls
                .iter()
                .filter(|(name, _)| *name == location.name)
                .map(|(_, d)| *d)
                .collect();
            assert_eq!(order, dates);
        }
    }

    #[tokio::test]
    async fn test_fetch_range_response_shape() {
        let range = DateRange {
            start: date("2026-02-18"),
            end: date("2026-03-19"),
            dates: dates(),
        };
        let times = aggregator(ScriptedProvider::ok("18:05"))
            .fetch_range(&locations(2), &range)
            .await
            .unwrap();

        assert_eq!(times.total_days, 3);
        assert_eq!(times.start_date, "2026-02-18");
        assert_eq!(times.end_date, "2026-03-19");
        assert_eq!(times.dates, vec!["2026-02-18", "2026-02-19", "2026-02-20"]);

        let json = serde_json::to_value(&times).unwrap();
        assert_eq!(json["countries"]["country-0"]["times"]["2026-02-19"], "6:05 م");
        assert_eq!(json["countries"]["country-0"]["city"], "city-0");
    }
}
