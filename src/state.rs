//! Application state shared by all handlers

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::Result;
use crate::config::AppConfig;
use crate::generation::{
    GenerationService, GenerationStore, MySqlGenerationStore, PlaceholderImageGenerator,
};
use crate::models::Location;
use crate::models::location::featured_countries;
use crate::prayer_times::{AladhanClient, IftarAggregator};
use crate::season::{DateRange, SeasonCalendar};

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: IftarAggregator,
    pub generation: GenerationService,
    pub seasons: Arc<SeasonCalendar>,
    pub countries: Arc<[Location]>,
    pub max_days: usize,
    timezone: Tz,
    fixed_today: Option<NaiveDate>,
}

impl AppState {
    #[must_use]
    pub fn new(
        aggregator: IftarAggregator,
        generation: GenerationService,
        seasons: SeasonCalendar,
        max_days: usize,
        timezone: Tz,
    ) -> Self {
        Self {
            aggregator,
            generation,
            seasons: Arc::new(seasons),
            countries: featured_countries().into(),
            max_days,
            timezone,
            fixed_today: None,
        }
    }

    /// Build the production state: Aladhan client, placeholder images, MySQL when configured
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let prayer = &config.prayer_times;

        let client = AladhanClient::new(prayer)?;
        let aggregator =
            IftarAggregator::new(Arc::new(client), prayer.max_concurrency, prayer.locale);

        let store: Option<Arc<dyn GenerationStore>> = match &config.database.url {
            Some(url) => {
                let store =
                    MySqlGenerationStore::connect_lazy(url, config.database.max_connections)?;
                if let Err(e) = store.ensure_schema().await {
                    warn!(error = %e, "Database unavailable at startup, generations may not be saved");
                }
                Some(Arc::new(store) as Arc<dyn GenerationStore>)
            }
            None => {
                info!("No database configured, generations will not be saved");
                None
            }
        };

        let generation = GenerationService::new(
            Arc::new(PlaceholderImageGenerator::new(
                config.generation.placeholder_url.clone(),
            )),
            store,
            config.generation.max_prompt_length,
        );

        Ok(Self::new(
            aggregator,
            generation,
            SeasonCalendar::with_overrides(prayer.season_windows()),
            prayer.max_days,
            prayer.tz()?,
        ))
    }

    /// Pin "today" instead of reading the clock
    #[must_use]
    pub fn with_fixed_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    /// Replace the served countries
    #[must_use]
    pub fn with_countries(mut self, countries: Vec<Location>) -> Self {
        self.countries = countries.into();
        self
    }

    /// Current date in the configured timezone
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Utc::now().with_timezone(&self.timezone).date_naive())
    }

    /// Date range served for today
    pub fn date_range(&self) -> Result<DateRange> {
        self.seasons.resolve(self.today(), self.max_days)
    }
}
