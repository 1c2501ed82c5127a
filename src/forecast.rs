//! The query session: holds the current observation table and answers the six forecast
//! reports against it.

use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::ingest::csv_store::{read_observations, write_observations};
use crate::ingest::openweather::OpenWeatherClient;
use crate::observer::{ForecastEvent, ForecastObserver, LogObserver};
use crate::query::aggregations::{ExtremumScope, ForecastQueryExt};
use crate::query::error::QueryError;
use crate::query::horizon::resolve_horizon;
use crate::types::observation_table::ObservationTable;
use bon::bon;
use polars::prelude::{DataFrame, LazyFrame};
use std::path::Path;
use std::sync::Arc;

/// A forecast session over one observation table.
///
/// Building a session does no I/O. Data arrives through [`WeatherForecast::ingest`],
/// [`WeatherForecast::load_csv`] or [`WeatherForecast::with_table`]; each replaces the whole
/// table at once, so a query always sees one consistent snapshot.
///
/// Every query is a builder: the horizon is set with `.hours_forecast(h)` and defaults to the
/// table's maximum horizon when omitted.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_forecast::{ForecastConfig, Observation, ObservationTable, WeatherForecast};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let start = NaiveDate::from_ymd_opt(2024, 3, 28).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let rows: Vec<Observation> = [(1, 7.36), (2, 7.43)]
///     .into_iter()
///     .map(|(hour, temp)| Observation {
///         city: "Milan".to_string(),
///         country: "IT".to_string(),
///         datetime: start + chrono::Duration::hours(hour - 1),
///         hours_forecast: hour,
///         temp,
///         temp_feels_like: temp,
///         weather: "Clouds".to_string(),
///         weather_description: "overcast clouds".to_string(),
///         pop: 0.0,
///         wind_speed_m_s: 1.5,
///         clouds_percentage: 100,
///         pressure_level: 997,
///         humidity_percentage: 94,
///     })
///     .collect();
///
/// let session = WeatherForecast::with_table(
///     ForecastConfig::default(),
///     ObservationTable::from_observations(&rows)?,
/// );
/// let averages = session.get_average_temp().hours_forecast(2).call()?;
/// assert_eq!(averages.height(), 1);
///
/// // Outside [1, max_horizon]
/// assert!(session.get_average_temp().hours_forecast(3).call().is_err());
/// # Ok(())
/// # }
/// ```
pub struct WeatherForecast {
    config: ForecastConfig,
    table: Option<Arc<ObservationTable>>,
    observer: Arc<dyn ForecastObserver>,
}

#[bon]
impl WeatherForecast {
    /// Creates an empty session. Events go to `observer`, or to [`LogObserver`] if unset.
    #[builder]
    pub fn new(config: ForecastConfig, observer: Option<Arc<dyn ForecastObserver>>) -> Self {
        Self {
            config,
            table: None,
            observer: observer.unwrap_or_else(|| Arc::new(LogObserver)),
        }
    }

    /// Creates a session that already holds `table`.
    pub fn with_table(config: ForecastConfig, table: ObservationTable) -> Self {
        let mut session = Self::builder().config(config).build();
        session.replace_table(table);
        session
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// The current snapshot, if any data has been loaded.
    pub fn table(&self) -> Option<Arc<ObservationTable>> {
        self.table.clone()
    }

    pub fn max_horizon(&self) -> Option<u32> {
        self.table.as_ref().map(|table| table.max_horizon())
    }

    /// Swaps in a new table. Queries already holding the old snapshot are unaffected.
    pub fn replace_table(&mut self, table: ObservationTable) {
        self.observer.on_event(&ForecastEvent::TableReplaced {
            rows: table.height(),
            max_horizon: table.max_horizon(),
        });
        self.table = Some(Arc::new(table));
    }

    /// Fetches every configured location, writes the observations to the configured CSV and
    /// loads that file as the new table.
    ///
    /// Locations are fetched one after the other. The current table is kept if any step fails.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Ingest`] for network, API or file failures,
    /// [`ForecastError::Table`] if the fetched series are inconsistent (or no location is
    /// configured), and [`ForecastError::Config`] if the CSV path cannot be resolved.
    pub async fn ingest(&mut self) -> Result<(), ForecastError> {
        let client = OpenWeatherClient::new(&self.config);
        self.observer.on_event(&ForecastEvent::IngestStarted {
            locations: self.config.locations.len(),
        });

        let mut observations = Vec::new();
        for location in &self.config.locations {
            let fetched = client.fetch_observations(location).await?;
            self.observer.on_event(&ForecastEvent::LocationFetched {
                city: location.city.clone(),
                country: location.country.clone(),
                hours: fetched.len(),
            });
            observations.extend(fetched);
        }

        let table = ObservationTable::from_observations(&observations)?;
        let path = self.config.weather_data_csv()?;
        write_observations(&path, &table).await?;
        self.load_csv(&path).await
    }

    /// Loads a previously written observation CSV as the new table.
    pub async fn load_csv(&mut self, path: impl AsRef<Path>) -> Result<(), ForecastError> {
        let table = read_observations(path.as_ref()).await?;
        self.observer.on_event(&ForecastEvent::IngestCompleted {
            rows: table.height(),
            max_horizon: table.max_horizon(),
        });
        self.table = Some(Arc::new(table));
        Ok(())
    }

    /// Share of the horizon each city spends in each weather condition.
    ///
    /// Columns: `city, weather, weather_description, percentage`.
    #[builder]
    pub fn get_distinct_weather(
        &self,
        hours_forecast: Option<u32>,
    ) -> Result<DataFrame, QueryError> {
        self.run_query("get_distinct_weather", hours_forecast, |frame, hours| {
            frame.distinct_weather(hours)
        })
    }

    /// Each city's most frequent weather condition(s).
    ///
    /// Columns: `city, weather, weather_description`.
    #[builder]
    pub fn get_most_common_weather(
        &self,
        hours_forecast: Option<u32>,
    ) -> Result<DataFrame, QueryError> {
        self.run_query("get_most_common_weather", hours_forecast, |frame, hours| {
            frame.most_common_weather(hours)
        })
    }

    /// Columns: `city, average_temp`.
    #[builder]
    pub fn get_average_temp(&self, hours_forecast: Option<u32>) -> Result<DataFrame, QueryError> {
        self.run_query("get_average_temp", hours_forecast, |frame, hours| {
            frame.average_temp(hours)
        })
    }

    /// The hour(s) with the highest temperature.
    ///
    /// Columns: `datetime, city, highest_temp`. With the default [`ExtremumScope::Global`]
    /// only the rows holding the overall maximum are returned.
    #[builder]
    pub fn get_highest_temp_city(
        &self,
        hours_forecast: Option<u32>,
        #[builder(default)] scope: ExtremumScope,
    ) -> Result<DataFrame, QueryError> {
        self.run_query("get_highest_temp_city", hours_forecast, |frame, hours| {
            frame.highest_temp(hours, scope)
        })
    }

    /// Columns: `city, max_temp, min_temp, highest_temp_variation`.
    #[builder]
    pub fn get_highest_temp_variation_city(
        &self,
        hours_forecast: Option<u32>,
    ) -> Result<DataFrame, QueryError> {
        self.run_query(
            "get_highest_temp_variation_city",
            hours_forecast,
            |frame, hours| frame.highest_temp_variation(hours),
        )
    }

    /// The hour(s) with the strongest wind.
    ///
    /// Columns: `datetime, city, wind_speed_m_s`. Scope works as in
    /// [`WeatherForecast::get_highest_temp_city`].
    #[builder]
    pub fn get_strongest_wind_city(
        &self,
        hours_forecast: Option<u32>,
        #[builder(default)] scope: ExtremumScope,
    ) -> Result<DataFrame, QueryError> {
        self.run_query("get_strongest_wind_city", hours_forecast, |frame, hours| {
            frame.strongest_wind(hours, scope)
        })
    }

    fn run_query(
        &self,
        operation: &'static str,
        hours_forecast: Option<u32>,
        pipeline: impl FnOnce(LazyFrame, u32) -> LazyFrame,
    ) -> Result<DataFrame, QueryError> {
        self.observer.on_event(&ForecastEvent::QueryStarted {
            operation,
            hours_forecast,
        });

        let result = self
            .table
            .clone()
            .ok_or(QueryError::NotIngested)
            .and_then(|table| {
                let hours = resolve_horizon(hours_forecast, table.max_horizon())?;
                let frame = pipeline(table.lazy(), hours)
                    .collect()
                    .map_err(|source| QueryError::Execution { operation, source })?;
                Ok((hours, frame))
            });

        match result {
            Ok((hours, frame)) => {
                self.observer.on_event(&ForecastEvent::QueryCompleted {
                    operation,
                    hours_forecast: hours,
                    rows: frame.height(),
                });
                Ok(frame)
            }
            Err(e) => {
                self.observer.on_event(&ForecastEvent::QueryFailed {
                    operation,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
