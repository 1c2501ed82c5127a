//! Contains the `ObservationTable`, an immutable polars frame of per-city forecast hours.

use crate::types::error::TableError;
use crate::types::observation::*;
use chrono::DateTime;
use polars::prelude::*;

const COL_ROWS: &str = "rows";
const COL_FIRST_HOUR: &str = "first_hour";
const COL_LAST_HOUR: &str = "last_hour";
const COL_DISTINCT_HOURS: &str = "distinct_hours";

/// A validated table of forecast observations, one row per (city, forecast hour).
///
/// The table is built once per ingestion cycle and never mutated. Building it normalizes
/// the column types and checks that every city carries a dense `1..=max_horizon`
/// series of `hours_forecast` values:
///
/// * `hours_forecast`, `clouds_percentage`, `pressure_level`, `humidity_percentage`: `Int64`
/// * `datetime`: `Datetime(Milliseconds)`, timezone-naive UTC
/// * `temp`, `temp_feels_like`, `pop`, `wind_speed_m_s`: `Float64`
/// * `city`, `country`, `weather`, `weather_description`: `String`
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_forecast::{Observation, ObservationTable};
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 28).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let observations: Vec<Observation> = (1..=2)
///     .map(|hour| Observation {
///         city: "Milan".to_string(),
///         country: "IT".to_string(),
///         datetime: start + chrono::Duration::hours(hour - 1),
///         hours_forecast: hour,
///         temp: 7.0 + hour as f64,
///         temp_feels_like: 5.0,
///         weather: "Clouds".to_string(),
///         weather_description: "overcast clouds".to_string(),
///         pop: 0.2,
///         wind_speed_m_s: 2.4,
///         clouds_percentage: 100,
///         pressure_level: 997,
///         humidity_percentage: 94,
///     })
///     .collect();
///
/// let table = ObservationTable::from_observations(&observations).unwrap();
/// assert_eq!(table.max_horizon(), 2);
/// assert_eq!(table.height(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ObservationTable {
    frame: DataFrame,
    max_horizon: u32,
}

impl ObservationTable {
    /// Wraps a frame holding the observation columns.
    ///
    /// Columns are selected in canonical order and cast to the table types; extra columns
    /// are dropped. A `datetime` column read as text must use [`DATETIME_FORMAT`].
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] or [`TableError::Empty`] for malformed input,
    /// [`TableError::NullValues`] if any cell is missing, and [`TableError::NonDenseHorizon`]
    /// or [`TableError::UnevenHorizon`] if the per-city forecast series break the table
    /// invariants.
    pub fn new(frame: DataFrame) -> Result<Self, TableError> {
        for name in OBSERVATION_COLUMNS {
            frame
                .column(name)
                .map_err(|e| TableError::MissingColumn(name.to_string(), e))?;
        }
        if frame.height() == 0 {
            return Err(TableError::Empty);
        }

        let datetime = match frame.column(COL_DATETIME)?.dtype() {
            DataType::String => col(COL_DATETIME).str().to_datetime(
                Some(TimeUnit::Milliseconds),
                None,
                StrptimeOptions {
                    format: Some(DATETIME_FORMAT.into()),
                    ..Default::default()
                },
                lit("raise"),
            ),
            _ => col(COL_DATETIME).cast(DataType::Datetime(TimeUnit::Milliseconds, None)),
        };

        let frame = frame
            .lazy()
            .select([
                col(COL_HOURS_FORECAST).cast(DataType::Int64),
                datetime,
                col(COL_COUNTRY).cast(DataType::String),
                col(COL_CITY).cast(DataType::String),
                col(COL_TEMP).cast(DataType::Float64),
                col(COL_TEMP_FEELS_LIKE).cast(DataType::Float64),
                col(COL_WEATHER).cast(DataType::String),
                col(COL_WEATHER_DESCRIPTION).cast(DataType::String),
                col(COL_POP).cast(DataType::Float64),
                col(COL_WIND_SPEED).cast(DataType::Float64),
                col(COL_CLOUDS).cast(DataType::Int64),
                col(COL_PRESSURE).cast(DataType::Int64),
                col(COL_HUMIDITY).cast(DataType::Int64),
            ])
            .collect()?;

        if let Some(column) = frame.get_columns().iter().find(|c| c.null_count() > 0) {
            return Err(TableError::NullValues(column.name().to_string()));
        }

        let max_horizon = check_city_series(&frame)?;
        Ok(Self { frame, max_horizon })
    }

    /// Builds a table from typed observation records.
    pub fn from_observations(observations: &[Observation]) -> Result<Self, TableError> {
        let datetimes = DatetimeChunked::from_naive_datetime(
            COL_DATETIME.into(),
            observations.iter().map(|o| o.datetime),
            TimeUnit::Milliseconds,
        );

        let columns = vec![
            Column::new(
                COL_HOURS_FORECAST.into(),
                observations.iter().map(|o| o.hours_forecast).collect::<Vec<i64>>(),
            ),
            Column::from(datetimes.into_series()),
            Column::new(
                COL_COUNTRY.into(),
                observations.iter().map(|o| o.country.as_str()).collect::<Vec<&str>>(),
            ),
            Column::new(
                COL_CITY.into(),
                observations.iter().map(|o| o.city.as_str()).collect::<Vec<&str>>(),
            ),
            Column::new(
                COL_TEMP.into(),
                observations.iter().map(|o| o.temp).collect::<Vec<f64>>(),
            ),
            Column::new(
                COL_TEMP_FEELS_LIKE.into(),
                observations.iter().map(|o| o.temp_feels_like).collect::<Vec<f64>>(),
            ),
            Column::new(
                COL_WEATHER.into(),
                observations.iter().map(|o| o.weather.as_str()).collect::<Vec<&str>>(),
            ),
            Column::new(
                COL_WEATHER_DESCRIPTION.into(),
                observations
                    .iter()
                    .map(|o| o.weather_description.as_str())
                    .collect::<Vec<&str>>(),
            ),
            Column::new(
                COL_POP.into(),
                observations.iter().map(|o| o.pop).collect::<Vec<f64>>(),
            ),
            Column::new(
                COL_WIND_SPEED.into(),
                observations.iter().map(|o| o.wind_speed_m_s).collect::<Vec<f64>>(),
            ),
            Column::new(
                COL_CLOUDS.into(),
                observations.iter().map(|o| o.clouds_percentage).collect::<Vec<i64>>(),
            ),
            Column::new(
                COL_PRESSURE.into(),
                observations.iter().map(|o| o.pressure_level).collect::<Vec<i64>>(),
            ),
            Column::new(
                COL_HUMIDITY.into(),
                observations.iter().map(|o| o.humidity_percentage).collect::<Vec<i64>>(),
            ),
        ];

        Self::new(DataFrame::new(columns)?)
    }

    /// The largest `hours_forecast` in the table, shared by every city series.
    pub fn max_horizon(&self) -> u32 {
        self.max_horizon
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// The underlying frame in canonical column order.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// A lazy view over the whole table.
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// Collects the table back into typed records, in table order.
    pub fn to_observations(&self) -> Result<Vec<Observation>, TableError> {
        let df = &self.frame;
        let hours = df.column(COL_HOURS_FORECAST)?.i64()?;
        let datetimes = df.column(COL_DATETIME)?.datetime()?;
        let countries = df.column(COL_COUNTRY)?.str()?;
        let cities = df.column(COL_CITY)?.str()?;
        let temps = df.column(COL_TEMP)?.f64()?;
        let feels_like = df.column(COL_TEMP_FEELS_LIKE)?.f64()?;
        let weather = df.column(COL_WEATHER)?.str()?;
        let descriptions = df.column(COL_WEATHER_DESCRIPTION)?.str()?;
        let pop = df.column(COL_POP)?.f64()?;
        let wind = df.column(COL_WIND_SPEED)?.f64()?;
        let clouds = df.column(COL_CLOUDS)?.i64()?;
        let pressure = df.column(COL_PRESSURE)?.i64()?;
        let humidity = df.column(COL_HUMIDITY)?.i64()?;

        fn required<T>(value: Option<T>, column: &str) -> Result<T, TableError> {
            value.ok_or_else(|| TableError::NullValues(column.to_string()))
        }

        (0..df.height())
            .map(|idx| {
                let millis = required(datetimes.get(idx), COL_DATETIME)?;
                let datetime = required(DateTime::from_timestamp_millis(millis), COL_DATETIME)?
                    .naive_utc();
                Ok(Observation {
                    city: required(cities.get(idx), COL_CITY)?.to_string(),
                    country: required(countries.get(idx), COL_COUNTRY)?.to_string(),
                    datetime,
                    hours_forecast: required(hours.get(idx), COL_HOURS_FORECAST)?,
                    temp: required(temps.get(idx), COL_TEMP)?,
                    temp_feels_like: required(feels_like.get(idx), COL_TEMP_FEELS_LIKE)?,
                    weather: required(weather.get(idx), COL_WEATHER)?.to_string(),
                    weather_description: required(descriptions.get(idx), COL_WEATHER_DESCRIPTION)?
                        .to_string(),
                    pop: required(pop.get(idx), COL_POP)?,
                    wind_speed_m_s: required(wind.get(idx), COL_WIND_SPEED)?,
                    clouds_percentage: required(clouds.get(idx), COL_CLOUDS)?,
                    pressure_level: required(pressure.get(idx), COL_PRESSURE)?,
                    humidity_percentage: required(humidity.get(idx), COL_HUMIDITY)?,
                })
            })
            .collect()
    }
}

/// Checks that every city holds a dense `1..=H` series with the same `H`, and returns `H`.
fn check_city_series(frame: &DataFrame) -> Result<u32, TableError> {
    let summary = frame
        .clone()
        .lazy()
        .group_by([col(COL_CITY)])
        .agg([
            len().cast(DataType::Int64).alias(COL_ROWS),
            col(COL_HOURS_FORECAST).min().alias(COL_FIRST_HOUR),
            col(COL_HOURS_FORECAST).max().alias(COL_LAST_HOUR),
            col(COL_HOURS_FORECAST)
                .n_unique()
                .cast(DataType::Int64)
                .alias(COL_DISTINCT_HOURS),
        ])
        .sort_by_exprs([col(COL_CITY)], SortMultipleOptions::default())
        .collect()?;

    let cities = summary.column(COL_CITY)?.str()?;
    let rows = summary.column(COL_ROWS)?.i64()?;
    let first_hours = summary.column(COL_FIRST_HOUR)?.i64()?;
    let last_hours = summary.column(COL_LAST_HOUR)?.i64()?;
    let distinct_hours = summary.column(COL_DISTINCT_HOURS)?.i64()?;

    let series: Vec<(String, i64, i64, i64, i64)> = (0..summary.height())
        .map(|idx| {
            (
                cities.get(idx).unwrap_or_default().to_string(),
                rows.get(idx).unwrap_or(0),
                first_hours.get(idx).unwrap_or(0),
                last_hours.get(idx).unwrap_or(0),
                distinct_hours.get(idx).unwrap_or(0),
            )
        })
        .collect();

    // Every series must be dense before lengths are compared; a gap inflates the maximum.
    for (city, rows, first_hour, last_hour, distinct_hours) in &series {
        if *first_hour != 1 || last_hour != rows || distinct_hours != rows {
            return Err(TableError::NonDenseHorizon {
                city: city.clone(),
                rows: *rows,
                first_hour: *first_hour,
                last_hour: *last_hour,
                distinct_hours: *distinct_hours,
            });
        }
    }

    let max_horizon = last_hours.max().unwrap_or(0);
    if let Some((city, rows, ..)) = series.iter().find(|(_, rows, ..)| *rows != max_horizon) {
        return Err(TableError::UnevenHorizon {
            city: city.clone(),
            rows: *rows,
            max_horizon,
        });
    }

    // Dense from 1, so the horizon is bounded by the frame height.
    Ok(max_horizon as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{observation, sample_observations, sample_table};

    #[test]
    fn test_sample_table_shape() -> Result<(), TableError> {
        let table = sample_table();

        assert_eq!(table.height(), 9);
        assert_eq!(table.max_horizon(), 3);
        assert_eq!(table.frame().get_column_names(), OBSERVATION_COLUMNS);

        let dt_col = table.frame().column(COL_DATETIME)?;
        assert!(matches!(
            dt_col.dtype(),
            DataType::Datetime(TimeUnit::Milliseconds, None)
        ));
        Ok(())
    }

    #[test]
    fn test_to_observations_preserves_rows() -> Result<(), TableError> {
        let observations = sample_observations();
        let table = ObservationTable::from_observations(&observations)?;

        assert_eq!(table.to_observations()?, observations);
        Ok(())
    }

    #[test]
    fn test_string_datetimes_are_parsed() -> Result<(), TableError> {
        let table = sample_table();
        let mut frame = table.frame().clone();
        let as_text = Column::new(
            COL_DATETIME.into(),
            sample_observations()
                .iter()
                .map(|o| o.datetime.format(DATETIME_FORMAT).to_string())
                .collect::<Vec<String>>(),
        );
        frame.with_column(as_text)?;

        let reparsed = ObservationTable::new(frame)?;
        assert_eq!(reparsed.to_observations()?, table.to_observations()?);
        Ok(())
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let result = ObservationTable::from_observations(&[]);
        assert!(matches!(result, Err(TableError::Empty)));
    }

    #[test]
    fn test_missing_column_is_rejected() -> Result<(), PolarsError> {
        let frame = sample_table().frame().drop(COL_WIND_SPEED)?;

        let result = ObservationTable::new(frame);
        assert!(matches!(
            result,
            Err(TableError::MissingColumn(ref name, _)) if name == COL_WIND_SPEED
        ));
        Ok(())
    }

    #[test]
    fn test_gap_in_series_is_rejected() {
        let mut observations = sample_observations();
        // Milan: 1, 2, 4
        observations[2].hours_forecast = 4;

        let result = ObservationTable::from_observations(&observations);
        assert!(matches!(
            result,
            Err(TableError::NonDenseHorizon {
                ref city,
                rows: 3,
                first_hour: 1,
                last_hour: 4,
                distinct_hours: 3,
            }) if city == "Milan"
        ));
    }

    #[test]
    fn test_gap_is_reported_before_uneven_lengths() {
        let mut observations = sample_observations();
        // Cagliari: 1, 2, 5. Bologna and Milan stay 1..=3 but fall short of the inflated max.
        observations[8].hours_forecast = 5;

        let result = ObservationTable::from_observations(&observations);
        assert!(matches!(
            result,
            Err(TableError::NonDenseHorizon { ref city, .. }) if city == "Cagliari"
        ));
    }

    #[test]
    fn test_null_cell_is_rejected() -> Result<(), PolarsError> {
        let mut frame = sample_table().frame().clone();
        let temps: Vec<Option<f64>> = (0..frame.height())
            .map(|idx| if idx == 4 { None } else { Some(7.0) })
            .collect();
        frame.with_column(Column::new(COL_TEMP.into(), temps))?;

        let result = ObservationTable::new(frame);
        assert!(matches!(
            result,
            Err(TableError::NullValues(ref name)) if name == COL_TEMP
        ));
        Ok(())
    }

    #[test]
    fn test_duplicate_hour_is_rejected() {
        let mut observations = sample_observations();
        observations[1].hours_forecast = 1;

        let result = ObservationTable::from_observations(&observations);
        assert!(matches!(result, Err(TableError::NonDenseHorizon { .. })));
    }

    #[test]
    fn test_uneven_series_is_rejected() {
        let mut observations = sample_observations();
        observations.push(observation("Milan", 4, 7.50, "Clouds", "overcast clouds", 2.0));

        let result = ObservationTable::from_observations(&observations);
        assert!(matches!(
            result,
            Err(TableError::UnevenHorizon { rows: 3, max_horizon: 4, .. })
        ));
    }
}
