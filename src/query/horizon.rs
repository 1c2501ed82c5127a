//! Gatekeeping for the forecast horizon passed to every aggregation query.

use crate::query::error::HorizonError;

/// Checks that `hours_forecast` lies in `[1, max_horizon]` and returns it.
///
/// # Examples
///
/// ```
/// use weather_forecast::{validate_horizon, HorizonError};
///
/// assert_eq!(validate_horizon(24, 48), Ok(24));
/// assert_eq!(
///     validate_horizon(0, 48),
///     Err(HorizonError::OutOfRange { requested: 0, max_horizon: 48 })
/// );
/// ```
pub fn validate_horizon(hours_forecast: u32, max_horizon: u32) -> Result<u32, HorizonError> {
    if (1..=max_horizon).contains(&hours_forecast) {
        Ok(hours_forecast)
    } else {
        Err(HorizonError::OutOfRange {
            requested: hours_forecast,
            max_horizon,
        })
    }
}

/// Resolves an optional horizon, defaulting to the full table, then validates it.
pub fn resolve_horizon(hours_forecast: Option<u32>, max_horizon: u32) -> Result<u32, HorizonError> {
    validate_horizon(hours_forecast.unwrap_or(max_horizon), max_horizon)
}
