//! Structured events emitted by a [`crate::WeatherForecast`] session, and the observers
//! that receive them.

use log::{error, info};
use std::fmt;

/// Something that happened while querying or ingesting forecast data.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastEvent {
    QueryStarted {
        operation: &'static str,
        hours_forecast: Option<u32>,
    },
    QueryCompleted {
        operation: &'static str,
        hours_forecast: u32,
        rows: usize,
    },
    QueryFailed {
        operation: &'static str,
        message: String,
    },
    IngestStarted {
        locations: usize,
    },
    LocationFetched {
        city: String,
        country: String,
        hours: usize,
    },
    IngestCompleted {
        rows: usize,
        max_horizon: u32,
    },
    TableReplaced {
        rows: usize,
        max_horizon: u32,
    },
}

impl fmt::Display for ForecastEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastEvent::QueryStarted {
                operation,
                hours_forecast: Some(hours),
            } => write!(f, "Calling {} with hours forecast {}", operation, hours),
            ForecastEvent::QueryStarted {
                operation,
                hours_forecast: None,
            } => write!(f, "Calling {} over the full horizon", operation),
            ForecastEvent::QueryCompleted {
                operation,
                hours_forecast,
                rows,
            } => write!(
                f,
                "{} returned {} rows for {} hours",
                operation, rows, hours_forecast
            ),
            ForecastEvent::QueryFailed { operation, message } => {
                write!(f, "Error occurred in {}: {}", operation, message)
            }
            ForecastEvent::IngestStarted { locations } => {
                write!(f, "Ingesting forecasts for {} locations", locations)
            }
            ForecastEvent::LocationFetched {
                city,
                country,
                hours,
            } => write!(f, "Fetched {} forecast hours for {},{}", hours, city, country),
            ForecastEvent::IngestCompleted { rows, max_horizon } => write!(
                f,
                "Loaded {} observations with a {} hour horizon",
                rows, max_horizon
            ),
            ForecastEvent::TableReplaced { rows, max_horizon } => write!(
                f,
                "Replaced table with {} observations over a {} hour horizon",
                rows, max_horizon
            ),
        }
    }
}

/// Receives the events of a session. Implementations must be cheap; they run inline.
pub trait ForecastObserver: Send + Sync {
    fn on_event(&self, event: &ForecastEvent);
}

/// Forwards events to the `log` facade. Failures log at `error`, everything else at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ForecastObserver for LogObserver {
    fn on_event(&self, event: &ForecastEvent) {
        match event {
            ForecastEvent::QueryFailed { .. } => error!("{}", event),
            _ => info!("{}", event),
        }
    }
}
