//! Fetches the configured cities from OpenWeather and prints the six forecast reports.
//!
//! Usage: `cargo run --example report -- path/to/config.toml`

use polars::prelude::DataFrame;
use std::env;
use weather_forecast::{ForecastConfig, ForecastError, QueryError, WeatherForecast};

const HOURS_FORECAST: u32 = 24;

#[tokio::main]
async fn main() -> Result<(), ForecastError> {
    env_logger::init();
    configure_polars_display();
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = ForecastConfig::from_file(&config_path)?;
    let mut forecast = WeatherForecast::builder().config(config).build();
    forecast.ingest().await?;

    print_report(
        "Distinct weather conditions",
        forecast.get_distinct_weather().hours_forecast(HOURS_FORECAST).call(),
    )?;
    print_report(
        "Most common weather conditions",
        forecast.get_most_common_weather().hours_forecast(HOURS_FORECAST).call(),
    )?;
    print_report(
        "Average temperature",
        forecast.get_average_temp().hours_forecast(HOURS_FORECAST).call(),
    )?;
    print_report(
        "Highest temperature",
        forecast.get_highest_temp_city().hours_forecast(HOURS_FORECAST).call(),
    )?;
    print_report(
        "Highest temperature variation",
        forecast
            .get_highest_temp_variation_city()
            .hours_forecast(HOURS_FORECAST)
            .call(),
    )?;
    print_report(
        "Strongest wind",
        forecast.get_strongest_wind_city().hours_forecast(HOURS_FORECAST).call(),
    )?;

    Ok(())
}

fn print_report(title: &str, report: Result<DataFrame, QueryError>) -> Result<(), ForecastError> {
    println!("\n--- {} (next {} hours) ---", title, HOURS_FORECAST);
    println!("{}", report?);
    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "50");
}
