use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weather_forecast::{
    ExtremumScope, ForecastConfig, Observation, ObservationTable, WeatherForecast,
};

const CITIES: usize = 50;
const HOURS: i64 = 48;

fn synthetic_table() -> ObservationTable {
    let start = NaiveDate::from_ymd_opt(2024, 3, 28)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let conditions = [
        ("Clear", "clear sky"),
        ("Clouds", "overcast clouds"),
        ("Rain", "light rain"),
    ];

    let mut observations = Vec::with_capacity(CITIES * HOURS as usize);
    for city_idx in 0..CITIES {
        for hour in 1..=HOURS {
            let (weather, description) = conditions[(city_idx + hour as usize) % conditions.len()];
            let temp = 5.0 + (city_idx as f64) * 0.1 + ((hour % 24) as f64) * 0.4;
            observations.push(Observation {
                city: format!("City{:02}", city_idx),
                country: "IT".to_string(),
                datetime: start + Duration::hours(hour - 1),
                hours_forecast: hour,
                temp,
                temp_feels_like: temp - 1.2,
                weather: weather.to_string(),
                weather_description: description.to_string(),
                pop: 0.2,
                wind_speed_m_s: 1.0 + ((city_idx as i64 * 7 + hour) % 13) as f64 * 0.3,
                clouds_percentage: 40,
                pressure_level: 1005,
                humidity_percentage: 70,
            });
        }
    }
    ObservationTable::from_observations(&observations).unwrap()
}

fn bench_forecast_queries(c: &mut Criterion) {
    let session = WeatherForecast::with_table(ForecastConfig::default(), synthetic_table());

    c.bench_function("get_distinct_weather", |b| {
        b.iter(|| session.get_distinct_weather().hours_forecast(black_box(24)).call())
    });
    c.bench_function("get_most_common_weather", |b| {
        b.iter(|| session.get_most_common_weather().hours_forecast(black_box(24)).call())
    });
    c.bench_function("get_average_temp", |b| {
        b.iter(|| session.get_average_temp().hours_forecast(black_box(24)).call())
    });
    c.bench_function("get_highest_temp_city", |b| {
        b.iter(|| session.get_highest_temp_city().hours_forecast(black_box(24)).call())
    });
    c.bench_function("get_highest_temp_city_per_city", |b| {
        b.iter(|| {
            session
                .get_highest_temp_city()
                .hours_forecast(black_box(24))
                .scope(ExtremumScope::PerCity)
                .call()
        })
    });
    c.bench_function("get_highest_temp_variation_city", |b| {
        b.iter(|| {
            session
                .get_highest_temp_variation_city()
                .hours_forecast(black_box(24))
                .call()
        })
    });
    c.bench_function("get_strongest_wind_city", |b| {
        b.iter(|| session.get_strongest_wind_city().hours_forecast(black_box(24)).call())
    });
}

criterion_group!(benches, bench_forecast_queries);
criterion_main!(benches);
