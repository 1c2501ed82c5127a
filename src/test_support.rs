//! Fixtures shared by the unit tests: three Italian cities over a three-hour horizon.

use crate::types::observation::Observation;
use crate::types::observation_table::ObservationTable;
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub fn forecast_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 28)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

pub fn observation(
    city: &str,
    hour: i64,
    temp: f64,
    weather: &str,
    description: &str,
    wind_speed_m_s: f64,
) -> Observation {
    Observation {
        city: city.to_string(),
        country: "IT".to_string(),
        datetime: forecast_start() + Duration::hours(hour - 1),
        hours_forecast: hour,
        temp,
        temp_feels_like: temp - 1.5,
        weather: weather.to_string(),
        weather_description: description.to_string(),
        pop: if hour == 1 { 1.0 } else { 0.8 },
        wind_speed_m_s,
        clouds_percentage: 100,
        pressure_level: if hour == 3 { 998 } else { 997 },
        humidity_percentage: if hour == 3 { 93 } else { 94 },
    }
}

/// Milan, Bologna and Cagliari, hours 1..=3.
pub fn sample_observations() -> Vec<Observation> {
    vec![
        observation("Milan", 1, 7.36, "Rain", "light rain", 2.79),
        observation("Milan", 2, 7.36, "Clouds", "overcast clouds", 2.41),
        observation("Milan", 3, 7.43, "Clouds", "overcast clouds", 1.45),
        observation("Bologna", 1, 8.36, "Rain", "light rain", 3.79),
        observation("Bologna", 2, 7.36, "Rain", "light rain", 2.41),
        observation("Bologna", 3, 7.43, "Rain", "light rain", 1.45),
        observation("Cagliari", 1, 10.36, "Clouds", "overcast clouds", 3.79),
        observation("Cagliari", 2, 7.36, "Clouds", "overcast clouds", 2.41),
        observation("Cagliari", 3, 7.43, "Clouds", "overcast clouds", 1.45),
    ]
}

pub fn sample_table() -> ObservationTable {
    ObservationTable::from_observations(&sample_observations()).unwrap()
}

/// Milliseconds since the epoch, as stored in the `datetime` column.
pub fn millis(datetime: NaiveDateTime) -> i64 {
    datetime.and_utc().timestamp_millis()
}

pub const GEOCODE_MILAN: &str = r#"[
    {"name": "Milan", "lat": 45.4641943, "lon": 9.1896346, "country": "IT", "state": "Lombardy"}
]"#;

/// A One Call response with three hourly entries starting 2024-03-28 10:00 UTC.
pub const ONECALL_THREE_HOURS: &str = r#"{
    "lat": 45.4642,
    "lon": 9.1896,
    "timezone": "Europe/Rome",
    "hourly": [
        {"dt": 1711620000, "temp": 7.36, "feels_like": 5.48, "pressure": 997, "humidity": 94,
         "clouds": 100, "wind_speed": 2.79, "pop": 1,
         "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}]},
        {"dt": 1711623600, "temp": 7.36, "feels_like": 5.77, "pressure": 997, "humidity": 94,
         "clouds": 100, "wind_speed": 2.41, "pop": 0.8,
         "weather": [{"id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d"}]},
        {"dt": 1711627200, "temp": 7.43, "feels_like": 6.78, "pressure": 998, "humidity": 93,
         "clouds": 100, "wind_speed": 1.45,
         "weather": []}
    ]
}"#;

/// A fixed response served for every request whose path starts with `path`.
pub struct CannedRoute {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

impl CannedRoute {
    pub fn new(path: &'static str, status: u16, body: &str) -> Self {
        Self {
            path,
            status,
            body: body.to_string(),
        }
    }
}

/// Serves `routes` over plain HTTP on a loopback port and returns the base URL.
/// Unmatched paths get a 404.
pub async fn serve_canned(routes: Vec<CannedRoute>) -> std::io::Result<String> {
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            request.extend_from_slice(&chunk[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = routes
                    .iter()
                    .find(|route| path.starts_with(route.path))
                    .map(|route| (route.status, route.body.clone()))
                    .unwrap_or((404, "{}".to_string()));

                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    Ok(format!("http://{}", addr))
}
