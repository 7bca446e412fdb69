//! OpenWeatherMap current-weather client

use super::{capitalize, WeatherError, WeatherFetcher, WeatherReport};
use crate::config::WeatherConfig;
use serde::Deserialize;
use std::io;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    main: ApiMain,
    wind: ApiWind,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    /// Kelvin
    temp: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
}

/// Parse a current-weather JSON document
///
/// `city` is used when the document carries no name of its own.
pub fn parse_report(city: &str, body: &str) -> Result<WeatherReport, WeatherError> {
    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;

    let description = response
        .weather
        .first()
        .map(|w| capitalize(&w.description))
        .unwrap_or_default();

    Ok(WeatherReport {
        city: response
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| city.to_string()),
        temperature_c: WeatherReport::celsius_from_kelvin(response.main.temp),
        wind_speed: response.wind.speed,
        pressure_hpa: response.main.pressure,
        humidity: response.main.humidity,
        description,
    })
}

/// Whether a transport failure was caused by a socket timeout
fn is_timeout(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some_and(|e| matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock))
}

/// Map a ureq failure to the message shown to the user
fn classify(error: ureq::Error) -> WeatherError {
    match error {
        ureq::Error::Status(status, _) => WeatherError::from_status(status),
        ureq::Error::Transport(transport) => match transport.kind() {
            ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => WeatherError::Connection,
            ureq::ErrorKind::TooManyRedirects => WeatherError::TooManyRedirects,
            ureq::ErrorKind::Io if is_timeout(&transport) => WeatherError::Timeout,
            _ => WeatherError::Request(transport.to_string()),
        },
    }
}

/// Blocking HTTP client for the current-weather endpoint
pub struct OpenWeatherClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    /// Create a client from the weather settings
    pub fn new(config: &WeatherConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent(concat!("weather-kiosk/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            endpoint: config.endpoint.clone(),
            api_key: config.resolved_api_key(),
        }
    }
}

impl WeatherFetcher for OpenWeatherClient {
    fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let response = self
            .agent
            .get(&self.endpoint)
            .query("q", city)
            .query("appid", api_key)
            .call()
            .map_err(classify)?;

        let body = response.into_string().map_err(|e| {
            if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
                WeatherError::Timeout
            } else {
                WeatherError::Request(e.to_string())
            }
        })?;

        parse_report(city, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    const OSLO: &str = r#"{
        "coord": {"lon": 10.75, "lat": 59.91},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 280.0, "feels_like": 277.1, "pressure": 1012, "humidity": 81},
        "wind": {"speed": 3.6, "deg": 200},
        "name": "Oslo",
        "cod": 200
    }"#;

    fn client(endpoint: String, api_key: Option<&str>) -> OpenWeatherClient {
        OpenWeatherClient {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(1))
                .build(),
            endpoint,
            api_key: api_key.map(str::to_string),
        }
    }

    fn client_for(server: &MockServer, api_key: Option<&str>) -> OpenWeatherClient {
        client(server.url("/data/2.5/weather"), api_key)
    }

    #[test]
    fn test_parse_report() {
        let report = parse_report("Oslo", OSLO).unwrap();
        assert_eq!(report.city, "Oslo");
        assert_eq!(report.description, "Light rain");
        assert_eq!(report.temperature_text(), "6.85°C");
        assert_eq!(report.pressure_hpa, 1012.0);
        assert_eq!(report.humidity, 81.0);
        assert_eq!(report.wind_speed, 3.6);
    }

    #[test]
    fn test_parse_report_rejects_other_documents() {
        let result = parse_report("Oslo", r#"{"cod": "404", "message": "city not found"}"#);
        assert!(matches!(result, Err(WeatherError::InvalidResponse(_))));
    }

    #[test]
    fn test_fetch_sends_city_and_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/data/2.5/weather")
                .query_param("q", "Oslo")
                .query_param("appid", "secret");
            then.status(200)
                .header("content-type", "application/json")
                .body(OSLO);
        });

        let report = client_for(&server, Some("secret")).fetch("Oslo").unwrap();
        mock.assert();
        assert_eq!(report.wind_text(), "3.6 m/s");
    }

    #[test]
    fn test_fetch_maps_http_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).query_param("q", "Paris");
            then.status(401).body(r#"{"cod": 401, "message": "Invalid API key"}"#);
        });
        server.mock(|when, then| {
            when.method(GET).query_param("q", "Rome");
            then.status(503);
        });

        let client = client_for(&server, Some("wrong"));
        assert_eq!(client.fetch("Paris"), Err(WeatherError::Unauthorized));
        assert_eq!(client.fetch("Rome"), Err(WeatherError::ServiceUnavailable));
    }

    #[test]
    fn test_fetch_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(200).body(OSLO).delay(Duration::from_secs(3));
        });

        assert_eq!(
            client_for(&server, Some("secret")).fetch("Oslo"),
            Err(WeatherError::Timeout)
        );
    }

    #[test]
    fn test_fetch_without_server() {
        let client = client("http://127.0.0.1:1/data/2.5/weather".to_string(), Some("secret"));
        assert_eq!(client.fetch("Oslo"), Err(WeatherError::Connection));
    }

    #[test]
    fn test_fetch_without_api_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200).body(OSLO);
        });

        assert_eq!(
            client_for(&server, None).fetch("Oslo"),
            Err(WeatherError::MissingApiKey)
        );
        mock.assert_hits(0);
    }
}
