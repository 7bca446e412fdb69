//! World weather lookup
//!
//! The kiosk can show the current weather of a city picked from a list,
//! fetched from the OpenWeatherMap current-weather endpoint. This module is
//! separate from sensor sampling: it never touches the store.
//!
//! # Main Types
//!
//! - [`Region`] - which city list is offered (Poland or world capitals)
//! - [`WeatherReport`] - parsed current conditions of one city
//! - [`WeatherError`] - why a lookup failed, with the text shown to the user
//! - [`WeatherFetcher`] - blocking lookup interface, implemented by
//!   [`OpenWeatherClient`]
//! - [`WeatherService`] / [`WeatherHandle`] - lookup thread and the UI side of
//!   its channels

pub mod client;
pub mod service;

pub use client::{parse_report, OpenWeatherClient};
pub use service::{WeatherHandle, WeatherRequest, WeatherService, WeatherUpdate};

use crate::types::format_rounded;
use thiserror::Error;

/// Offset between Kelvin and degrees Celsius
const KELVIN_OFFSET: f64 = 273.15;

const POLAND_CITIES: &[&str] = &[
    "Warszawa", "Kraków", "Łódź", "Wrocław", "Poznań", "Gdańsk", "Szczecin",
    "Bydgoszcz", "Lublin", "Katowice", "Białystok", "Gdynia", "Częstochowa",
    "Radom", "Sosnowiec", "Toruń", "Kielce", "Gliwice", "Zabrze", "Olsztyn",
    "Rzeszów", "Zielona Góra", "Bytom", "Nowy Sącz", "Wałbrzych", "Opole",
    "Płock", "Elbląg", "Gorzów Wielkopolski", "Dąbrowa Górnicza", "Tarnów",
    "Kalisz", "Legnica", "Świdnica", "Mielec", "Przemyśl", "Stalowa Wola",
    "Lubin", "Tychy", "Chorzów", "Ruda Śląska", "Siedlce", "Włocławek",
    "Ciechanów", "Kołobrzeg", "Lubliniec", "Zamość", "Żory", "Piotrków Trybunalski",
    "Kędzierzyn-Koźle", "Suwałki", "Świnoujście", "Krosno", "Kutno", "Głogów",
];

const WORLD_CAPITALS: &[&str] = &[
    "Abu Dhabi", "Amman", "Amsterdam", "Ankara", "Athens", "Baghdad", "Bangkok", "Beijing",
    "Belgrade", "Berlin", "Bogota", "Brasilia", "Brussels", "Bucharest", "Budapest",
    "Buenos Aires", "Cairo", "Canberra", "Caracas", "Copenhagen", "Doha", "Dublin", "Hanoi",
    "Helsinki", "Istanbul", "Jakarta", "Kabul", "Kuala Lumpur", "Lisbon", "London", "Madrid",
    "Manila", "Mexico City", "Moscow", "New Delhi", "Oslo", "Ottawa", "Paris", "Prague",
    "Reykjavik", "Riyadh", "Rome", "Santiago", "Seoul", "Singapore", "Sofia", "Stockholm",
    "Tehran", "Tokyo", "Vienna", "Warsaw", "Washington", "Zagreb",
];

/// City list offered on the world weather page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// Polish cities
    #[default]
    Poland,
    /// World capitals
    World,
}

impl Region {
    /// Cities of this region, in display order
    pub fn cities(self) -> &'static [&'static str] {
        match self {
            Region::Poland => POLAND_CITIES,
            Region::World => WORLD_CAPITALS,
        }
    }

    /// The other region
    pub fn toggled(self) -> Self {
        match self {
            Region::Poland => Region::World,
            Region::World => Region::Poland,
        }
    }

    /// Label of the region button
    pub fn label(self) -> &'static str {
        match self {
            Region::Poland => "Poland",
            Region::World => "World",
        }
    }
}

/// Current conditions in one city
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// City name as reported by the service
    pub city: String,
    /// Air temperature in °C
    pub temperature_c: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Sea-level pressure in hPa
    pub pressure_hpa: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Short description, e.g. "Light rain"
    pub description: String,
}

impl WeatherReport {
    /// Convert a Kelvin reading into °C
    pub fn celsius_from_kelvin(kelvin: f64) -> f64 {
        kelvin - KELVIN_OFFSET
    }

    pub fn temperature_text(&self) -> String {
        format!("{}°C", format_rounded(self.temperature_c))
    }

    pub fn wind_text(&self) -> String {
        format!("{} m/s", format_rounded(self.wind_speed))
    }

    pub fn pressure_text(&self) -> String {
        format!("{:.0} hPa", self.pressure_hpa)
    }

    pub fn humidity_text(&self) -> String {
        format!("{:.0}%", self.humidity)
    }
}

/// Why a weather lookup failed
///
/// The `Display` text is what the world weather page shows in place of the
/// description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// HTTP 401
    #[error("Unauthorized")]
    Unauthorized,
    /// HTTP 403
    #[error("Access is denied")]
    Forbidden,
    /// HTTP 500
    #[error("Internal server error")]
    InternalServerError,
    /// HTTP 502
    #[error("Bad gateway")]
    BadGateway,
    /// HTTP 503
    #[error("Server is down")]
    ServiceUnavailable,
    /// Any other HTTP error status
    #[error("HTTP error {0}")]
    Http(u16),
    /// DNS failure or refused connection
    #[error("No internet connection")]
    Connection,
    /// The server did not answer in time
    #[error("Timeout error")]
    Timeout,
    /// Redirect limit reached
    #[error("Too many redirects")]
    TooManyRedirects,
    /// Any other transport failure
    #[error("Request error")]
    Request(String),
    /// The body was not a current-weather document
    #[error("Unexpected response from weather service")]
    InvalidResponse(String),
    /// No API key in the configuration or the environment
    #[error("No API key configured")]
    MissingApiKey,
}

impl WeatherError {
    /// Map an HTTP error status
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => WeatherError::Unauthorized,
            403 => WeatherError::Forbidden,
            500 => WeatherError::InternalServerError,
            502 => WeatherError::BadGateway,
            503 => WeatherError::ServiceUnavailable,
            other => WeatherError::Http(other),
        }
    }
}

/// Blocking current-weather lookup
#[cfg_attr(test, mockall::automock)]
pub trait WeatherFetcher: Send {
    /// Fetch the current conditions of `city`
    fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
