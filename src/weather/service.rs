//! Weather lookup thread
//!
//! HTTP requests can take seconds, so lookups run on their own thread. The
//! UI sends city names through a [`WeatherHandle`] and picks up
//! [`WeatherUpdate`]s on later frames.

use super::{WeatherError, WeatherFetcher, WeatherReport};
use crate::error::{Result, ResultExt};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::thread::JoinHandle;

/// Message sent from the UI to the weather thread
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherRequest {
    /// Look up the current weather of a city
    Fetch(String),
    /// Stop the thread
    Shutdown,
}

/// Result of one lookup
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherUpdate {
    /// City that was requested
    pub city: String,
    /// Report or the reason there is none
    pub result: std::result::Result<WeatherReport, WeatherError>,
}

/// UI side of the weather thread's channels
pub struct WeatherHandle {
    requests: Sender<WeatherRequest>,
    updates: Receiver<WeatherUpdate>,
}

impl WeatherHandle {
    /// Ask for the weather of `city`; returns false if the request was not queued
    pub fn request(&self, city: impl Into<String>) -> bool {
        match self.requests.try_send(WeatherRequest::Fetch(city.into())) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Weather request queue is full");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Try to receive a finished lookup (non-blocking)
    pub fn try_recv(&self) -> Option<WeatherUpdate> {
        self.updates.try_recv().ok()
    }

    /// Drain all finished lookups
    pub fn drain(&self) -> Vec<WeatherUpdate> {
        self.updates.try_iter().collect()
    }

    /// Stop the weather thread
    pub fn shutdown(&self) {
        let _ = self.requests.try_send(WeatherRequest::Shutdown);
    }
}

/// Thread answering weather lookups
pub struct WeatherService {
    fetcher: Box<dyn WeatherFetcher>,
    requests: Receiver<WeatherRequest>,
    updates: Sender<WeatherUpdate>,
}

impl WeatherService {
    /// Create the service and the handle the UI talks to
    pub fn new(fetcher: Box<dyn WeatherFetcher>) -> (Self, WeatherHandle) {
        let (request_tx, request_rx) = bounded(8);
        let (update_tx, update_rx) = bounded(8);

        let service = Self {
            fetcher,
            requests: request_rx,
            updates: update_tx,
        };
        let handle = WeatherHandle {
            requests: request_tx,
            updates: update_rx,
        };
        (service, handle)
    }

    /// Answer requests until shutdown or until the handle is dropped
    pub fn run(self) {
        tracing::info!("Weather service started");

        for request in self.requests.iter() {
            let city = match request {
                WeatherRequest::Fetch(city) => city,
                WeatherRequest::Shutdown => break,
            };

            let result = self.fetcher.fetch(&city);
            match &result {
                Ok(report) => tracing::debug!(
                    "Weather for {}: {}, {}",
                    city,
                    report.temperature_text(),
                    report.description
                ),
                Err(e) => tracing::warn!("Weather lookup for {} failed: {:?}", city, e),
            }

            if self.updates.try_send(WeatherUpdate { city, result }).is_err() {
                tracing::warn!("Dropping weather update, UI is not reading");
            }
        }

        tracing::info!("Weather service stopped");
    }

    /// Run the service on a new thread
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("weather".to_string())
            .spawn(move || self.run())
            .context("Failed to spawn weather thread")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::MockWeatherFetcher;
    use std::time::Duration;

    fn report(city: &str) -> WeatherReport {
        WeatherReport {
            city: city.to_string(),
            temperature_c: 12.5,
            wind_speed: 4.0,
            pressure_hpa: 1008.0,
            humidity: 70.0,
            description: "Overcast clouds".to_string(),
        }
    }

    #[test]
    fn test_lookups_are_answered_in_order() {
        let mut fetcher = MockWeatherFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|city| city == "Gdańsk")
            .returning(|city| Ok(report(city)));
        fetcher
            .expect_fetch()
            .withf(|city| city == "Tokyo")
            .returning(|_| Err(WeatherError::Forbidden));

        let (service, handle) = WeatherService::new(Box::new(fetcher));
        assert!(handle.request("Gdańsk"));
        assert!(handle.request("Tokyo"));
        handle.shutdown();
        service.run();

        let updates = handle.drain();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].city, "Gdańsk");
        assert_eq!(updates[0].result, Ok(report("Gdańsk")));
        assert_eq!(updates[1].result, Err(WeatherError::Forbidden));
    }

    #[test]
    fn test_spawned_service_stops_on_shutdown() {
        let mut fetcher = MockWeatherFetcher::new();
        fetcher.expect_fetch().returning(|city| Ok(report(city)));

        let (service, handle) = WeatherService::new(Box::new(fetcher));
        let thread = service.spawn().unwrap();

        assert!(handle.request("Opole"));
        let mut update = None;
        for _ in 0..200 {
            update = handle.try_recv();
            if update.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(update.map(|u| u.city), Some("Opole".to_string()));

        handle.shutdown();
        assert!(thread.join().is_ok());
    }

    #[test]
    fn test_requests_after_shutdown_are_rejected() {
        let fetcher = MockWeatherFetcher::new();
        let (service, handle) = WeatherService::new(Box::new(fetcher));
        drop(service);
        assert!(!handle.request("Kutno"));
    }
}
