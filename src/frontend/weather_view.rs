//! UI state of the world weather page

use crate::weather::{Region, WeatherReport, WeatherUpdate};

/// What the world weather page currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the lookup of a city
    Loading(String),
    /// Last lookup succeeded
    Ready(WeatherReport),
    /// Last lookup failed
    Failed { city: String, message: String },
}

/// Region, selected city and last result of the world weather page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherView {
    /// City list on offer
    pub region: Region,
    /// Index into the region's city list
    pub city_index: usize,
    /// Lookup state
    pub status: WeatherStatus,
}

impl WeatherView {
    pub fn cities(&self) -> &'static [&'static str] {
        self.region.cities()
    }

    /// Currently selected city
    pub fn selected_city(&self) -> &'static str {
        let cities = self.cities();
        cities[self.city_index.min(cities.len() - 1)]
    }

    /// Switch city list; the selection goes back to the first city
    pub fn toggle_region(&mut self) {
        self.region = self.region.toggled();
        self.city_index = 0;
    }

    pub fn select(&mut self, index: usize) {
        self.city_index = index.min(self.cities().len() - 1);
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, WeatherStatus::Loading(_))
    }

    /// Mark the selected city as requested and return its name
    pub fn begin_request(&mut self) -> &'static str {
        let city = self.selected_city();
        self.status = WeatherStatus::Loading(city.to_string());
        city
    }

    /// Take a finished lookup; replies for cities no longer awaited are ignored
    pub fn apply(&mut self, update: WeatherUpdate) {
        match &self.status {
            WeatherStatus::Loading(city) if *city == update.city => {}
            _ => {
                tracing::debug!("Ignoring stale weather reply for {}", update.city);
                return;
            }
        }

        self.status = match update.result {
            Ok(report) => WeatherStatus::Ready(report),
            Err(e) => WeatherStatus::Failed {
                city: update.city,
                message: e.to_string(),
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherError;

    fn report(city: &str) -> WeatherReport {
        WeatherReport {
            city: city.to_string(),
            temperature_c: -2.0,
            wind_speed: 7.5,
            pressure_hpa: 995.0,
            humidity: 90.0,
            description: "Snow".to_string(),
        }
    }

    #[test]
    fn test_toggle_region_resets_selection() {
        let mut view = WeatherView::default();
        view.select(5);
        assert_eq!(view.selected_city(), "Gdańsk");

        view.toggle_region();
        assert_eq!(view.region, Region::World);
        assert_eq!(view.city_index, 0);
        assert_eq!(view.selected_city(), "Abu Dhabi");
    }

    #[test]
    fn test_select_clamps_index() {
        let mut view = WeatherView::default();
        view.select(10_000);
        assert_eq!(view.city_index, view.cities().len() - 1);
    }

    #[test]
    fn test_lookup_lifecycle() {
        let mut view = WeatherView::default();
        assert_eq!(view.begin_request(), "Warszawa");
        assert!(view.is_loading());

        view.apply(WeatherUpdate {
            city: "Warszawa".to_string(),
            result: Ok(report("Warsaw")),
        });
        assert_eq!(view.status, WeatherStatus::Ready(report("Warsaw")));

        view.begin_request();
        view.apply(WeatherUpdate {
            city: "Warszawa".to_string(),
            result: Err(WeatherError::Unauthorized),
        });
        assert_eq!(
            view.status,
            WeatherStatus::Failed {
                city: "Warszawa".to_string(),
                message: "Unauthorized".to_string(),
            }
        );
    }

    #[test]
    fn test_reply_for_previous_city_is_ignored() {
        let mut view = WeatherView::default();
        view.begin_request();
        view.select(1);
        view.begin_request();

        view.apply(WeatherUpdate {
            city: "Warszawa".to_string(),
            result: Ok(report("Warsaw")),
        });
        assert_eq!(view.status, WeatherStatus::Loading("Kraków".to_string()));
    }
}
