//! Test data builders for creating test objects

use chrono::{DateTime, Local, TimeZone};
use weather_kiosk::config::{AppConfig, SourceConfig};
use weather_kiosk::store::{SeriesStore, SharedStore, TimeMark};
use weather_kiosk::types::{Channel, CycleReadings};

/// Local time on 2024-05-20
pub fn local_time(hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 5, 20, hour, minute, 0)
        .single()
        .expect("unambiguous local time")
}

/// Builder for creating test configs
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn period_secs(mut self, secs: u64) -> Self {
        self.config.sampling.period_secs = secs;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.sampling.capacity = capacity;
        self
    }

    pub fn long_term_interval(mut self, interval: u64) -> Self {
        self.config.sampling.long_term_interval = interval;
        self
    }

    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.sampling.read_timeout_ms = ms;
        self
    }

    pub fn failure_rate(mut self, failure_rate: f64) -> Self {
        self.config.source = SourceConfig::Simulated {
            failure_rate,
            noise: 0.0,
        };
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

/// Builder for creating pre-filled stores
pub struct StoreBuilder {
    capacity: usize,
    cycles: Vec<(CycleReadings, TimeMark, bool)>,
}

impl StoreBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            cycles: Vec::new(),
        }
    }

    /// Add a cycle with every channel reading `value`, stamped `minute` past 08:00
    pub fn cycle(mut self, value: f64, minute: u32, long_term: bool) -> Self {
        let mark = TimeMark::at(&local_time(8, minute));
        self.cycles
            .push((CycleReadings::uniform(value), mark, long_term));
        self
    }

    pub fn build(self) -> SharedStore {
        let store = SeriesStore::shared(self.capacity);
        for (readings, mark, long_term) in &self.cycles {
            store.append_cycle(readings, mark, *long_term);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_kiosk::types::Resolution;

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .period_secs(1)
            .capacity(5)
            .long_term_interval(2)
            .build();

        assert_eq!(config.sampling.period_secs, 1);
        assert_eq!(config.sampling.capacity, 5);
        assert_eq!(config.sampling.long_term_interval, 2);
    }

    #[test]
    fn test_store_builder() {
        let store = StoreBuilder::new(3)
            .cycle(1.0, 0, true)
            .cycle(2.0, 3, false)
            .build();

        assert_eq!(store.len(Resolution::Short), 2);
        assert_eq!(store.len(Resolution::Long), 1);
        assert_eq!(
            store.snapshot(Channel::Humidity, Resolution::Short).values,
            vec![1.0, 2.0]
        );
    }
}
