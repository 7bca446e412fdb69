//! Mock construction helpers

use chrono::TimeDelta;
use std::sync::Arc;
use weather_kiosk::backend::{SignalPattern, SimulatedSource};
use weather_kiosk::clock::ManualClock;
use weather_kiosk::error::ReadFailure;
use weather_kiosk::types::Channel;
use weather_kiosk::SampleSource;

use super::builders::local_time;

mockall::mock! {
    pub Source {}

    impl SampleSource for Source {
        fn read_room_temperature(&mut self) -> Result<f64, ReadFailure>;
        fn read_outside_temperature(&mut self) -> Result<f64, ReadFailure>;
        fn read_humidity(&mut self) -> Result<f64, ReadFailure>;
        fn read_pressure(&mut self) -> Result<f64, ReadFailure>;
        fn read_rain(&mut self) -> Result<bool, ReadFailure>;
        fn describe(&self) -> String;
    }
}

/// Mock where every read succeeds with a fixed value
pub fn steady_mock(value: f64) -> MockSource {
    let mut source = MockSource::new();
    source
        .expect_read_room_temperature()
        .returning(move || Ok(value));
    source
        .expect_read_outside_temperature()
        .returning(move || Ok(value));
    source.expect_read_humidity().returning(move || Ok(value));
    source.expect_read_pressure().returning(move || Ok(value));
    source.expect_read_rain().returning(|| Ok(false));
    source
        .expect_describe()
        .returning(|| "mock sensors".to_string());
    source
}

/// Simulated source with every channel pinned to `value`
pub fn constant_source(value: f64) -> SimulatedSource {
    Channel::ALL
        .into_iter()
        .filter(|channel| *channel != Channel::Rain)
        .fold(SimulatedSource::new(), |source, channel| {
            source.with_pattern(channel, SignalPattern::Constant(value))
        })
        .with_pattern(Channel::Rain, SignalPattern::Constant(0.0))
}

/// Manual clock at 08:00 that the test advances by the sampling period
pub fn morning_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(local_time(8, 0)))
}

/// Advance a manual clock by one three-minute sampling period
pub fn advance_period(clock: &ManualClock) {
    clock.advance(TimeDelta::minutes(3));
}
