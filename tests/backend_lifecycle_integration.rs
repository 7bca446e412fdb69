//! Integration tests for backend lifecycle
//!
//! These tests validate the complete backend workflow:
//! - Immediate first cycle on start
//! - Commands from the UI (sample now, clear errors, shutdown)
//! - Backend message handling

mod common;

use common::builders::ConfigBuilder;
use common::mock_helpers::{constant_source, morning_clock, steady_mock};
use std::time::Instant;
use weather_kiosk::backend::{build_source, BackendMessage, FrontendHandle, SamplingBackend};
use weather_kiosk::error::ReadFailure;
use weather_kiosk::store::SeriesStore;
use weather_kiosk::types::{Channel, Resolution};

/// Poll the frontend until a message matches or the timeout expires
fn wait_for(
    frontend: &FrontendHandle,
    mut matches: impl FnMut(&BackendMessage) -> bool,
) -> Option<BackendMessage> {
    let deadline = Instant::now() + common::backend_timeout();
    while Instant::now() < deadline {
        match frontend.try_recv() {
            Some(message) if matches(&message) => return Some(message),
            Some(_) => {}
            None => std::thread::sleep(std::time::Duration::from_millis(5)),
        }
    }
    None
}

#[test]
fn test_backend_creation_and_shutdown() {
    let config = ConfigBuilder::new().build();
    let store = SeriesStore::shared(config.sampling.capacity);
    let (backend, frontend) = SamplingBackend::new(&config, store, Box::new(steady_mock(1.0)));

    let handle = backend.spawn().expect("spawn sampling thread");

    frontend.shutdown();
    assert!(wait_for(&frontend, |m| matches!(m, BackendMessage::Shutdown)).is_some());

    let result = handle.join();
    assert!(result.is_ok(), "Backend thread should exit cleanly");
}

#[test]
fn test_first_cycle_runs_immediately() {
    // A long period means only the startup cycle can run during the test
    let config = ConfigBuilder::new().period_secs(3_600).build();
    let store = SeriesStore::shared(config.sampling.capacity);
    let (backend, frontend) =
        SamplingBackend::new(&config, store.clone(), Box::new(constant_source(17.0)));
    let handle = backend.with_clock(morning_clock()).spawn().expect("spawn");

    let message = wait_for(&frontend, |m| {
        matches!(m, BackendMessage::CycleCommitted { .. })
    });
    assert_eq!(
        message,
        Some(BackendMessage::CycleCommitted {
            cycle: 1,
            long_term: true
        })
    );
    assert_eq!(
        store.latest(Channel::OutsideTemperature, Resolution::Short),
        Some((17.0, "08:00".to_string()))
    );

    frontend.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_sample_now_and_live_values() {
    let config = ConfigBuilder::new().period_secs(3_600).build();
    let store = SeriesStore::shared(config.sampling.capacity);
    let (backend, frontend) =
        SamplingBackend::new(&config, store.clone(), Box::new(constant_source(4.0)));
    let handle = backend.spawn().expect("spawn");

    // The startup cycle is reported before the first live refresh
    assert!(wait_for(&frontend, |m| matches!(
        m,
        BackendMessage::CycleCommitted { cycle: 1, .. }
    ))
    .is_some());

    let live = wait_for(&frontend, |m| matches!(m, BackendMessage::Live(_)));
    match live {
        Some(BackendMessage::Live(readings)) => {
            assert_eq!(readings.get(Channel::Humidity), &Ok(4.0));
        }
        other => panic!("expected live readings, got {:?}", other),
    }

    frontend.sample_now();
    assert!(wait_for(&frontend, |m| matches!(
        m,
        BackendMessage::CycleCommitted {
            cycle: 2,
            long_term: false
        }
    ))
    .is_some());
    assert_eq!(store.len(Resolution::Short), 2);
    assert_eq!(store.len(Resolution::Long), 1);

    frontend.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_discarded_cycle_and_clear_errors() {
    let config = ConfigBuilder::new().period_secs(3_600).build();
    let store = SeriesStore::shared(config.sampling.capacity);
    let mut source = constant_source(2.0);
    source.fail_next(Channel::Pressure, ReadFailure::Timeout);

    let (backend, frontend) = SamplingBackend::new(&config, store.clone(), Box::new(source));
    let handle = backend.spawn().expect("spawn");

    let discarded = wait_for(&frontend, |m| matches!(m, BackendMessage::CycleDiscarded(_)));
    match discarded {
        Some(BackendMessage::CycleDiscarded(record)) => assert_eq!(record.kind, "Timeout"),
        other => panic!("expected a discarded cycle, got {:?}", other),
    }
    assert_eq!(store.error_count(), 1);
    assert!(store.is_empty());

    frontend.clear_errors();
    frontend.sample_now();
    assert!(wait_for(&frontend, |m| matches!(
        m,
        BackendMessage::CycleCommitted { cycle: 1, .. }
    ))
    .is_some());
    // Commands are handled in order, so the log was cleared first
    assert_eq!(store.error_count(), 0);

    frontend.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_stop_handle_ends_backend() {
    let config = ConfigBuilder::new().period_secs(3_600).build();
    let store = SeriesStore::shared(config.sampling.capacity);
    let (backend, _frontend) = SamplingBackend::new(&config, store, Box::new(steady_mock(0.0)));
    let stop = backend.stop_handle();
    let handle = backend.spawn().expect("spawn");

    stop.store(false, std::sync::atomic::Ordering::SeqCst);
    assert!(handle.join().is_ok());
}

#[test]
fn test_built_source_runs_through_read_timeout() {
    let config = ConfigBuilder::new()
        .period_secs(3_600)
        .read_timeout_ms(500)
        .build();
    let store = SeriesStore::shared(config.sampling.capacity);
    let source = build_source(&config).expect("build simulated source");
    assert!(source.describe().contains("simulated"));

    let (backend, frontend) = SamplingBackend::new(&config, store.clone(), source);
    let handle = backend.spawn().expect("spawn");

    assert!(wait_for(&frontend, |m| matches!(
        m,
        BackendMessage::CycleCommitted { cycle: 1, .. }
    ))
    .is_some());
    store.inspect(|data| data.assert_synchronized());

    frontend.shutdown();
    handle.join().unwrap();
}
