//! Integration test: driver lifecycle under concurrent control.
//!
//! Exercises stop requests, repeated and concurrent joins, drop-while-
//! running, and checks that the observed status only ever moves forward.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fdsim_core::SimulationStatus;
use fdsim_engine::SimulationDriver;
use fdsim_output::SimulationReport;
use fdsim_test_utils::{
    drain, init_test_logging, params, report_channel, test_model, times, TestSystemConfig,
};

const SLOW_STEP: Duration = Duration::from_millis(2);

/// A run long enough that it only ends when stopped.
fn start_endless() -> (SimulationDriver, crossbeam_channel::Receiver<SimulationReport>) {
    init_test_logging();
    let (on_report, rx) = report_channel();
    let driver = SimulationDriver::start(
        test_model(TestSystemConfig::with_delay(SLOW_STEP), 0.0),
        params(1.0e6, 0.1),
        on_report,
    )
    .unwrap();
    (driver, rx)
}

fn rank(s: SimulationStatus) -> u8 {
    match s {
        SimulationStatus::Initializing => 0,
        SimulationStatus::Running => 1,
        SimulationStatus::Completed | SimulationStatus::Cancelled | SimulationStatus::Error => 2,
    }
}

// ── Cancellation ─────────────────────────────────────────────────────

#[test]
fn stop_yields_cancelled_and_reports_stay_ordered() {
    let (driver, rx) = start_endless();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    thread::sleep(Duration::from_millis(20));
    driver.stop();

    assert_eq!(driver.status(), SimulationStatus::Cancelled);
    let t = times(&drain(&rx));
    assert!(t.windows(2).all(|w| w[0] < w[1]), "{t:?}");
}

#[test]
fn repeated_stop_requests_are_harmless() {
    let (driver, rx) = start_endless();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    for _ in 0..100 {
        driver.request_stop();
    }
    assert!(driver.is_stop_requested());
    driver.join();
    driver.request_stop();
    driver.stop();
    assert_eq!(driver.status(), SimulationStatus::Cancelled);
}

#[test]
fn stop_before_any_progress_may_cancel_without_reports() {
    init_test_logging();
    let (on_report, rx) = report_channel();
    let driver = SimulationDriver::start(
        test_model(TestSystemConfig::with_delay(SLOW_STEP), 0.0),
        params(1.0e6, 0.1),
        on_report,
    )
    .unwrap();
    driver.stop();
    assert_eq!(driver.status(), SimulationStatus::Cancelled);
    // Zero reports if the worker saw the flag first, otherwise a prefix
    // of the grid starting at t = 0.
    let t = times(&drain(&rx));
    if let Some(first) = t.first() {
        assert_eq!(*first, 0.0);
    }
}

// ── Joining ──────────────────────────────────────────────────────────

#[test]
fn join_is_idempotent() {
    init_test_logging();
    let driver = SimulationDriver::start(
        test_model(TestSystemConfig::default(), 0.0),
        params(1.0, 0.1),
        |_: SimulationReport| {},
    )
    .unwrap();
    driver.join();
    driver.join();
    driver.join();
    assert_eq!(driver.status(), SimulationStatus::Completed);
}

#[test]
fn concurrent_joins_all_wait_for_the_worker() {
    let (driver, rx) = start_endless();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let driver = Arc::new(driver);

    let joiners: Vec<_> = (0..4)
        .map(|_| {
            let d = Arc::clone(&driver);
            thread::spawn(move || {
                d.join();
                // Every joiner returns only once the run is over.
                d.status()
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(10));
    driver.request_stop();

    for j in joiners {
        assert_eq!(j.join().unwrap(), SimulationStatus::Cancelled);
    }
}

#[test]
fn drop_stops_and_joins_a_running_worker() {
    let (driver, rx) = start_endless();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();

    let started = Instant::now();
    drop(driver);
    assert!(started.elapsed() < Duration::from_secs(5));

    // The callback (and its sender) went away with the worker.
    let _ = drain(&rx);
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
}

#[test]
fn drop_after_completion_is_quiet() {
    init_test_logging();
    let driver = SimulationDriver::start(
        test_model(TestSystemConfig::default(), 0.0),
        params(0.5, 0.1),
        |_: SimulationReport| {},
    )
    .unwrap();
    driver.join();
    drop(driver);
}

// ── Status ───────────────────────────────────────────────────────────

#[test]
fn status_only_moves_forward() {
    init_test_logging();
    let driver = SimulationDriver::start(
        test_model(TestSystemConfig::with_delay(Duration::from_millis(1)), 0.0),
        params(0.2, 0.01),
        |_: SimulationReport| {},
    )
    .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut seen = vec![driver.status()];
    while !seen.last().is_some_and(|s| s.is_terminal()) {
        assert!(Instant::now() < deadline, "run did not finish in time");
        let now = driver.status();
        if seen.last() != Some(&now) {
            seen.push(now);
        }
        thread::yield_now();
    }
    driver.join();
    seen.push(driver.status());

    assert!(seen.windows(2).all(|w| rank(w[0]) <= rank(w[1])), "{seen:?}");
    let terminal = seen[seen.len() - 1];
    assert_eq!(terminal, SimulationStatus::Completed);
    assert!(seen.iter().skip_while(|s| !s.is_terminal()).all(|s| *s == terminal));
}

#[test]
fn status_is_running_while_stepping() {
    let (driver, rx) = start_endless();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(driver.status(), SimulationStatus::Running);
    assert!(!driver.is_finished());
    driver.stop();
    assert!(driver.is_finished());
}

#[test]
fn driver_can_be_polled_from_another_thread() {
    let (driver, rx) = start_endless();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let driver = Arc::new(driver);
    let poller = {
        let d = Arc::clone(&driver);
        thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(5);
            while !d.is_finished() {
                assert!(Instant::now() < deadline);
                thread::yield_now();
            }
            d.status()
        })
    };
    driver.stop();
    assert_eq!(poller.join().unwrap(), SimulationStatus::Cancelled);
}
