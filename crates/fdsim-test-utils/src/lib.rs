//! Test utilities for fdsim development.
//!
//! Provides a deterministic [`TestSystem`]/[`TestIntegrator`] pair with
//! configurable sub-stepping, per-step delay, and fault injection, plus
//! helpers for collecting reports emitted on the worker thread.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixtures;

pub use fixtures::{Fault, TestIntegrator, TestSystem, TestSystemConfig};

use crossbeam_channel::Receiver;

use fdsim_core::{ModelState, RunParameters, SystemState};
use fdsim_output::SimulationReport;

/// Install `env_logger` for the test harness. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A report callback that forwards into a channel, and the receiving end.
///
/// The callback runs on the worker thread; drain the receiver on the test
/// thread once the run has been joined.
pub fn report_channel() -> (
    impl FnMut(SimulationReport) + Send + 'static,
    Receiver<SimulationReport>,
) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let on_report = move |report: SimulationReport| {
        // Receiver may already be gone if the test bailed out early.
        let _ = tx.send(report);
    };
    (on_report, rx)
}

/// Drain every report currently buffered in `rx`.
pub fn drain(rx: &Receiver<SimulationReport>) -> Vec<SimulationReport> {
    rx.try_iter().collect()
}

/// Report times, in emission order.
pub fn times(reports: &[SimulationReport]) -> Vec<f64> {
    reports.iter().map(SimulationReport::time).collect()
}

/// A one-body model at `t = start_time` moving with unit speed.
pub fn test_model(config: TestSystemConfig, start_time: f64) -> ModelState<TestSystem> {
    ModelState::new(
        TestSystem::new(config),
        SystemState::new(start_time, vec![0.0], vec![1.0]),
    )
}

/// Parameters with the given final time and reporting interval.
pub fn params(final_time: f64, reporting_interval: f64) -> RunParameters {
    RunParameters {
        final_time,
        reporting_interval,
        ..Default::default()
    }
}
