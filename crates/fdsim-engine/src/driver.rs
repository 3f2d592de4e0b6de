//! User-facing handle for a background simulation run.
//!
//! [`SimulationDriver::start`] moves the model and the report callback
//! onto a dedicated worker thread and returns immediately. The owner then
//! polls [`status`](SimulationDriver::status), may ask the run to stop,
//! and eventually joins it. Dropping the driver stops and joins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::{debug, error};

use fdsim_core::{DynamicSystem, ModelState, RunParameters, SimulationStatus};
use fdsim_output::SimulationReport;

use crate::shared::SharedState;
use crate::worker::{SimulatorThreadInput, SimulatorThreadState};

const WORKER_THREAD_NAME: &str = "fdsim-worker";

// ── Error types ──────────────────────────────────────────────────

/// Error starting a [`SimulationDriver`].
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The OS refused to create the worker thread.
    #[error("failed to spawn simulation worker thread: {reason}")]
    ThreadSpawnFailed {
        /// OS error text.
        reason: String,
    },
}

// ── SimulationDriver ─────────────────────────────────────────────

/// Runs one forward-dynamics simulation on a background thread.
///
/// The driver is `Send + Sync`: every method takes `&self`, so it may be
/// shared behind an `Arc` and polled, stopped, or joined from any thread.
///
/// # Report callback
///
/// The callback passed to [`start`](Self::start) runs synchronously on
/// the worker thread, once per report, in time order. It blocks the
/// integration loop while it runs; hand reports to a channel if the
/// consumer is slow.
pub struct SimulationDriver {
    params: RunParameters,
    shared: Arc<SharedState>,
    stop_flag: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SimulationDriver {
    /// Start simulating `model` with `params` on a new worker thread.
    ///
    /// Returns as soon as the thread exists. Parameter validation and
    /// integrator setup happen on the worker; a failure there shows up
    /// as [`SimulationStatus::Error`], not as an `Err` here.
    pub fn start<S, F>(
        model: ModelState<S>,
        params: RunParameters,
        on_report: F,
    ) -> Result<Self, DriverError>
    where
        S: DynamicSystem,
        F: FnMut(SimulationReport) + Send + 'static,
    {
        let shared = Arc::new(SharedState::new());
        let stop_flag = Arc::new(AtomicBool::new(false));

        let input = SimulatorThreadInput::new(model, params, Box::new(on_report));
        let worker_shared = Arc::clone(&shared);
        let worker_stop = Arc::clone(&stop_flag);
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || {
                let state = SimulatorThreadState::new(input, worker_shared, worker_stop);
                state.run();
            })
            .map_err(|e| DriverError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;

        debug!(
            "simulation started: final_time={}, interval={}",
            params.final_time, params.reporting_interval
        );

        Ok(Self {
            params,
            shared,
            stop_flag,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Current run status (lock-free).
    pub fn status(&self) -> SimulationStatus {
        self.shared.status()
    }

    /// Ask the worker to stop at its next loop iteration.
    ///
    /// Idempotent and non-blocking. Has no effect on a run that has
    /// already reached a terminal status.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    /// Whether [`request_stop`](Self::request_stop) has been called.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }

    /// Block until the worker thread has exited.
    ///
    /// Idempotent. Concurrent callers all return only after the worker is
    /// gone. Must not be called from inside the report callback.
    pub fn join(&self) {
        // The guard is never held across user code, so poisoning only
        // means another joiner panicked; the handle is still usable.
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                error!("simulation worker thread panicked outside its guard");
            }
        }
    }

    /// [`request_stop`](Self::request_stop) then [`join`](Self::join).
    pub fn stop(&self) {
        self.request_stop();
        self.join();
    }

    /// Parameters this run was started with.
    pub fn params(&self) -> &RunParameters {
        &self.params
    }

    /// Whether the run has reached a terminal status.
    ///
    /// The worker may still be unwinding; call [`join`](Self::join) to
    /// wait for it.
    pub fn is_finished(&self) -> bool {
        self.status().is_terminal()
    }
}

impl std::fmt::Debug for SimulationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationDriver")
            .field("status", &self.status())
            .field("stop_requested", &self.is_stop_requested())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

// Compile-time assertion: the driver can be shared across threads.
const _: () = {
    fn _assert_send_sync<T: Send + Sync>() {}
    fn _check() {
        _assert_send_sync::<SimulationDriver>();
    }
};
