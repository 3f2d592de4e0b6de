//! Worker loop state machine for the simulation thread.
//!
//! The worker owns its [`SimulatorThreadInput`] exclusively (moved in via
//! `thread::spawn`). It communicates back only by writing the shared
//! status cell and by invoking the report callback, which runs on this
//! thread.
//!
//! Failures never leave the thread: errors and panics are caught by the
//! guard in [`SimulatorThreadState::run`], logged, and turned into
//! [`SimulationStatus::Error`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error};

use fdsim_core::{
    DynamicSystem, Integrator, IntegratorSettings, ModelState, RunParameters, SimulationError,
    SimulationStatus, StepOutcome, TerminationReason,
};
use fdsim_output::{build_report, ReportTiming, SimulationReport};

use crate::shared::SharedState;

/// Fraction of the reporting interval the run's end may trail the last
/// report by before a tail report is emitted.
const TAIL_REPORT_FRACTION: f64 = 0.01;

/// Owner-supplied report callback.
pub(crate) type ReportCallback = Box<dyn FnMut(SimulationReport) + Send>;

/// Everything the worker needs, moved in at spawn time.
pub(crate) struct SimulatorThreadInput<S> {
    model: ModelState<S>,
    params: RunParameters,
    on_report: ReportCallback,
}

impl<S: DynamicSystem> SimulatorThreadInput<S> {
    pub fn new(model: ModelState<S>, params: RunParameters, on_report: ReportCallback) -> Self {
        Self {
            model,
            params,
            on_report,
        }
    }
}

/// Report callback plus bookkeeping about what it has been sent.
struct ReportSink {
    on_report: ReportCallback,
    emitted: usize,
}

impl ReportSink {
    fn emit(&mut self, report: SimulationReport) {
        self.emitted += 1;
        (self.on_report)(report);
    }
}

/// State held by the simulation thread's main loop.
pub(crate) struct SimulatorThreadState<S> {
    model: ModelState<S>,
    params: RunParameters,
    sink: ReportSink,
    shared: Arc<SharedState>,
    stop_flag: Arc<AtomicBool>,
}

impl<S: DynamicSystem> SimulatorThreadState<S> {
    pub fn new(
        input: SimulatorThreadInput<S>,
        shared: Arc<SharedState>,
        stop_flag: Arc<AtomicBool>,
    ) -> Self {
        Self {
            model: input.model,
            params: input.params,
            sink: ReportSink {
                on_report: input.on_report,
                emitted: 0,
            },
            shared,
            stop_flag,
        }
    }

    /// Thread entry point.
    ///
    /// Always stores a terminal status before returning, whatever happened
    /// inside the loop.
    pub fn run(mut self) {
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_unguarded(started)));

        let status = match outcome {
            Ok(Ok(status)) => status,
            Ok(Err(e)) if e.is_physics() => {
                error!("physics error occurred when running a simulation: {e}");
                SimulationStatus::Error
            }
            Ok(Err(e)) => {
                error!("error occurred when running a simulation: {e}");
                SimulationStatus::Error
            }
            Err(payload) => {
                match panic_message(payload.as_ref()) {
                    Some(msg) => error!("a panic occurred when running a simulation: {msg}"),
                    None => error!(
                        "a panic with an unknown payload occurred when running a simulation \
                         (no error message available)"
                    ),
                }
                SimulationStatus::Error
            }
        };

        self.shared.transition(status);
        debug!(
            "simulation finished: status={status}, reports={}, wall={:?}",
            self.sink.emitted,
            started.elapsed()
        );
    }

    fn stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }

    /// Main loop (unguarded against panics).
    fn run_unguarded(&mut self, started: Instant) -> Result<SimulationStatus, SimulationError> {
        if self.stop_requested() {
            return Ok(SimulationStatus::Cancelled);
        }

        let params = self.params;
        let system = &self.model.system;
        let mut integ = create_initialized_integrator(&self.model, &params)?;

        self.shared.transition(SimulationStatus::Running);
        debug!(
            "simulation running: method={}, t={}..{}, interval={}",
            params.integrator_method,
            integ.time(),
            params.final_time,
            params.reporting_interval
        );

        // Unconditional first report at t = start.
        let timing = ReportTiming {
            wall_time: started.elapsed(),
            step_duration: Duration::ZERO,
        };
        self.sink.emit(build_report(timing, system, &*integ));

        let t_start = integ.time();
        let mut t_last_report = t_start;
        let mut step: u64 = 1;
        while !integ.is_simulation_over() {
            if self.stop_requested() {
                return Ok(SimulationStatus::Cancelled);
            }

            let t_next = t_start + step as f64 * params.reporting_interval;

            let step_start = Instant::now();
            let outcome = integ.step_to(t_next)?;
            let step_end = Instant::now();

            if integ.is_simulation_over()
                && integ.termination_reason() != Some(TerminationReason::ReachedFinalTime)
            {
                let reason = integ
                    .termination_reason()
                    .map_or("unknown termination reason", TerminationReason::as_str);
                error!("simulation terminated abnormally at t={}: {reason}", integ.time());
                return Ok(SimulationStatus::Error);
            }

            let timing = ReportTiming {
                wall_time: step_end - started,
                step_duration: step_end - step_start,
            };
            match outcome {
                StepOutcome::ReachedReportTime => {
                    self.sink.emit(build_report(timing, system, &*integ));
                    t_last_report = integ.time();
                    step += 1;
                }
                StepOutcome::EndOfSimulation => {
                    // Report the true end unless a report already sits
                    // within 1% of an interval of it.
                    let t = integ.time();
                    if t_last_report + TAIL_REPORT_FRACTION * params.reporting_interval < t {
                        self.sink.emit(build_report(timing, system, &*integ));
                    }
                    break;
                }
                StepOutcome::InternalStep => {}
            }
        }

        Ok(SimulationStatus::Completed)
    }
}

/// Validate params, build the integrator, configure, and initialize it.
fn create_initialized_integrator<'s, S: DynamicSystem>(
    model: &'s ModelState<S>,
    params: &RunParameters,
) -> Result<Box<dyn Integrator + 's>, SimulationError> {
    params.validate()?;
    let mut integ = model.system.make_integrator(params.integrator_method)?;
    integ.configure(&IntegratorSettings::from(params))?;
    integ.initialize(&model.state)?;
    Ok(integ)
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}
