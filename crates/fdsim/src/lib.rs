//! fdsim: run a forward-dynamics simulation on a background thread and
//! stream timestamped reports back to the caller.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all fdsim sub-crates. For most users, adding `fdsim` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use fdsim::prelude::*;
//! use std::sync::mpsc;
//!
//! // A system whose integrator lands exactly on every requested time.
//! struct Drift;
//!
//! struct ExactStepper {
//!     state: SystemState,
//!     final_time: f64,
//!     done: bool,
//! }
//!
//! impl DynamicSystem for Drift {
//!     fn make_integrator<'s>(
//!         &'s self,
//!         _method: IntegratorMethod,
//!     ) -> Result<Box<dyn Integrator + 's>, SimulationError> {
//!         Ok(Box::new(ExactStepper {
//!             state: SystemState::new(0.0, vec![], vec![]),
//!             final_time: 0.0,
//!             done: false,
//!         }))
//!     }
//!     fn stats(&self) -> SystemStats { SystemStats::default() }
//! }
//!
//! impl Integrator for ExactStepper {
//!     fn configure(&mut self, s: &IntegratorSettings) -> Result<(), SimulationError> {
//!         self.final_time = s.final_time;
//!         Ok(())
//!     }
//!     fn initialize(&mut self, state: &SystemState) -> Result<(), SimulationError> {
//!         self.state = state.clone();
//!         Ok(())
//!     }
//!     fn step_to(&mut self, t: f64) -> Result<StepOutcome, SimulationError> {
//!         if t > self.final_time {
//!             self.state.set_time(self.final_time);
//!             self.done = true;
//!             return Ok(StepOutcome::EndOfSimulation);
//!         }
//!         self.state.set_time(t);
//!         Ok(StepOutcome::ReachedReportTime)
//!     }
//!     fn is_simulation_over(&self) -> bool { self.done }
//!     fn termination_reason(&self) -> Option<TerminationReason> {
//!         self.done.then_some(TerminationReason::ReachedFinalTime)
//!     }
//!     fn time(&self) -> f64 { self.state.time() }
//!     fn state(&self) -> &SystemState { &self.state }
//!     fn stats(&self) -> IntegratorStats { IntegratorStats::default() }
//! }
//!
//! let (tx, rx) = mpsc::channel();
//! let params = RunParameters { final_time: 2.0, reporting_interval: 0.5, ..Default::default() };
//! let model = ModelState::new(Drift, SystemState::new(0.0, vec![], vec![]));
//! let driver = SimulationDriver::start(model, params, move |r: SimulationReport| {
//!     let _ = tx.send(r.time());
//! })
//! .unwrap();
//! driver.join();
//!
//! assert_eq!(driver.status(), SimulationStatus::Completed);
//! assert_eq!(rx.try_iter().collect::<Vec<_>>(), [0.0, 0.5, 1.0, 1.5, 2.0]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `fdsim-core` | Parameters, status, state, integrator/system traits |
//! | [`output`] | `fdsim-output` | Output extractors, registry, reports |
//! | [`engine`] | `fdsim-engine` | The background driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`fdsim-core`).
///
/// Run parameters, the status enum, the state snapshot, and the
/// [`types::Integrator`] / [`types::DynamicSystem`] traits a physics
/// backend implements.
pub use fdsim_core as types;

/// Auxiliary outputs and reports (`fdsim-output`).
///
/// Enumerate extractors with [`output::extractor_count`] and
/// [`output::extractor_at`], and read values back out of a
/// [`output::SimulationReport`].
pub use fdsim_output as output;

/// The background driver (`fdsim-engine`).
pub use fdsim_engine as engine;

/// Common imports for typical fdsim usage.
///
/// ```rust
/// use fdsim::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use fdsim_core::{
        DynamicSystem, Integrator, IntegratorMethod, IntegratorSettings, IntegratorStats,
        ModelState, RunParameters, SimulationStatus, Stage, StepOutcome, SystemState,
        SystemStats, TerminationReason,
    };

    // Errors
    pub use fdsim_core::{ParamsError, SimulationError};

    // Outputs
    pub use fdsim_output::{
        extractor_at, extractor_count, OutputExtractor, SimulationReport, UNAVAILABLE,
    };

    // Engine
    pub use fdsim_engine::{DriverError, SimulationDriver};
}
