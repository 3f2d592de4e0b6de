//! Core types and traits for the fdsim forward-dynamics driver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the output registry and the engine: output
//! identity tokens, run parameters, simulation status, the system state
//! snapshot, and the traits through which the driver talks to an
//! external integrator and dynamical system.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod integrator;
pub mod params;
pub mod state;
pub mod stats;
pub mod status;

pub use error::{ParamsError, SimulationError};
pub use id::OutputId;
pub use integrator::{
    DynamicSystem, Integrator, IntegratorSettings, ModelState, StepOutcome, TerminationReason,
};
pub use params::{IntegratorMethod, RunParameters};
pub use state::{Stage, SystemState};
pub use stats::{IntegratorStats, SystemStats};
pub use status::SimulationStatus;
