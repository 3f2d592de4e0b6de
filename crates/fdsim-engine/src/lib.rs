//! Background forward-dynamics simulation driver.
//!
//! [`SimulationDriver`] owns one worker thread that integrates a
//! [`DynamicSystem`](fdsim_core::DynamicSystem) from an initial state,
//! emits [`SimulationReport`](fdsim_output::SimulationReport)s to an
//! owner-supplied callback, and publishes a coarse
//! [`SimulationStatus`](fdsim_core::SimulationStatus) through an atomic
//! cell the owner polls.
//!
//! # Architecture
//!
//! ```text
//! Owner Thread                      Worker Thread ("fdsim-worker")
//!     |                                 |
//!     |--start(model, params, cb)------>| validate params, build integrator
//!     |   [moves SimulatorThreadInput]  | status <- Running
//!     |                                 | cb(report @ t_start)
//!     |--status()  [atomic load]        | loop:
//!     |                                 |   stop_flag? -> Cancelled
//!     |--request_stop() [atomic store]->|   step_to(t_start + k*interval)
//!     |                                 |   cb(report) on report time
//!     |--join() / stop() / drop         |   tail report at end if needed
//!     |<------------thread exit---------| status <- terminal
//! ```
//!
//! The status cell behind [`SimulationDriver::status`] is internal; owners
//! only ever see it through the driver.
//!
//! ```compile_fail
//! use fdsim_engine::shared::SharedState;
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod driver;
mod shared;
mod worker;

pub use driver::{DriverError, SimulationDriver};
