//! Auxiliary output registry and simulation reports for fdsim.
//!
//! An [`OutputExtractor`] names one scalar that can be pulled out of a
//! running simulation: wall-clock timing, an integrator statistic, or a
//! system call counter. The process-wide [`registry`] lists them all in a
//! fixed order, and [`build_report`] evaluates every one of them into an
//! immutable [`SimulationReport`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod extractor;
pub mod integrator_outputs;
pub mod registry;
pub mod report;
pub mod system_outputs;

pub use error::OutputError;
pub use extractor::{BuiltinOutput, ExtractionContext, ExtractorKind, OutputExtractor, UNAVAILABLE};
pub use integrator_outputs::{integrator_extractor_at, integrator_extractor_count};
pub use registry::{builtin_extractor, extractor_at, extractor_count, extractors, find_extractor};
pub use report::{build_report, ReportTiming, SimulationReport};
pub use system_outputs::{system_extractor_at, system_extractor_count};
