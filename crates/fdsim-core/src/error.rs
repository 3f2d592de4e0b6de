//! Error types for the fdsim driver.
//!
//! Organized by origin: configuration errors detected when the integrator
//! is built ([`ParamsError`]) and failures raised while the worker runs
//! ([`SimulationError`]). Cancellation is a status, not an error.

use thiserror::Error;

/// Invalid [`RunParameters`](crate::RunParameters), detected by
/// [`validate()`](crate::RunParameters::validate).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParamsError {
    /// `final_time` is NaN, infinite, or negative.
    #[error("final_time must be finite and non-negative, got {value}")]
    InvalidFinalTime {
        /// The invalid value.
        value: f64,
    },
    /// `reporting_interval` is NaN, infinite, zero, or negative.
    #[error("reporting_interval must be finite and positive, got {value}")]
    InvalidReportingInterval {
        /// The invalid value.
        value: f64,
    },
    /// `integrator_accuracy` is NaN, infinite, zero, or negative.
    #[error("integrator_accuracy must be finite and positive, got {value}")]
    InvalidAccuracy {
        /// The invalid value.
        value: f64,
    },
    /// A step size is NaN, infinite, zero, or negative.
    #[error("{which} step size must be finite and positive, got {value}")]
    InvalidStepSize {
        /// `"minimum"` or `"maximum"`.
        which: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// The minimum step size exceeds the maximum step size.
    #[error("minimum step size {min} exceeds maximum step size {max}")]
    StepSizeRange {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// `integrator_step_limit` is zero.
    #[error("integrator_step_limit must be at least 1")]
    ZeroStepLimit,
}

/// A failure raised inside the simulation worker.
///
/// The worker never lets one of these escape its thread: every variant is
/// logged and mapped to [`SimulationStatus::Error`](crate::SimulationStatus::Error).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// The run parameters were rejected while building the integrator.
    #[error("invalid run parameters: {0}")]
    InvalidParameters(#[from] ParamsError),
    /// The model/physics layer failed (e.g. a constraint could not be
    /// satisfied while realizing the state).
    #[error("physics failure: {reason}")]
    Physics {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The integrator could not be built, configured, or stepped.
    #[error("integrator failure: {reason}")]
    Integrator {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl SimulationError {
    /// Whether this error belongs to the physics-layer family.
    pub fn is_physics(&self) -> bool {
        matches!(self, Self::Physics { .. })
    }
}
