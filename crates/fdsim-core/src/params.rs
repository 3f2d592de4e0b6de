//! Run parameters, validation, and the integrator method catalogue.
//!
//! [`RunParameters`] is the already-parsed configuration for one run. It is
//! a `Copy` value: the driver keeps one copy for queries and the worker
//! thread owns another, so no parameter state is shared between threads.

use std::fmt;

use crate::error::ParamsError;

// ── IntegratorMethod ───────────────────────────────────────────────

/// Integration scheme the system should instantiate for a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntegratorMethod {
    /// Error-controlled Runge-Kutta-Merson. The default choice.
    #[default]
    RungeKuttaMerson,
    /// First-order explicit Euler.
    ExplicitEuler,
    /// Second-order Runge-Kutta.
    RungeKutta2,
    /// Third-order Runge-Kutta.
    RungeKutta3,
    /// Runge-Kutta-Fehlberg.
    RungeKuttaFeldberg,
    /// Semi-explicit Euler with error estimation.
    SemiExplicitEuler2,
    /// Verlet.
    Verlet,
}

impl IntegratorMethod {
    /// Every method, in presentation order.
    pub fn all() -> &'static [IntegratorMethod] {
        &[
            Self::RungeKuttaMerson,
            Self::ExplicitEuler,
            Self::RungeKutta2,
            Self::RungeKutta3,
            Self::RungeKuttaFeldberg,
            Self::SemiExplicitEuler2,
            Self::Verlet,
        ]
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::RungeKuttaMerson => "Runge Kutta Merson",
            Self::ExplicitEuler => "Explicit Euler",
            Self::RungeKutta2 => "Runge Kutta 2",
            Self::RungeKutta3 => "Runge Kutta 3",
            Self::RungeKuttaFeldberg => "Runge Kutta Feldberg",
            Self::SemiExplicitEuler2 => "Semi Explicit Euler 2",
            Self::Verlet => "Verlet",
        }
    }
}

impl fmt::Display for IntegratorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── RunParameters ──────────────────────────────────────────────────

/// Parameters for one forward-dynamic run.
///
/// All times are seconds of simulation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunParameters {
    /// Which integration scheme to use. Default: Runge-Kutta-Merson.
    pub integrator_method: IntegratorMethod,
    /// Maximum number of internal steps within one call that advances the
    /// integrator. Default: 20000.
    pub integrator_step_limit: u32,
    /// Smallest step an error-controlled integrator may take. Default: 1e-8.
    pub integrator_minimum_step_size: f64,
    /// Largest step an integrator may take before returning. Default: 1.0.
    pub integrator_maximum_step_size: f64,
    /// Target accuracy for error-controlled integrators. Default: 1e-5.
    pub integrator_accuracy: f64,
    /// Time the run integrates up to. Default: 10.0.
    pub final_time: f64,
    /// Spacing between scheduled reports. Default: 1/120.
    pub reporting_interval: f64,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            integrator_method: IntegratorMethod::default(),
            integrator_step_limit: 20_000,
            integrator_minimum_step_size: 1.0e-8,
            integrator_maximum_step_size: 1.0,
            integrator_accuracy: 1.0e-5,
            final_time: 10.0,
            reporting_interval: 1.0 / 120.0,
        }
    }
}

impl RunParameters {
    /// Check structural invariants.
    ///
    /// Called by the worker before it builds the integrator, so an invalid
    /// configuration surfaces as an `Error` status rather than a panic.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.final_time.is_finite() || self.final_time < 0.0 {
            return Err(ParamsError::InvalidFinalTime {
                value: self.final_time,
            });
        }
        if !is_positive(self.reporting_interval) {
            return Err(ParamsError::InvalidReportingInterval {
                value: self.reporting_interval,
            });
        }
        if !is_positive(self.integrator_accuracy) {
            return Err(ParamsError::InvalidAccuracy {
                value: self.integrator_accuracy,
            });
        }
        if !is_positive(self.integrator_minimum_step_size) {
            return Err(ParamsError::InvalidStepSize {
                which: "minimum",
                value: self.integrator_minimum_step_size,
            });
        }
        if !is_positive(self.integrator_maximum_step_size) {
            return Err(ParamsError::InvalidStepSize {
                which: "maximum",
                value: self.integrator_maximum_step_size,
            });
        }
        if self.integrator_minimum_step_size > self.integrator_maximum_step_size {
            return Err(ParamsError::StepSizeRange {
                min: self.integrator_minimum_step_size,
                max: self.integrator_maximum_step_size,
            });
        }
        if self.integrator_step_limit == 0 {
            return Err(ParamsError::ZeroStepLimit);
        }
        Ok(())
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
