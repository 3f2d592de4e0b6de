//! Traits through which the driver consumes the external integrator and
//! dynamical system.
//!
//! The driver treats integration as opaque: it configures an
//! [`Integrator`], asks it to advance to a report time, and interprets the
//! returned [`StepOutcome`]. The numerical scheme and the physics behind
//! [`DynamicSystem`] are supplied by the caller.

use std::fmt;

use crate::error::SimulationError;
use crate::params::{IntegratorMethod, RunParameters};
use crate::state::SystemState;
use crate::stats::{IntegratorStats, SystemStats};

// ── StepOutcome ────────────────────────────────────────────────────

/// Result of one successful [`Integrator::step_to`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The integrator reached the requested report time.
    ReachedReportTime,
    /// The integrator stopped for good (final time or termination).
    EndOfSimulation,
    /// The integrator returned after an internal step without reaching a
    /// reportable event.
    InternalStep,
}

// ── TerminationReason ──────────────────────────────────────────────

/// Why an integrator finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// The configured final time was reached. The only non-error reason.
    ReachedFinalTime,
    /// Integration could not continue (e.g. step size underflow).
    UnrecoverableError,
    /// An event handler asked the run to stop.
    EventHandlerRequestedTermination,
    /// The integrator was given an invalid state or configuration.
    InvalidConditions,
}

impl TerminationReason {
    /// Human-readable reason string, as logged on abnormal termination.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReachedFinalTime => "reached final time",
            Self::UnrecoverableError => "an unrecoverable error occurred",
            Self::EventHandlerRequestedTermination => "an event handler requested termination",
            Self::InvalidConditions => "invalid conditions",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── IntegratorSettings ─────────────────────────────────────────────

/// Settings applied to a freshly built integrator before initialization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegratorSettings {
    /// Maximum internal steps per [`Integrator::step_to`] call.
    pub internal_step_limit: u32,
    /// Smallest step size.
    pub minimum_step_size: f64,
    /// Largest step size.
    pub maximum_step_size: f64,
    /// Target accuracy.
    pub accuracy: f64,
    /// Time at which the integrator reports [`StepOutcome::EndOfSimulation`].
    pub final_time: f64,
    /// Return control after every internal step. The worker always sets
    /// this so cancellation latency is one internal step.
    pub return_every_internal_step: bool,
}

impl From<&RunParameters> for IntegratorSettings {
    fn from(p: &RunParameters) -> Self {
        Self {
            internal_step_limit: p.integrator_step_limit,
            minimum_step_size: p.integrator_minimum_step_size,
            maximum_step_size: p.integrator_maximum_step_size,
            accuracy: p.integrator_accuracy,
            final_time: p.final_time,
            return_every_internal_step: true,
        }
    }
}

// ── Integrator ─────────────────────────────────────────────────────

/// A time-stepping integrator driving a [`DynamicSystem`].
///
/// Built by [`DynamicSystem::make_integrator`], configured, initialized
/// from a starting state, then repeatedly advanced with
/// [`step_to`](Integrator::step_to). Only ever used on the worker thread.
pub trait Integrator {
    /// Apply step limits, accuracy, and final time.
    fn configure(&mut self, settings: &IntegratorSettings) -> Result<(), SimulationError>;

    /// Reset the integrator to start from `state`.
    fn initialize(&mut self, state: &SystemState) -> Result<(), SimulationError>;

    /// Advance towards `report_time`.
    ///
    /// May return early with [`StepOutcome::InternalStep`] when configured
    /// to return after every internal step. May block for arbitrary wall
    /// time.
    fn step_to(&mut self, report_time: f64) -> Result<StepOutcome, SimulationError>;

    /// Whether the integrator has finished, for any reason.
    fn is_simulation_over(&self) -> bool;

    /// Why the integrator finished. `None` while still running.
    fn termination_reason(&self) -> Option<TerminationReason>;

    /// Current simulation time, in seconds.
    fn time(&self) -> f64;

    /// The integrator's working state. The worker clones this for reports.
    fn state(&self) -> &SystemState;

    /// Statistics since initialization.
    fn stats(&self) -> IntegratorStats;
}

// ── DynamicSystem ──────────────────────────────────────────────────

/// The simulated multibody/ODE system.
///
/// Moved into the worker thread with the initial state, hence `Send`.
pub trait DynamicSystem: Send + 'static {
    /// Build an integrator for this system using `method`.
    fn make_integrator<'s>(
        &'s self,
        method: IntegratorMethod,
    ) -> Result<Box<dyn Integrator + 's>, SimulationError>;

    /// Call counters since the system was built.
    fn stats(&self) -> SystemStats;
}

// ── ModelState ─────────────────────────────────────────────────────

/// An already-initialized system paired with its starting state.
#[derive(Clone, Debug)]
pub struct ModelState<S> {
    /// The system to integrate.
    pub system: S,
    /// State to start integrating from.
    pub state: SystemState,
}

impl<S: DynamicSystem> ModelState<S> {
    /// Pair a system with its starting state.
    pub fn new(system: S, state: SystemState) -> Self {
        Self { system, state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_params_and_return_every_step() {
        let p = RunParameters {
            integrator_step_limit: 7,
            final_time: 3.0,
            ..Default::default()
        };
        let s = IntegratorSettings::from(&p);
        assert_eq!(s.internal_step_limit, 7);
        assert_eq!(s.final_time, 3.0);
        assert_eq!(s.accuracy, p.integrator_accuracy);
        assert!(s.return_every_internal_step);
    }

    #[test]
    fn termination_reason_strings() {
        assert_eq!(
            TerminationReason::UnrecoverableError.to_string(),
            "an unrecoverable error occurred"
        );
        assert_eq!(
            TerminationReason::ReachedFinalTime.as_str(),
            "reached final time"
        );
    }
}
