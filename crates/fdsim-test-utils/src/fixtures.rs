//! Deterministic test system and integrator.
//!
//! [`TestSystem`] models bodies moving at constant speed (`q += u * dt`).
//! Its [`TestIntegrator`] lands exactly on every requested report time,
//! optionally via several internal sub-steps, and stops at the configured
//! final time. [`Fault`] injects the failure modes the driver must contain.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use fdsim_core::{
    DynamicSystem, Integrator, IntegratorMethod, IntegratorSettings, IntegratorStats,
    SimulationError, Stage, StepOutcome, SystemState, SystemStats, TerminationReason,
};

/// Failure injected into a [`TestSystem`] run.
///
/// Call numbers count [`Integrator::step_to`] calls, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// `make_integrator` fails.
    RejectIntegrator,
    /// `initialize` fails with a physics error.
    PhysicsErrorOnInitialize,
    /// `step_to` returns a physics error on the given call.
    PhysicsErrorOnCall(u64),
    /// `step_to` returns a non-physics integrator error on the given call.
    IntegratorErrorOnCall(u64),
    /// `step_to` panics on the given call.
    PanicOnCall(u64),
    /// The integrator gives up on the given call (unrecoverable error).
    DivergeOnCall(u64),
}

/// Behaviour knobs for [`TestSystem`].
#[derive(Clone, Copy, Debug)]
pub struct TestSystemConfig {
    /// Internal steps needed to reach each requested time. Minimum 1.
    pub substeps_per_report: u32,
    /// Wall time each `step_to` call sleeps for.
    pub step_delay: Duration,
    /// Injected failure, if any.
    pub fault: Option<Fault>,
}

impl Default for TestSystemConfig {
    fn default() -> Self {
        Self {
            substeps_per_report: 1,
            step_delay: Duration::ZERO,
            fault: None,
        }
    }
}

impl TestSystemConfig {
    pub fn with_fault(fault: Fault) -> Self {
        Self {
            fault: Some(fault),
            ..Default::default()
        }
    }

    pub fn with_delay(step_delay: Duration) -> Self {
        Self {
            step_delay,
            ..Default::default()
        }
    }
}

// ── TestSystem ─────────────────────────────────────────────────────

/// Constant-speed system with call counters.
#[derive(Debug, Default)]
pub struct TestSystem {
    config: TestSystemConfig,
    realize_calls: AtomicU64,
    project_q_calls: AtomicU64,
}

impl TestSystem {
    pub fn new(config: TestSystemConfig) -> Self {
        Self {
            config,
            realize_calls: AtomicU64::new(0),
            project_q_calls: AtomicU64::new(0),
        }
    }

    fn realize(&self, state: &mut SystemState, stage: Stage) {
        self.realize_calls.fetch_add(1, Ordering::Relaxed);
        state.realize(stage);
    }
}

impl DynamicSystem for TestSystem {
    fn make_integrator<'s>(
        &'s self,
        method: IntegratorMethod,
    ) -> Result<Box<dyn Integrator + 's>, SimulationError> {
        if self.config.fault == Some(Fault::RejectIntegrator) {
            return Err(SimulationError::Integrator {
                reason: format!("{method} is not available for this system"),
            });
        }
        Ok(Box::new(TestIntegrator::new(self)))
    }

    fn stats(&self) -> SystemStats {
        SystemStats {
            num_realize_calls: self.realize_calls.load(Ordering::Relaxed),
            num_project_q_calls: self.project_q_calls.load(Ordering::Relaxed),
            ..Default::default()
        }
    }
}

// ── TestIntegrator ─────────────────────────────────────────────────

/// Integrator for [`TestSystem`].
pub struct TestIntegrator<'s> {
    system: &'s TestSystem,
    settings: Option<IntegratorSettings>,
    state: SystemState,
    target: Option<f64>,
    remaining_substeps: u32,
    calls: u64,
    termination: Option<TerminationReason>,
    stats: IntegratorStats,
}

impl<'s> TestIntegrator<'s> {
    pub fn new(system: &'s TestSystem) -> Self {
        Self {
            system,
            settings: None,
            state: SystemState::new(0.0, Vec::new(), Vec::new()),
            target: None,
            remaining_substeps: 0,
            calls: 0,
            termination: None,
            stats: IntegratorStats::default(),
        }
    }

    fn final_time(&self) -> f64 {
        self.settings.map_or(f64::INFINITY, |s| s.final_time)
    }

    fn advance(&mut self, to: f64) {
        let dt = to - self.state.time();
        let speeds = self.state.u().to_vec();
        for (q, u) in self.state.q_mut().iter_mut().zip(speeds) {
            *q += u * dt;
        }
        self.state.set_time(to);
        self.system.realize(&mut self.state, Stage::Acceleration);
        self.stats.num_steps_attempted += 1;
        self.stats.num_steps_taken += 1;
        self.stats.num_realizations += 1;
        self.stats.predicted_next_step_size = dt.abs();
    }

    fn inject_fault(&mut self) -> Result<Option<StepOutcome>, SimulationError> {
        let call = self.calls;
        match self.system.config.fault {
            Some(Fault::PhysicsErrorOnCall(n)) if n == call => Err(SimulationError::Physics {
                reason: format!("constraint violated at call {call}"),
            }),
            Some(Fault::IntegratorErrorOnCall(n)) if n == call => {
                Err(SimulationError::Integrator {
                    reason: format!("step size underflow at call {call}"),
                })
            }
            Some(Fault::PanicOnCall(n)) if n == call => {
                panic!("integrator blew up at call {call}")
            }
            Some(Fault::DivergeOnCall(n)) if n == call => {
                self.termination = Some(TerminationReason::UnrecoverableError);
                Ok(Some(StepOutcome::EndOfSimulation))
            }
            _ => Ok(None),
        }
    }
}

impl Integrator for TestIntegrator<'_> {
    fn configure(&mut self, settings: &IntegratorSettings) -> Result<(), SimulationError> {
        self.settings = Some(*settings);
        self.stats.accuracy_in_use = settings.accuracy;
        Ok(())
    }

    fn initialize(&mut self, state: &SystemState) -> Result<(), SimulationError> {
        if self.system.config.fault == Some(Fault::PhysicsErrorOnInitialize) {
            return Err(SimulationError::Physics {
                reason: "initial state violates constraints".into(),
            });
        }
        self.state = state.clone();
        self.system.project_q_calls.fetch_add(1, Ordering::Relaxed);
        self.system.realize(&mut self.state, Stage::Acceleration);
        if self.state.time() >= self.final_time() {
            self.termination = Some(TerminationReason::ReachedFinalTime);
        }
        Ok(())
    }

    fn step_to(&mut self, report_time: f64) -> Result<StepOutcome, SimulationError> {
        self.calls += 1;
        if !self.system.config.step_delay.is_zero() {
            std::thread::sleep(self.system.config.step_delay);
        }
        if let Some(outcome) = self.inject_fault()? {
            return Ok(outcome);
        }
        if self.termination.is_some() {
            return Ok(StepOutcome::EndOfSimulation);
        }

        let final_time = self.final_time();
        let target = report_time.min(final_time);
        if self.target != Some(target) || self.remaining_substeps == 0 {
            self.target = Some(target);
            self.remaining_substeps = self.system.config.substeps_per_report.max(1);
        }

        self.remaining_substeps -= 1;
        if self.remaining_substeps > 0 {
            let now = self.state.time();
            let fraction = 1.0 / f64::from(self.remaining_substeps + 1);
            self.advance(now + (target - now) * fraction);
            return Ok(StepOutcome::InternalStep);
        }

        self.advance(target);
        if report_time > final_time {
            self.termination = Some(TerminationReason::ReachedFinalTime);
            Ok(StepOutcome::EndOfSimulation)
        } else {
            Ok(StepOutcome::ReachedReportTime)
        }
    }

    fn is_simulation_over(&self) -> bool {
        self.termination.is_some()
    }

    fn termination_reason(&self) -> Option<TerminationReason> {
        self.termination
    }

    fn time(&self) -> f64 {
        self.state.time()
    }

    fn state(&self) -> &SystemState {
        &self.state
    }

    fn stats(&self) -> IntegratorStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(final_time: f64) -> IntegratorSettings {
        IntegratorSettings::from(&fdsim_core::RunParameters {
            final_time,
            ..Default::default()
        })
    }

    #[test]
    fn lands_on_report_times_and_stops_past_final() {
        let sys = TestSystem::default();
        let mut integ = sys.make_integrator(IntegratorMethod::default()).unwrap();
        integ.configure(&settings(1.0)).unwrap();
        integ
            .initialize(&SystemState::new(0.0, vec![0.0], vec![2.0]))
            .unwrap();

        assert_eq!(integ.step_to(0.5).unwrap(), StepOutcome::ReachedReportTime);
        assert_eq!(integ.time(), 0.5);
        assert_eq!(integ.state().q(), &[1.0]);

        assert_eq!(integ.step_to(1.0).unwrap(), StepOutcome::ReachedReportTime);
        assert!(!integ.is_simulation_over());

        assert_eq!(integ.step_to(1.5).unwrap(), StepOutcome::EndOfSimulation);
        assert_eq!(integ.time(), 1.0);
        assert_eq!(
            integ.termination_reason(),
            Some(TerminationReason::ReachedFinalTime)
        );
        assert!(sys.stats().num_realize_calls >= 3);
    }

    #[test]
    fn substeps_return_internal_steps_first() {
        let sys = TestSystem::new(TestSystemConfig {
            substeps_per_report: 3,
            ..Default::default()
        });
        let mut integ = sys.make_integrator(IntegratorMethod::default()).unwrap();
        integ.configure(&settings(10.0)).unwrap();
        integ
            .initialize(&SystemState::new(0.0, vec![0.0], vec![1.0]))
            .unwrap();

        assert_eq!(integ.step_to(0.3).unwrap(), StepOutcome::InternalStep);
        assert_eq!(integ.step_to(0.3).unwrap(), StepOutcome::InternalStep);
        assert!(integ.time() < 0.3);
        assert_eq!(integ.step_to(0.3).unwrap(), StepOutcome::ReachedReportTime);
        assert_eq!(integ.time(), 0.3);
    }

    #[test]
    fn divergence_sets_abnormal_reason() {
        let sys = TestSystem::new(TestSystemConfig::with_fault(Fault::DivergeOnCall(1)));
        let mut integ = sys.make_integrator(IntegratorMethod::default()).unwrap();
        integ.configure(&settings(10.0)).unwrap();
        integ
            .initialize(&SystemState::new(0.0, vec![0.0], vec![1.0]))
            .unwrap();
        assert_eq!(integ.step_to(1.0).unwrap(), StepOutcome::EndOfSimulation);
        assert!(integ.is_simulation_over());
        assert_eq!(
            integ.termination_reason(),
            Some(TerminationReason::UnrecoverableError)
        );
    }
}
