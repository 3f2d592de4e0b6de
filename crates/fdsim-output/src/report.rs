//! Immutable simulation reports and the factory that builds them.

use std::time::Duration;

use indexmap::IndexMap;

use fdsim_core::{DynamicSystem, Integrator, OutputId, Stage, SystemState};

use crate::extractor::ExtractionContext;
use crate::registry;

/// Timing the worker measures around each report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportTiming {
    /// Wall time since the run started.
    pub wall_time: Duration,
    /// Wall time spent in the integrator call that led to this report.
    /// Zero for the initial report.
    pub step_duration: Duration,
}

/// Snapshot of a simulation at one instant.
///
/// Holds a deep copy of the system state and one scalar per registered
/// output, keyed by [`OutputId`] in registry order.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationReport {
    state: SystemState,
    auxiliary: IndexMap<OutputId, f32>,
}

impl SimulationReport {
    /// Assemble a report from its parts.
    pub fn new(state: SystemState, auxiliary: IndexMap<OutputId, f32>) -> Self {
        Self { state, auxiliary }
    }

    /// Simulation time the report was taken at.
    pub fn time(&self) -> f64 {
        self.state.time()
    }

    /// The state snapshot.
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// Value recorded for `id`, if any.
    pub fn auxiliary_value(&self, id: OutputId) -> Option<f32> {
        self.auxiliary.get(&id).copied()
    }

    /// Every recorded value, in registry order.
    pub fn auxiliary_values(&self) -> &IndexMap<OutputId, f32> {
        &self.auxiliary
    }

    /// Take the state snapshot out of the report.
    pub fn into_state(self) -> SystemState {
        self.state
    }
}

/// Build a report from the integrator's current state.
///
/// The state is cloned, then normalized by invalidating every cache at or
/// above [`Stage::Instance`] so the snapshot does not depend on what the
/// integrator happened to have realized. Every registered extractor is
/// evaluated in registry order; the resulting map has exactly one entry
/// per extractor.
pub fn build_report(
    timing: ReportTiming,
    system: &dyn DynamicSystem,
    integrator: &dyn Integrator,
) -> SimulationReport {
    let mut state = integrator.state().clone();
    state.invalidate_all_cache_at_or_above(Stage::Instance);

    let ctx = ExtractionContext {
        timing,
        system,
        integrator,
    };
    let outputs = registry::extractors();
    let mut auxiliary = IndexMap::with_capacity(outputs.len());
    for output in outputs {
        auxiliary.insert(output.id(), output.extract(&ctx));
    }

    SimulationReport::new(state, auxiliary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::UNAVAILABLE;
    use crate::{extractor_count, extractors, integrator_outputs, system_outputs};
    use fdsim_core::{
        IntegratorMethod, IntegratorSettings, IntegratorStats, SimulationError, StepOutcome,
        SystemStats, TerminationReason,
    };

    struct FrozenIntegrator {
        state: SystemState,
    }

    impl Integrator for FrozenIntegrator {
        fn configure(&mut self, _: &IntegratorSettings) -> Result<(), SimulationError> {
            Ok(())
        }
        fn initialize(&mut self, state: &SystemState) -> Result<(), SimulationError> {
            self.state = state.clone();
            Ok(())
        }
        fn step_to(&mut self, _: f64) -> Result<StepOutcome, SimulationError> {
            Ok(StepOutcome::EndOfSimulation)
        }
        fn is_simulation_over(&self) -> bool {
            true
        }
        fn termination_reason(&self) -> Option<TerminationReason> {
            Some(TerminationReason::ReachedFinalTime)
        }
        fn time(&self) -> f64 {
            self.state.time()
        }
        fn state(&self) -> &SystemState {
            &self.state
        }
        fn stats(&self) -> IntegratorStats {
            IntegratorStats {
                accuracy_in_use: 0.25,
                num_steps_taken: 12,
                ..Default::default()
            }
        }
    }

    struct CountingSystem;

    impl DynamicSystem for CountingSystem {
        fn make_integrator<'s>(
            &'s self,
            _: IntegratorMethod,
        ) -> Result<Box<dyn Integrator + 's>, SimulationError> {
            Ok(Box::new(FrozenIntegrator {
                state: SystemState::new(0.0, vec![], vec![]),
            }))
        }
        fn stats(&self) -> SystemStats {
            SystemStats {
                num_realize_calls: 40,
                ..Default::default()
            }
        }
    }

    fn frozen_at(time: f64) -> FrozenIntegrator {
        let mut state = SystemState::new(time, vec![1.0, 2.0], vec![0.5]);
        state.realize(Stage::Acceleration);
        FrozenIntegrator { state }
    }

    fn value_named(report: &SimulationReport, name: &str) -> f32 {
        extractors()
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.extract_from_report(report))
            .unwrap_or(UNAVAILABLE)
    }

    #[test]
    fn report_has_one_entry_per_extractor() {
        let report = build_report(ReportTiming::default(), &CountingSystem, &frozen_at(0.0));
        assert_eq!(report.auxiliary_values().len(), extractor_count());
        for (entry, extractor) in report.auxiliary_values().keys().zip(extractors()) {
            assert_eq!(*entry, extractor.id());
        }
    }

    #[test]
    fn snapshot_is_normalized_copy() {
        let integ = frozen_at(1.5);
        let report = build_report(ReportTiming::default(), &CountingSystem, &integ);
        assert_eq!(report.time(), 1.5);
        assert_eq!(report.state().q(), integ.state().q());
        assert!(report.state().stage() < Stage::Instance);
        assert_eq!(integ.state().stage(), Stage::Acceleration);
    }

    #[test]
    fn values_come_from_the_right_source() {
        let timing = ReportTiming {
            wall_time: Duration::from_millis(1500),
            step_duration: Duration::from_millis(250),
        };
        let report = build_report(timing, &CountingSystem, &frozen_at(0.0));

        assert_eq!(value_named(&report, "Wall time"), 1.5);
        assert_eq!(value_named(&report, "Step Wall Time"), 0.25);
        assert_eq!(value_named(&report, "AccuracyInUse"), 0.25);
        assert_eq!(value_named(&report, "NumStepsTaken"), 12.0);
        assert_eq!(value_named(&report, "NumRealizeCalls"), 40.0);
        assert_eq!(value_named(&report, "NumProjectQCalls"), 0.0);

        assert!(integrator_outputs::integrator_extractor_count() > 0);
        assert!(system_outputs::system_extractor_count() > 0);
    }

    #[test]
    fn building_is_deterministic() {
        let integ = frozen_at(2.0);
        let timing = ReportTiming {
            wall_time: Duration::from_secs(3),
            step_duration: Duration::from_millis(1),
        };
        let a = build_report(timing, &CountingSystem, &integ);
        let b = build_report(timing, &CountingSystem, &integ);
        assert_eq!(a, b);
    }
}
