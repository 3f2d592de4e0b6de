//! Extractors derived from integrator statistics.

use fdsim_core::{Integrator, OutputId};

use crate::error::OutputError;
use crate::extractor::{ExtractorKind, OutputExtractor};
use crate::registry;

fn integrator_output(
    name: &'static str,
    description: &'static str,
    extract: fn(&dyn Integrator) -> f32,
) -> OutputExtractor {
    OutputExtractor::new(
        name,
        description,
        OutputId::next(),
        ExtractorKind::IntegratorDerived(extract),
    )
}

/// Build the integrator table. Called once, by the registry.
pub(crate) fn create_integrator_extractors() -> Vec<OutputExtractor> {
    vec![
        integrator_output(
            "AccuracyInUse",
            "The accuracy which is being used for error control. Usually the same value that was configured for the run",
            |i| i.stats().accuracy_in_use as f32,
        ),
        integrator_output(
            "PredictedNextStepSize",
            "The step size that will be attempted first on the next integrator call",
            |i| i.stats().predicted_next_step_size as f32,
        ),
        integrator_output(
            "NumStepsAttempted",
            "The total number of steps that have been attempted (successfully or unsuccessfully)",
            |i| i.stats().num_steps_attempted as f32,
        ),
        integrator_output(
            "NumStepsTaken",
            "The total number of steps that have been successfully taken",
            |i| i.stats().num_steps_taken as f32,
        ),
        integrator_output(
            "NumRealizations",
            "The total number of state realizations that have been performed",
            |i| i.stats().num_realizations as f32,
        ),
        integrator_output(
            "NumQProjections",
            "The total number of times the state positions Q have been projected",
            |i| i.stats().num_q_projections as f32,
        ),
        integrator_output(
            "NumUProjections",
            "The total number of times the state velocities U have been projected",
            |i| i.stats().num_u_projections as f32,
        ),
        integrator_output(
            "NumErrorTestFailures",
            "The number of attempted steps that failed due to the error being unacceptably high",
            |i| i.stats().num_error_test_failures as f32,
        ),
        integrator_output(
            "NumConvergenceTestFailures",
            "The number of attempted steps that failed due to non-convergence of internal step iterations",
            |i| i.stats().num_convergence_test_failures as f32,
        ),
        integrator_output(
            "NumRealizationFailures",
            "The number of attempted steps that failed due to an error when realizing the state",
            |i| i.stats().num_realization_failures as f32,
        ),
        integrator_output(
            "NumQProjectionFailures",
            "The number of attempted steps that failed due to an error when projecting the state positions (Q)",
            |i| i.stats().num_q_projection_failures as f32,
        ),
        integrator_output(
            "NumUProjectionFailures",
            "The number of attempted steps that failed due to an error when projecting the state velocities (U)",
            |i| i.stats().num_u_projection_failures as f32,
        ),
        integrator_output(
            "NumProjectionFailures",
            "The number of attempted steps that failed due to an error when projecting the state (either a Q- or U-projection)",
            |i| i.stats().num_projection_failures as f32,
        ),
        integrator_output(
            "NumConvergentIterations",
            "For iterative methods, the number of internal step iterations in steps that led to convergence",
            |i| i.stats().num_convergent_iterations as f32,
        ),
        integrator_output(
            "NumDivergentIterations",
            "For iterative methods, the number of internal step iterations in steps that did not lead to convergence",
            |i| i.stats().num_divergent_iterations as f32,
        ),
        integrator_output(
            "NumIterations",
            "For iterative methods, the total number of internal step iterations, convergent or not",
            |i| i.stats().num_iterations as f32,
        ),
    ]
}

/// Number of integrator-derived extractors.
pub fn integrator_extractor_count() -> usize {
    registry::integrator_range().len()
}

/// The `index`-th integrator-derived extractor.
pub fn integrator_extractor_at(index: usize) -> Result<OutputExtractor, OutputError> {
    let range = registry::integrator_range();
    if index >= range.len() {
        return Err(OutputError::IndexOutOfRange {
            index,
            len: range.len(),
        });
    }
    registry::extractor_at(range.start + index)
}
