//! Counters the integrator and the dynamical system expose for reporting.
//!
//! These are plain value types: an [`Integrator`](crate::Integrator) or
//! [`DynamicSystem`](crate::DynamicSystem) fills one in on request and the
//! output extractors read individual fields out of it.

/// Integrator statistics since initialization.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntegratorStats {
    /// Accuracy being used for error control.
    pub accuracy_in_use: f64,
    /// Step size the next advance will attempt first.
    pub predicted_next_step_size: f64,
    /// Steps attempted, successful or not.
    pub num_steps_attempted: u64,
    /// Steps successfully taken.
    pub num_steps_taken: u64,
    /// State realizations performed.
    pub num_realizations: u64,
    /// Times the positions Q were projected.
    pub num_q_projections: u64,
    /// Times the velocities U were projected.
    pub num_u_projections: u64,
    /// Steps rejected because the error was too high.
    pub num_error_test_failures: u64,
    /// Steps rejected because internal iterations did not converge.
    pub num_convergence_test_failures: u64,
    /// Steps rejected because realizing the state failed.
    pub num_realization_failures: u64,
    /// Steps rejected because projecting Q failed.
    pub num_q_projection_failures: u64,
    /// Steps rejected because projecting U failed.
    pub num_u_projection_failures: u64,
    /// Steps rejected because any projection failed.
    pub num_projection_failures: u64,
    /// Internal iterations in steps that converged.
    pub num_convergent_iterations: u64,
    /// Internal iterations in steps that diverged.
    pub num_divergent_iterations: u64,
    /// All internal iterations.
    pub num_iterations: u64,
}

/// Dynamical-system call counters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SystemStats {
    /// Calls that realized a state.
    pub num_realize_calls: u64,
    /// Calls that prescribed positions.
    pub num_prescribe_q_calls: u64,
    /// Calls that prescribed velocities.
    pub num_prescribe_u_calls: u64,
    /// Calls that projected positions.
    pub num_project_q_calls: u64,
    /// Calls that projected velocities.
    pub num_project_u_calls: u64,
    /// Event handler invocations.
    pub num_handle_event_calls: u64,
    /// Report-event handler invocations.
    pub num_report_event_calls: u64,
}
