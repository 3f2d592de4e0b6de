//! Extractors derived from dynamical-system call counters.

use fdsim_core::{DynamicSystem, OutputId};

use crate::error::OutputError;
use crate::extractor::{ExtractorKind, OutputExtractor};
use crate::registry;

fn system_output(
    name: &'static str,
    description: &'static str,
    extract: fn(&dyn DynamicSystem) -> f32,
) -> OutputExtractor {
    OutputExtractor::new(
        name,
        description,
        OutputId::next(),
        ExtractorKind::SystemDerived(extract),
    )
}

/// Build the system table. Called once, by the registry.
pub(crate) fn create_system_extractors() -> Vec<OutputExtractor> {
    vec![
        system_output(
            "NumRealizeCalls",
            "The number of times the system realized a state",
            |s| s.stats().num_realize_calls as f32,
        ),
        system_output(
            "NumPrescribeQCalls",
            "The number of times the system prescribed positions",
            |s| s.stats().num_prescribe_q_calls as f32,
        ),
        system_output(
            "NumPrescribeUCalls",
            "The number of times the system prescribed velocities",
            |s| s.stats().num_prescribe_u_calls as f32,
        ),
        system_output(
            "NumProjectQCalls",
            "The number of times the system projected positions",
            |s| s.stats().num_project_q_calls as f32,
        ),
        system_output(
            "NumProjectUCalls",
            "The number of times the system projected velocities",
            |s| s.stats().num_project_u_calls as f32,
        ),
        system_output(
            "NumHandleEventCalls",
            "The number of times an event handler was invoked",
            |s| s.stats().num_handle_event_calls as f32,
        ),
        system_output(
            "NumReportEventCalls",
            "The number of times a report-event handler was invoked",
            |s| s.stats().num_report_event_calls as f32,
        ),
    ]
}

/// Number of system-derived extractors.
pub fn system_extractor_count() -> usize {
    registry::system_range().len()
}

/// The `index`-th system-derived extractor.
pub fn system_extractor_at(index: usize) -> Result<OutputExtractor, OutputError> {
    let range = registry::system_range();
    if index >= range.len() {
        return Err(OutputError::IndexOutOfRange {
            index,
            len: range.len(),
        });
    }
    registry::extractor_at(range.start + index)
}
