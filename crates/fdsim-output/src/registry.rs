//! Process-wide, lazily built list of every auxiliary output.
//!
//! Built exactly once, on first access, behind a [`OnceLock`]. The list is
//! immutable afterwards: every call observes the same slice, and each
//! extractor's [`OutputId`] stays valid for the life of the process. This
//! is what lets a report built on the worker thread be correlated with
//! its extractors on the owner thread.
//!
//! Order: the two built-in timing outputs, then the integrator table, then
//! the system table.

use std::ops::Range;
use std::sync::OnceLock;

use fdsim_core::OutputId;

use crate::error::OutputError;
use crate::extractor::{BuiltinOutput, ExtractorKind, OutputExtractor};
use crate::integrator_outputs::create_integrator_extractors;
use crate::system_outputs::create_system_extractors;

struct Registry {
    outputs: Vec<OutputExtractor>,
    integrator: Range<usize>,
    system: Range<usize>,
}

fn create_registry() -> Registry {
    let integrator = create_integrator_extractors();
    let system = create_system_extractors();

    let mut outputs = Vec::with_capacity(2 + integrator.len() + system.len());
    outputs.push(OutputExtractor::new(
        "Wall time",
        "Total cumulative time spent computing the simulation",
        OutputId::next(),
        ExtractorKind::AuxiliaryBuiltin(BuiltinOutput::WallTime),
    ));
    outputs.push(OutputExtractor::new(
        "Step Wall Time",
        "How long it took, in wall time, to compute the last integration step",
        OutputId::next(),
        ExtractorKind::AuxiliaryBuiltin(BuiltinOutput::StepDuration),
    ));

    let integrator_start = outputs.len();
    outputs.extend(integrator);
    let system_start = outputs.len();
    outputs.extend(system);

    Registry {
        integrator: integrator_start..system_start,
        system: system_start..outputs.len(),
        outputs,
    }
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(create_registry)
}

/// Every registered extractor, in registry order.
pub fn extractors() -> &'static [OutputExtractor] {
    &registry().outputs
}

/// Number of registered extractors (built-ins + integrator + system).
pub fn extractor_count() -> usize {
    extractors().len()
}

/// The `index`-th registered extractor.
pub fn extractor_at(index: usize) -> Result<OutputExtractor, OutputError> {
    let outputs = extractors();
    outputs
        .get(index)
        .cloned()
        .ok_or(OutputError::IndexOutOfRange {
            index,
            len: outputs.len(),
        })
}

/// Look up a registered extractor by identity token.
pub fn find_extractor(id: OutputId) -> Option<&'static OutputExtractor> {
    extractors().iter().find(|e| e.id() == id)
}

/// The registered extractor for a built-in timing output.
pub fn builtin_extractor(which: BuiltinOutput) -> &'static OutputExtractor {
    match which {
        BuiltinOutput::WallTime => &extractors()[0],
        BuiltinOutput::StepDuration => &extractors()[1],
    }
}

pub(crate) fn integrator_range() -> Range<usize> {
    registry().integrator.clone()
}

pub(crate) fn system_range() -> Range<usize> {
    registry().system.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator_outputs::{integrator_extractor_at, integrator_extractor_count};
    use crate::system_outputs::{system_extractor_at, system_extractor_count};
    use std::collections::HashSet;

    #[test]
    fn count_is_builtins_plus_tables() {
        assert_eq!(
            extractor_count(),
            2 + integrator_extractor_count() + system_extractor_count()
        );
    }

    #[test]
    fn same_slice_on_every_call() {
        let a = extractors();
        let b = extractors();
        assert!(std::ptr::eq(a, b));
        assert_eq!(extractor_at(0).unwrap(), a[0]);
    }

    #[test]
    fn concurrent_first_access_observes_one_registry() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| extractors().as_ptr() as usize))
            .collect();
        let addrs: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(addrs.len(), 1);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let len = extractor_count();
        assert_eq!(
            extractor_at(len),
            Err(OutputError::IndexOutOfRange { index: len, len })
        );
        assert!(integrator_extractor_at(integrator_extractor_count()).is_err());
        assert!(system_extractor_at(system_extractor_count()).is_err());
    }

    #[test]
    fn ids_are_unique_and_findable() {
        let ids: HashSet<_> = extractors().iter().map(|e| e.id()).collect();
        assert_eq!(ids.len(), extractor_count());
        for e in extractors() {
            assert_eq!(find_extractor(e.id()), Some(e));
        }
        assert_eq!(find_extractor(OutputId::next()), None);
    }

    #[test]
    fn builtins_come_first() {
        assert_eq!(builtin_extractor(BuiltinOutput::WallTime).name(), "Wall time");
        assert_eq!(
            builtin_extractor(BuiltinOutput::StepDuration).name(),
            "Step Wall Time"
        );
        let first_integrator = integrator_extractor_at(0).unwrap();
        assert_eq!(extractor_at(2).unwrap(), first_integrator);
        let first_system = system_extractor_at(0).unwrap();
        assert_eq!(
            extractor_at(2 + integrator_extractor_count()).unwrap(),
            first_system
        );
    }
}
