//! Named scalar extractors.
//!
//! Each [`OutputExtractor`] carries a display name, a description, a
//! process-unique [`OutputId`], and an [`ExtractorKind`] saying where its
//! value comes from. Extractors are plain values: cloning one is cheap and
//! the clone is equal to the original.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use fdsim_core::{DynamicSystem, Integrator, OutputId};

use crate::report::{ReportTiming, SimulationReport};

/// Value returned when a report has no entry for an extractor.
///
/// Callers must treat it as "unavailable", never as a physical value.
pub const UNAVAILABLE: f32 = -1337.0;

// ── ExtractorKind ──────────────────────────────────────────────────

/// Timing values the driver measures itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinOutput {
    /// Wall time since the run started, in seconds.
    WallTime,
    /// Wall time spent in the last integrator call, in seconds.
    StepDuration,
}

/// Where an extractor's value comes from.
#[derive(Clone, Copy)]
pub enum ExtractorKind {
    /// Measured by the driver and stored in the report.
    AuxiliaryBuiltin(BuiltinOutput),
    /// Derived from the integrator at report time.
    IntegratorDerived(fn(&dyn Integrator) -> f32),
    /// Derived from the dynamical system at report time.
    SystemDerived(fn(&dyn DynamicSystem) -> f32),
}

impl fmt::Debug for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuxiliaryBuiltin(b) => f.debug_tuple("AuxiliaryBuiltin").field(b).finish(),
            Self::IntegratorDerived(_) => f.write_str("IntegratorDerived(..)"),
            Self::SystemDerived(_) => f.write_str("SystemDerived(..)"),
        }
    }
}

// ── ExtractionContext ──────────────────────────────────────────────

/// Everything a live extraction may read from.
pub struct ExtractionContext<'a> {
    /// Timing measured by the worker for this report.
    pub timing: ReportTiming,
    /// The system being integrated.
    pub system: &'a dyn DynamicSystem,
    /// The integrator at the instant the report is taken.
    pub integrator: &'a dyn Integrator,
}

// ── OutputExtractor ────────────────────────────────────────────────

/// A named, pure scalar extractor.
///
/// Equality and hashing consider only `(name, description, id)`.
#[derive(Clone, Debug)]
pub struct OutputExtractor {
    name: Cow<'static, str>,
    description: Cow<'static, str>,
    id: OutputId,
    kind: ExtractorKind,
}

impl OutputExtractor {
    /// Create an extractor.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        id: OutputId,
        kind: ExtractorKind,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            id,
            kind,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Identity token keying this extractor's value in reports.
    pub fn id(&self) -> OutputId {
        self.id
    }

    /// Where the value comes from.
    pub fn kind(&self) -> ExtractorKind {
        self.kind
    }

    /// Evaluate against a live simulation.
    pub fn extract(&self, ctx: &ExtractionContext<'_>) -> f32 {
        match self.kind {
            ExtractorKind::AuxiliaryBuiltin(BuiltinOutput::WallTime) => {
                ctx.timing.wall_time.as_secs_f32()
            }
            ExtractorKind::AuxiliaryBuiltin(BuiltinOutput::StepDuration) => {
                ctx.timing.step_duration.as_secs_f32()
            }
            ExtractorKind::IntegratorDerived(f) => f(ctx.integrator),
            ExtractorKind::SystemDerived(f) => f(ctx.system),
        }
    }

    /// Read this extractor's value back out of a report.
    ///
    /// Returns [`UNAVAILABLE`] if the report has no entry for [`id`](Self::id).
    pub fn extract_from_report(&self, report: &SimulationReport) -> f32 {
        report.auxiliary_value(self.id).unwrap_or(UNAVAILABLE)
    }

    /// Batch form of [`extract_from_report`](Self::extract_from_report).
    ///
    /// Overwrites `out[i]` with the value from `reports[i]`. Only the
    /// first `min(reports.len(), out.len())` slots are written; the rest
    /// of `out` is left untouched.
    pub fn extract_from_reports(&self, reports: &[SimulationReport], out: &mut [f32]) {
        for (slot, report) in out.iter_mut().zip(reports) {
            *slot = self.extract_from_report(report);
        }
    }
}

impl PartialEq for OutputExtractor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.description == other.description && self.id == other.id
    }
}

impl Eq for OutputExtractor {}

impl Hash for OutputExtractor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.description.hash(state);
        self.id.hash(state);
    }
}
