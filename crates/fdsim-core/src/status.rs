//! Coarse-grained run status observed by the owning thread.

use std::fmt;

/// Status of a simulation run.
///
/// `Initializing` is the only start state. `Completed`, `Cancelled`, and
/// `Error` are terminal and mutually exclusive. Only the worker loop
/// drives transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SimulationStatus {
    /// The worker is building and initializing the integrator.
    Initializing = 0,
    /// The worker is integrating and emitting reports.
    Running = 1,
    /// The run reached its final time.
    Completed = 2,
    /// The run stopped at a cooperative cancellation request.
    Cancelled = 3,
    /// The run failed; the reason was logged.
    Error = 4,
}

impl SimulationStatus {
    /// Whether no further transition can occur from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Error)
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Error => "error",
        }
    }

    /// Encoding used by atomic status cells.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Decode a value produced by [`to_u8`](Self::to_u8).
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Initializing),
            1 => Some(Self::Running),
            2 => Some(Self::Completed),
            3 => Some(Self::Cancelled),
            4 => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
