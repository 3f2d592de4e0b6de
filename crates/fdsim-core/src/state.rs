//! Deep-copyable snapshot of a simulated system's state.

/// Computation stage a state has been realized through.
///
/// Stages are ordered: realizing a state to `Dynamics` implies every
/// earlier stage is valid too. Cached results at or above a stage can be
/// discarded with [`SystemState::invalidate_all_cache_at_or_above`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Nothing computed.
    Empty,
    /// System topology fixed.
    Topology,
    /// Model-level variables allocated.
    Model,
    /// Instance variables (masses, lengths) set.
    Instance,
    /// Time-dependent quantities computed.
    Time,
    /// Position kinematics computed.
    Position,
    /// Velocity kinematics computed.
    Velocity,
    /// Forces computed.
    Dynamics,
    /// Accelerations computed.
    Acceleration,
    /// Report-only quantities computed.
    Report,
}

impl Stage {
    /// The stage immediately below this one. `Empty` is its own predecessor.
    pub fn prev(self) -> Stage {
        match self {
            Self::Empty | Self::Topology => Self::Empty,
            Self::Model => Self::Topology,
            Self::Instance => Self::Model,
            Self::Time => Self::Instance,
            Self::Position => Self::Time,
            Self::Velocity => Self::Position,
            Self::Dynamics => Self::Velocity,
            Self::Acceleration => Self::Dynamics,
            Self::Report => Self::Acceleration,
        }
    }
}

/// State of a dynamical system at one instant.
///
/// Holds generalized coordinates `q`, generalized speeds `u`, auxiliary
/// continuous states `z`, and the highest realized [`Stage`]. `Clone` is a
/// deep copy: a clone never aliases the original's buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemState {
    time: f64,
    q: Vec<f64>,
    u: Vec<f64>,
    z: Vec<f64>,
    stage: Stage,
}

impl SystemState {
    /// A state at `time` with the given coordinates and speeds, realized
    /// through [`Stage::Model`].
    pub fn new(time: f64, q: Vec<f64>, u: Vec<f64>) -> Self {
        Self {
            time,
            q,
            u,
            z: Vec::new(),
            stage: Stage::Model,
        }
    }

    /// Attach auxiliary continuous states.
    pub fn with_auxiliary(mut self, z: Vec<f64>) -> Self {
        self.z = z;
        self
    }

    /// Simulation time, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Set the simulation time. Invalidates everything from [`Stage::Time`] up.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
        self.invalidate_all_cache_at_or_above(Stage::Time);
    }

    /// Generalized coordinates.
    pub fn q(&self) -> &[f64] {
        &self.q
    }

    /// Mutable generalized coordinates. Invalidates from [`Stage::Position`] up.
    pub fn q_mut(&mut self) -> &mut [f64] {
        self.invalidate_all_cache_at_or_above(Stage::Position);
        &mut self.q
    }

    /// Generalized speeds.
    pub fn u(&self) -> &[f64] {
        &self.u
    }

    /// Mutable generalized speeds. Invalidates from [`Stage::Velocity`] up.
    pub fn u_mut(&mut self) -> &mut [f64] {
        self.invalidate_all_cache_at_or_above(Stage::Velocity);
        &mut self.u
    }

    /// Auxiliary continuous states.
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Highest realized stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Mark the state as realized through `stage`. Never lowers the stage.
    pub fn realize(&mut self, stage: Stage) {
        self.stage = self.stage.max(stage);
    }

    /// Discard cached results at or above `stage`.
    pub fn invalidate_all_cache_at_or_above(&mut self, stage: Stage) {
        if self.stage >= stage {
            self.stage = stage.prev();
        }
    }
}
