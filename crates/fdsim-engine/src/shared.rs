//! Status cell shared between the driver and its worker thread.

use std::sync::atomic::{AtomicU8, Ordering};

use fdsim_core::SimulationStatus;

/// Atomic status cell.
///
/// Held by `Arc` on both sides, so it lives as long as the longer-lived of
/// the driver and the worker. Only the worker writes it, and a terminal
/// status is never overwritten.
#[derive(Debug)]
pub(crate) struct SharedState {
    status: AtomicU8,
}

impl SharedState {
    /// A cell in [`SimulationStatus::Initializing`].
    pub fn new() -> Self {
        Self {
            status: AtomicU8::new(SimulationStatus::Initializing.to_u8()),
        }
    }

    /// Current status (lock-free read).
    pub fn status(&self) -> SimulationStatus {
        decode(self.status.load(Ordering::Acquire))
    }

    /// Move to `next` unless the current status is already terminal.
    ///
    /// Returns `true` if the store happened.
    pub(crate) fn transition(&self, next: SimulationStatus) -> bool {
        self.status
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                if decode(cur).is_terminal() {
                    None
                } else {
                    Some(next.to_u8())
                }
            })
            .is_ok()
    }
}

fn decode(v: u8) -> SimulationStatus {
    // Only `transition` stores, and it only stores valid encodings.
    SimulationStatus::from_u8(v).unwrap_or(SimulationStatus::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_initializing() {
        assert_eq!(SharedState::new().status(), SimulationStatus::Initializing);
    }

    #[test]
    fn walks_the_happy_path() {
        let s = SharedState::new();
        assert!(s.transition(SimulationStatus::Running));
        assert_eq!(s.status(), SimulationStatus::Running);
        assert!(s.transition(SimulationStatus::Completed));
        assert_eq!(s.status(), SimulationStatus::Completed);
    }

    #[test]
    fn terminal_status_is_sticky() {
        let s = SharedState::new();
        assert!(s.transition(SimulationStatus::Cancelled));
        assert!(!s.transition(SimulationStatus::Running));
        assert!(!s.transition(SimulationStatus::Error));
        assert_eq!(s.status(), SimulationStatus::Cancelled);
    }

    #[test]
    fn outlives_either_holder() {
        let a = Arc::new(SharedState::new());
        let b = Arc::clone(&a);
        let t = std::thread::spawn(move || {
            b.transition(SimulationStatus::Completed);
        });
        t.join().unwrap();
        assert_eq!(Arc::strong_count(&a), 1);
        assert_eq!(a.status(), SimulationStatus::Completed);
    }
}
