//! Process-unique identity tokens for auxiliary outputs.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`OutputId`] allocation.
static OUTPUT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity token correlating a report value with the extractor that
/// produced it.
///
/// Allocated from a monotonic atomic counter via [`OutputId::next`].
/// Two distinct allocations always yield different IDs, so a report built
/// on the worker thread can be matched back to its extractor on any other
/// thread. Copying an ID preserves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(u64);

impl OutputId {
    /// Allocate a fresh, unique ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(OUTPUT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let a = OutputId::next();
        let b = OutputId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..256).map(|_| OutputId::next()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 1024);
    }
}
