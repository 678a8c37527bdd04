//! Incumbent sharing between search workers.
//!
//! `IncumbentStore` is the interface a search uses to read and publish the
//! best known objective (minimization scale).
//!
//! - `NoSharedIncumbent`: local only. `tighten(x) = x`, publishing is a no-op.
//! - `SharedIncumbent`: a mutex-guarded tracker shared by parallel subtree
//!   searches. `tighten(x)` returns `min(shared, x)` and `offer` installs a
//!   point only if it is strictly better than the shared one.
//!
//! A worker may read a stale shared bound; that only costs extra nodes.

use parking_lot::Mutex;

use crate::model::IncumbentTracker;

/// Read/publish access to a best-known objective.
pub trait IncumbentStore {
    /// Best objective known to the store (`+inf` if none).
    fn upper_bound(&self) -> f64;

    /// Combine a local incumbent objective with the stored one.
    fn tighten(&self, local_best: f64) -> f64 {
        local_best.min(self.upper_bound())
    }

    /// Publish a new solution. Returns true if it was installed.
    fn offer(&self, x: &[f64], obj: f64) -> bool;
}

/// Store for single-threaded search: nothing is shared.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSharedIncumbent;

impl IncumbentStore for NoSharedIncumbent {
    #[inline]
    fn upper_bound(&self) -> f64 {
        f64::INFINITY
    }

    #[inline]
    fn tighten(&self, local_best: f64) -> f64 {
        local_best
    }

    #[inline]
    fn offer(&self, _: &[f64], _: f64) -> bool {
        false
    }
}

/// Incumbent shared across threads.
#[derive(Debug, Default)]
pub struct SharedIncumbent {
    inner: Mutex<IncumbentTracker>,
}

impl SharedIncumbent {
    /// Create an empty shared incumbent with improvement tolerance `tol`.
    pub fn new(tol: f64) -> Self {
        Self {
            inner: Mutex::new(IncumbentTracker::new(tol)),
        }
    }

    /// Snapshot of the tracker.
    pub fn snapshot(&self) -> IncumbentTracker {
        self.inner.lock().clone()
    }

    /// Consume the store and return the tracker.
    pub fn into_inner(self) -> IncumbentTracker {
        self.inner.into_inner()
    }
}

impl IncumbentStore for SharedIncumbent {
    fn upper_bound(&self) -> f64 {
        self.inner.lock().obj_val
    }

    fn offer(&self, x: &[f64], obj: f64) -> bool {
        self.inner.lock().update(x, obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_shared_is_passthrough() {
        let store = NoSharedIncumbent;
        assert_eq!(store.upper_bound(), f64::INFINITY);
        assert_eq!(store.tighten(3.0), 3.0);
        assert!(!store.offer(&[1.0], 0.0));
    }

    #[test]
    fn test_shared_keeps_best() {
        let store = SharedIncumbent::new(1e-6);
        assert!(store.offer(&[1.0, 0.0], 5.0));
        assert!(!store.offer(&[0.0, 1.0], 7.0));
        assert_eq!(store.tighten(6.0), 5.0);
        assert_eq!(store.tighten(4.0), 4.0);
        assert!(store.offer(&[1.0, 1.0], 2.0));

        let tracker = store.into_inner();
        assert_eq!(tracker.obj_val, 2.0);
        assert_eq!(tracker.update_count, 2);
        assert_eq!(tracker.solution, Some(vec![1.0, 1.0]));
    }
}
