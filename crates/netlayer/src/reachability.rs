//! Network reachability

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reports whether the network is currently usable
///
/// Implementations must answer synchronously from a snapshot; a background
/// monitor may update that snapshot at any time.
pub trait ReachabilityProbe: Send + Sync + Debug {
    /// Is the network currently reachable
    fn is_reachable(&self) -> bool;
}

impl<P: ReachabilityProbe + ?Sized> ReachabilityProbe for Arc<P> {
    fn is_reachable(&self) -> bool {
        (**self).is_reachable()
    }
}

/// Probe that always reports the network as reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReachable;

impl ReachabilityProbe for AlwaysReachable {
    fn is_reachable(&self) -> bool {
        true
    }
}

/// Shared reachability flag
///
/// Clones share the same state, so a monitor task can hold one clone and
/// call [`ReachabilityFlag::set`] while executors read another.
#[derive(Debug, Clone)]
pub struct ReachabilityFlag {
    reachable: Arc<AtomicBool>,
}

impl Default for ReachabilityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReachabilityFlag {
    /// Create a new flag with the given initial state
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: Arc::new(AtomicBool::new(reachable)),
        }
    }

    /// Update the reachability state
    pub fn set(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Release);
    }
}

impl ReachabilityProbe for ReachabilityFlag {
    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::Acquire)
    }
}
