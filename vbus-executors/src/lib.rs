//!
//! VBus-Executors provides the schedulers that run nodes at their
//! requested cadences.
//!
//! A vehicle controller typically runs a handful of nodes with update
//! delays between a few hundred microseconds and a few hundred
//! milliseconds.  The [`SimpleExecutor`] runs them all on one thread,
//! always updating whichever node's deadline comes up next.  When one
//! node must hold its cadence regardless of what the others are doing
//! (the bus driver, most of the time), the [`ThreadedExecutor`] pins node
//! groups to dedicated threads, one simple executor per thread.
//!

#![deny(missing_docs)]

pub mod simple_executor;
pub use simple_executor::SimpleExecutor;

pub mod threaded_executor;
pub use threaded_executor::ThreadedExecutor;

use std::cmp::Ordering;

use vbus_core::Node;

/// A node queued with the timestamp (in us since the executor started)
/// of its next update.
///
/// The ordering is reversed so that a BinaryHeap of scheduled nodes pops
/// the earliest deadline first.
pub(crate) struct ScheduledNode {
    /// When this node's next update is due
    pub due_us: u128,
    /// The node itself
    pub node: Box<dyn Node>,
}

impl Ord for ScheduledNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_us.cmp(&other.due_us).reverse()
    }
}

impl PartialOrd for ScheduledNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledNode {
    fn eq(&self, other: &Self) -> bool {
        self.due_us == other.due_us
    }
}

impl Eq for ScheduledNode {}
