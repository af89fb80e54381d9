//!
//! The Threaded Executor.
//!
//! Pins groups of nodes to dedicated threads, one simple executor per
//! thread.  Use this when a node must hold its cadence regardless of
//! what the rest of the system is doing: on a vehicle controller that is
//! typically the bus driver on one thread and the sensor estimators on
//! another, so a slow display refresh can never delay a publish cycle.
//!

use std::thread;
use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use vbus_core::{Executor, ExecutorState, Node};

use crate::SimpleExecutor;

/// An executor running each group of nodes on its own dedicated thread.
///
/// Note: the threaded executor can be interrupted by sending `true` over
/// the channel whose receiving end it owns; the interrupt is propagated
/// to every group thread.
pub struct ThreadedExecutor {
    // one simple executor per dedicated thread
    groups: Vec<SimpleExecutor>,
    // the current state of the executor
    state: ExecutorState,
    // the interrupt receiver channel
    interrupt: Receiver<bool>,
    // the senders used to propagate an interrupt to each group
    interrupt_propagators: Vec<Sender<bool>>,
    // whether the executor has been interrupted
    interrupted: bool,
}

impl ThreadedExecutor {
    /// Create a new threaded executor without any node groups.
    pub fn new(interrupt: Receiver<bool>) -> Self {
        Self {
            groups: Vec::new(),
            state: ExecutorState::Stopped,
            interrupt,
            interrupt_propagators: Vec::new(),
            interrupted: false,
        }
    }

    /// Add a group of nodes that will share one dedicated thread.
    pub fn add_group(&mut self, nodes: Vec<Box<dyn Node>>) {
        let (tx, rx) = unbounded();
        self.interrupt_propagators.push(tx);
        self.groups.push(SimpleExecutor::new_with(rx, nodes));
    }

    /// Forward an interrupt to every group thread.
    fn propagate_interrupt(&self) {
        for propagator in self.interrupt_propagators.iter() {
            // a group whose thread already exited is fine to miss
            let _ = propagator.send(true);
        }
    }
}

impl Executor for ThreadedExecutor {
    /// Start every node in every group.
    ///
    /// Note: the update methods re-start their groups themselves, so
    /// calling this separately is only useful for bringing nodes up early.
    fn start(&mut self) {
        for group in self.groups.iter_mut() {
            group.start();
        }
        self.interrupted = false;
        self.state = ExecutorState::Started;
    }

    /// Run every group on its own thread for a set amount of time,
    /// stopping early if interrupted.
    fn update_for_ms(&mut self, ms: u128) {
        self.state = ExecutorState::Running;

        let groups = &mut self.groups;
        let interrupt = &self.interrupt;
        let propagators = &self.interrupt_propagators;

        thread::scope(|scope| {
            for group in groups.iter_mut() {
                scope.spawn(move || group.update_for_ms(ms));
            }

            // forward an interrupt if one arrives before the time is up
            let mut remaining = Duration::from_millis(ms as u64);
            let deadline = std::time::Instant::now() + remaining;
            loop {
                match interrupt.recv_timeout(remaining) {
                    Ok(true) => {
                        for propagator in propagators.iter() {
                            let _ = propagator.send(true);
                        }
                        break;
                    }
                    Ok(false) => {}
                    Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
                }
                remaining = deadline.saturating_duration_since(std::time::Instant::now());
            }
        });

        self.state = ExecutorState::Stopped;
    }

    /// Run every group on its own thread until an interrupt arrives.
    fn update_loop(&mut self) {
        self.state = ExecutorState::Running;

        let groups = &mut self.groups;
        let interrupt = &self.interrupt;
        let propagators = &self.interrupt_propagators;

        thread::scope(|scope| {
            for group in groups.iter_mut() {
                scope.spawn(move || group.update_loop());
            }

            loop {
                match interrupt.recv() {
                    Ok(true) => break,
                    Ok(false) => {}
                    // with the sending side gone the only way the group
                    // threads ever stop is propagating now
                    Err(_) => break,
                }
            }
            for propagator in propagators.iter() {
                let _ = propagator.send(true);
            }
        });

        self.interrupted = true;
        self.state = ExecutorState::Stopped;
    }

    /// Check the interrupt receiver, propagating any interrupt to the
    /// group threads.
    fn check_interrupt(&mut self) -> bool {
        if let Ok(interrupt) = self.interrupt.try_recv() {
            self.interrupted = interrupt;
            if interrupt {
                self.propagate_interrupt();
            }
        }
        self.interrupted
    }

    /// Add a node to the executor as its own single-node group.
    fn add_node(&mut self, node: Box<dyn Node>) {
        self.add_group(vec![node]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    struct CountingNode {
        update_delay_us: u128,
        updates: Arc<AtomicU32>,
    }

    impl CountingNode {
        fn new(update_delay_us: u128) -> (Self, Arc<AtomicU32>) {
            let updates = Arc::new(AtomicU32::new(0));
            (
                Self {
                    update_delay_us,
                    updates: updates.clone(),
                },
                updates,
            )
        }
    }

    impl Node for CountingNode {
        fn get_update_delay_us(&self) -> u128 {
            self.update_delay_us
        }

        fn start(&mut self) {}

        fn update(&mut self) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }

        fn shutdown(&mut self) {}
    }

    #[test]
    fn test_groups_run_in_parallel_for_ms() {
        let (_tx, rx) = unbounded();
        let mut executor = ThreadedExecutor::new(rx);

        let (fast, fast_updates) = CountingNode::new(10_000);
        let (slow, slow_updates) = CountingNode::new(25_000);
        executor.add_group(vec![Box::new(fast)]);
        executor.add_group(vec![Box::new(slow)]);

        executor.update_for_ms(100);

        let fast_count = fast_updates.load(Ordering::SeqCst);
        let slow_count = slow_updates.load(Ordering::SeqCst);
        assert!((9..=11).contains(&fast_count), "fast ran {fast_count} times");
        assert!((3..=5).contains(&slow_count), "slow ran {slow_count} times");
    }

    #[test]
    fn test_interrupt_stops_every_group() {
        let (tx, rx) = unbounded();
        let mut executor = ThreadedExecutor::new(rx);

        let (a, a_updates) = CountingNode::new(5_000);
        let (b, b_updates) = CountingNode::new(5_000);
        executor.add_group(vec![Box::new(a)]);
        executor.add_group(vec![Box::new(b)]);

        let handle = thread::spawn(move || {
            executor.update_loop();
            executor
        });

        thread::sleep(Duration::from_millis(50));
        tx.send(true).unwrap();

        let executor = handle.join().unwrap();
        assert!(executor.interrupted);
        assert_eq!(executor.state, ExecutorState::Stopped);
        assert!(a_updates.load(Ordering::SeqCst) > 0);
        assert!(b_updates.load(Ordering::SeqCst) > 0);
    }
}
