//!
//! The Simple Executor.
//!
//! A single-threaded scheduler keeping its nodes in a deadline-ordered
//! heap: pop whichever node is due next, update it, push it back with its
//! deadline advanced by its update delay.  Between due nodes it busy
//! waits, so the controller core running a simple executor is dedicated
//! to it.
//!

use std::collections::BinaryHeap;

use crossbeam::channel::Receiver;

use quanta::{Clock, Instant};

use vbus_core::{Executor, ExecutorState, Node};

use crate::ScheduledNode;

/// A single-threaded, deadline-ordered executor.
///
/// Note: the executor can be interrupted by sending `true` over the
/// channel whose receiving end it owns.
pub struct SimpleExecutor {
    // nodes keyed by their next update deadline
    queue: BinaryHeap<ScheduledNode>,
    // the quanta high-precision clock backing all deadlines
    clock: Clock,
    // the instant deadlines are measured from
    start_instant: Instant,
    // the current state of the executor
    state: ExecutorState,
    // the interrupt receiver channel
    interrupt: Receiver<bool>,
    // whether the executor has been interrupted
    interrupted: bool,
}

impl SimpleExecutor {
    /// Create a new simple executor without any nodes.
    pub fn new(interrupt: Receiver<bool>) -> Self {
        let clock = Clock::new();
        let now = clock.now();

        Self {
            queue: BinaryHeap::new(),
            clock,
            start_instant: now,
            state: ExecutorState::Stopped,
            interrupt,
            interrupted: false,
        }
    }

    /// Create a new simple executor with a set of nodes.
    pub fn new_with(interrupt: Receiver<bool>, nodes: Vec<Box<dyn Node>>) -> Self {
        let mut executor = Self::new(interrupt);
        for node in nodes {
            executor.queue.push(ScheduledNode { due_us: 0, node });
        }
        executor
    }

    /// Microseconds since the executor started.
    fn now_us(&self) -> u128 {
        self.clock
            .now()
            .duration_since(self.start_instant)
            .as_micros()
    }

    /// Update the node with the earliest deadline if that deadline has
    /// arrived, then reschedule it.
    fn run_next_due(&mut self) {
        let now = self.now_us();
        let due = self
            .queue
            .peek()
            .map(|scheduled| scheduled.due_us <= now)
            .unwrap_or(false);

        if due {
            if let Some(mut scheduled) = self.queue.pop() {
                scheduled.node.update();
                scheduled.due_us += scheduled.node.get_update_delay_us();
                self.queue.push(scheduled);
            }
        }
    }

    /// Call shutdown on every node and reset all deadlines to zero.
    fn stop_all(&mut self) {
        let mut nodes: Vec<ScheduledNode> = self.queue.drain().collect();
        for scheduled in nodes.iter_mut() {
            scheduled.node.shutdown();
            scheduled.due_us = 0;
        }
        self.queue.extend(nodes);
        self.state = ExecutorState::Stopped;
    }
}

impl Executor for SimpleExecutor {
    /// Start every node and restart the executor's time base.
    fn start(&mut self) {
        let mut nodes: Vec<ScheduledNode> = self.queue.drain().collect();
        for scheduled in nodes.iter_mut() {
            scheduled.node.start();
            scheduled.due_us = 0;
        }
        self.queue.extend(nodes);

        self.interrupted = false;
        self.state = ExecutorState::Started;
        self.start_instant = self.clock.now();
    }

    /// Start the executor and run it for a given number of milliseconds
    /// before stopping.  An interrupt also stops the executor early.
    fn update_for_ms(&mut self, ms: u128) {
        self.start();

        self.state = ExecutorState::Running;
        while self.now_us() < ms * 1000 && !self.check_interrupt() {
            self.run_next_due();
        }

        self.stop_all();
    }

    /// Start the executor and run until an interrupt is received.
    fn update_loop(&mut self) {
        self.start();

        self.state = ExecutorState::Running;
        while !self.check_interrupt() {
            self.run_next_due();
        }

        self.stop_all();
    }

    /// Check the interrupt receiver for an interrupt.
    fn check_interrupt(&mut self) -> bool {
        if let Ok(interrupt) = self.interrupt.try_recv() {
            self.interrupted = interrupt;
        }
        self.interrupted
    }

    /// Add a node to the executor.
    ///
    /// A node added while the executor is running is first due
    /// immediately rather than at time zero, so it cannot monopolize the
    /// queue catching up.
    fn add_node(&mut self, node: Box<dyn Node>) {
        let due_us = if self.state == ExecutorState::Stopped {
            0
        } else {
            self.now_us()
        };
        self.queue.push(ScheduledNode { due_us, node });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crossbeam::channel::unbounded;

    /// A node that counts its updates through shared atomics so tests can
    /// observe it after the executor takes ownership.
    struct CountingNode {
        update_delay_us: u128,
        updates: Arc<AtomicU32>,
        running: Arc<AtomicBool>,
    }

    impl CountingNode {
        fn new(update_delay_us: u128) -> (Self, Arc<AtomicU32>, Arc<AtomicBool>) {
            let updates = Arc::new(AtomicU32::new(0));
            let running = Arc::new(AtomicBool::new(false));
            (
                Self {
                    update_delay_us,
                    updates: updates.clone(),
                    running: running.clone(),
                },
                updates,
                running,
            )
        }
    }

    impl Node for CountingNode {
        fn get_update_delay_us(&self) -> u128 {
            self.update_delay_us
        }

        fn start(&mut self) {
            self.running.store(true, Ordering::SeqCst);
        }

        fn update(&mut self) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }

        fn shutdown(&mut self) {
            self.running.store(false, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_update_for_ms_runs_nodes_at_their_cadence() {
        let (_tx, rx) = unbounded();
        let (fast, fast_updates, _) = CountingNode::new(10_000);
        let (slow, slow_updates, _) = CountingNode::new(25_000);

        let mut executor =
            SimpleExecutor::new_with(rx, vec![Box::new(fast), Box::new(slow)]);
        executor.update_for_ms(100);

        let fast_count = fast_updates.load(Ordering::SeqCst);
        let slow_count = slow_updates.load(Ordering::SeqCst);
        assert!((9..=11).contains(&fast_count), "fast ran {fast_count} times");
        assert!((3..=5).contains(&slow_count), "slow ran {slow_count} times");
    }

    #[test]
    fn test_nodes_started_and_shut_down() {
        let (_tx, rx) = unbounded();
        let (node, _, running) = CountingNode::new(10_000);

        let mut executor = SimpleExecutor::new_with(rx, vec![Box::new(node)]);
        assert!(!running.load(Ordering::SeqCst));

        executor.update_for_ms(20);
        assert!(!running.load(Ordering::SeqCst));

        executor.start();
        assert!(running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_interrupt_stops_update_loop() {
        let (tx, rx) = unbounded();
        let (node, updates, running) = CountingNode::new(5_000);
        let mut executor = SimpleExecutor::new_with(rx, vec![Box::new(node)]);

        let handle = thread::spawn(move || {
            executor.update_loop();
            executor
        });

        thread::sleep(Duration::from_millis(50));
        tx.send(true).unwrap();

        let executor = handle.join().unwrap();
        assert!(executor.interrupted);
        assert_eq!(executor.state, ExecutorState::Stopped);
        assert!(!running.load(Ordering::SeqCst));
        assert!(updates.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn test_check_interrupt() {
        let (tx, rx) = unbounded();
        let mut executor = SimpleExecutor::new(rx);

        assert!(!executor.check_interrupt());
        tx.send(true).unwrap();
        assert!(executor.check_interrupt());
    }

    #[test]
    fn test_add_node_while_stopped() {
        let (_tx, rx) = unbounded();
        let mut executor = SimpleExecutor::new(rx);

        let (node, updates, _) = CountingNode::new(10_000);
        executor.add_node(Box::new(node));
        executor.update_for_ms(50);

        assert!(updates.load(Ordering::SeqCst) > 0);
    }
}
