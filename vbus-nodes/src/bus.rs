//!
//! The Bus Node.
//!
//! Runs a [`BusDriver`] as a periodic node: every update it drains a
//! bounded batch of inbound frames into the signal table, then lets the
//! driver publish if the send interval has elapsed.  The batch bound is
//! what keeps a chatty bus from ever starving the publish step.
//!

use log::info;

use vbus_core::{FrameBus, Node};
use vbus_transport::BusDriver;

use crate::clock::MonotonicMillis;

/// The default bus cadence: well under the send interval so the publish
/// timing is dominated by the interval, not the scheduler.
const DEFAULT_UPDATE_DELAY_US: u128 = 5_000;

/// The node running one bus driver.
pub struct BusNode<B: FrameBus> {
    driver: BusDriver<B>,
    ticker: MonotonicMillis,
    update_delay_us: u128,
}

impl<B: FrameBus> BusNode<B> {
    /// Wrap a configured driver into a periodic node.
    pub fn new(driver: BusDriver<B>) -> Self {
        Self {
            driver,
            ticker: MonotonicMillis::new(),
            update_delay_us: DEFAULT_UPDATE_DELAY_US,
        }
    }

    /// Use a non-default bus cadence.
    pub fn with_update_delay_us(mut self, update_delay_us: u128) -> Self {
        self.update_delay_us = update_delay_us;
        self
    }

    /// The wrapped driver (counters, role, configuration).
    pub fn driver(&self) -> &BusDriver<B> {
        &self.driver
    }
}

impl<B: FrameBus + Send> Node for BusNode<B> {
    fn get_update_delay_us(&self) -> u128 {
        self.update_delay_us
    }

    fn start(&mut self) {
        info!(
            "bus node up: role {:?}, publishing {} signals every {} ms",
            self.driver.role(),
            self.driver.role().publish_set().len(),
            self.driver.config().send_interval_ms
        );
    }

    fn update(&mut self) {
        for _ in 0..self.driver.config().receive_batch_limit {
            if self.driver.poll_receive().is_none() {
                break;
            }
        }

        self.driver.tick(self.ticker.now_ms());
    }

    fn shutdown(&mut self) {
        info!("bus node down: {:?}", self.driver.stats());
    }
}
