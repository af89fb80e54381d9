//!
//! The Wheel-Speed Node.
//!
//! Owns the four per-corner estimators, drains them every tick, watches
//! for stopped wheels, classifies traction against the GPS ground speed
//! absorbed from the bus, and writes the results into the shared signal
//! table for the bus node to publish.
//!

use std::sync::Arc;

use log::{error, info};

use vbus_core::Node;
use vbus_signals::{SignalId, SignalTable, SignalValue};
use vbus_wheel::{EdgeCapture, WheelConfig, WheelCorner, WheelEstimator};

use crate::clock::MonotonicMillis;

/// One mile per hour is this many meters per second.
const METERS_PER_SECOND_TO_MPH: f32 = 2.236_94;

/// The default estimation cadence (well under the shortest realistic
/// pulse interval).
const DEFAULT_UPDATE_DELAY_US: u128 = 10_000;

/// The node running wheel-speed estimation for all four corners.
pub struct WheelSpeedNode {
    estimators: Vec<WheelEstimator>,
    table: Arc<SignalTable>,
    ticker: MonotonicMillis,
    update_delay_us: u128,
}

impl WheelSpeedNode {
    /// Create the node with one estimator per corner, all sharing one
    /// calibration.
    pub fn new(config: WheelConfig, table: Arc<SignalTable>) -> Self {
        Self::with_corner_configs([config; 4], table)
    }

    /// Create the node with a separate calibration per corner, in
    /// [`WheelCorner::ALL`] order.  Front and rear tires often differ in
    /// diameter, and a retrofitted tone ring can leave one wheel with a
    /// different target count.
    pub fn with_corner_configs(configs: [WheelConfig; 4], table: Arc<SignalTable>) -> Self {
        let estimators = WheelCorner::ALL
            .iter()
            .zip(configs)
            .map(|(corner, config)| WheelEstimator::new(*corner, config))
            .collect();

        Self {
            estimators,
            table,
            ticker: MonotonicMillis::new(),
            update_delay_us: DEFAULT_UPDATE_DELAY_US,
        }
    }

    /// Use a non-default estimation cadence.
    pub fn with_update_delay_us(mut self, update_delay_us: u128) -> Self {
        self.update_delay_us = update_delay_us;
        self
    }

    /// The capture cell to hand to one corner's hardware edge handler.
    pub fn capture_handle(&self, corner: WheelCorner) -> Arc<EdgeCapture> {
        // ALL order is construction order
        let position = WheelCorner::ALL
            .iter()
            .position(|c| *c == corner)
            .unwrap_or(0);
        self.estimators[position].capture_handle()
    }

    /// The table signals carrying one corner's speed and condition.
    fn corner_signals(corner: WheelCorner) -> (SignalId, SignalId) {
        match corner {
            WheelCorner::FrontLeft => (
                SignalId::FrontLeftWheelSpeed,
                SignalId::FrontLeftWheelCondition,
            ),
            WheelCorner::FrontRight => (
                SignalId::FrontRightWheelSpeed,
                SignalId::FrontRightWheelCondition,
            ),
            WheelCorner::RearLeft => (
                SignalId::RearLeftWheelSpeed,
                SignalId::RearLeftWheelCondition,
            ),
            WheelCorner::RearRight => (
                SignalId::RearRightWheelSpeed,
                SignalId::RearRightWheelCondition,
            ),
        }
    }

    /// The classifier reference: GPS ground speed (published in m/s by
    /// the data-acquisition node) converted to mph.
    fn reference_speed_mph(&self) -> f32 {
        let ground_speed_ms = self
            .table
            .get(SignalId::GpsGroundSpeed)
            .as_unsigned()
            .unwrap_or(0);
        ground_speed_ms as f32 * METERS_PER_SECOND_TO_MPH
    }

    fn store(table: &SignalTable, id: SignalId, value: SignalValue) {
        // kinds are fixed by the definition table, so this only fires on
        // a table regression
        if let Err(err) = table.set(id, value) {
            error!("failed to store {}: {:?}", id.name(), err);
        }
    }
}

impl Node for WheelSpeedNode {
    fn get_update_delay_us(&self) -> u128 {
        self.update_delay_us
    }

    fn start(&mut self) {
        for estimator in self.estimators.iter() {
            info!(
                "wheel-speed node up: {} with {}-sample window, {} ms zero timeout",
                estimator.corner().name(),
                estimator.config().window_size,
                estimator.config().zero_timeout_ms
            );
        }
    }

    fn update(&mut self) {
        let now_ms = self.ticker.now_ms();
        let reference_mph = self.reference_speed_mph();

        for estimator in self.estimators.iter_mut() {
            estimator.drain();
            estimator.check_timeout(now_ms);
            let condition = estimator.classify(reference_mph);

            let (speed_id, condition_id) = Self::corner_signals(estimator.corner());
            Self::store(
                &self.table,
                speed_id,
                SignalValue::Float(estimator.speed_mph()),
            );
            Self::store(
                &self.table,
                condition_id,
                SignalValue::Unsigned(condition.code()),
            );
        }
    }

    fn shutdown(&mut self) {
        // leave no stale speeds behind for the publisher
        for estimator in self.estimators.iter() {
            let (speed_id, condition_id) = Self::corner_signals(estimator.corner());
            Self::store(&self.table, speed_id, SignalValue::Float(0.0));
            Self::store(&self.table, condition_id, SignalValue::Unsigned(0));
        }
        info!("wheel-speed node down");
    }
}
