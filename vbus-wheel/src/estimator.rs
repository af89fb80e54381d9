//!
//! The Wheel-Speed Estimator.
//!
//! One estimator per monitored wheel.  The interrupt path timestamps
//! edges through the estimator's [`EdgeCapture`]; the periodic task calls
//! `drain`, `check_timeout`, and `classify` every tick.  A smoothed speed
//! is only ever published from the Steady state, and a long pulse gap is
//! always consumed as a new timing baseline so that it can never be
//! misread as a speed spike.
//!

use std::sync::Arc;

use log::{info, warn};

use vbus_utils::ticks;

use crate::capture::EdgeCapture;
use crate::config::WheelConfig;
use crate::window::SmoothingWindow;

/// The four monitored wheel positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WheelCorner {
    /// Front-left wheel
    FrontLeft,
    /// Front-right wheel
    FrontRight,
    /// Rear-left wheel
    RearLeft,
    /// Rear-right wheel
    RearRight,
}

impl WheelCorner {
    /// All four corners, front axle first.
    pub const ALL: [WheelCorner; 4] = [
        WheelCorner::FrontLeft,
        WheelCorner::FrontRight,
        WheelCorner::RearLeft,
        WheelCorner::RearRight,
    ];

    /// A short stable name for logs.
    pub fn name(self) -> &'static str {
        match self {
            WheelCorner::FrontLeft => "front_left",
            WheelCorner::FrontRight => "front_right",
            WheelCorner::RearLeft => "rear_left",
            WheelCorner::RearRight => "rear_right",
        }
    }
}

/// The traction classification of one wheel against the vehicle's
/// reference speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelCondition {
    /// Wheel speed tracks the reference
    Normal,
    /// Wheel turning significantly faster than the vehicle moves
    Spin,
    /// Wheel turning significantly slower than the vehicle moves
    Skid,
}

impl WheelCondition {
    /// The value published on the bus for this condition.
    pub fn code(self) -> u32 {
        match self {
            WheelCondition::Normal => 0,
            WheelCondition::Spin => 1,
            WheelCondition::Skid => 2,
        }
    }
}

/// Where the estimator is in its life cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstimatorState {
    /// No edge has ever been drained; timeouts are meaningless
    Uninitialized,
    /// A timing baseline exists or is pending after a stop; no smoothed
    /// speed is being published
    Baselined,
    /// Pulses are arriving steadily and the smoothed speed is live
    Steady,
}

/// The wheel-speed estimator for a single wheel.
pub struct WheelEstimator {
    corner: WheelCorner,
    config: WheelConfig,
    rpm_to_mph: f32,
    capture: Arc<EdgeCapture>,
    window: SmoothingWindow,
    state: EstimatorState,
    // the next drained snapshot only re-establishes the timing baseline
    rebaseline: bool,
    deadline_ms: u32,
    rpm: f32,
    speed_mph: f32,
    condition: WheelCondition,
}

impl WheelEstimator {
    /// Create an estimator for one wheel corner.
    pub fn new(corner: WheelCorner, config: WheelConfig) -> Self {
        Self {
            corner,
            rpm_to_mph: config.rpm_to_mph_factor(),
            capture: Arc::new(EdgeCapture::new(config.debounce_floor_ms)),
            window: SmoothingWindow::new(config.window_size),
            state: EstimatorState::Uninitialized,
            rebaseline: true,
            deadline_ms: 0,
            rpm: 0.0,
            speed_mph: 0.0,
            condition: WheelCondition::Normal,
            config,
        }
    }

    /// The capture cell to hand to this wheel's hardware edge handler.
    pub fn capture_handle(&self) -> Arc<EdgeCapture> {
        self.capture.clone()
    }

    /// The wheel this estimator watches.
    pub fn corner(&self) -> WheelCorner {
        self.corner
    }

    /// This wheel's calibration.
    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    /// The smoothed rotational speed (rpm).
    pub fn rpm(&self) -> f32 {
        self.rpm
    }

    /// The smoothed linear speed (mph).
    pub fn speed_mph(&self) -> f32 {
        self.speed_mph
    }

    /// The most recent traction classification.
    pub fn condition(&self) -> WheelCondition {
        self.condition
    }

    /// The estimator's current life-cycle state.
    pub fn state(&self) -> EstimatorState {
        self.state
    }

    /// Drain one pending edge pair into the speed estimate, if any.
    ///
    /// Returns the accepted instantaneous rpm sample, or `None` when the
    /// cycle produced no new sample (nothing pending, baseline
    /// established, or the sample was rejected).
    pub fn drain(&mut self) -> Option<f32> {
        let snapshot = self.capture.drain_snapshot()?;

        if self.rebaseline {
            // Either the very first edge or the first one after a stop:
            // the gap spanned by this pair is not a pulse interval.
            self.rebaseline = false;
            self.state = EstimatorState::Baselined;
            self.deadline_ms =
                ticks::advance_ms(snapshot.current_ms, self.config.zero_timeout_ms);
            return None;
        }

        let dt_ms = ticks::elapsed_ms(snapshot.current_ms, snapshot.last_ms);

        if dt_ms < self.config.debounce_floor_ms {
            return None;
        }
        if dt_ms > self.config.zero_timeout_ms {
            // A pair spanning more than the timeout is a stop the timeout
            // check has not fired on yet: zero out, drop the pre-stop
            // samples, and let this edge be the new baseline.
            self.rpm = 0.0;
            self.speed_mph = 0.0;
            self.window.reset();
            self.state = EstimatorState::Baselined;
            self.deadline_ms =
                ticks::advance_ms(snapshot.current_ms, self.config.zero_timeout_ms);
            return None;
        }

        let instantaneous_rpm =
            (1000.0 / dt_ms as f32) * 60.0 / self.config.pulses_per_rev as f32;

        if instantaneous_rpm > self.config.max_plausible_rpm {
            warn!(
                "{}: rejecting implausible sample of {:.0} rpm (dt {} ms)",
                self.corner.name(),
                instantaneous_rpm,
                dt_ms
            );
            return None;
        }

        self.window.push(instantaneous_rpm);
        self.rpm = self.window.mean();
        self.speed_mph = self.rpm * self.rpm_to_mph;
        self.state = EstimatorState::Steady;
        self.deadline_ms = ticks::advance_ms(
            snapshot.current_ms,
            (dt_ms as f32 * self.config.deadline_factor) as u32,
        );

        Some(instantaneous_rpm)
    }

    /// Declare the wheel stopped if the next-edge deadline has passed.
    ///
    /// Returns whether this call performed the moving-to-stopped
    /// transition.
    pub fn check_timeout(&mut self, now_ms: u32) -> bool {
        if self.state == EstimatorState::Uninitialized {
            return false;
        }
        if !ticks::deadline_passed(now_ms, self.deadline_ms) {
            return false;
        }

        let was_moving = self.state == EstimatorState::Steady;
        self.rpm = 0.0;
        self.speed_mph = 0.0;
        self.window.reset();
        self.rebaseline = true;
        self.state = EstimatorState::Baselined;
        self.deadline_ms = ticks::advance_ms(now_ms, self.config.zero_timeout_ms);

        if was_moving {
            info!("{}: no pulses before deadline, speed is zero", self.corner.name());
        }
        was_moving
    }

    /// Classify this wheel's traction against a reference vehicle speed.
    ///
    /// Near standstill the comparison is meaningless, so below the
    /// low-speed floor the wheel always reads Normal.
    pub fn classify(&mut self, reference_mph: f32) -> WheelCondition {
        self.condition = if reference_mph < self.config.low_speed_floor_mph {
            WheelCondition::Normal
        } else if self.speed_mph - reference_mph > self.config.spin_threshold_mph {
            WheelCondition::Spin
        } else if reference_mph - self.speed_mph > self.config.skid_threshold_mph {
            WheelCondition::Skid
        } else {
            WheelCondition::Normal
        };

        self.condition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> WheelEstimator {
        WheelEstimator::new(WheelCorner::FrontLeft, WheelConfig::default())
    }

    /// Feed an edge and drain it in one step.
    fn edge(est: &mut WheelEstimator, at_ms: u32) -> Option<f32> {
        est.capture_handle().capture(at_ms);
        est.drain()
    }

    #[test]
    fn test_first_edge_only_establishes_baseline() {
        let mut est = estimator();
        assert_eq!(edge(&mut est, 1000), None);
        assert_eq!(est.state(), EstimatorState::Baselined);
        assert_eq!(est.rpm(), 0.0);
    }

    #[test]
    fn test_second_edge_computes_the_pulse_formula() {
        let mut est = estimator();
        edge(&mut est, 1000);
        let sample = edge(&mut est, 1250).unwrap();

        // (1000 / 250ms) * 60 / 4 pulses = 60 rpm
        assert!((sample - 60.0).abs() < 1e-4);
        assert_eq!(est.state(), EstimatorState::Steady);
        assert!((est.rpm() - 60.0).abs() < 1e-4);

        let expected_mph = 60.0 * WheelConfig::default().rpm_to_mph_factor();
        assert!((est.speed_mph() - expected_mph).abs() < 1e-4);
    }

    #[test]
    fn test_published_speed_is_mean_of_collected_samples() {
        let mut est = estimator();
        // intervals: 250, 200, 500 -> 60, 75, 30 rpm
        for at in [0, 250, 450, 950] {
            edge(&mut est, at);
        }
        assert!((est.rpm() - 55.0).abs() < 1e-3);
    }

    #[test]
    fn test_window_displaces_once_full() {
        let mut est = estimator();
        let mut at = 0u32;
        edge(&mut est, at);
        // six identical 300ms intervals (50 rpm) fill the 5-slot window
        for _ in 0..6 {
            at += 300;
            edge(&mut est, at);
        }
        // then one 150ms interval (100 rpm) displaces one 50 rpm sample
        at += 150;
        edge(&mut est, at);
        assert!((est.rpm() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_sub_debounce_edges_change_nothing() {
        let mut est = estimator();
        edge(&mut est, 1000);
        edge(&mut est, 1250);
        let rpm_before = est.rpm();

        // a bounce burst right behind the accepted edge
        for at in [1251, 1252, 1254] {
            est.capture_handle().capture(at);
            assert_eq!(est.drain(), None);
        }
        assert_eq!(est.rpm(), rpm_before);
        assert_eq!(est.state(), EstimatorState::Steady);
    }

    #[test]
    fn test_implausible_sample_rejected_and_window_kept() {
        let config = WheelConfig {
            debounce_floor_ms: 2,
            ..WheelConfig::default()
        };
        let mut est = WheelEstimator::new(WheelCorner::RearLeft, config);
        est.capture_handle().capture(0);
        est.drain();
        est.capture_handle().capture(300);
        est.drain();
        let rpm_before = est.rpm();

        // 3ms interval = 5000 rpm, far beyond max_plausible_rpm
        est.capture_handle().capture(303);
        assert_eq!(est.drain(), None);
        assert_eq!(est.rpm(), rpm_before);
        assert_eq!(est.state(), EstimatorState::Steady);
    }

    #[test]
    fn test_timeout_forces_zero_until_new_baseline() {
        let mut est = estimator();
        edge(&mut est, 0);
        edge(&mut est, 250);
        assert!(est.rpm() > 0.0);

        // deadline is 250 + 1.75*250 = ~687ms; nothing by 2500ms
        assert!(est.check_timeout(2500));
        assert_eq!(est.rpm(), 0.0);
        assert_eq!(est.speed_mph(), 0.0);
        assert_eq!(est.state(), EstimatorState::Baselined);

        // a second check does not report another transition
        assert!(!est.check_timeout(5000));

        // first edge after the stop only re-baselines
        assert_eq!(edge(&mut est, 6000), None);
        assert_eq!(est.rpm(), 0.0);

        // the next edge revives the estimate
        let sample = edge(&mut est, 6250).unwrap();
        assert!((sample - 60.0).abs() < 1e-4);
        assert!((est.rpm() - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_timeout_before_any_edge_is_a_no_op() {
        let mut est = estimator();
        assert!(!est.check_timeout(1_000_000));
        assert_eq!(est.state(), EstimatorState::Uninitialized);
    }

    #[test]
    fn test_stale_pair_rebaselines_instead_of_spiking() {
        let mut est = estimator();
        edge(&mut est, 0);
        edge(&mut est, 250);
        assert!(est.rpm() > 0.0);

        // an edge pair spanning 5 seconds is a stop, not a speed
        assert_eq!(edge(&mut est, 5250), None);
        assert_eq!(est.state(), EstimatorState::Baselined);
        assert_eq!(est.rpm(), 0.0);

        // the stale pair's newer edge is the baseline, so the very next
        // pulse produces a clean single-sample estimate
        let revived = edge(&mut est, 5500).unwrap();
        assert!((est.rpm() - revived).abs() < 1e-4);
    }

    #[test]
    fn test_classification_thresholds() {
        let mut est = estimator();
        edge(&mut est, 0);
        // 100ms interval = 150 rpm = ~10.26 mph
        edge(&mut est, 100);

        assert_eq!(est.classify(9.0), WheelCondition::Normal);
        assert_eq!(est.classify(3.0), WheelCondition::Spin);
        assert_eq!(est.classify(16.0), WheelCondition::Skid);
    }

    #[test]
    fn test_classification_suppressed_near_standstill() {
        let mut est = estimator();
        edge(&mut est, 0);
        edge(&mut est, 100);

        // wheel at ~10 mph but the vehicle is stationary: below the
        // low-speed floor this must not read as wheelspin
        assert_eq!(est.classify(0.0), WheelCondition::Normal);
        assert_eq!(est.classify(1.9), WheelCondition::Normal);
    }

    #[test]
    fn test_condition_codes_are_stable() {
        assert_eq!(WheelCondition::Normal.code(), 0);
        assert_eq!(WheelCondition::Spin.code(), 1);
        assert_eq!(WheelCondition::Skid.code(), 2);
    }
}
