//!
//! Wheel Estimator Tunables.
//!
//! Every constant that was hand-tuned on the vehicle lives here so a
//! deployment can retune without touching estimator logic.  The defaults
//! are the values the original car ran with.
//!

use serde::{Deserialize, Serialize};

use std::f32::consts::PI;

/// One mile per hour expressed in feet per second.
const FEET_PER_SECOND_AT_ONE_MPH: f32 = 1.4667;

/// The tunable parameters of one wheel's estimator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Wheel diameter in inches
    pub wheel_diameter_in: f32,
    /// Number of sensing targets passing the sensor per wheel revolution
    pub pulses_per_rev: u32,
    /// Minimum accepted time between two edges (ms); anything faster is
    /// treated as contact bounce or electrical noise
    pub debounce_floor_ms: u32,
    /// Time without an edge (ms) after which the wheel is declared stopped
    pub zero_timeout_ms: u32,
    /// Number of instantaneous samples in the smoothing window
    pub window_size: usize,
    /// The next-edge deadline is this multiple of the last pulse interval
    pub deadline_factor: f32,
    /// Instantaneous readings above this are rejected as sensor glitches
    pub max_plausible_rpm: f32,
    /// Wheel speed this far above the reference declares wheelspin (mph)
    pub spin_threshold_mph: f32,
    /// Wheel speed this far below the reference declares skidding (mph)
    pub skid_threshold_mph: f32,
    /// Below this reference speed classification is suppressed (mph)
    pub low_speed_floor_mph: f32,
}

impl WheelConfig {
    /// When wheel RPM is multiplied by this, it results in that wheel's
    /// linear speed in mph.
    pub fn rpm_to_mph_factor(&self) -> f32 {
        self.wheel_diameter_in / 63360.0 * PI * 60.0
    }

    /// The zero-speed timeout implied by the wheel geometry: the pulse
    /// interval at one mile per hour, plus a 25% error margin.
    ///
    /// Below one mph the wheel is as good as stopped, so a pulse gap
    /// longer than this means zero speed rather than slow rolling.
    pub fn derived_zero_timeout_ms(wheel_diameter_in: f32, pulses_per_rev: u32) -> u32 {
        let circumference_ft = wheel_diameter_in * PI / 12.0;
        let revs_per_second_at_one_mph = FEET_PER_SECOND_AT_ONE_MPH / circumference_ft;
        let pulse_interval_s = 1.0 / (revs_per_second_at_one_mph * pulses_per_rev as f32);
        (pulse_interval_s * 1.25 * 1000.0) as u32
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            wheel_diameter_in: 23.0,
            pulses_per_rev: 4,
            debounce_floor_ms: 5,
            zero_timeout_ms: Self::derived_zero_timeout_ms(23.0, 4),
            window_size: 5,
            deadline_factor: 1.75,
            max_plausible_rpm: 1200.0,
            spin_threshold_mph: 5.0,
            skid_threshold_mph: 5.0,
            low_speed_floor_mph: 2.0,
        }
    }
}
