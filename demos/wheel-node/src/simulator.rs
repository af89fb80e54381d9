//!
//! The stand-in for the wheel sensors and the GPS.
//!
//! A background thread pulses each wheel's capture cell the way a hall
//! sensor would: the simulated vehicle accelerates to a cruise, holds
//! it, brakes to a stop, and waits, forever.  The rear-left wheel runs a
//! little fast so the dashboard occasionally shows wheelspin.  The thread
//! also writes the matching GPS ground speed straight into the wheel
//! node's table, standing in for the value the bus would absorb from the
//! data-acquisition node.
//!

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;

use vbus::prelude::*;
use vbus::wheel::EdgeCapture;

/// How much faster the rear-left wheel spins than the vehicle moves.
const SPINNING_WHEEL_FACTOR: f32 = 1.35;

/// The handle to the sensor-simulation thread.
pub struct EdgeSimulator {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl EdgeSimulator {
    /// Start pulsing the four capture cells.
    pub fn spawn(
        captures: [Arc<EdgeCapture>; 4],
        table: Arc<SignalTable>,
        config: WheelConfig,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = running.clone();

        let handle = thread::spawn(move || {
            let ticker = MonotonicMillis::new();
            let mut rng = rand::thread_rng();
            let mut next_pulse_ms = [0u32; 4];

            while thread_running.load(Ordering::Relaxed) {
                let now = ticker.now_ms();
                let vehicle_mph = speed_profile_mph(now);

                let _ = table.set(
                    SignalId::GpsGroundSpeed,
                    SignalValue::Unsigned((vehicle_mph / 2.23694) as u32),
                );

                // the suspension sensors live outside this crate: their
                // read path writes displacements straight into the table,
                // and the bus node publishes them with the wheel speeds
                for id in [
                    SignalId::FrontLeftDisplacement,
                    SignalId::FrontRightDisplacement,
                    SignalId::RearLeftDisplacement,
                    SignalId::RearRightDisplacement,
                ] {
                    let ripple = rng.gen_range(-0.3f32..0.3f32) * (vehicle_mph / 25.0);
                    let _ = table.set(id, SignalValue::Float(ripple));
                }

                for (index, capture) in captures.iter().enumerate() {
                    let mut wheel_mph = vehicle_mph;
                    if index == 2 && vehicle_mph > 5.0 {
                        wheel_mph *= SPINNING_WHEEL_FACTOR;
                    }
                    if wheel_mph < 0.5 {
                        continue;
                    }

                    if now >= next_pulse_ms[index] {
                        capture.capture(now);
                        let interval = pulse_interval_ms(wheel_mph, &config);
                        // a few percent of timing jitter, like a real tone ring
                        let jitter = rng.gen_range(0.97f32..1.03f32);
                        next_pulse_ms[index] = now + (interval * jitter) as u32;
                    }
                }

                thread::sleep(Duration::from_millis(2));
            }
        });

        Self { running, handle }
    }

    /// Stop the thread and wait for it.
    pub fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}

/// The drive cycle: accelerate for 15s, cruise at 25 mph, brake, sit
/// still for 5s, repeat.
fn speed_profile_mph(now_ms: u32) -> f32 {
    let phase_ms = now_ms % 40_000;
    match phase_ms {
        0..=14_999 => 25.0 * (phase_ms as f32 / 15_000.0),
        15_000..=29_999 => 25.0,
        30_000..=34_999 => 25.0 * (1.0 - (phase_ms - 30_000) as f32 / 5_000.0),
        _ => 0.0,
    }
}

/// The expected ms between sensing targets at a given wheel speed.
fn pulse_interval_ms(wheel_mph: f32, config: &WheelConfig) -> f32 {
    let rpm = wheel_mph / config.rpm_to_mph_factor();
    60_000.0 / (rpm * config.pulses_per_rev as f32)
}
