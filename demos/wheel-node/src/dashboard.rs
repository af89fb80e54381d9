//!
//! The dashboard's display refresh, reduced to a console printout.
//!
//! Everything printed here arrived over the bus: the dashboard's own
//! table is filled entirely by its bus node absorbing the wheel
//! controller's frames.  (Traction conditions stay local to the wheel
//! controller and are not transmitted, so the dashboard shows speeds.)
//!

use std::sync::Arc;

use vbus::prelude::*;

/// A node printing the absorbed wheel telemetry twice a second.
pub struct DashboardNode {
    table: Arc<SignalTable>,
}

impl DashboardNode {
    /// Create the dashboard over its (bus-fed) table.
    pub fn new(table: Arc<SignalTable>) -> Self {
        Self { table }
    }

    fn mph(&self, id: SignalId) -> f32 {
        self.table.get(id).as_float().unwrap_or(0.0)
    }
}

impl Node for DashboardNode {
    fn get_update_delay_us(&self) -> u128 {
        500_000
    }

    fn start(&mut self) {
        println!("dashboard: waiting for wheel telemetry");
    }

    fn update(&mut self) {
        println!(
            "wheels (mph)  FL {:5.1}  FR {:5.1}  RL {:5.1}  RR {:5.1}",
            self.mph(SignalId::FrontLeftWheelSpeed),
            self.mph(SignalId::FrontRightWheelSpeed),
            self.mph(SignalId::RearLeftWheelSpeed),
            self.mph(SignalId::RearRightWheelSpeed),
        );
    }

    fn shutdown(&mut self) {
        println!("dashboard: done");
    }
}
