//!
//! A whole miniature vehicle network in one process: a wheel-speed
//! controller and a dashboard, joined by a loopback bus.
//!
//! A background thread plays the part of the four hall-effect sensors,
//! pulsing each wheel's capture cell as the simulated vehicle speeds up
//! and slows down.  The wheel node estimates, the bus nodes shuttle
//! signals, and the dashboard node prints what it hears.
//!
//! Tunables load from `wheel-node.json` next to the binary if present:
//!
//! ```json
//! { "wheel": { "window_size": 8 }, "bus": { "send_interval_ms": 50 } }
//! ```
//!

#![deny(missing_docs)]

use std::fs;
use std::sync::Arc;

use crossbeam::channel::unbounded;

use serde_json::Value;

use vbus::prelude::*;

pub mod dashboard;
use dashboard::DashboardNode;

pub mod simulator;
use simulator::EdgeSimulator;

/// Load a config section from wheel-node.json, falling back to defaults.
fn load_configs() -> (WheelConfig, BusConfig) {
    let raw = match fs::read_to_string("wheel-node.json") {
        Ok(raw) => raw,
        Err(_) => return (WheelConfig::default(), BusConfig::default()),
    };

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!("ignoring unreadable wheel-node.json: {err}");
            return (WheelConfig::default(), BusConfig::default());
        }
    };

    let wheel = serde_json::from_value(parsed["wheel"].clone()).unwrap_or_default();
    let bus = serde_json::from_value(parsed["bus"].clone()).unwrap_or_default();
    (wheel, bus)
}

fn main() {
    env_logger::init();

    let (wheel_config, bus_config) = load_configs();

    let bus = LoopbackBus::new();

    // the wheel-speed controller
    let wheel_table = Arc::new(SignalTable::new());
    let wheel_node = WheelSpeedNode::new(wheel_config, wheel_table.clone());
    let wheel_bus_node = BusNode::new(BusDriver::new(
        bus.endpoint(),
        NodeRole::WheelSpeed,
        wheel_table.clone(),
        bus_config,
    ));

    // the dashboard
    let dash_table = Arc::new(SignalTable::new());
    let dash_bus_node = BusNode::new(BusDriver::new(
        bus.endpoint(),
        NodeRole::Dashboard,
        dash_table.clone(),
        bus_config,
    ));
    let dashboard_node = DashboardNode::new(dash_table);

    // the "hardware": four wheels pulsing in a background thread
    let captures = WheelCorner::ALL.map(|corner| wheel_node.capture_handle(corner));
    let simulator = EdgeSimulator::spawn(captures, wheel_table, wheel_config);

    let (tx, rx) = unbounded();
    ctrlc::set_handler(move || tx.send(true).expect("could not send interrupt"))
        .expect("error setting ctrl-c handler");

    let mut executor = SimpleExecutor::new_with(
        rx,
        vec![
            Box::new(wheel_node),
            Box::new(wheel_bus_node),
            Box::new(dash_bus_node),
            Box::new(dashboard_node),
        ],
    );

    executor.update_loop();
    simulator.stop();
}
