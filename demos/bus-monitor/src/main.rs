//!
//! The trackside base station: joins the vehicle network over UDP in the
//! listen-only BaseStation role and prints whatever telemetry it absorbs.
//!
//! ```text
//! bus-monitor [bind-address]      # default 0.0.0.0:7400
//! ```
//!
//! Point any UDP-bridged node at this address and the table fills up.
//!

#![deny(missing_docs)]

use std::env;
use std::process::exit;
use std::sync::Arc;

use crossbeam::channel::unbounded;

use vbus::prelude::*;

/// A node printing a one-line vehicle summary once a second.
struct SummaryNode {
    table: Arc<SignalTable>,
}

impl Node for SummaryNode {
    fn get_update_delay_us(&self) -> u128 {
        1_000_000
    }

    fn start(&mut self) {
        println!("listening; waiting for telemetry");
    }

    fn update(&mut self) {
        let ground_speed_ms = self
            .table
            .get(SignalId::GpsGroundSpeed)
            .as_unsigned()
            .unwrap_or(0);
        let rpm = self
            .table
            .get(SignalId::PrimaryRpm)
            .as_unsigned()
            .unwrap_or(0);
        let front_left = self
            .table
            .get(SignalId::FrontLeftWheelSpeed)
            .as_float()
            .unwrap_or(0.0);
        let battery = self
            .table
            .get(SignalId::BatteryPercent)
            .as_unsigned()
            .unwrap_or(0);

        println!(
            "gps {ground_speed_ms:2} m/s | engine {rpm:4} rpm | FL wheel {front_left:5.1} mph | battery {battery:3}%"
        );
    }

    fn shutdown(&mut self) {
        println!("monitor stopped");
    }
}

fn main() {
    env_logger::init();

    let bind_address = env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:7400".to_string());
    let bind_address = match bind_address.parse() {
        Ok(address) => address,
        Err(err) => {
            eprintln!("unusable bind address {bind_address}: {err}");
            exit(2);
        }
    };

    // no bus, no node: bring-up failure here is fatal
    let bus = match UdpFrameBus::new(bind_address, Vec::new()) {
        Ok(bus) => bus,
        Err(err) => {
            eprintln!("could not bring up the UDP bus on {bind_address}: {err}");
            exit(1);
        }
    };

    let table = Arc::new(SignalTable::new());
    let bus_node = BusNode::new(BusDriver::new(
        bus,
        NodeRole::BaseStation,
        table.clone(),
        BusConfig::default(),
    ));
    let summary_node = SummaryNode { table };

    let (tx, rx) = unbounded();
    ctrlc::set_handler(move || tx.send(true).expect("could not send interrupt"))
        .expect("error setting ctrl-c handler");

    let mut executor =
        SimpleExecutor::new_with(rx, vec![Box::new(bus_node), Box::new(summary_node)]);

    executor.update_loop();
}
