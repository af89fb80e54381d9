//!
//! VBus-Transport moves the signal table across the field bus.
//!
//! The [`BusDriver`] owns a node's publish cadence and receive dispatch:
//! every `send_interval_ms` it serializes the signals the node's role owns
//! into frames, and between publishes it drains inbound frames into the
//! shared signal table.  The physical wire is abstracted behind the
//! `FrameBus` trait from vbus-core, with three drivers provided here: an
//! in-process loopback bus for tests and demos, a UDP datagram bus for
//! host-side nodes, and an embedded-io serial bus for SLCAN-style
//! adapters.
//!

#![deny(missing_docs)]

pub mod config;
pub use config::BusConfig;

pub mod driver;
pub use driver::{BusDriver, BusStats};

pub mod loopback;
pub use loopback::{LoopbackBus, LoopbackEndpoint, LoopbackError};

pub mod udp;
pub use udp::UdpFrameBus;

pub mod serial;
pub use serial::{SerialBusError, SerialFrameBus};
