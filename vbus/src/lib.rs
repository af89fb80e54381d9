//!
//! # VBus
//!
//! VBus is the sensing and communication layer of a distributed vehicle
//! control network: a handful of small controllers, each measuring its
//! own corner of the vehicle, all exchanging state over one shared field
//! bus.
//!
//! ## Technical Overview
//!
//! Every controller runs the same three pieces:
//!
//! * A **signal table** (vbus-signals): the vehicle-wide registry of
//!   named, typed values.  Each node holds the full table, publishes the
//!   part its role owns, and passively absorbs everything else, so any
//!   node can reason about any other node's state (the wheel node reads
//!   the GPS ground speed the data-acquisition node publishes).
//!
//! * **Sensing nodes** (vbus-wheel, vbus-nodes): periodic units of work
//!   in the spirit of an Arduino `loop()`, scheduled by an executor
//!   (vbus-executors) at their own cadence.  The most developed sensor is
//!   the wheel-speed estimator, which turns interrupt-timestamped hall
//!   sensor pulses into debounced, smoothed, traction-classified wheel
//!   speeds.
//!
//! * A **bus driver** (vbus-transport): publishes the node's owned
//!   signals on a fixed interval and dispatches every inbound frame into
//!   the table, whatever physical wire the deployment uses (CAN via a
//!   serial adapter, UDP on the bench, in-process loopback in tests).
//!
//! ## Why?
//!
//! Because every subsystem on the vehicle needs the same three pieces,
//! and they need to agree bit for bit.  Splitting the table, the
//! estimator, and the transport into crates with hard seams means a
//! bench rig, a software-in-the-loop simulation, and the real car all
//! run the same driver code against the same frozen signal table.
//!

pub mod prelude;

/// Core traits (Node, Executor, FrameBus)
pub use vbus_core as core;
/// Node executors
pub use vbus_executors as executors;
/// Ready-made nodes
pub use vbus_nodes as nodes;
/// The signal registry and table
pub use vbus_signals as signals;
/// The bus driver and frame buses
pub use vbus_transport as transport;
/// Utility packing and tick arithmetic
pub use vbus_utils as utils;
/// Wheel-speed estimation
pub use vbus_wheel as wheel;
