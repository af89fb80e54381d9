//!
//! VBus-Nodes contains the ready-made nodes most vehicle controllers are
//! assembled from: the wheel-speed node (four per-corner estimators
//! draining into the signal table) and the bus node (periodic publish
//! plus bounded receive dispatch).
//!

#![deny(missing_docs)]

pub mod clock;
pub use clock::MonotonicMillis;

pub mod wheel;
pub use wheel::WheelSpeedNode;

pub mod bus;
pub use bus::BusNode;
