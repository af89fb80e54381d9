//!
//! VBus-Utils contains the utility functionality shared by the vbus
//! crates: the wire packing used for signal payloads and the
//! rollover-safe millisecond arithmetic used for all bus and sensor
//! timing.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod framing;
pub mod ticks;
