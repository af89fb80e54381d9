//!
//! VBus-Core is a collection of traits that lay out the core of the
//! vbus vehicle telemetry framework.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]
#[cfg(feature = "alloc")]
extern crate alloc;

pub mod node;
pub use node::Node;

#[cfg(any(feature = "std", feature = "alloc"))]
pub mod executor;
#[cfg(any(feature = "std", feature = "alloc"))]
pub use executor::{Executor, ExecutorState};

pub mod bus;
pub use bus::{BusFrame, FrameBus, FrameError, MAX_FRAME_PAYLOAD};
