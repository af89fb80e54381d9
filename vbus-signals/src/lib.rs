//!
//! VBus-Signals is the shared vocabulary of the vehicle network: the fixed
//! identifier table every node agrees on, the typed values those
//! identifiers carry, the role-indexed publish sets, and the per-node
//! signal table instance that the estimators and the bus driver read and
//! write.
//!
//! The identifier table is bit-compatible network-wide.  Changing an
//! identifier or its kind is a compatibility break for every controller on
//! the vehicle, so additions go at the end of the table and nothing is ever
//! renumbered.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod ids;
pub use ids::{SignalDef, SignalId, SignalKind, SIGNAL_DEFS};

pub mod value;
pub use value::SignalValue;

pub mod role;
pub use role::NodeRole;

pub mod table;
pub use table::{SignalError, SignalTable};
