//!
//! Common imports for assembling a VBus controller.
//!

pub use vbus_core::{BusFrame, Executor, ExecutorState, FrameBus, Node};

pub use vbus_executors::{SimpleExecutor, ThreadedExecutor};

pub use vbus_nodes::{BusNode, MonotonicMillis, WheelSpeedNode};

pub use vbus_signals::{NodeRole, SignalId, SignalKind, SignalTable, SignalValue};

pub use vbus_transport::{BusConfig, BusDriver, LoopbackBus, UdpFrameBus};

pub use vbus_wheel::{WheelConfig, WheelCondition, WheelCorner, WheelEstimator};
