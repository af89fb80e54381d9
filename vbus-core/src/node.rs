//!
//! A Singular Unit of Periodic Work.
//!
//! In VBus, a Node is an individual unit of work that is performed every
//! x microseconds on one of a vehicle's controllers.  A wheel-speed
//! estimator that drains captured sensor edges, a bus driver that publishes
//! its owned signals, a display refresher -- each is a Node scheduled by an
//! executor at its own cadence.
//!

/// A Node represents a singular process that performs some singular
/// purpose at a fixed cadence.
pub trait Node: Send {
    /// Return the node's update rate (in us)
    fn get_update_delay_us(&self) -> u128;

    /// Complete the necessary setup functionalities for a Node.
    ///
    /// Note: this method is called once by the executor before the first
    /// update so peripheral bring-up and initial signal values belong here.
    fn start(&mut self);

    /// Update is called by the executor every get_update_delay_us
    /// microseconds.
    ///
    /// This can be compared to Arduino's `void loop` and should contain the
    /// work completed by this node every "tick".  Updates must not block:
    /// anything waiting on the bus or a sensor belongs behind a non-blocking
    /// poll.
    fn update(&mut self);

    /// When an executor is stopped or has finished executing nodes, it will
    /// call this method on all of its nodes so this should clean up any work
    /// the node needs to do.
    fn shutdown(&mut self);
}
