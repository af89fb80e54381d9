//!
//! The Bus Driver.
//!
//! One driver per node binds together the node's role (which signals it
//! owns), the shared signal table, and a frame bus.  Publishing is
//! periodic and per-signal independent: a failed transmit is counted and
//! the rest of the batch still goes out, because the next cycle is always
//! coming and the bus cadence is itself the retry interval.  Receive
//! dispatch is table-driven and never fatal: unknown identifiers and
//! malformed payloads are counted and dropped.
//!

use std::sync::Arc;

use log::warn;

use vbus_core::{BusFrame, FrameBus, MAX_FRAME_PAYLOAD};
use vbus_signals::{NodeRole, SignalError, SignalId, SignalTable};
use vbus_utils::ticks;

use crate::config::BusConfig;

/// Monotonic counters describing a driver's life on the bus.
///
/// Everything non-fatal ends up here instead of in a panic: the counters
/// are the first thing to read when a subsystem looks deaf or mute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusStats {
    /// Frames successfully handed to the bus
    pub frames_sent: u64,
    /// Frames received and dispatched into the table
    pub frames_received: u64,
    /// Per-signal transmit failures (the batch continued regardless)
    pub send_failures: u64,
    /// Bus-level receive errors
    pub receive_failures: u64,
    /// Inbound frames dropped for an unrecognized identifier
    pub unknown_ids: u64,
    /// Inbound frames dropped for an undecodable payload
    pub decode_errors: u64,
}

/// The field-bus driver for one node.
pub struct BusDriver<B: FrameBus> {
    bus: B,
    role: NodeRole,
    table: Arc<SignalTable>,
    config: BusConfig,
    last_publish_ms: Option<u32>,
    stats: BusStats,
}

impl<B: FrameBus> BusDriver<B> {
    /// Bind a brought-up frame bus to a role and a shared signal table.
    ///
    /// Bring-up failure of the underlying transport surfaces from the
    /// frame-bus constructor before this point; a node without a bus must
    /// not get this far.
    pub fn new(bus: B, role: NodeRole, table: Arc<SignalTable>, config: BusConfig) -> Self {
        Self {
            bus,
            role,
            table,
            config,
            last_publish_ms: None,
            stats: BusStats::default(),
        }
    }

    /// The role this driver publishes for.
    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// The driver's configuration.
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// The driver's counters.
    pub fn stats(&self) -> &BusStats {
        &self.stats
    }

    /// Dispatch at most one pending inbound frame into the signal table.
    ///
    /// Returns the signal that was updated, or `None` when nothing usable
    /// arrived.  All failure modes are counted and logged; none of them
    /// ever aborts the receive loop.
    pub fn poll_receive(&mut self) -> Option<SignalId> {
        let frame = match self.bus.poll() {
            Ok(Some(frame)) => frame,
            Ok(None) => return None,
            Err(err) => {
                self.stats.receive_failures += 1;
                warn!("bus receive error: {:?}", err);
                return None;
            }
        };

        self.stats.frames_received += 1;

        match self.table.apply_wire(frame.id, frame.payload()) {
            Ok(id) => Some(id),
            Err(SignalError::UnknownId(wire_id)) => {
                self.stats.unknown_ids += 1;
                warn!(
                    "dropping frame with unknown identifier 0x{:02X} ({} bytes)",
                    wire_id,
                    frame.len
                );
                None
            }
            Err(err) => {
                self.stats.decode_errors += 1;
                warn!("dropping undecodable frame: {:?}", err);
                None
            }
        }
    }

    /// Publish the node's owned signals if the send interval has elapsed.
    ///
    /// Every signal in the publish set is attempted independently; a
    /// transmit failure is counted and the remaining signals still go
    /// out.  Returns the number of frames actually sent this call.
    pub fn tick(&mut self, now_ms: u32) -> usize {
        let due = match self.last_publish_ms {
            None => true,
            Some(last) => ticks::elapsed_ms(now_ms, last) >= self.config.send_interval_ms,
        };
        if !due {
            return 0;
        }
        self.last_publish_ms = Some(now_ms);

        let mut sent = 0;
        for id in self.role.publish_set() {
            let value = self.table.get(*id);

            let mut payload = [0u8; MAX_FRAME_PAYLOAD];
            let len = match value.encode(&mut payload) {
                Ok(len) => len,
                Err(err) => {
                    self.stats.send_failures += 1;
                    warn!("{}: could not encode value: {:?}", id.name(), err);
                    continue;
                }
            };

            let frame = match BusFrame::new(id.wire(), &payload[..len]) {
                Ok(frame) => frame,
                Err(err) => {
                    self.stats.send_failures += 1;
                    warn!("{}: could not frame value: {:?}", id.name(), err);
                    continue;
                }
            };

            match self.bus.send(&frame) {
                Ok(()) => {
                    self.stats.frames_sent += 1;
                    sent += 1;
                }
                Err(err) => {
                    self.stats.send_failures += 1;
                    warn!("{}: transmit failed: {:?}", id.name(), err);
                }
            }
        }

        sent
    }
}
