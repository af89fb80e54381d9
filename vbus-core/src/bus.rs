//!
//! The Field-Bus Seam.
//!
//! Every VBus node ultimately talks to the rest of the vehicle through a
//! shared frame bus.  The physical controller differs between deployments
//! (an on-chip CAN peripheral, an SLCAN serial adapter, a UDP socket during
//! bench testing) so the transport layer programs against the FrameBus
//! trait and the concrete driver is chosen at bring-up.
//!

/// The maximum payload carried by a single bus frame.
///
/// This matches classic CAN data frames so the same signal encoding works
/// unchanged against real CAN silicon.
pub const MAX_FRAME_PAYLOAD: usize = 8;

/// An error with constructing or re-constructing a bus frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The payload handed to [`BusFrame::new`] does not fit in a frame
    PayloadTooLong,
    /// The wire bytes are shorter than a serialized frame
    Truncated,
    /// The embedded length field exceeds [`MAX_FRAME_PAYLOAD`]
    BadLength,
}

/// A single frame exchanged over the field bus: a signal identifier plus
/// up to eight payload bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusFrame {
    /// The signal identifier this frame carries
    pub id: u16,
    /// The number of valid payload bytes
    pub len: u8,
    /// The payload bytes (only the first `len` are meaningful)
    pub data: [u8; MAX_FRAME_PAYLOAD],
}

impl BusFrame {
    /// The size of a frame serialized for byte-stream transports:
    /// identifier (2) + length (1) + payload (8).
    pub const WIRE_LEN: usize = 3 + MAX_FRAME_PAYLOAD;

    /// Create a new frame for the given identifier and payload
    pub fn new(id: u16, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_FRAME_PAYLOAD {
            return Err(FrameError::PayloadTooLong);
        }

        let mut data = [0u8; MAX_FRAME_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            len: payload.len() as u8,
            data,
        })
    }

    /// The valid payload bytes of this frame
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Serialize this frame into the fixed wire layout used by the
    /// byte-stream transports (identifier little-endian, then length,
    /// then the full padded payload).
    pub fn to_wire(&self) -> [u8; Self::WIRE_LEN] {
        let mut wire = [0u8; Self::WIRE_LEN];
        wire[..2].copy_from_slice(&self.id.to_le_bytes());
        wire[2] = self.len;
        wire[3..].copy_from_slice(&self.data);
        wire
    }

    /// Reconstruct a frame from the fixed wire layout
    pub fn from_wire(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < Self::WIRE_LEN {
            return Err(FrameError::Truncated);
        }

        let len = bytes[2];
        if len as usize > MAX_FRAME_PAYLOAD {
            return Err(FrameError::BadLength);
        }

        let mut data = [0u8; MAX_FRAME_PAYLOAD];
        data.copy_from_slice(&bytes[3..Self::WIRE_LEN]);
        Ok(Self {
            id: u16::from_le_bytes([bytes[0], bytes[1]]),
            len,
            data,
        })
    }
}

/// The seam over a physical (or simulated) field-bus controller.
///
/// Implementations must be usable from a periodic task: `send` may fail
/// fast but must not wait for bus arbitration, and `poll` must return
/// immediately whether or not a frame has arrived.
pub trait FrameBus {
    /// The error type surfaced by the underlying controller.
    ///
    /// Errors must be debug-printable because the transport layer counts
    /// and logs them rather than aborting the periodic loop.
    type Error: core::fmt::Debug;

    /// Queue one frame for transmission onto the bus
    fn send(&mut self, frame: &BusFrame) -> Result<(), Self::Error>;

    /// Fetch at most one pending inbound frame without blocking
    fn poll(&mut self) -> Result<Option<BusFrame>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_wire_round_trip() {
        let frame = BusFrame::new(0x0B, &[0x12, 0x34, 0x56, 0x78]).unwrap();
        let wire = frame.to_wire();
        assert_eq!(BusFrame::from_wire(&wire).unwrap(), frame);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        assert_eq!(
            BusFrame::new(0x01, &[0u8; 9]),
            Err(FrameError::PayloadTooLong)
        );
    }

    #[test]
    fn test_truncated_wire_rejected() {
        let frame = BusFrame::new(0x39, &[7]).unwrap();
        let wire = frame.to_wire();
        assert_eq!(
            BusFrame::from_wire(&wire[..BusFrame::WIRE_LEN - 1]),
            Err(FrameError::Truncated)
        );
    }

    #[test]
    fn test_corrupt_length_rejected() {
        let frame = BusFrame::new(0x39, &[7]).unwrap();
        let mut wire = frame.to_wire();
        wire[2] = 9;
        assert_eq!(BusFrame::from_wire(&wire), Err(FrameError::BadLength));
    }
}
