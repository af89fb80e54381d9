//!
//! Typed Signal Values and their Wire Encoding.
//!
//! The fixed-width binary sub-protocol: unsigned, signed, and float
//! payloads are four little-endian bytes, flags are one byte.  Publishers
//! and subscribers of an identifier always agree on the layout because
//! both sides derive it from the identifier's kind in the definition
//! table.
//!

use vbus_utils::framing::{FramingError, Packable};

use crate::ids::SignalKind;

/// A single typed signal value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SignalValue {
    /// A 32-bit unsigned integer value
    Unsigned(u32),
    /// A 32-bit signed integer value
    Signed(i32),
    /// A 32-bit float value
    Float(f32),
    /// An on/off value
    Flag(bool),
}

impl SignalValue {
    /// The kind of payload this value encodes to.
    pub fn kind(&self) -> SignalKind {
        match self {
            SignalValue::Unsigned(_) => SignalKind::Unsigned,
            SignalValue::Signed(_) => SignalKind::Signed,
            SignalValue::Float(_) => SignalKind::Float,
            SignalValue::Flag(_) => SignalKind::Flag,
        }
    }

    /// The zero/identity value every table slot holds at startup.
    pub fn zero(kind: SignalKind) -> Self {
        match kind {
            SignalKind::Unsigned => SignalValue::Unsigned(0),
            SignalKind::Signed => SignalValue::Signed(0),
            SignalKind::Float => SignalValue::Float(0.0),
            SignalKind::Flag => SignalValue::Flag(false),
        }
    }

    /// Encode this value into the front of `buffer`, returning the number
    /// of payload bytes written.
    pub fn encode(self, buffer: &mut [u8]) -> Result<usize, FramingError> {
        match self {
            SignalValue::Unsigned(v) => v.pack(buffer)?,
            SignalValue::Signed(v) => v.pack(buffer)?,
            SignalValue::Float(v) => v.pack(buffer)?,
            SignalValue::Flag(v) => v.pack(buffer)?,
        }
        Ok(self.kind().payload_len())
    }

    /// Decode a payload of the given kind.
    ///
    /// The payload length must match the kind exactly; a wheel node must
    /// never guess at the meaning of a malformed frame.
    pub fn decode(kind: SignalKind, payload: &[u8]) -> Result<Self, FramingError> {
        if payload.len() != kind.payload_len() {
            return Err(FramingError::InvalidBufferSize);
        }

        Ok(match kind {
            SignalKind::Unsigned => SignalValue::Unsigned(u32::unpack(payload)?),
            SignalKind::Signed => SignalValue::Signed(i32::unpack(payload)?),
            SignalKind::Float => SignalValue::Float(f32::unpack(payload)?),
            SignalKind::Flag => SignalValue::Flag(bool::unpack(payload)?),
        })
    }

    /// The contained unsigned value, if this is an unsigned signal.
    pub fn as_unsigned(&self) -> Option<u32> {
        match self {
            SignalValue::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    /// The contained signed value, if this is a signed signal.
    pub fn as_signed(&self) -> Option<i32> {
        match self {
            SignalValue::Signed(v) => Some(*v),
            _ => None,
        }
    }

    /// The contained float value, if this is a float signal.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            SignalValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The contained flag value, if this is a flag signal.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SignalValue::Flag(v) => Some(*v),
            _ => None,
        }
    }
}
