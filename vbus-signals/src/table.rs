//!
//! The Per-Node Signal Table.
//!
//! Every node holds one table instance covering the full vehicle-wide
//! signal set, even signals it never publishes, so local code can reason
//! about remote state (a wheel node reading the GPS ground speed, a
//! dashboard reading wheel speeds).  The table is created once at startup
//! and lives for the whole process.
//!
//! Each slot is an atomic cell, so the table tolerates any number of
//! concurrent readers plus the per-family periodic writers (the estimator
//! for wheel signals, the bus receive path for everything else) without a
//! lock ever being held across bus I/O.
//!

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use vbus_utils::framing::FramingError;

use crate::ids::{SignalDef, SignalId, SignalKind, SIGNAL_DEFS};
use crate::value::SignalValue;

/// An error from writing a value into the signal table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SignalError {
    /// The wire identifier does not name any known signal
    UnknownId(u16),
    /// The value's kind does not match the identifier's kind
    KindMismatch {
        /// The signal being written
        id: SignalId,
        /// The kind the definition table requires
        expected: SignalKind,
        /// The kind that was provided
        found: SignalKind,
    },
    /// The payload could not be decoded as the identifier's kind
    Malformed {
        /// The signal being decoded
        id: SignalId,
        /// The underlying framing failure
        source: FramingError,
    },
}

// Cells carry no ordering relationship to any other memory, so relaxed
// loads and stores are sufficient everywhere.
enum Cell {
    Unsigned(AtomicU32),
    Signed(AtomicI32),
    Float(AtomicU32),
    Flag(AtomicBool),
}

impl Cell {
    fn zeroed(kind: SignalKind) -> Self {
        match kind {
            SignalKind::Unsigned => Cell::Unsigned(AtomicU32::new(0)),
            SignalKind::Signed => Cell::Signed(AtomicI32::new(0)),
            SignalKind::Float => Cell::Float(AtomicU32::new(0.0f32.to_bits())),
            SignalKind::Flag => Cell::Flag(AtomicBool::new(false)),
        }
    }

    fn load(&self) -> SignalValue {
        match self {
            Cell::Unsigned(cell) => SignalValue::Unsigned(cell.load(Ordering::Relaxed)),
            Cell::Signed(cell) => SignalValue::Signed(cell.load(Ordering::Relaxed)),
            Cell::Float(cell) => SignalValue::Float(f32::from_bits(cell.load(Ordering::Relaxed))),
            Cell::Flag(cell) => SignalValue::Flag(cell.load(Ordering::Relaxed)),
        }
    }

    /// Store `value` if its variant matches this cell, reporting whether
    /// it did.
    fn store(&self, value: SignalValue) -> bool {
        match (self, value) {
            (Cell::Unsigned(cell), SignalValue::Unsigned(v)) => {
                cell.store(v, Ordering::Relaxed);
                true
            }
            (Cell::Signed(cell), SignalValue::Signed(v)) => {
                cell.store(v, Ordering::Relaxed);
                true
            }
            (Cell::Float(cell), SignalValue::Float(v)) => {
                cell.store(v.to_bits(), Ordering::Relaxed);
                true
            }
            (Cell::Flag(cell), SignalValue::Flag(v)) => {
                cell.store(v, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }
}

struct Slot {
    def: &'static SignalDef,
    cell: Cell,
}

/// The shared signal table instance for one node.
///
/// Constructed once at startup with zeroed defaults; shared between the
/// estimator, the bus driver, and sensor-reading code behind an `Arc`.
pub struct SignalTable {
    slots: Vec<Slot>,
    // wire identifier -> slot position, resolved once at construction so
    // receive dispatch never branches per identifier
    index: HashMap<u16, usize>,
}

impl SignalTable {
    /// Create a table covering the full definition table, all slots zeroed.
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(SIGNAL_DEFS.len());
        let mut index = HashMap::with_capacity(SIGNAL_DEFS.len());

        for def in SIGNAL_DEFS {
            index.insert(def.id.wire(), slots.len());
            slots.push(Slot {
                def,
                cell: Cell::zeroed(def.kind),
            });
        }

        Self { slots, index }
    }

    // Every SignalId has a definition row (generated from the same macro
    // invocation), so slot lookup by a typed identifier cannot miss.
    fn slot(&self, id: SignalId) -> &Slot {
        &self.slots[self.index[&id.wire()]]
    }

    /// The number of signals this table covers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table covers no signals (never true in practice).
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Read the current value of a signal.
    pub fn get(&self, id: SignalId) -> SignalValue {
        self.slot(id).cell.load()
    }

    /// Overwrite the current value of a signal (last writer wins).
    pub fn set(&self, id: SignalId, value: SignalValue) -> Result<(), SignalError> {
        let slot = self.slot(id);
        if slot.cell.store(value) {
            Ok(())
        } else {
            Err(SignalError::KindMismatch {
                id,
                expected: slot.def.kind,
                found: value.kind(),
            })
        }
    }

    /// Decode a raw inbound frame payload into the matching slot,
    /// returning which signal was updated.
    ///
    /// This is the bus receive dispatch: identifier resolution and payload
    /// decoding both run off the definition table, and failures leave the
    /// prior value untouched.
    pub fn apply_wire(&self, wire_id: u16, payload: &[u8]) -> Result<SignalId, SignalError> {
        let position = match self.index.get(&wire_id) {
            Some(position) => *position,
            None => return Err(SignalError::UnknownId(wire_id)),
        };

        let slot = &self.slots[position];
        let value = SignalValue::decode(slot.def.kind, payload).map_err(|source| {
            SignalError::Malformed {
                id: slot.def.id,
                source,
            }
        })?;

        // decode produced the slot's own kind, so this store cannot miss
        slot.cell.store(value);
        Ok(slot.def.id)
    }
}

impl Default for SignalTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_zeroed() {
        let table = SignalTable::new();
        assert_eq!(table.len(), SIGNAL_DEFS.len());
        assert_eq!(
            table.get(SignalId::PrimaryRpm),
            SignalValue::Unsigned(0)
        );
        assert_eq!(
            table.get(SignalId::FrontLeftWheelSpeed),
            SignalValue::Float(0.0)
        );
        assert_eq!(
            table.get(SignalId::LoggingActive),
            SignalValue::Flag(false)
        );
    }

    #[test]
    fn test_set_then_get_each_kind() {
        let table = SignalTable::new();

        table
            .set(SignalId::PrimaryRpm, SignalValue::Unsigned(3400))
            .unwrap();
        table
            .set(SignalId::PrimaryTemperature, SignalValue::Signed(-12))
            .unwrap();
        table
            .set(SignalId::FrontLeftWheelSpeed, SignalValue::Float(14.7))
            .unwrap();
        table
            .set(SignalId::LoggingActive, SignalValue::Flag(true))
            .unwrap();

        assert_eq!(
            table.get(SignalId::PrimaryRpm),
            SignalValue::Unsigned(3400)
        );
        assert_eq!(
            table.get(SignalId::PrimaryTemperature),
            SignalValue::Signed(-12)
        );
        assert_eq!(
            table.get(SignalId::FrontLeftWheelSpeed),
            SignalValue::Float(14.7)
        );
        assert_eq!(table.get(SignalId::LoggingActive), SignalValue::Flag(true));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let table = SignalTable::new();
        let result = table.set(SignalId::PrimaryRpm, SignalValue::Float(1.0));
        assert_eq!(
            result,
            Err(SignalError::KindMismatch {
                id: SignalId::PrimaryRpm,
                expected: SignalKind::Unsigned,
                found: SignalKind::Float,
            })
        );
        // the failed write left the slot untouched
        assert_eq!(table.get(SignalId::PrimaryRpm), SignalValue::Unsigned(0));
    }

    #[test]
    fn test_apply_wire_updates_slot() {
        let table = SignalTable::new();
        let payload = 17.25f32.to_le_bytes();

        let updated = table
            .apply_wire(SignalId::RearLeftWheelSpeed.wire(), &payload)
            .unwrap();

        assert_eq!(updated, SignalId::RearLeftWheelSpeed);
        assert_eq!(
            table.get(SignalId::RearLeftWheelSpeed),
            SignalValue::Float(17.25)
        );
    }

    #[test]
    fn test_apply_wire_last_writer_wins() {
        let table = SignalTable::new();
        table
            .apply_wire(SignalId::BatteryPercent.wire(), &95u32.to_le_bytes())
            .unwrap();
        table
            .apply_wire(SignalId::BatteryPercent.wire(), &94u32.to_le_bytes())
            .unwrap();
        assert_eq!(
            table.get(SignalId::BatteryPercent),
            SignalValue::Unsigned(94)
        );
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        use std::sync::Arc;
        use std::thread;

        let table = Arc::new(SignalTable::new());
        let estimator_side = table.clone();
        let receive_side = table.clone();

        let estimator = thread::spawn(move || {
            for step in 1..=1000u32 {
                estimator_side
                    .set(
                        SignalId::FrontLeftWheelSpeed,
                        SignalValue::Float(step as f32),
                    )
                    .unwrap();
            }
        });
        let receiver = thread::spawn(move || {
            for step in 1..=1000u32 {
                receive_side
                    .apply_wire(SignalId::GpsGroundSpeed.wire(), &step.to_le_bytes())
                    .unwrap();
            }
        });

        // readers only ever observe whole written values
        for _ in 0..1000 {
            let speed = table.get(SignalId::FrontLeftWheelSpeed).as_float().unwrap();
            assert!((0.0..=1000.0).contains(&speed));
            let gps = table.get(SignalId::GpsGroundSpeed).as_unsigned().unwrap();
            assert!(gps <= 1000);
        }

        estimator.join().unwrap();
        receiver.join().unwrap();
    }

    #[test]
    fn test_apply_wire_unknown_identifier() {
        let table = SignalTable::new();
        assert_eq!(
            table.apply_wire(0x05, &[0u8; 4]),
            Err(SignalError::UnknownId(0x05))
        );
    }

    #[test]
    fn test_apply_wire_malformed_payload() {
        let table = SignalTable::new();
        let result = table.apply_wire(SignalId::GpsLatitude.wire(), &[0u8; 2]);
        assert!(matches!(
            result,
            Err(SignalError::Malformed {
                id: SignalId::GpsLatitude,
                ..
            })
        ));
        assert_eq!(table.get(SignalId::GpsLatitude), SignalValue::Float(0.0));
    }
}
