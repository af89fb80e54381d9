//!
//! A Serial Frame Bus using the embedded-io traits.
//!
//! For controllers that reach the vehicle bus through a serial CAN
//! adapter, frames cross the serial line in the fixed wire layout.  The
//! implementation is generic over any peripheral implementing the
//! embedded-io Read/ReadReady/Write traits and keeps a statically sized
//! reassembly buffer so a frame split across reads is handled without
//! allocation.
//!

use embedded_io::{Error, Read, ReadReady, Write};

use vbus_core::{BusFrame, FrameBus, FrameError};

/// An error from the serial frame bus.
#[derive(Debug)]
pub enum SerialBusError<Err: Error> {
    /// The underlying embedded-io peripheral failed
    IOError(Err),
    /// The bytes on the line did not form a frame
    Frame(FrameError),
}

/// A frame bus speaking the fixed wire layout over a serial peripheral.
pub struct SerialFrameBus<Serial, Err>
where
    Serial: Read<Error = Err> + ReadReady<Error = Err> + Write<Error = Err>,
    Err: Error,
{
    serial: Serial,
    rx_buffer: [u8; BusFrame::WIRE_LEN],
    rx_filled: usize,
}

impl<Serial, Err> SerialFrameBus<Serial, Err>
where
    Serial: Read<Error = Err> + ReadReady<Error = Err> + Write<Error = Err>,
    Err: Error,
{
    /// Wrap a brought-up serial peripheral.
    pub fn new(serial: Serial) -> Self {
        Self {
            serial,
            rx_buffer: [0u8; BusFrame::WIRE_LEN],
            rx_filled: 0,
        }
    }

    /// Destroy the bus, returning the serial peripheral.
    pub fn destroy(self) -> Serial {
        self.serial
    }
}

impl<Serial, Err> FrameBus for SerialFrameBus<Serial, Err>
where
    Serial: Read<Error = Err> + ReadReady<Error = Err> + Write<Error = Err>,
    Err: Error,
{
    type Error = SerialBusError<Err>;

    fn send(&mut self, frame: &BusFrame) -> Result<(), Self::Error> {
        self.serial
            .write_all(&frame.to_wire())
            .map_err(SerialBusError::IOError)?;
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<BusFrame>, Self::Error> {
        while self.serial.read_ready().map_err(SerialBusError::IOError)? {
            let read = self
                .serial
                .read(&mut self.rx_buffer[self.rx_filled..])
                .map_err(SerialBusError::IOError)?;
            if read == 0 {
                break;
            }
            self.rx_filled += read;

            if self.rx_filled == BusFrame::WIRE_LEN {
                self.rx_filled = 0;
                let frame =
                    BusFrame::from_wire(&self.rx_buffer).map_err(SerialBusError::Frame)?;
                return Ok(Some(frame));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::convert::Infallible;

    /// A serial peripheral whose transmit line is looped back to its
    /// receive line, delivering `chunk` bytes per read to exercise frame
    /// reassembly.
    struct LoopedSerial {
        line: VecDeque<u8>,
        chunk: usize,
    }

    impl LoopedSerial {
        fn new(chunk: usize) -> Self {
            Self {
                line: VecDeque::new(),
                chunk,
            }
        }
    }

    impl embedded_io::ErrorType for LoopedSerial {
        type Error = Infallible;
    }

    impl Read for LoopedSerial {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let take = buf.len().min(self.chunk).min(self.line.len());
            for slot in buf.iter_mut().take(take) {
                *slot = self.line.pop_front().unwrap();
            }
            Ok(take)
        }
    }

    impl ReadReady for LoopedSerial {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.line.is_empty())
        }
    }

    impl Write for LoopedSerial {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.line.extend(buf.iter().copied());
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_frame_round_trip_over_the_line() {
        let mut bus = SerialFrameBus::new(LoopedSerial::new(64));

        let frame = BusFrame::new(0x0D, &21.5f32.to_le_bytes()).unwrap();
        bus.send(&frame).unwrap();

        assert_eq!(bus.poll().unwrap(), Some(frame));
        assert_eq!(bus.poll().unwrap(), None);
    }

    #[test]
    fn test_frame_reassembled_from_small_reads() {
        // three bytes per read: a frame needs four reads to arrive
        let mut bus = SerialFrameBus::new(LoopedSerial::new(3));

        let frame = BusFrame::new(0x16, &42u32.to_le_bytes()).unwrap();
        bus.send(&frame).unwrap();

        assert_eq!(bus.poll().unwrap(), Some(frame));
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut bus = SerialFrameBus::new(LoopedSerial::new(64));

        let first = BusFrame::new(0x01, &3400u32.to_le_bytes()).unwrap();
        let second = BusFrame::new(0x02, &2900u32.to_le_bytes()).unwrap();
        bus.send(&first).unwrap();
        bus.send(&second).unwrap();

        assert_eq!(bus.poll().unwrap(), Some(first));
        assert_eq!(bus.poll().unwrap(), Some(second));
        assert_eq!(bus.poll().unwrap(), None);
    }

    #[test]
    fn test_corrupt_length_surfaces_a_frame_error() {
        let mut serial = LoopedSerial::new(64);
        let mut wire = BusFrame::new(0x01, &[1]).unwrap().to_wire();
        wire[2] = 0xFF;
        serial.write(&wire).unwrap();

        let mut bus = SerialFrameBus::new(serial);
        assert!(matches!(
            bus.poll(),
            Err(SerialBusError::Frame(FrameError::BadLength))
        ));
    }
}
