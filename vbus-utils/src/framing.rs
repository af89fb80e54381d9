//!
//! Wire Packing for Values Sent over the Field Bus.
//!
//! Every payload on the bus is little-endian so that all controllers on
//! the vehicle, whatever their native order, agree on the layout byte for
//! byte.
//!

/// An error from attempting to pack a value into a buffer or from
/// attempting to unpack a value from a slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramingError {
    /// The buffer to pack into or unpack from is too small for the value.
    InvalidBufferSize,
}

/// Trait implemented by values that cross the bus boundary.
pub trait Packable: Sized {
    /// Get the exact number of payload bytes this value occupies.
    fn len() -> usize;

    /// Pack this value into the front of a given buffer.
    fn pack(self, buffer: &mut [u8]) -> Result<(), FramingError>;

    /// Unpack a value from the front of a slice of payload bytes.
    fn unpack(data: &[u8]) -> Result<Self, FramingError>;
}

macro_rules! packable_primitive {
    ($primitive_name: ident, $length: literal) => {
        impl Packable for $primitive_name {
            fn len() -> usize {
                $length as usize
            }

            fn pack(self, buffer: &mut [u8]) -> Result<(), FramingError> {
                if buffer.len() < Self::len() {
                    return Err(FramingError::InvalidBufferSize);
                }

                buffer[..Self::len()].copy_from_slice(&self.to_le_bytes()[..]);
                Ok(())
            }

            fn unpack(data: &[u8]) -> Result<Self, FramingError> {
                if data.len() < Self::len() {
                    return Err(FramingError::InvalidBufferSize);
                }

                Ok(Self::from_le_bytes(data[..Self::len()].try_into().unwrap()))
            }
        }
    };
}

packable_primitive!(u8, 1);
packable_primitive!(u16, 2);
packable_primitive!(u32, 4);
packable_primitive!(i32, 4);
packable_primitive!(f32, 4);

impl Packable for bool {
    fn len() -> usize {
        1
    }

    fn pack(self, buffer: &mut [u8]) -> Result<(), FramingError> {
        if buffer.is_empty() {
            return Err(FramingError::InvalidBufferSize);
        }

        buffer[0] = self as u8;
        Ok(())
    }

    fn unpack(data: &[u8]) -> Result<Self, FramingError> {
        if data.is_empty() {
            return Err(FramingError::InvalidBufferSize);
        }

        Ok(data[0] != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_primitive_framing {
        ($primitive: ident, $buffer_length: literal, $value: literal, $test_name: ident) => {
            #[test]
            fn $test_name() {
                let mut buffer = [0u8; $buffer_length as usize];
                assert!($value.pack(&mut buffer).is_ok());
                assert_eq!($value, $primitive::unpack(&buffer).unwrap());
            }
        };
    }

    test_primitive_framing!(u8, 1, 129u8, test_u8_framing);
    test_primitive_framing!(u16, 2, 517u16, test_u16_framing);
    test_primitive_framing!(u32, 4, 3850u32, test_u32_framing);
    test_primitive_framing!(i32, 4, -40i32, test_i32_framing);
    test_primitive_framing!(f32, 4, 58.37f32, test_f32_framing);

    #[test]
    fn test_bool_framing() {
        let mut buffer = [0u8; 1];
        assert!(true.pack(&mut buffer).is_ok());
        assert!(bool::unpack(&buffer).unwrap());
        assert!(false.pack(&mut buffer).is_ok());
        assert!(!bool::unpack(&buffer).unwrap());
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buffer = [0u8; 4];
        0x0102_0304u32.pack(&mut buffer).unwrap();
        assert_eq!(buffer, [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let mut buffer = [0u8; 2];
        assert_eq!(
            1.0f32.pack(&mut buffer),
            Err(FramingError::InvalidBufferSize)
        );
        assert_eq!(u32::unpack(&buffer), Err(FramingError::InvalidBufferSize));
    }
}
