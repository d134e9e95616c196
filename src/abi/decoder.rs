//! The `Decoder`: mirror image of `Encoder` (§4.2). Operates over a borrowed byte slice
//! cursor rather than a generic `std::io::Read`, following the teacher's
//! `BoundedReader::parse` style in `payload/reader.rs` (explicit bounds check before every
//! read, the input slice itself tracking "remaining," no intermediate buffering).

use byteorder::{ByteOrder, LittleEndian};

use crate::abi::marshal::Decode;
use crate::error::{Error, Result};
use crate::varint;

/// First-chance hook for decode. Because `decode` *returns* a freshly built value rather
/// than mutating one in place, the hook can't inspect an instance the way the encoder's
/// hook does — instead it's offered the type identity it's about to be asked to produce,
/// and may hand back a type-erased value for the engine to downcast.
pub type DecodeHookFn = fn(
    dec: &mut Decoder<'_>,
    type_id: std::any::TypeId,
) -> Option<Result<Box<dyn std::any::Any>>>;

pub struct Decoder<'a> {
    data: &'a [u8],
    hook: Option<DecodeHookFn>,
    /// Set only while decoding inside a pack-inside-bytes sub-frame (§4.2 "frame
    /// discipline"); lets `take` report `OverfullFrame` instead of a generic EOF.
    frame_declared_len: Option<usize>,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Decoder {
            data,
            hook: None,
            frame_declared_len: None,
        }
    }

    pub fn with_hook(data: &'a [u8], hook: DecodeHookFn) -> Self {
        Decoder {
            data,
            hook: Some(hook),
            frame_declared_len: None,
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.data.len() < n {
            return Err(match self.frame_declared_len {
                Some(declared) => Error::OverfullFrame {
                    declared,
                    requested: n,
                },
                None => Error::UnexpectedEof {
                    needed: n,
                    available: self.data.len(),
                },
            });
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    /// Recursively decodes a `T` (§4.2 steps 1-3): the hook gets first refusal, then the
    /// type's own `Decode` impl runs.
    pub fn decode<T: Decode + 'static>(&mut self) -> Result<T> {
        if let Some(hook) = self.hook {
            if let Some(result) = hook(self, std::any::TypeId::of::<T>()) {
                let boxed = result?;
                return boxed
                    .downcast::<T>()
                    .map(|v| *v)
                    .map_err(|_| Error::UnsupportedValue("hook returned a mismatched type"));
            }
        }
        T::decode(self)
    }

    /// Convenience wrapper matching the "decode into an existing value" shape (§6):
    /// decodes a fresh `T` and assigns it over `value`.
    pub fn decode_into<T: Decode + 'static>(&mut self, value: &mut T) -> Result<()> {
        *value = self.decode()?;
        Ok(())
    }

    /// Reads Varuint32(length), binds a sub-decoder to exactly that many bytes, decodes
    /// `T` from it, and requires the sub-decode to have consumed the frame exactly
    /// (§4.2 "frame discipline", §4.6 "pack-inside-bytes").
    pub fn decode_packed<T: Decode>(&mut self) -> Result<T> {
        let len = self.read_varuint32()? as usize;
        let frame = self.take(len)?;
        let mut sub = Decoder {
            data: frame,
            hook: self.hook,
            frame_declared_len: Some(len),
        };
        let value = T::decode(&mut sub)?;
        if sub.remaining() != 0 {
            return Err(Error::UnderfullFrame {
                declared: len,
                consumed: len - sub.remaining(),
            });
        }
        Ok(value)
    }

    /// Decodes `Array<T>` (§3.2): Varuint32 count bounded by remaining bytes divided by
    /// `T::MIN_SIZE` (§4.2 step 3), then `count` elements.
    pub fn read_array<T: Decode>(&mut self) -> Result<Vec<T>> {
        let count = self.read_varuint32()? as usize;
        let min_size = T::MIN_SIZE.max(1);
        if count > self.remaining() / min_size {
            return Err(Error::UnexpectedEof {
                needed: count * min_size,
                available: self.remaining(),
            });
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(T::decode(self)?);
        }
        Ok(out)
    }

    pub fn read_raw(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidTag(other)),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_varuint32(&mut self) -> Result<u32> {
        let (value, consumed) = varint::read_varuint32(self.data)?;
        self.take(consumed)?;
        Ok(value)
    }

    pub fn read_varint32(&mut self) -> Result<i32> {
        let (value, consumed) = varint::read_varint32(self.data)?;
        self.take(consumed)?;
        Ok(value)
    }

    /// Varuint32(len) then `len` raw bytes (§3.1 "Bytes").
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_varuint32()? as usize;
        self.read_raw(len)
    }

    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        // Not validated during decode (§3.1): malformed UTF-8 is replaced rather than
        // rejected, matching "interpreted as UTF-8 by convention."
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

macro_rules! impl_fixed_read {
    ($name:ident, $t:ty, $size:expr, $byteorder_read:ident) => {
        impl<'a> Decoder<'a> {
            pub fn $name(&mut self) -> Result<$t> {
                let bytes = self.take($size)?;
                Ok(LittleEndian::$byteorder_read(bytes))
            }
        }
    };
}

impl_fixed_read!(read_u16, u16, 2, read_u16);
impl_fixed_read!(read_i16, i16, 2, read_i16);
impl_fixed_read!(read_u32, u32, 4, read_u32);
impl_fixed_read!(read_i32, i32, 4, read_i32);
impl_fixed_read!(read_u64, u64, 8, read_u64);
impl_fixed_read!(read_i64, i64, 8, read_i64);
impl_fixed_read!(read_u128, u128, 16, read_u128);
impl_fixed_read!(read_i128, i128, 16, read_i128);
impl_fixed_read!(read_f32, f32, 4, read_f32);
impl_fixed_read!(read_f64, f64, 8, read_f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_round_trip() {
        let bytes = [7u8, 0x2C, 0x01, 1, 0xAC, 0x02];
        let mut dec = Decoder::new(&bytes);
        assert_eq!(dec.read_u8().unwrap(), 7);
        assert_eq!(dec.read_u16().unwrap(), 300);
        assert!(dec.read_bool().unwrap());
        assert_eq!(dec.read_varuint32().unwrap(), 300);
        assert_eq!(dec.remaining(), 0);
    }

    #[test]
    fn truncated_input_is_unexpected_eof() {
        let bytes = [1u8];
        let mut dec = Decoder::new(&bytes);
        assert!(matches!(
            dec.read_u32(),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn invalid_bool_tag_errors() {
        let bytes = [2u8];
        let mut dec = Decoder::new(&bytes);
        assert!(matches!(dec.read_bool(), Err(Error::InvalidTag(2))));
    }

    #[test]
    fn array_count_bounded_by_remaining_bytes() {
        // Declares 1000 u32 elements but supplies far fewer bytes.
        let mut bytes = Vec::new();
        varint::write_varuint32(&mut bytes, 1000);
        bytes.extend_from_slice(&[0u8; 4]);
        let mut dec = Decoder::new(&bytes);
        assert!(matches!(
            dec.read_array::<u32>(),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn decode_packed_enforces_exact_frame_consumption() {
        // Declares a 4-byte frame but the inner value is a single byte (u8) -- underfull.
        let mut bytes = Vec::new();
        varint::write_varuint32(&mut bytes, 4);
        bytes.extend_from_slice(&[9, 0, 0, 0]);
        let mut dec = Decoder::new(&bytes);
        assert!(matches!(
            dec.decode_packed::<u8>(),
            Err(Error::UnderfullFrame { .. })
        ));
    }

    #[test]
    fn decode_packed_round_trips_exact_frame() {
        let mut bytes = Vec::new();
        varint::write_varuint32(&mut bytes, 4);
        bytes.extend_from_slice(&300u32.to_le_bytes());
        let mut dec = Decoder::new(&bytes);
        let value: u32 = dec.decode_packed().unwrap();
        assert_eq!(value, 300);
        assert_eq!(dec.remaining(), 0);
    }
}
