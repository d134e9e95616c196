//! `Encode`/`Decode`: the capability a type implements to serialize itself into an
//! `Encoder`/out of a `Decoder`. Each impl *is* the type's schema — there is no runtime
//! reflection over field lists; the trait method body is the ordered sequence of
//! primitive operations (§4.3 "static binding").

use std::io::Write;

use crate::abi::decoder::Decoder;
use crate::abi::encoder::Encoder;
use crate::error::{Error, Result};

/// A value that knows how to write itself into an `Encoder`.
pub trait Encode {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()>;
}

/// A value that knows how to read itself out of a `Decoder`.
///
/// `MIN_SIZE` is the fewest bytes this type can possibly occupy on the wire; `Array<T>`
/// decode uses it to reject a declared element count that could not possibly fit in the
/// bytes remaining (§4.2 step 3), without first allocating a `Vec` of that size.
pub trait Decode: Sized {
    const MIN_SIZE: usize = 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self>;
}

macro_rules! impl_int_marshal {
    ($t:ty, $write:ident, $read:ident, $size:expr) => {
        impl Encode for $t {
            fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
                enc.$write(*self)
            }
        }

        impl Decode for $t {
            const MIN_SIZE: usize = $size;

            fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
                dec.$read()
            }
        }
    };
}

impl_int_marshal!(u8, write_u8, read_u8, 1);
impl_int_marshal!(i8, write_i8, read_i8, 1);
impl_int_marshal!(u16, write_u16, read_u16, 2);
impl_int_marshal!(i16, write_i16, read_i16, 2);
impl_int_marshal!(u32, write_u32, read_u32, 4);
impl_int_marshal!(i32, write_i32, read_i32, 4);
impl_int_marshal!(u64, write_u64, read_u64, 8);
impl_int_marshal!(i64, write_i64, read_i64, 8);
impl_int_marshal!(u128, write_u128, read_u128, 16);
impl_int_marshal!(i128, write_i128, read_i128, 16);
impl_int_marshal!(f32, write_f32, read_f32, 4);
impl_int_marshal!(f64, write_f64, read_f64, 8);

impl Encode for bool {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_bool(*self)
    }
}

impl Decode for bool {
    const MIN_SIZE: usize = 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.read_bool()
    }
}

impl Encode for String {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_string(self)
    }
}

impl Decode for String {
    const MIN_SIZE: usize = 1; // empty string is 1 byte: the zero length prefix

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.read_string()
    }
}

/// `Bytes`: Varuint32 length + raw bytes (§3.1). `Vec<u8>` decode reads the raw buffer
/// directly; encode goes through the blanket `Vec<T>` impl below (per-element `u8::encode`
/// calls write one raw byte each, so the wire output is identical to a single `write_bytes`
/// call — a dedicated `Encode for Vec<u8>` would conflict with that blanket impl).
impl Decode for Vec<u8> {
    const MIN_SIZE: usize = 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.read_bytes()
    }
}

/// `Optional<T>` (§3.2): one presence byte, then `T` iff present.
impl<T: Encode> Encode for Option<T> {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            Some(value) => {
                enc.write_bool(true)?;
                value.encode(enc)
            }
            None => enc.write_bool(false),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    const MIN_SIZE: usize = 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        if dec.read_bool()? {
            Ok(Some(T::decode(dec)?))
        } else {
            Ok(None)
        }
    }
}

/// `Array<T>` (§3.2): Varuint32 count, then `count` elements.
impl<T: Encode> Encode for Vec<T> {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_varuint32(
            u32::try_from(self.len())
                .map_err(|_| Error::UnsupportedValue("array length exceeds u32"))?,
        )?;
        for item in self {
            item.encode(enc)?;
        }
        Ok(())
    }
}

// Generic `impl<T: Decode> Decode for Vec<T>` would overlap with `Decode for Vec<u8>`
// above under specialization-free coherence rules, so array decode is exposed as an
// associated function rather than a blanket impl; callers write `Decoder::read_array`.

/// `Extension<T>` (§3.2): present iff bytes remain in the enclosing frame, never tagged.
/// MUST be the last field of any struct that uses it (§3.4 invariant 4) — the static
/// binding model makes this a compile-time structural fact rather than a runtime check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extension<T>(pub Option<T>);

impl<T> Extension<T> {
    pub fn some(value: T) -> Self {
        Extension(Some(value))
    }

    pub fn none() -> Self {
        Extension(None)
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T: Encode> Encode for Extension<T> {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match &self.0 {
            Some(value) => value.encode(enc),
            None => Ok(()),
        }
    }
}

impl<T: Decode> Decode for Extension<T> {
    const MIN_SIZE: usize = 0;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        if dec.remaining() == 0 {
            Ok(Extension(None))
        } else {
            Ok(Extension(Some(T::decode(dec)?)))
        }
    }
}
