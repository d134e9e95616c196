//! The `Encoder`: drives serialization of a value's declared layout into a writer
//! (§4.1). Primitive writes mirror the teacher's `header.rs`/`pack.rs` manual
//! `byteorder::LittleEndian` field-by-field style, staged through a small stack buffer
//! per fixed-width field rather than writing through the generic `W` one byte at a time.

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian};

use crate::abi::marshal::Encode;
use crate::error::{Error, Result};
use crate::varint;

/// First-chance hook: given the encoder and the value being encoded (type-erased), either
/// handle it and return the result, or return `None` to let the default dispatch proceed.
/// Mirrors `noopEncode`'s `(handled bool, err error)` shape from the reference benchmark
/// harness, adapted to Rust's `Option<Result<...>>` idiom for "handled or not".
pub type EncodeHookFn<W> = fn(enc: &mut Encoder<W>, value: &dyn std::any::Any) -> Option<Result<()>>;

pub struct Encoder<W: Write> {
    writer: W,
    hook: Option<EncodeHookFn<W>>,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Encoder { writer, hook: None }
    }

    pub fn with_hook(writer: W, hook: EncodeHookFn<W>) -> Self {
        Encoder {
            writer,
            hook: Some(hook),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Recursively encodes `value` (§4.1 steps 1-3): the hook gets first refusal, then
    /// the value's own `Encode` impl runs.
    pub fn encode<T: Encode + 'static>(&mut self, value: &T) -> Result<()> {
        if let Some(hook) = self.hook {
            if let Some(result) = hook(self, value as &dyn std::any::Any) {
                return result;
            }
        }
        value.encode(self)
    }

    /// Stages `value`'s encoding into an owned buffer, then writes Varuint32(len) + the
    /// buffer (§4.6 "pack-inside-bytes", §9 "staging buffer" design note). Used for
    /// fields whose contents are themselves a fully serialized nested value.
    pub fn encode_packed<T: Encode>(&mut self, value: &T) -> Result<()> {
        let mut staged = Encoder::new(Vec::new());
        value.encode(&mut staged)?;
        let bytes = staged.into_inner();
        self.write_bytes(&bytes)
    }

    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_raw(&[if v { 1 } else { 0 }])
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.write_raw(&[v])
    }

    pub fn write_i8(&mut self, v: i8) -> Result<()> {
        self.write_raw(&[v as u8])
    }

    pub fn write_varuint32(&mut self, v: u32) -> Result<()> {
        let mut buf = Vec::with_capacity(5);
        varint::write_varuint32(&mut buf, v);
        self.write_raw(&buf)
    }

    pub fn write_varint32(&mut self, v: i32) -> Result<()> {
        let mut buf = Vec::with_capacity(5);
        varint::write_varint32(&mut buf, v);
        self.write_raw(&buf)
    }

    /// Varuint32(len) then the raw bytes (§3.1 "Bytes").
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_varuint32(
            u32::try_from(bytes.len())
                .map_err(|_| Error::UnsupportedValue("byte length exceeds u32"))?,
        )?;
        self.write_raw(bytes)
    }

    pub fn write_string(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }
}

macro_rules! impl_fixed_write {
    ($name:ident, $t:ty, $size:expr, $byteorder_write:ident) => {
        impl<W: Write> Encoder<W> {
            pub fn $name(&mut self, v: $t) -> Result<()> {
                let mut buf = [0u8; $size];
                LittleEndian::$byteorder_write(&mut buf, v);
                self.write_raw(&buf)
            }
        }
    };
}

impl_fixed_write!(write_u16, u16, 2, write_u16);
impl_fixed_write!(write_i16, i16, 2, write_i16);
impl_fixed_write!(write_u32, u32, 4, write_u32);
impl_fixed_write!(write_i32, i32, 4, write_i32);
impl_fixed_write!(write_u64, u64, 8, write_u64);
impl_fixed_write!(write_i64, i64, 8, write_i64);
impl_fixed_write!(write_u128, u128, 16, write_u128);
impl_fixed_write!(write_i128, i128, 16, write_i128);
impl_fixed_write!(write_f32, f32, 4, write_f32);
impl_fixed_write!(write_f64, f64, 8, write_f64);
