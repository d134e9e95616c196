//! `ExtensionEntry` (§3.3): the `(type, data)` pair used for block header extensions,
//! block extensions, and transaction extensions throughout the domain layer. Not to be
//! confused with `abi::Extension<T>` (§3.2), the wire-framing wrapper whose presence is
//! inferred from remaining frame bytes — this is an ordinary two-field struct that
//! happens to be carried inside `Array<ExtensionEntry>` fields.

use std::io::Write;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionEntry {
    pub extension_type: u16,
    pub data: Vec<u8>,
}

impl ExtensionEntry {
    pub fn new(extension_type: u16, data: Vec<u8>) -> Self {
        ExtensionEntry { extension_type, data }
    }
}

impl Encode for ExtensionEntry {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u16(self.extension_type)?;
        self.data.encode(enc)
    }
}

impl Decode for ExtensionEntry {
    const MIN_SIZE: usize = 3;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let extension_type = dec.read_u16()?;
        let data = dec.read_bytes()?;
        Ok(ExtensionEntry { extension_type, data })
    }
}
