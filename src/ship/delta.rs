//! Table-delta types (§3.3): the row-level state changes a block produces in a
//! contract's multi-index tables. Grounded on the `blockResult.Deltas` fixture
//! (`original_source/ship/result_test.go`), whose `Row.Data` is itself a
//! "pack-inside-bytes" value (§4.6) shaped by whatever ABI the table's type resolves
//! to — this crate carries it as opaque bytes and leaves ABI-driven decoding to the
//! caller via `abi::Abi`.

use std::io::Write;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::error::{Error, Result};

/// `row` (§3.3): one table row, present (inserted/updated) or absent (deleted).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub present: bool,
    pub data: Vec<u8>,
}

impl Encode for Row {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_bool(self.present)?;
        self.data.encode(enc)
    }
}

impl Decode for Row {
    const MIN_SIZE: usize = 2;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(Row {
            present: dec.read_bool()?,
            data: dec.read_bytes()?,
        })
    }
}

/// `table_delta_v0` (§3.3): every changed row of one table, named by its multi-index
/// table name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableDeltaV0 {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Encode for TableDeltaV0 {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_string(&self.name)?;
        self.rows.encode(enc)
    }
}

impl Decode for TableDeltaV0 {
    const MIN_SIZE: usize = 2;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(TableDeltaV0 {
            name: dec.read_string()?,
            rows: dec.read_array::<Row>()?,
        })
    }
}

/// `table_delta` (§3.2 Variant): single-arm variant wrapping `TableDeltaV0`, framed the
/// same way as `ActionReceipt`/`PartialTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableDelta(pub TableDeltaV0);

impl Encode for TableDelta {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_varuint32(0)?;
        self.0.encode(enc)
    }
}

impl Decode for TableDelta {
    const MIN_SIZE: usize = 1 + TableDeltaV0::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_varuint32()? {
            0 => Ok(TableDelta(TableDeltaV0::decode(dec)?)),
            other => Err(Error::VariantOutOfRange {
                discriminant: other,
                arm_count: 1,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_delta_wire_round_trip() {
        let delta = TableDelta(TableDeltaV0 {
            name: "contact_row".to_string(),
            rows: vec![
                Row {
                    present: true,
                    data: vec![1, 2, 3],
                },
                Row {
                    present: false,
                    data: vec![4, 5, 6],
                },
            ],
        });
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&delta).unwrap();
        let bytes = enc.into_inner();
        assert_eq!(bytes[0], 0);
        let mut dec = Decoder::new(&bytes);
        let decoded: TableDelta = dec.decode().unwrap();
        assert_eq!(decoded, delta);
    }

    #[test]
    fn unknown_discriminant_is_rejected() {
        let bytes = vec![1u8];
        let mut dec = Decoder::new(&bytes);
        assert!(matches!(
            dec.decode::<TableDelta>(),
            Err(Error::VariantOutOfRange { .. })
        ));
    }
}
