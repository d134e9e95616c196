//! Transaction types (§3.3): the unpacked `Transaction` (header + action lists), its
//! packed-and-signed wire form `PackedTransaction`, and the receipt header that wraps
//! both. Grounded on `chain.PackedTransaction`/`chain.TransactionReceiptHeader` in the
//! `blockResult` fixture (`original_source/ship/result_test.go`); `Transaction` itself
//! is the type whose encoding is the contents of `PackedTransaction.packed_trx`
//! (§3.3 "pack-inside-bytes").

use std::io::Write;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::chain::action::Action;
use crate::chain::extension::ExtensionEntry;
use crate::checksum::Checksum256;
use crate::crypto::Signature;
use crate::error::{Error, Result};
use crate::time::TimePointSec;

/// `transaction_status` (one byte): the outcome of applying a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Executed,
    SoftFail,
    HardFail,
    Delayed,
    Expired,
}

impl TransactionStatus {
    fn tag(self) -> u8 {
        match self {
            TransactionStatus::Executed => 0,
            TransactionStatus::SoftFail => 1,
            TransactionStatus::HardFail => 2,
            TransactionStatus::Delayed => 3,
            TransactionStatus::Expired => 4,
        }
    }

    fn from_tag(tag: u8) -> Result<Self> {
        Ok(match tag {
            0 => TransactionStatus::Executed,
            1 => TransactionStatus::SoftFail,
            2 => TransactionStatus::HardFail,
            3 => TransactionStatus::Delayed,
            4 => TransactionStatus::Expired,
            _ => return Err(Error::UnsupportedValue("unknown transaction status tag")),
        })
    }
}

impl Encode for TransactionStatus {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u8(self.tag())
    }
}

impl Decode for TransactionStatus {
    const MIN_SIZE: usize = 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        TransactionStatus::from_tag(dec.read_u8()?)
    }
}

/// `compression_type` (one byte): how `PackedTransaction.packed_trx` is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    None,
    Zlib,
}

impl Encode for CompressionType {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u8(match self {
            CompressionType::None => 0,
            CompressionType::Zlib => 1,
        })
    }
}

impl Decode for CompressionType {
    const MIN_SIZE: usize = 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(match dec.read_u8()? {
            0 => CompressionType::None,
            1 => CompressionType::Zlib,
            _ => return Err(Error::UnsupportedValue("unknown compression type tag")),
        })
    }
}

/// `transaction_header` (§3.3): the fields shared by `Transaction` and
/// `PartialTransactionV0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHeader {
    pub expiration: TimePointSec,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub max_net_usage_words: u32,
    pub max_cpu_usage_ms: u8,
    pub delay_sec: u32,
}

impl Encode for TransactionHeader {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.expiration.encode(enc)?;
        enc.write_u16(self.ref_block_num)?;
        enc.write_u32(self.ref_block_prefix)?;
        enc.write_varuint32(self.max_net_usage_words)?;
        enc.write_u8(self.max_cpu_usage_ms)?;
        enc.write_varuint32(self.delay_sec)
    }
}

impl Decode for TransactionHeader {
    const MIN_SIZE: usize = 11;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(TransactionHeader {
            expiration: TimePointSec::decode(dec)?,
            ref_block_num: dec.read_u16()?,
            ref_block_prefix: dec.read_u32()?,
            max_net_usage_words: dec.read_varuint32()?,
            max_cpu_usage_ms: dec.read_u8()?,
            delay_sec: dec.read_varuint32()?,
        })
    }
}

/// The full, unpacked `Transaction` (§3.3): a `TransactionHeader` plus its action lists.
/// This is the type whose serialized bytes are carried inside
/// `PackedTransaction.packed_trx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub header: TransactionHeader,
    pub context_free_actions: Vec<Action>,
    pub actions: Vec<Action>,
    pub transaction_extensions: Vec<ExtensionEntry>,
}

impl Encode for Transaction {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.header.encode(enc)?;
        self.context_free_actions.encode(enc)?;
        self.actions.encode(enc)?;
        self.transaction_extensions.encode(enc)
    }
}

impl Decode for Transaction {
    const MIN_SIZE: usize = TransactionHeader::MIN_SIZE + 3;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(Transaction {
            header: TransactionHeader::decode(dec)?,
            context_free_actions: dec.read_array::<Action>()?,
            actions: dec.read_array::<Action>()?,
            transaction_extensions: dec.read_array::<ExtensionEntry>()?,
        })
    }
}

/// `packed_transaction` (§3.3): the signed, wire-ready transaction envelope.
/// `packed_trx` is a "pack-inside-bytes" field (§4.6): a fresh `Transaction::decode`
/// against it (after `compression` is undone) recovers the structured transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedTransaction {
    pub signatures: Vec<Signature>,
    pub compression: CompressionType,
    pub packed_context_free_data: Vec<u8>,
    pub packed_trx: Vec<u8>,
}

impl PackedTransaction {
    /// Decodes `packed_trx` as a `Transaction`, rejecting `Zlib` compression (no
    /// decompressor is wired in — §1 treats that as an external concern the caller
    /// handles before calling this).
    pub fn unpack(&self) -> Result<Transaction> {
        if !matches!(self.compression, CompressionType::None) {
            return Err(Error::UnsupportedValue(
                "compressed packed_trx requires an external decompressor",
            ));
        }
        let mut dec = Decoder::new(&self.packed_trx);
        Transaction::decode(&mut dec)
    }
}

impl Encode for PackedTransaction {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.signatures.encode(enc)?;
        self.compression.encode(enc)?;
        self.packed_context_free_data.encode(enc)?;
        self.packed_trx.encode(enc)
    }
}

impl Decode for PackedTransaction {
    const MIN_SIZE: usize = 3;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(PackedTransaction {
            signatures: dec.read_array::<Signature>()?,
            compression: CompressionType::decode(dec)?,
            packed_context_free_data: dec.read_bytes()?,
            packed_trx: dec.read_bytes()?,
        })
    }
}

/// `transaction_receipt_header` (§3.3): `status` + resource-usage accounting shared by
/// every receipt in a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceiptHeader {
    pub status: TransactionStatus,
    pub cpu_usage_us: u32,
    pub net_usage_words: u32,
}

impl Encode for TransactionReceiptHeader {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.status.encode(enc)?;
        enc.write_u32(self.cpu_usage_us)?;
        enc.write_varuint32(self.net_usage_words)
    }
}

impl Decode for TransactionReceiptHeader {
    const MIN_SIZE: usize = 6;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(TransactionReceiptHeader {
            status: TransactionStatus::decode(dec)?,
            cpu_usage_us: dec.read_u32()?,
            net_usage_words: dec.read_varuint32()?,
        })
    }
}

/// `transaction_variant` (§3.2 Variant): the two ways a receipt may carry its
/// transaction — by reference (`Id`, once the trx is already included elsewhere in the
/// block) or inline (`Packed`). Mirrors `ship.Transaction{ID, Packed}` in the fixture,
/// expressed as a genuine Rust enum so "neither arm populated" cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptTrx {
    Id(Checksum256),
    Packed(PackedTransaction),
}

impl Encode for ReceiptTrx {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            ReceiptTrx::Id(id) => {
                enc.write_varuint32(0)?;
                id.encode(enc)
            }
            ReceiptTrx::Packed(packed) => {
                enc.write_varuint32(1)?;
                packed.encode(enc)
            }
        }
    }
}

impl Decode for ReceiptTrx {
    const MIN_SIZE: usize = 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_varuint32()? {
            0 => Ok(ReceiptTrx::Id(Checksum256::decode(dec)?)),
            1 => Ok(ReceiptTrx::Packed(PackedTransaction::decode(dec)?)),
            other => Err(Error::VariantOutOfRange {
                discriminant: other,
                arm_count: 2,
            }),
        }
    }
}

/// `transaction_receipt` (§3.3): a header plus the transaction it accounts for, either
/// inline or by reference. Grounded on `ship.TransactionReceipt` in the `blockResult`
/// fixture (`original_source/ship/result_test.go`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub header: TransactionReceiptHeader,
    pub trx: ReceiptTrx,
}

impl Encode for TransactionReceipt {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.header.encode(enc)?;
        self.trx.encode(enc)
    }
}

impl Decode for TransactionReceipt {
    const MIN_SIZE: usize = TransactionReceiptHeader::MIN_SIZE + ReceiptTrx::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(TransactionReceipt {
            header: TransactionReceiptHeader::decode(dec)?,
            trx: ReceiptTrx::decode(dec)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_transaction_wire_round_trip() {
        let pt = PackedTransaction {
            signatures: vec![],
            compression: CompressionType::None,
            packed_context_free_data: vec![],
            packed_trx: vec![1, 2, 3],
        };
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&pt).unwrap();
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        let decoded: PackedTransaction = dec.decode().unwrap();
        assert_eq!(decoded, pt);
    }

    #[test]
    fn transaction_receipt_header_wire_round_trip() {
        let header = TransactionReceiptHeader {
            status: TransactionStatus::Executed,
            cpu_usage_us: 887,
            net_usage_words: 18,
        };
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&header).unwrap();
        let bytes = enc.into_inner();
        assert_eq!(bytes[0], 0);
        let mut dec = Decoder::new(&bytes);
        let decoded: TransactionReceiptHeader = dec.decode().unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn transaction_round_trips_through_packed_trx_bytes() {
        let tx = Transaction {
            header: TransactionHeader {
                expiration: TimePointSec::from_unix_secs(171279471),
                ref_block_num: 52089,
                ref_block_prefix: 1613944601,
                max_net_usage_words: 0,
                max_cpu_usage_ms: 0,
                delay_sec: 0,
            },
            context_free_actions: vec![],
            actions: vec![],
            transaction_extensions: vec![],
        };
        let mut staged = Encoder::new(Vec::new());
        tx.encode(&mut staged).unwrap();
        let packed = PackedTransaction {
            signatures: vec![],
            compression: CompressionType::None,
            packed_context_free_data: vec![],
            packed_trx: staged.into_inner(),
        };
        assert_eq!(packed.unpack().unwrap(), tx);
    }

    #[test]
    fn unpack_rejects_zlib_compression() {
        let packed = PackedTransaction {
            signatures: vec![],
            compression: CompressionType::Zlib,
            packed_context_free_data: vec![],
            packed_trx: vec![],
        };
        assert!(matches!(packed.unpack(), Err(Error::UnsupportedValue(_))));
    }
}
