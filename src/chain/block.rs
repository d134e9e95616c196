//! Block header and signed-block types (§3.3). Grounded field-for-field on the
//! `blockResult.Block` fixture (`original_source/ship/result_test.go`), which exercises
//! every optional/extension field: a populated `new_producers_v1`, two header
//! extensions, and a two-receipt transaction list.

use std::io::Write;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::chain::extension::ExtensionEntry;
use crate::chain::transaction::TransactionReceipt;
use crate::checksum::Checksum256;
use crate::crypto::{PublicKey, Signature};
use crate::error::Result;
use crate::name::Name;
use crate::time::BlockTimestamp;

/// `producer_key` (§3.3): a producer account paired with the key it signs blocks with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerKey {
    pub account_name: Name,
    pub block_signing_key: PublicKey,
}

impl Encode for ProducerKey {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.account_name.encode(enc)?;
        self.block_signing_key.encode(enc)
    }
}

impl Decode for ProducerKey {
    const MIN_SIZE: usize = 8 + PublicKey::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(ProducerKey {
            account_name: Name::decode(dec)?,
            block_signing_key: PublicKey::decode(dec)?,
        })
    }
}

/// `producer_schedule` (§3.3): the active producer set as of a schedule version change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerSchedule {
    pub version: u32,
    pub producers: Vec<ProducerKey>,
}

impl Encode for ProducerSchedule {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u32(self.version)?;
        self.producers.encode(enc)
    }
}

impl Decode for ProducerSchedule {
    const MIN_SIZE: usize = 5;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(ProducerSchedule {
            version: dec.read_u32()?,
            producers: dec.read_array::<ProducerKey>()?,
        })
    }
}

/// `block_header` (§3.3): the unsigned header common to every block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub timestamp: BlockTimestamp,
    pub producer: Name,
    pub confirmed: u16,
    pub previous: Checksum256,
    pub transaction_mroot: Checksum256,
    pub action_mroot: Checksum256,
    pub schedule_version: u32,
    pub new_producers_v1: Option<ProducerSchedule>,
    pub header_extensions: Vec<ExtensionEntry>,
}

impl Encode for BlockHeader {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.timestamp.encode(enc)?;
        self.producer.encode(enc)?;
        enc.write_u16(self.confirmed)?;
        self.previous.encode(enc)?;
        self.transaction_mroot.encode(enc)?;
        self.action_mroot.encode(enc)?;
        enc.write_u32(self.schedule_version)?;
        self.new_producers_v1.encode(enc)?;
        self.header_extensions.encode(enc)
    }
}

impl Decode for BlockHeader {
    const MIN_SIZE: usize = 4 + 8 + 2 + 32 + 32 + 32 + 4 + 1 + 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(BlockHeader {
            timestamp: BlockTimestamp::decode(dec)?,
            producer: Name::decode(dec)?,
            confirmed: dec.read_u16()?,
            previous: Checksum256::decode(dec)?,
            transaction_mroot: Checksum256::decode(dec)?,
            action_mroot: Checksum256::decode(dec)?,
            schedule_version: dec.read_u32()?,
            new_producers_v1: Option::<ProducerSchedule>::decode(dec)?,
            header_extensions: dec.read_array::<ExtensionEntry>()?,
        })
    }
}

/// `signed_block_header` (§3.3): a `BlockHeader` plus the producer's signature over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBlockHeader {
    pub block_header: BlockHeader,
    pub producer_signature: Signature,
}

impl Encode for SignedBlockHeader {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.block_header.encode(enc)?;
        self.producer_signature.encode(enc)
    }
}

impl Decode for SignedBlockHeader {
    const MIN_SIZE: usize = BlockHeader::MIN_SIZE + Signature::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(SignedBlockHeader {
            block_header: BlockHeader::decode(dec)?,
            producer_signature: Signature::decode(dec)?,
        })
    }
}

/// `signed_block` (§3.3): a full block as it appears on the wire — header, signature,
/// transaction receipts, and trailing extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBlock {
    pub signed_block_header: SignedBlockHeader,
    pub transactions: Vec<TransactionReceipt>,
    pub block_extensions: Vec<ExtensionEntry>,
}

impl Encode for SignedBlock {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.signed_block_header.encode(enc)?;
        self.transactions.encode(enc)?;
        self.block_extensions.encode(enc)
    }
}

impl Decode for SignedBlock {
    const MIN_SIZE: usize = SignedBlockHeader::MIN_SIZE + 2;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(SignedBlock {
            signed_block_header: SignedBlockHeader::decode(dec)?,
            transactions: dec.read_array::<TransactionReceipt>()?,
            block_extensions: dec.read_array::<ExtensionEntry>()?,
        })
    }
}
