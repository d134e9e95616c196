//! `antelope-codec`: a binary codec for the Antelope (EOSIO-family) blockchain wire
//! format (§1-§2): LEB128 varints, the domain scalar types (`Name`, `Symbol`, `Asset`,
//! time, checksums, keys/signatures), the container framing rules (`Optional`, `Array`,
//! `Variant`, `Extension`, pack-inside-bytes), the chain and state-history entity types
//! built on top of them, and a dynamic ABI-described codec for types not known at
//! compile time (§4.3).
//!
//! Two ways to encode/decode a value:
//! - **Static binding** (§4.3): implement [`Encode`]/[`Decode`] and call
//!   [`Encoder::encode`]/[`Decoder::decode`] — the common path, used by every type in
//!   [`chain`] and [`ship`].
//! - **Dynamic binding** (§4.3): parse an [`Abi`] from its JSON document and call
//!   [`Abi::encode`]/[`Abi::decode`] against an [`AbiValue`] when the schema is only
//!   known at runtime.

pub mod abi;
pub mod chain;
pub mod checksum;
pub mod crypto;
pub mod error;
pub mod name;
pub mod ship;
pub mod symbol;
pub mod time;
mod varint;

pub use abi::{
    Abi, AbiAction, AbiField, AbiStruct, AbiTable, AbiValue, AbiVariant, Decode, DecodeHookFn,
    Decoder, Encode, EncodeHookFn, Encoder, Extension,
};
pub use chain::{
    Action, BlockHeader, CompressionType, ExtensionEntry, PackedTransaction, PermissionLevel,
    ProducerKey, ProducerSchedule, ReceiptTrx, SignedBlock, SignedBlockHeader, Transaction,
    TransactionHeader, TransactionReceipt, TransactionReceiptHeader, TransactionStatus,
};
pub use checksum::{ripemd160, sha256, sha512, Checksum160, Checksum256, Checksum512};
pub use crypto::{PrivateKey, PublicKey, Signature};
pub use error::{Error, Result};
pub use name::Name;
pub use ship::{
    make_block, make_deltas, make_traces, must_make_block, must_make_deltas, must_make_traces,
    AccountAuthSequence, AccountDelta, ActionReceipt, ActionReceiptV0, ActionTrace,
    ActionTraceV0, ActionTraceV1, BlockPosition, GetBlocksResultV0, GetStatusResultV0,
    PartialTransaction, PartialTransactionV0, Row, StateHistoryResult, TableDelta, TableDeltaV0,
    TransactionTrace, TransactionTraceV0, TransactionTraceV1,
};
pub use symbol::{Asset, Symbol, SymbolCode};
pub use time::{BlockTimestamp, TimePoint, TimePointSec};
