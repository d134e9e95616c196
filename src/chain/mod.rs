//! Domain value model (§3.3): typed representations of chain entities — transactions,
//! blocks, receipts, actions, producer schedules — grounded field-for-field on the
//! `blockResult` fixture in `original_source/ship/result_test.go`.

mod action;
mod block;
mod extension;
mod transaction;

pub use action::{Action, PermissionLevel};
pub use block::{BlockHeader, ProducerKey, ProducerSchedule, SignedBlock, SignedBlockHeader};
pub use extension::ExtensionEntry;
pub use transaction::{
    CompressionType, PackedTransaction, ReceiptTrx, Transaction, TransactionHeader,
    TransactionReceipt, TransactionReceiptHeader, TransactionStatus,
};
