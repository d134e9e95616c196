//! State-history wire types (§3.3, §4.6): the result envelope a node streams to
//! subscribers, plus the per-block trace and table-delta payloads packed inside it.
//! Grounded on `original_source/ship/result_test.go`'s `blockResult`/`statusResult`
//! fixtures.

mod delta;
mod result;
mod trace;

pub use delta::{Row, TableDelta, TableDeltaV0};
pub use result::{
    make_block, make_deltas, make_traces, must_make_block, must_make_deltas, must_make_traces,
    BlockPosition, GetBlocksResultV0, GetStatusResultV0, StateHistoryResult,
};
pub use trace::{
    AccountAuthSequence, AccountDelta, ActionReceipt, ActionReceiptV0, ActionTrace,
    ActionTraceV0, ActionTraceV1, PartialTransaction, PartialTransactionV0, TransactionTrace,
    TransactionTraceV0, TransactionTraceV1,
};
