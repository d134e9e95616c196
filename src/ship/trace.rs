//! Execution-trace types (§3.3, §4.4): the nested `transaction_trace`/`action_trace`
//! tree state-history streams to subscribers, plus the receipt and delta types it
//! embeds. Grounded field-for-field on the `blockResult.Traces` fixture
//! (`original_source/ship/result_test.go`), which exercises both `ActionTraceV0` and
//! `ActionTraceV1` and a populated `FailedDtrxTrace` (a self-recursive trace).

use std::io::Write;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::chain::{Action, ExtensionEntry, TransactionStatus};
use crate::checksum::Checksum256;
use crate::crypto::Signature;
use crate::error::{Error, Result};
use crate::name::Name;
use crate::time::TimePointSec;

/// `account_auth_sequence` (§3.3): how many times `account` has authorized a given
/// permission, as of this action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountAuthSequence {
    pub account: Name,
    pub sequence: u64,
}

impl Encode for AccountAuthSequence {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.account.encode(enc)?;
        enc.write_u64(self.sequence)
    }
}

impl Decode for AccountAuthSequence {
    const MIN_SIZE: usize = 16;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(AccountAuthSequence {
            account: Name::decode(dec)?,
            sequence: dec.read_u64()?,
        })
    }
}

/// `account_delta` (§3.3): the signed change in an account's RAM usage caused by an
/// action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountDelta {
    pub account: Name,
    pub delta: i64,
}

impl Encode for AccountDelta {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.account.encode(enc)?;
        enc.write_i64(self.delta)
    }
}

impl Decode for AccountDelta {
    const MIN_SIZE: usize = 16;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(AccountDelta {
            account: Name::decode(dec)?,
            delta: dec.read_i64()?,
        })
    }
}

/// `action_receipt_v0` (§3.3): the on-chain accounting record for one executed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceiptV0 {
    pub receiver: Name,
    pub act_digest: Checksum256,
    pub global_sequence: u64,
    pub recv_sequence: u64,
    pub auth_sequence: Vec<AccountAuthSequence>,
    pub code_sequence: u32,
    pub abi_sequence: u32,
}

impl Encode for ActionReceiptV0 {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.receiver.encode(enc)?;
        self.act_digest.encode(enc)?;
        enc.write_u64(self.global_sequence)?;
        enc.write_u64(self.recv_sequence)?;
        self.auth_sequence.encode(enc)?;
        enc.write_varuint32(self.code_sequence)?;
        enc.write_varuint32(self.abi_sequence)
    }
}

impl Decode for ActionReceiptV0 {
    const MIN_SIZE: usize = 8 + 32 + 8 + 8 + 1 + 1 + 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(ActionReceiptV0 {
            receiver: Name::decode(dec)?,
            act_digest: Checksum256::decode(dec)?,
            global_sequence: dec.read_u64()?,
            recv_sequence: dec.read_u64()?,
            auth_sequence: dec.read_array::<AccountAuthSequence>()?,
            code_sequence: dec.read_varuint32()?,
            abi_sequence: dec.read_varuint32()?,
        })
    }
}

/// `action_receipt` (§3.2 Variant): only one arm (`v0`) exists in the current protocol,
/// but it is still framed as a variant on the wire (§3.3), so a fresh arm can be added
/// without breaking old decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceipt(pub ActionReceiptV0);

impl Encode for ActionReceipt {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_varuint32(0)?;
        self.0.encode(enc)
    }
}

impl Decode for ActionReceipt {
    const MIN_SIZE: usize = 1 + ActionReceiptV0::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_varuint32()? {
            0 => Ok(ActionReceipt(ActionReceiptV0::decode(dec)?)),
            other => Err(Error::VariantOutOfRange {
                discriminant: other,
                arm_count: 1,
            }),
        }
    }
}

/// `action_trace_v0` (§3.3): execution record for one action, pre-`return_value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTraceV0 {
    pub action_ordinal: u32,
    pub creator_action_ordinal: u32,
    pub receipt: Option<ActionReceipt>,
    pub receiver: Name,
    pub act: Action,
    pub context_free: bool,
    pub elapsed: i64,
    pub console: String,
    pub account_ram_deltas: Vec<AccountDelta>,
    pub except: Option<String>,
    pub error_code: Option<u64>,
}

impl Encode for ActionTraceV0 {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_varuint32(self.action_ordinal)?;
        enc.write_varuint32(self.creator_action_ordinal)?;
        self.receipt.encode(enc)?;
        self.receiver.encode(enc)?;
        self.act.encode(enc)?;
        enc.write_bool(self.context_free)?;
        enc.write_i64(self.elapsed)?;
        enc.write_string(&self.console)?;
        self.account_ram_deltas.encode(enc)?;
        self.except.encode(enc)?;
        self.error_code.encode(enc)
    }
}

impl Decode for ActionTraceV0 {
    const MIN_SIZE: usize = 1 + 1 + 1 + 8 + Action::MIN_SIZE + 1 + 8 + 1 + 1 + 1 + 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(ActionTraceV0 {
            action_ordinal: dec.read_varuint32()?,
            creator_action_ordinal: dec.read_varuint32()?,
            receipt: Option::<ActionReceipt>::decode(dec)?,
            receiver: Name::decode(dec)?,
            act: Action::decode(dec)?,
            context_free: dec.read_bool()?,
            elapsed: dec.read_i64()?,
            console: dec.read_string()?,
            account_ram_deltas: dec.read_array::<AccountDelta>()?,
            except: Option::<String>::decode(dec)?,
            error_code: Option::<u64>::decode(dec)?,
        })
    }
}

/// `action_trace_v1` (§3.3): `ActionTraceV0` plus the action's `return_value` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTraceV1 {
    pub action_ordinal: u32,
    pub creator_action_ordinal: u32,
    pub receipt: Option<ActionReceipt>,
    pub receiver: Name,
    pub act: Action,
    pub context_free: bool,
    pub elapsed: i64,
    pub console: String,
    pub account_ram_deltas: Vec<AccountDelta>,
    pub except: Option<String>,
    pub error_code: Option<u64>,
    pub return_value: Vec<u8>,
}

impl Encode for ActionTraceV1 {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_varuint32(self.action_ordinal)?;
        enc.write_varuint32(self.creator_action_ordinal)?;
        self.receipt.encode(enc)?;
        self.receiver.encode(enc)?;
        self.act.encode(enc)?;
        enc.write_bool(self.context_free)?;
        enc.write_i64(self.elapsed)?;
        enc.write_string(&self.console)?;
        self.account_ram_deltas.encode(enc)?;
        self.except.encode(enc)?;
        self.error_code.encode(enc)?;
        self.return_value.encode(enc)
    }
}

impl Decode for ActionTraceV1 {
    const MIN_SIZE: usize = ActionTraceV0::MIN_SIZE + 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(ActionTraceV1 {
            action_ordinal: dec.read_varuint32()?,
            creator_action_ordinal: dec.read_varuint32()?,
            receipt: Option::<ActionReceipt>::decode(dec)?,
            receiver: Name::decode(dec)?,
            act: Action::decode(dec)?,
            context_free: dec.read_bool()?,
            elapsed: dec.read_i64()?,
            console: dec.read_string()?,
            account_ram_deltas: dec.read_array::<AccountDelta>()?,
            except: Option::<String>::decode(dec)?,
            error_code: Option::<u64>::decode(dec)?,
            return_value: dec.read_bytes()?,
        })
    }
}

/// `action_trace` (§3.2 Variant): picks `ActionTraceV0` or `ActionTraceV1` by
/// discriminant, matching `ship.ActionTrace{V0, V1}` in the fixture (both arms are
/// exercised there).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTrace {
    V0(ActionTraceV0),
    V1(ActionTraceV1),
}

impl Encode for ActionTrace {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            ActionTrace::V0(v0) => {
                enc.write_varuint32(0)?;
                v0.encode(enc)
            }
            ActionTrace::V1(v1) => {
                enc.write_varuint32(1)?;
                v1.encode(enc)
            }
        }
    }
}

impl Decode for ActionTrace {
    const MIN_SIZE: usize = 1 + ActionTraceV0::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_varuint32()? {
            0 => Ok(ActionTrace::V0(ActionTraceV0::decode(dec)?)),
            1 => Ok(ActionTrace::V1(ActionTraceV1::decode(dec)?)),
            other => Err(Error::VariantOutOfRange {
                discriminant: other,
                arm_count: 2,
            }),
        }
    }
}

/// `partial_transaction_v0` (§3.3): the subset of `Transaction` needed to reconstruct a
/// deferred/failed transaction's header and signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialTransactionV0 {
    pub expiration: TimePointSec,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub max_net_usage_words: u32,
    pub max_cpu_usage_ms: u8,
    pub delay_sec: u32,
    pub transaction_extensions: Vec<ExtensionEntry>,
    pub signatures: Vec<Signature>,
    pub context_free_data: Vec<u8>,
}

impl Encode for PartialTransactionV0 {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.expiration.encode(enc)?;
        enc.write_u16(self.ref_block_num)?;
        enc.write_u32(self.ref_block_prefix)?;
        enc.write_varuint32(self.max_net_usage_words)?;
        enc.write_u8(self.max_cpu_usage_ms)?;
        enc.write_varuint32(self.delay_sec)?;
        self.transaction_extensions.encode(enc)?;
        self.signatures.encode(enc)?;
        self.context_free_data.encode(enc)
    }
}

impl Decode for PartialTransactionV0 {
    const MIN_SIZE: usize = 4 + 2 + 4 + 1 + 1 + 1 + 1 + 1 + 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(PartialTransactionV0 {
            expiration: TimePointSec::decode(dec)?,
            ref_block_num: dec.read_u16()?,
            ref_block_prefix: dec.read_u32()?,
            max_net_usage_words: dec.read_varuint32()?,
            max_cpu_usage_ms: dec.read_u8()?,
            delay_sec: dec.read_varuint32()?,
            transaction_extensions: dec.read_array::<ExtensionEntry>()?,
            signatures: dec.read_array::<Signature>()?,
            context_free_data: dec.read_bytes()?,
        })
    }
}

/// `partial_transaction` (§3.2 Variant): single-arm variant wrapping
/// `PartialTransactionV0`, framed the same way as `ActionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialTransaction(pub PartialTransactionV0);

impl Encode for PartialTransaction {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_varuint32(0)?;
        self.0.encode(enc)
    }
}

impl Decode for PartialTransaction {
    const MIN_SIZE: usize = 1 + PartialTransactionV0::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_varuint32()? {
            0 => Ok(PartialTransaction(PartialTransactionV0::decode(dec)?)),
            other => Err(Error::VariantOutOfRange {
                discriminant: other,
                arm_count: 1,
            }),
        }
    }
}

/// `transaction_trace_v0` (§3.3): the full accounting record of applying one
/// transaction, including every nested `ActionTrace` and, for a scheduled transaction
/// that failed, the trace of the failure itself (`failed_dtrx_trace`, recursive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTraceV0 {
    pub id: Checksum256,
    pub status: TransactionStatus,
    pub cpu_usage_us: u32,
    pub net_usage_words: u32,
    pub elapsed: i64,
    pub net_usage: u64,
    pub scheduled: bool,
    pub action_traces: Vec<ActionTrace>,
    pub account_delta: Option<AccountDelta>,
    pub except: Option<String>,
    pub error_code: Option<u64>,
    pub failed_dtrx_trace: Option<Box<TransactionTrace>>,
    pub partial: Option<PartialTransaction>,
}

impl Encode for TransactionTraceV0 {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.id.encode(enc)?;
        self.status.encode(enc)?;
        enc.write_u32(self.cpu_usage_us)?;
        enc.write_varuint32(self.net_usage_words)?;
        enc.write_i64(self.elapsed)?;
        enc.write_u64(self.net_usage)?;
        enc.write_bool(self.scheduled)?;
        self.action_traces.encode(enc)?;
        self.account_delta.encode(enc)?;
        self.except.encode(enc)?;
        self.error_code.encode(enc)?;
        self.failed_dtrx_trace.encode(enc)?;
        self.partial.encode(enc)
    }
}

impl Decode for TransactionTraceV0 {
    const MIN_SIZE: usize = 32 + 1 + 4 + 1 + 8 + 8 + 1 + 1 + 1 + 1 + 1 + 1 + 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(TransactionTraceV0 {
            id: Checksum256::decode(dec)?,
            status: TransactionStatus::decode(dec)?,
            cpu_usage_us: dec.read_u32()?,
            net_usage_words: dec.read_varuint32()?,
            elapsed: dec.read_i64()?,
            net_usage: dec.read_u64()?,
            scheduled: dec.read_bool()?,
            action_traces: dec.read_array::<ActionTrace>()?,
            account_delta: Option::<AccountDelta>::decode(dec)?,
            except: Option::<String>::decode(dec)?,
            error_code: Option::<u64>::decode(dec)?,
            failed_dtrx_trace: Option::<Box<TransactionTrace>>::decode(dec)?,
            partial: Option::<PartialTransaction>::decode(dec)?,
        })
    }
}

impl Encode for Box<TransactionTrace> {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.as_ref().encode(enc)
    }
}

impl Decode for Box<TransactionTrace> {
    const MIN_SIZE: usize = TransactionTrace::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(Box::new(TransactionTrace::decode(dec)?))
    }
}

/// `transaction_trace_v1`: field-for-field identical to `TransactionTraceV0` in the
/// current protocol (§9 Open Question: no `v1`-only field has shipped yet); kept as a
/// distinct arm so `TransactionTrace` decodes a future protocol's `v1` discriminant
/// without a breaking change to this crate's enum shape.
pub type TransactionTraceV1 = TransactionTraceV0;

/// `transaction_trace` (§3.2 Variant): `v0` or `v1`, matching `ship.TransactionTrace` in
/// the fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionTrace {
    V0(TransactionTraceV0),
    V1(TransactionTraceV1),
}

impl TransactionTrace {
    pub const MIN_SIZE: usize = 1 + TransactionTraceV0::MIN_SIZE;
}

impl Encode for TransactionTrace {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            TransactionTrace::V0(v0) => {
                enc.write_varuint32(0)?;
                v0.encode(enc)
            }
            TransactionTrace::V1(v1) => {
                enc.write_varuint32(1)?;
                v1.encode(enc)
            }
        }
    }
}

impl Decode for TransactionTrace {
    const MIN_SIZE: usize = TransactionTrace::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_varuint32()? {
            0 => Ok(TransactionTrace::V0(TransactionTraceV0::decode(dec)?)),
            1 => Ok(TransactionTrace::V1(TransactionTraceV1::decode(dec)?)),
            other => Err(Error::VariantOutOfRange {
                discriminant: other,
                arm_count: 2,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_action_trace_v0() -> ActionTraceV0 {
        ActionTraceV0 {
            action_ordinal: 1,
            creator_action_ordinal: 0,
            receipt: Some(ActionReceipt(ActionReceiptV0 {
                receiver: "eosio".parse().unwrap(),
                act_digest: Checksum256([0xf6; 32]),
                global_sequence: 89053614934,
                recv_sequence: 471624500,
                auth_sequence: vec![AccountAuthSequence {
                    account: "eosio".parse().unwrap(),
                    sequence: 370136110,
                }],
                code_sequence: 16,
                abi_sequence: 10,
            })),
            receiver: "eosio".parse().unwrap(),
            act: Action {
                account: "eosio".parse().unwrap(),
                name: "onblock".parse().unwrap(),
                authorization: vec![],
                data: vec![1, 2, 3],
            },
            context_free: true,
            elapsed: 231,
            console: "console".to_string(),
            account_ram_deltas: vec![AccountDelta {
                account: "eosio".parse().unwrap(),
                delta: 0,
            }],
            except: Some("except1".to_string()),
            error_code: Some(0xdeadbeef),
        }
    }

    #[test]
    fn action_trace_v0_wire_round_trip() {
        let trace = ActionTrace::V0(sample_action_trace_v0());
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&trace).unwrap();
        let bytes = enc.into_inner();
        assert_eq!(bytes[0], 0);
        let mut dec = Decoder::new(&bytes);
        let decoded: ActionTrace = dec.decode().unwrap();
        assert_eq!(decoded, trace);
    }

    #[test]
    fn action_trace_v1_carries_return_value() {
        let v0 = sample_action_trace_v0();
        let v1 = ActionTraceV1 {
            action_ordinal: v0.action_ordinal,
            creator_action_ordinal: v0.creator_action_ordinal,
            receipt: v0.receipt.clone(),
            receiver: v0.receiver,
            act: v0.act.clone(),
            context_free: v0.context_free,
            elapsed: v0.elapsed,
            console: v0.console.clone(),
            account_ram_deltas: v0.account_ram_deltas.clone(),
            except: v0.except.clone(),
            error_code: v0.error_code,
            return_value: vec![0xbe, 0xef],
        };
        let trace = ActionTrace::V1(v1);
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&trace).unwrap();
        let bytes = enc.into_inner();
        assert_eq!(bytes[0], 1);
        let mut dec = Decoder::new(&bytes);
        let decoded: ActionTrace = dec.decode().unwrap();
        assert_eq!(decoded, trace);
    }

    #[test]
    fn transaction_trace_recursive_failed_dtrx_round_trips() {
        let inner = TransactionTrace::V0(TransactionTraceV0 {
            id: Checksum256([0x66; 32]),
            status: TransactionStatus::Expired,
            cpu_usage_us: 212,
            net_usage_words: 27,
            elapsed: 22,
            net_usage: 88,
            scheduled: true,
            action_traces: vec![],
            account_delta: Some(AccountDelta {
                account: "eosio".parse().unwrap(),
                delta: -2,
            }),
            except: Some("except4".to_string()),
            error_code: Some(17821),
            failed_dtrx_trace: None,
            partial: None,
        });
        let outer = TransactionTrace::V0(TransactionTraceV0 {
            id: Checksum256([0x66; 32]),
            status: TransactionStatus::Executed,
            cpu_usage_us: 100,
            net_usage_words: 0,
            elapsed: 0,
            net_usage: 0,
            scheduled: false,
            action_traces: vec![ActionTrace::V0(sample_action_trace_v0())],
            account_delta: None,
            except: Some("except2".to_string()),
            error_code: Some(918),
            failed_dtrx_trace: Some(Box::new(inner)),
            partial: Some(PartialTransaction(PartialTransactionV0 {
                expiration: TimePointSec::from_unix_secs(171279471),
                ref_block_num: 52089,
                ref_block_prefix: 1613944601,
                max_net_usage_words: 0,
                max_cpu_usage_ms: 0,
                delay_sec: 0,
                transaction_extensions: vec![ExtensionEntry::new(12983, vec![0x0f, 0x02, 0x3f, 0xe3])],
                signatures: vec![],
                context_free_data: vec![0x02, 0x23, 0xfe, 0x00],
            })),
        });

        let mut enc = Encoder::new(Vec::new());
        enc.encode(&outer).unwrap();
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        let decoded: TransactionTrace = dec.decode().unwrap();
        assert_eq!(decoded, outer);
    }
}
