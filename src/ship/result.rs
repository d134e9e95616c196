//! State-history results (§3.3, §4.6): the top-level `Result` variant a `get_status`/
//! `get_blocks` request resolves to, plus the `make_*`/`must_make_*` eager pack-inside-
//! bytes constructors callers use to build a `GetBlocksResultV0` without hand-staging an
//! `Encoder` themselves. Grounded field-for-field on
//! `TestStatusResponseEncode`/`TestStatusResultDecode`/`blockResult` in
//! `original_source/ship/result_test.go`.

use std::io::Write;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::chain::SignedBlock;
use crate::checksum::Checksum256;
use crate::error::{Error, Result};
use crate::ship::delta::TableDelta;
use crate::ship::trace::TransactionTrace;
use crate::varint;

/// `block_position` (§3.3): a block number paired with its ID, used throughout the
/// state-history results to point at a specific block without carrying its full content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPosition {
    pub block_num: u32,
    pub block_id: Checksum256,
}

impl Encode for BlockPosition {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u32(self.block_num)?;
        self.block_id.encode(enc)
    }
}

impl Decode for BlockPosition {
    const MIN_SIZE: usize = 4 + 32;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(BlockPosition {
            block_num: dec.read_u32()?,
            block_id: Checksum256::decode(dec)?,
        })
    }
}

/// `get_status_result_v0` (§3.3): the reply to a `get_status_request_v0`. `head` and
/// `last_irreversible` are plain `BlockPosition` values, not `Optional` — the reference
/// fixture's expected byte trace has no presence tag ahead of either field, even though
/// the Go struct carries them as pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetStatusResultV0 {
    pub head: BlockPosition,
    pub last_irreversible: BlockPosition,
    pub trace_begin_block: u32,
    pub trace_end_block: u32,
    pub chain_state_begin_block: u32,
    pub chain_state_end_block: u32,
}

impl Encode for GetStatusResultV0 {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.head.encode(enc)?;
        self.last_irreversible.encode(enc)?;
        enc.write_u32(self.trace_begin_block)?;
        enc.write_u32(self.trace_end_block)?;
        enc.write_u32(self.chain_state_begin_block)?;
        enc.write_u32(self.chain_state_end_block)
    }
}

impl Decode for GetStatusResultV0 {
    const MIN_SIZE: usize = BlockPosition::MIN_SIZE * 2 + 4 * 4;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(GetStatusResultV0 {
            head: BlockPosition::decode(dec)?,
            last_irreversible: BlockPosition::decode(dec)?,
            trace_begin_block: dec.read_u32()?,
            trace_end_block: dec.read_u32()?,
            chain_state_begin_block: dec.read_u32()?,
            chain_state_end_block: dec.read_u32()?,
        })
    }
}

/// `get_blocks_result_v0` (§3.3): the reply to a `get_blocks_request_v0`. `block`,
/// `traces`, and `deltas` are `Optional<Bytes>` fields whose contents, when present, are
/// themselves a fully serialized `SignedBlock` / `Array<TransactionTrace>` /
/// `Array<TableDelta>` (§4.6 "pack-inside-bytes") — build them with
/// [`make_block`]/[`make_traces`]/[`make_deltas`] rather than encoding by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBlocksResultV0 {
    pub head: BlockPosition,
    pub last_irreversible: BlockPosition,
    pub this_block: Option<BlockPosition>,
    pub prev_block: Option<BlockPosition>,
    pub block: Option<Vec<u8>>,
    pub traces: Option<Vec<u8>>,
    pub deltas: Option<Vec<u8>>,
}

impl Encode for GetBlocksResultV0 {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.head.encode(enc)?;
        self.last_irreversible.encode(enc)?;
        self.this_block.encode(enc)?;
        self.prev_block.encode(enc)?;
        self.block.encode(enc)?;
        self.traces.encode(enc)?;
        self.deltas.encode(enc)
    }
}

impl Decode for GetBlocksResultV0 {
    const MIN_SIZE: usize = BlockPosition::MIN_SIZE * 2 + 1 + 1 + 1 + 1 + 1;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(GetBlocksResultV0 {
            head: BlockPosition::decode(dec)?,
            last_irreversible: BlockPosition::decode(dec)?,
            this_block: Option::<BlockPosition>::decode(dec)?,
            prev_block: Option::<BlockPosition>::decode(dec)?,
            block: Option::<Vec<u8>>::decode(dec)?,
            traces: Option::<Vec<u8>>::decode(dec)?,
            deltas: Option::<Vec<u8>>::decode(dec)?,
        })
    }
}

impl GetBlocksResultV0 {
    /// Decodes `self.block` as a `SignedBlock`, enforcing exact-frame consumption
    /// (§4.2 "frame discipline").
    pub fn decode_block(&self) -> Result<Option<SignedBlock>> {
        self.block.as_deref().map(decode_exact).transpose()
    }

    /// Decodes `self.traces` as `Array<TransactionTrace>`.
    pub fn decode_traces(&self) -> Result<Option<Vec<TransactionTrace>>> {
        self.traces
            .as_deref()
            .map(decode_array_exact::<TransactionTrace>)
            .transpose()
    }

    /// Decodes `self.deltas` as `Array<TableDelta>`.
    pub fn decode_deltas(&self) -> Result<Option<Vec<TableDelta>>> {
        self.deltas
            .as_deref()
            .map(decode_array_exact::<TableDelta>)
            .transpose()
    }
}

/// `result` (§3.2 Variant, §4.6): the top-level reply to any state-history request,
/// matching `ship.Result{StatusResult, BlocksResult}` in the reference fixture. A genuine
/// Rust enum, so "neither arm populated" and "both arms populated" are both unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateHistoryResult {
    StatusResultV0(GetStatusResultV0),
    BlocksResultV0(GetBlocksResultV0),
}

impl Encode for StateHistoryResult {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            StateHistoryResult::StatusResultV0(v0) => {
                enc.write_varuint32(0)?;
                v0.encode(enc)
            }
            StateHistoryResult::BlocksResultV0(v0) => {
                enc.write_varuint32(1)?;
                v0.encode(enc)
            }
        }
    }
}

impl Decode for StateHistoryResult {
    const MIN_SIZE: usize = 1 + GetStatusResultV0::MIN_SIZE;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_varuint32()? {
            0 => Ok(StateHistoryResult::StatusResultV0(GetStatusResultV0::decode(dec)?)),
            1 => Ok(StateHistoryResult::BlocksResultV0(GetBlocksResultV0::decode(dec)?)),
            other => Err(Error::VariantOutOfRange {
                discriminant: other,
                arm_count: 2,
            }),
        }
    }
}

/// Stages `value`'s encoding into an owned buffer, with a Varuint32(len) count but no
/// additional framing — the exact shape `Option<Vec<u8>>::encode` expects of its
/// contents when the caller later assigns the result to `block`/`traces`/`deltas`.
fn encode_exact<T: Encode>(value: &T) -> Result<Vec<u8>> {
    let mut enc = Encoder::new(Vec::new());
    value.encode(&mut enc)?;
    Ok(enc.into_inner())
}

fn encode_array_exact<T: Encode>(items: &[T]) -> Result<Vec<u8>> {
    let mut enc = Encoder::new(Vec::new());
    enc.write_varuint32(
        u32::try_from(items.len()).map_err(|_| Error::UnsupportedValue("array length exceeds u32"))?,
    )?;
    for item in items {
        item.encode(&mut enc)?;
    }
    Ok(enc.into_inner())
}

/// Decodes `T` from a byte slice extracted from a `block`/`traces`/`deltas` field,
/// requiring it to consume the slice exactly (§4.2 "frame discipline").
fn decode_exact<T: Decode>(bytes: &[u8]) -> Result<T> {
    let mut framed = Vec::with_capacity(bytes.len() + 5);
    varint::write_varuint32(&mut framed, bytes.len() as u32);
    framed.extend_from_slice(bytes);
    Decoder::new(&framed).decode_packed::<T>()
}

fn decode_array_exact<T: Decode>(bytes: &[u8]) -> Result<Vec<T>> {
    let mut dec = Decoder::new(bytes);
    let items = dec.read_array::<T>()?;
    if dec.remaining() != 0 {
        return Err(Error::UnderfullFrame {
            declared: bytes.len(),
            consumed: bytes.len() - dec.remaining(),
        });
    }
    Ok(items)
}

/// `ship.MustMakeSignedBlockBytes`'s fallible counterpart: encodes `block` into the bytes
/// a `GetBlocksResultV0.block` field carries.
pub fn make_block(block: &SignedBlock) -> Result<Vec<u8>> {
    encode_exact(block)
}

/// Panics on encode failure. `SignedBlock` encoding has no fallible step for well-formed
/// values, so this is a convenience for call sites that already know the input is valid
/// (mirrors `ship.MustMakeSignedBlockBytes`).
pub fn must_make_block(block: &SignedBlock) -> Vec<u8> {
    make_block(block).expect("encoding a SignedBlock does not fail")
}

/// `ship.MustMakeTransactionTraceArray`'s fallible counterpart.
pub fn make_traces(traces: &[TransactionTrace]) -> Result<Vec<u8>> {
    encode_array_exact(traces)
}

pub fn must_make_traces(traces: &[TransactionTrace]) -> Vec<u8> {
    make_traces(traces).expect("encoding a TransactionTrace array does not fail")
}

/// `ship.MustMakeTableDeltaArray`'s fallible counterpart.
pub fn make_deltas(deltas: &[TableDelta]) -> Result<Vec<u8>> {
    encode_array_exact(deltas)
}

pub fn must_make_deltas(deltas: &[TableDelta]) -> Vec<u8> {
    make_deltas(deltas).expect("encoding a TableDelta array does not fail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{
        BlockHeader, CompressionType, PackedTransaction, ReceiptTrx, SignedBlockHeader,
        TransactionReceipt, TransactionReceiptHeader, TransactionStatus,
    };
    use crate::crypto::Signature;
    use crate::ship::delta::{Row, TableDeltaV0};
    use crate::ship::trace::{
        AccountAuthSequence, ActionReceipt, ActionReceiptV0, ActionTrace, ActionTraceV0,
        TransactionTraceV0,
    };
    use crate::time::BlockTimestamp;

    fn fixture_status_bytes() -> Vec<u8> {
        let mut bytes = vec![0x00];
        bytes.extend_from_slice(&893u32.to_le_bytes());
        bytes.extend_from_slice(&[
            0x52, 0x40, 0x67, 0x7a, 0x86, 0x2d, 0x5a, 0x4d, 0x99, 0x80, 0xfe, 0x60, 0xb0, 0x33,
            0xa2, 0xda, 0xf1, 0xb1, 0xac, 0x7a, 0xa8, 0x64, 0x7b, 0xac, 0x33, 0x06, 0xbb, 0x99,
            0x83, 0x17, 0x1d, 0x75,
        ]);
        bytes.extend_from_slice(&857u32.to_le_bytes());
        bytes.extend_from_slice(&[
            0xd1, 0xba, 0xa2, 0x3f, 0x59, 0xdc, 0xac, 0x4e, 0xb6, 0x9a, 0x98, 0x32, 0x93, 0x7f,
            0x0c, 0x6c, 0x8d, 0xdd, 0x88, 0x44, 0x42, 0x24, 0x45, 0x73, 0x8a, 0x39, 0x43, 0x64,
            0xde, 0x70, 0x4a, 0x46,
        ]);
        bytes.extend_from_slice(&1000u32.to_le_bytes());
        bytes.extend_from_slice(&2000u32.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&9000u32.to_le_bytes());
        bytes
    }

    fn fixture_status() -> GetStatusResultV0 {
        GetStatusResultV0 {
            head: BlockPosition {
                block_num: 893,
                block_id: Checksum256([
                    0x52, 0x40, 0x67, 0x7a, 0x86, 0x2d, 0x5a, 0x4d, 0x99, 0x80, 0xfe, 0x60, 0xb0,
                    0x33, 0xa2, 0xda, 0xf1, 0xb1, 0xac, 0x7a, 0xa8, 0x64, 0x7b, 0xac, 0x33, 0x06,
                    0xbb, 0x99, 0x83, 0x17, 0x1d, 0x75,
                ]),
            },
            last_irreversible: BlockPosition {
                block_num: 857,
                block_id: Checksum256([
                    0xd1, 0xba, 0xa2, 0x3f, 0x59, 0xdc, 0xac, 0x4e, 0xb6, 0x9a, 0x98, 0x32, 0x93,
                    0x7f, 0x0c, 0x6c, 0x8d, 0xdd, 0x88, 0x44, 0x42, 0x24, 0x45, 0x73, 0x8a, 0x39,
                    0x43, 0x64, 0xde, 0x70, 0x4a, 0x46,
                ]),
            },
            trace_begin_block: 1000,
            trace_end_block: 2000,
            chain_state_begin_block: 8000,
            chain_state_end_block: 9000,
        }
    }

    #[test]
    fn status_result_encodes_to_the_exact_reference_bytes() {
        let result = StateHistoryResult::StatusResultV0(fixture_status());
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&result).unwrap();
        let bytes = enc.into_inner();
        assert_eq!(bytes.len(), 89);
        assert_eq!(bytes, fixture_status_bytes());
    }

    #[test]
    fn status_result_decodes_from_the_exact_reference_bytes() {
        let bytes = fixture_status_bytes();
        let mut dec = Decoder::new(&bytes);
        let decoded: StateHistoryResult = dec.decode().unwrap();
        assert_eq!(decoded, StateHistoryResult::StatusResultV0(fixture_status()));
    }

    fn fixture_block() -> SignedBlock {
        SignedBlock {
            signed_block_header: SignedBlockHeader {
                block_header: BlockHeader {
                    timestamp: BlockTimestamp::from_slot(891),
                    producer: "pizzachain11".parse().unwrap(),
                    confirmed: 0,
                    previous: Checksum256([0x11; 32]),
                    transaction_mroot: Checksum256([0x22; 32]),
                    action_mroot: Checksum256([0x33; 32]),
                    schedule_version: 44,
                    new_producers_v1: None,
                    header_extensions: vec![],
                },
                producer_signature: Signature::K1([0u8; 65]),
            },
            transactions: vec![TransactionReceipt {
                header: TransactionReceiptHeader {
                    status: TransactionStatus::Executed,
                    cpu_usage_us: 500,
                    net_usage_words: 10,
                },
                trx: ReceiptTrx::Packed(PackedTransaction {
                    signatures: vec![],
                    compression: CompressionType::None,
                    packed_context_free_data: vec![],
                    packed_trx: vec![0xaa, 0xbb],
                }),
            }],
            block_extensions: vec![],
        }
    }

    fn fixture_traces() -> Vec<TransactionTrace> {
        vec![TransactionTrace::V0(TransactionTraceV0 {
            id: Checksum256([0x77; 32]),
            status: TransactionStatus::Executed,
            cpu_usage_us: 120,
            net_usage_words: 5,
            elapsed: 10,
            net_usage: 80,
            scheduled: false,
            action_traces: vec![ActionTrace::V0(ActionTraceV0 {
                action_ordinal: 1,
                creator_action_ordinal: 0,
                receipt: Some(ActionReceipt(ActionReceiptV0 {
                    receiver: "eosio.token".parse().unwrap(),
                    act_digest: Checksum256([0x88; 32]),
                    global_sequence: 42,
                    recv_sequence: 7,
                    auth_sequence: vec![AccountAuthSequence {
                        account: "qubiclesapp1".parse().unwrap(),
                        sequence: 3,
                    }],
                    code_sequence: 1,
                    abi_sequence: 1,
                })),
                receiver: "eosio.token".parse().unwrap(),
                act: crate::chain::Action {
                    account: "eosio.token".parse().unwrap(),
                    name: "transfer".parse().unwrap(),
                    authorization: vec![],
                    data: vec![1, 2, 3],
                },
                context_free: false,
                elapsed: 5,
                console: String::new(),
                account_ram_deltas: vec![],
                except: None,
                error_code: None,
            })],
            account_delta: None,
            except: None,
            error_code: None,
            failed_dtrx_trace: None,
            partial: None,
        })]
    }

    fn fixture_deltas() -> Vec<TableDelta> {
        vec![TableDelta(TableDeltaV0 {
            name: "accounts".to_string(),
            rows: vec![Row {
                present: true,
                data: vec![9, 9, 9],
            }],
        })]
    }

    #[test]
    fn blocks_result_round_trips_with_pack_inside_bytes_fields() {
        let block = fixture_block();
        let traces = fixture_traces();
        let deltas = fixture_deltas();

        let v0 = GetBlocksResultV0 {
            head: BlockPosition {
                block_num: 891,
                block_id: Checksum256([0x11; 32]),
            },
            last_irreversible: BlockPosition {
                block_num: 857,
                block_id: Checksum256([0x22; 32]),
            },
            this_block: Some(BlockPosition {
                block_num: 891,
                block_id: Checksum256([0x33; 32]),
            }),
            prev_block: Some(BlockPosition {
                block_num: 890,
                block_id: Checksum256([0x44; 32]),
            }),
            block: Some(must_make_block(&block)),
            traces: Some(must_make_traces(&traces)),
            deltas: Some(must_make_deltas(&deltas)),
        };
        let result = StateHistoryResult::BlocksResultV0(v0);

        let mut enc = Encoder::new(Vec::new());
        enc.encode(&result).unwrap();
        let bytes = enc.into_inner();
        assert_eq!(bytes[0], 1);

        let mut dec = Decoder::new(&bytes);
        let decoded: StateHistoryResult = dec.decode().unwrap();
        let StateHistoryResult::BlocksResultV0(decoded_v0) = decoded else {
            panic!("expected BlocksResultV0");
        };

        assert_eq!(decoded_v0.decode_block().unwrap(), Some(block));
        assert_eq!(decoded_v0.decode_traces().unwrap(), Some(traces));
        assert_eq!(decoded_v0.decode_deltas().unwrap(), Some(deltas));
    }

    #[test]
    fn blocks_result_without_block_content_decodes_to_none() {
        let v0 = GetBlocksResultV0 {
            head: BlockPosition {
                block_num: 1,
                block_id: Checksum256::default(),
            },
            last_irreversible: BlockPosition {
                block_num: 1,
                block_id: Checksum256::default(),
            },
            this_block: None,
            prev_block: None,
            block: None,
            traces: None,
            deltas: None,
        };
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&v0).unwrap();
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        let decoded: GetBlocksResultV0 = dec.decode().unwrap();
        assert!(decoded.decode_block().unwrap().is_none());
        assert!(decoded.decode_traces().unwrap().is_none());
        assert!(decoded.decode_deltas().unwrap().is_none());
    }

    #[test]
    fn unknown_top_level_discriminant_is_rejected() {
        let bytes = vec![2u8];
        let mut dec = Decoder::new(&bytes);
        assert!(matches!(
            dec.decode::<StateHistoryResult>(),
            Err(Error::VariantOutOfRange { .. })
        ));
    }
}
