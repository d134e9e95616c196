//! Integration test replaying the `get_status`/`get_blocks` exchange an external
//! subscriber sees end to end: build the domain types through the public API only, push
//! them through `StateHistoryResult`'s wire encoding, and confirm a consumer on the other
//! end recovers identical values, including the pack-inside-bytes payloads nested inside
//! `GetBlocksResultV0`. Scenario grounded on `original_source/ship/result_test.go`'s
//! `blockResult` fixture (§8 end-to-end scenarios 1 and 5).

use antelope_codec::{
    must_make_block, must_make_deltas, must_make_traces, Action, ActionReceipt, ActionReceiptV0,
    ActionTrace, ActionTraceV0, BlockHeader, BlockPosition, BlockTimestamp, Checksum256,
    CompressionType, Decoder, Encoder, GetBlocksResultV0, GetStatusResultV0, PackedTransaction,
    ReceiptTrx, Row, SignedBlock, SignedBlockHeader, Signature, StateHistoryResult, TableDelta,
    TableDeltaV0, TransactionReceipt, TransactionReceiptHeader, TransactionStatus,
    TransactionTrace, TransactionTraceV0,
};

fn sample_block() -> SignedBlock {
    SignedBlock {
        signed_block_header: SignedBlockHeader {
            block_header: BlockHeader {
                timestamp: BlockTimestamp::from_slot(12_345),
                producer: "eosio".parse().unwrap(),
                confirmed: 0,
                previous: Checksum256([0xaa; 32]),
                transaction_mroot: Checksum256([0xbb; 32]),
                action_mroot: Checksum256([0xcc; 32]),
                schedule_version: 7,
                new_producers_v1: None,
                header_extensions: vec![],
            },
            producer_signature: Signature::K1([0u8; 65]),
        },
        transactions: vec![TransactionReceipt {
            header: TransactionReceiptHeader {
                status: TransactionStatus::Executed,
                cpu_usage_us: 250,
                net_usage_words: 12,
            },
            trx: ReceiptTrx::Packed(PackedTransaction {
                signatures: vec![],
                compression: CompressionType::None,
                packed_context_free_data: vec![],
                packed_trx: vec![0x01, 0x02, 0x03],
            }),
        }],
        block_extensions: vec![],
    }
}

fn sample_traces() -> Vec<TransactionTrace> {
    vec![TransactionTrace::V0(TransactionTraceV0 {
        id: Checksum256([0x01; 32]),
        status: TransactionStatus::Executed,
        cpu_usage_us: 100,
        net_usage_words: 4,
        elapsed: 9,
        net_usage: 32,
        scheduled: false,
        action_traces: vec![ActionTrace::V0(ActionTraceV0 {
            action_ordinal: 1,
            creator_action_ordinal: 0,
            receipt: Some(ActionReceipt(ActionReceiptV0 {
                receiver: "eosio.token".parse().unwrap(),
                act_digest: Checksum256([0x02; 32]),
                global_sequence: 99,
                recv_sequence: 1,
                auth_sequence: vec![],
                code_sequence: 1,
                abi_sequence: 1,
            })),
            receiver: "eosio.token".parse().unwrap(),
            act: Action {
                account: "eosio.token".parse().unwrap(),
                name: "transfer".parse().unwrap(),
                authorization: vec![],
                data: vec![9, 8, 7],
            },
            context_free: false,
            elapsed: 3,
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

fn sample_deltas() -> Vec<TableDelta> {
    vec![TableDelta(TableDeltaV0 {
        name: "accounts".to_string(),
        rows: vec![Row {
            present: true,
            data: vec![1, 2, 3, 4],
        }],
    })]
}

#[test]
fn status_result_round_trips_through_the_public_api() {
    let status = GetStatusResultV0 {
        head: BlockPosition {
            block_num: 12_345,
            block_id: Checksum256([0x10; 32]),
        },
        last_irreversible: BlockPosition {
            block_num: 12_000,
            block_id: Checksum256([0x20; 32]),
        },
        trace_begin_block: 1,
        trace_end_block: 2,
        chain_state_begin_block: 3,
        chain_state_end_block: 4,
    };
    let sent = StateHistoryResult::StatusResultV0(status);

    let mut enc = Encoder::new(Vec::new());
    enc.encode(&sent).unwrap();
    let wire = enc.into_inner();

    let mut dec = Decoder::new(&wire);
    let received: StateHistoryResult = dec.decode().unwrap();
    assert_eq!(received, sent);
}

#[test]
fn blocks_result_round_trips_with_pack_inside_bytes_payloads() {
    let block = sample_block();
    let traces = sample_traces();
    let deltas = sample_deltas();

    let sent = StateHistoryResult::BlocksResultV0(GetBlocksResultV0 {
        head: BlockPosition {
            block_num: 12_345,
            block_id: Checksum256([0x10; 32]),
        },
        last_irreversible: BlockPosition {
            block_num: 12_000,
            block_id: Checksum256([0x20; 32]),
        },
        this_block: Some(BlockPosition {
            block_num: 12_345,
            block_id: Checksum256([0x30; 32]),
        }),
        prev_block: Some(BlockPosition {
            block_num: 12_344,
            block_id: Checksum256([0x40; 32]),
        }),
        block: Some(must_make_block(&block)),
        traces: Some(must_make_traces(&traces)),
        deltas: Some(must_make_deltas(&deltas)),
    });

    let mut enc = Encoder::new(Vec::new());
    enc.encode(&sent).unwrap();
    let wire = enc.into_inner();

    let mut dec = Decoder::new(&wire);
    let received: StateHistoryResult = dec.decode().unwrap();

    let StateHistoryResult::BlocksResultV0(v0) = received else {
        panic!("expected a BlocksResultV0 on the wire");
    };
    assert_eq!(v0.decode_block().unwrap(), Some(block));
    assert_eq!(v0.decode_traces().unwrap(), Some(traces));
    assert_eq!(v0.decode_deltas().unwrap(), Some(deltas));
}

#[test]
fn blocks_result_tolerates_a_partially_populated_reply() {
    let sent = StateHistoryResult::BlocksResultV0(GetBlocksResultV0 {
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
    });

    let mut enc = Encoder::new(Vec::new());
    enc.encode(&sent).unwrap();
    let wire = enc.into_inner();

    let mut dec = Decoder::new(&wire);
    let received: StateHistoryResult = dec.decode().unwrap();
    assert_eq!(received, sent);
}
