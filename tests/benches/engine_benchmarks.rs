//! # Privy-Trade Engine Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | pt-01 Group Membership | fingerprint of a participant set |
//! | pt-06 Visibility Gate | private call digest |
//! | pt-06 Visibility Gate | member read (no submission) |
//! | pt-04 Escrow Ledger | prepay + payTo through the gate |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pt_01_group_membership::group_fingerprint;
use pt_06_visibility_gate::{private_digest, ContractCall};
use pt_tests::harness::EngineHarness;
use shared_types::entities::{Participant, TradeId, U256};
use tokio::runtime::Runtime;

fn participants(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| {
            let mut key = vec![0x02u8; 33];
            key[1..9].copy_from_slice(&(i as u64).to_be_bytes());
            Participant::new(key)
        })
        .collect()
}

// ============================================================================
// PT-01: Group fingerprint
// ============================================================================

fn bench_group_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("pt-01-group-fingerprint");
    for size in [3usize, 16, 64] {
        let members = participants(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &members, |b, members| {
            b.iter(|| black_box(group_fingerprint(members.iter())))
        });
    }
    group.finish();
}

// ============================================================================
// PT-06: Visibility gate
// ============================================================================

fn bench_private_digest(c: &mut Criterion) {
    let call = ContractCall::SetItem {
        contract: TradeId([0x11; 20]),
        price: U256::from(120_000_000_000_000_000u64),
        name: "A secret data".to_string(),
        description: "Some secret data".repeat(16),
    };
    c.bench_function("pt-06-private-digest", |b| {
        b.iter(|| black_box(private_digest(&call)))
    });
}

fn bench_member_read(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let h = EngineHarness::new();
    let (group, contract) = rt.block_on(async {
        let (group, contract) = h.deploy_trade().await;
        h.advance_to_delivered(group, contract).await;
        (group, contract)
    });

    c.bench_function("pt-06-member-read", |b| {
        b.iter(|| {
            rt.block_on(h.private(
                &h.cast.buyer,
                group,
                ContractCall::GetItemName { contract },
            ))
        })
    });
}

// ============================================================================
// PT-04: Escrow through the gate
// ============================================================================

fn bench_escrow_round(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let h = EngineHarness::new();
    let escrow = rt.block_on(h.deploy_escrow());

    c.bench_function("pt-04-prepay-pay-to", |b| {
        b.iter(|| {
            rt.block_on(async {
                h.prepay(escrow, U256::from(10u64)).await;
                h.public(
                    &h.cast.agent,
                    ContractCall::PayTo {
                        escrow,
                        to: h.cast.seller.address(),
                        amount: U256::from(10u64),
                    },
                )
                .await
            })
        })
    });
}

criterion_group!(
    benches,
    bench_group_fingerprint,
    bench_private_digest,
    bench_member_read,
    bench_escrow_round
);
criterion_main!(benches);
