//! # Rollup Exchange Benchmarks
//!
//! | Component | Operation | Cost driver |
//! |-----------|-----------|-------------|
//! | rx-01 Account Tree | balance proof build / verify | depth 24 + 16 hashes |
//! | rx-02 Exchange | submit_blocks | public input hash + queue fold |
//! | rx-02 Exchange | withdraw_from_merkle_tree | proof verification |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use rx_01_account_tree::{verify_balance_proof, AccountTree};
use rx_02_exchange::ExchangeApi;
use rx_tests::harness::{ether, Harness, ETH};
use shared_types::{Address, U256};
use std::time::Duration;

fn random_owner(rng: &mut impl Rng) -> Address {
    let mut owner = [0u8; 20];
    rng.fill(&mut owner);
    owner[0] |= 1;
    owner
}

// ============================================================================
// RX-01: Account Tree
// ============================================================================

fn bench_account_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("rx-01-account-tree");
    group.measurement_time(Duration::from_secs(10));

    let mut rng = rand::thread_rng();
    let mut tree = AccountTree::new();
    for id in 1..=1_000u32 {
        let owner = random_owner(&mut rng);
        if tree.ensure_account(id, owner).is_ok() {
            let _ = tree.credit(id, ETH, U256::from(rng.gen::<u64>()));
        }
    }
    let root = tree.root();

    group.bench_function("balance_proof", |b| {
        b.iter(|| black_box(tree.balance_proof(black_box(500), ETH).is_ok()))
    });

    if let Ok(proof) = tree.balance_proof(500, ETH) {
        group.bench_function("verify_balance_proof", |b| {
            b.iter(|| black_box(verify_balance_proof(&proof, &root)))
        });
    }

    group.bench_function("credit_and_rehash", |b| {
        b.iter(|| black_box(tree.credit(1, ETH, U256::one()).is_ok()))
    });

    group.finish();
}

// ============================================================================
// RX-02: Exchange
// ============================================================================

fn bench_submit_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("rx-02-submit-blocks");
    group.measurement_time(Duration::from_secs(10));

    for deposits in [1u64, 16, 128] {
        group.throughput(Throughput::Elements(deposits));
        group.bench_with_input(
            BenchmarkId::new("fold_deposits", deposits),
            &deposits,
            |b, &deposits| {
                b.iter_batched(
                    || {
                        let mut rng = rand::thread_rng();
                        let h = Harness::new();
                        for _ in 0..deposits {
                            let _ = h.deposit(random_owner(&mut rng), ETH, ether(1));
                        }
                        h
                    },
                    |mut h| black_box(h.commit_pending().is_ok()),
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_withdrawal_mode_exit(c: &mut Criterion) {
    let mut group = c.benchmark_group("rx-02-withdrawal-mode");

    group.bench_function("withdraw_from_merkle_tree", |b| {
        b.iter_batched(
            || {
                let mut h = Harness::new();
                let mut rng = rand::thread_rng();
                let owner = random_owner(&mut rng);
                let _ = h.deposit(owner, ETH, ether(1));
                let _ = h.commit_pending();
                let _ = h.deposit(random_owner(&mut rng), ETH, ether(1));
                h.advance(h.config.max_age_request_until_withdraw_mode + 1);
                (h, owner)
            },
            |(h, owner)| black_box(h.exchange.withdraw_from_merkle_tree(owner, ETH).is_ok()),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_account_tree,
    bench_submit_blocks,
    bench_withdrawal_mode_exit,
);
criterion_main!(benches);
