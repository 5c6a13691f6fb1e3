//! Book micro-benchmarks: fee split and bid-ladder operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use marketplace::oracle::InMemoryOracle;
use marketplace::Marketplace;
use types::prelude::*;

fn deep_market(bids: u64) -> (Marketplace, AssetKey) {
    let oracle = Arc::new(InMemoryOracle::new());
    let engine = Marketplace::new(oracle, FeeSchedule::new(250, 500).unwrap());
    let asset = AssetKey::new(CollectionId::new("gallery"), 1u64);
    for i in 0..bids {
        engine
            .place_bid(asset.clone(), AccountId::new(), Amount::from_u64(i + 1))
            .unwrap();
    }
    (engine, asset)
}

fn bench_fee_split(c: &mut Criterion) {
    let schedule = FeeSchedule::new(250, 500).unwrap();
    c.bench_function("fee_split", |b| {
        b.iter(|| schedule.split(black_box(Amount::new(1_000_000_000_000_000_000))))
    });
}

fn bench_highest_bid(c: &mut Criterion) {
    let (engine, asset) = deep_market(10_000);
    c.bench_function("highest_bid_deep_ladder", |b| {
        b.iter(|| engine.highest_bid(black_box(&asset)))
    });
}

fn bench_place_and_withdraw(c: &mut Criterion) {
    let (engine, asset) = deep_market(10_000);
    let bidder = AccountId::new();
    c.bench_function("place_and_withdraw_bid", |b| {
        b.iter(|| {
            engine
                .place_bid(asset.clone(), bidder, Amount::new(5))
                .unwrap();
            engine.withdraw_bid(&asset, bidder).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_fee_split,
    bench_highest_bid,
    bench_place_and_withdraw
);
criterion_main!(benches);
