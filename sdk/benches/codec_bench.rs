// Lifecycle benchmarks for the transaction engine.
//
// Covers freezing across node counts, signing, encoding and decoding of
// signed transaction lists, and checksum computation.

use std::net::Ipv4Addr;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tessera_sdk::id::compute_checksum;
use tessera_sdk::{AccountId, Endpoint, LedgerId, NodeUpdate, PrivateKey, Timestamp, Transaction, TransactionId};

fn node_update(nodes: u64) -> Transaction<NodeUpdate> {
    let mut tx = Transaction::<NodeUpdate>::new();
    tx.set_transaction_id(TransactionId::new(AccountId::from_num(2), Timestamp { seconds: 1_700_000_000, nanos: 0 }))
        .unwrap()
        .set_node_account_ids((3..3 + nodes).map(AccountId::from_num))
        .unwrap()
        .set_node_id(1)
        .unwrap()
        .set_description("bench node")
        .unwrap()
        .add_gossip_endpoint(Endpoint::ipv4(Ipv4Addr::new(10, 0, 0, 1), 50111))
        .unwrap()
        .add_service_endpoint(Endpoint::domain("node1.example.com", 50211))
        .unwrap();
    tx
}

fn bench_freeze(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle/freeze");

    for nodes in [1u64, 5, 20] {
        group.throughput(Throughput::Elements(nodes));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &nodes, |b, &nodes| {
            b.iter_batched(
                || node_update(nodes),
                |mut tx| {
                    tx.freeze().unwrap();
                    tx
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_sign(c: &mut Criterion) {
    let key = PrivateKey::generate();
    let mut frozen = node_update(5);
    frozen.freeze().unwrap();

    c.bench_function("lifecycle/sign_5_nodes", |b| {
        b.iter_batched(
            || frozen.clone(),
            |mut tx| {
                tx.sign(&key).unwrap();
                tx
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for signers in [1usize, 4, 16] {
        let mut tx = node_update(5);
        for _ in 0..signers {
            tx.sign(&PrivateKey::generate()).unwrap();
        }
        let bytes = tx.to_bytes();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", signers), &tx, |b, tx| {
            b.iter(|| tx.to_bytes());
        });
        group.bench_with_input(BenchmarkId::new("decode", signers), &bytes, |b, bytes| {
            b.iter(|| tessera_sdk::from_bytes(bytes).unwrap());
        });
    }

    group.finish();
}

fn bench_checksum(c: &mut Criterion) {
    c.bench_function("id/checksum", |b| {
        b.iter(|| compute_checksum(&LedgerId::Testnet, "0.0.123456"));
    });
}

criterion_group!(benches, bench_freeze, bench_sign, bench_encode_decode, bench_checksum);
criterion_main!(benches);
