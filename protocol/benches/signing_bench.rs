// Signing and encoding benchmarks for the Dnero transaction core.
//
// Covers secp256k1 key generation, digest signing and address recovery,
// sign-bytes construction, and full transaction signing for Sends with a
// growing number of outputs.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_bigint::BigUint;

use dnero_protocol::config::{ProtocolConfig, CHAIN_ID_MAINNET, TX_SIGNATURE_V_OFFSET};
use dnero_protocol::crypto::{keccak256, PrivateKey};
use dnero_protocol::transaction::{
    sign_transaction, signable_bytes, OutputParams, SendParams, SendTransaction,
};
use dnero_protocol::Address;

fn send_with_outputs(count: usize) -> SendTransaction {
    let outputs = (0..count)
        .map(|i| OutputParams {
            address: Some(Address::from_bytes([i as u8; 20])),
            dnero_wei: BigUint::from(1_000_000u64 + i as u64),
            dtoken_wei: BigUint::from(500u32),
        })
        .collect();
    SendTransaction::new(
        SendParams {
            from: Some(Address::from_bytes([0xaa; 20])),
            outputs,
            sequence: Some(42),
            ..Default::default()
        },
        &ProtocolConfig::default(),
    )
    .unwrap()
}

fn bench_key_generation(c: &mut Criterion) {
    c.bench_function("secp256k1/key_generate", |b| {
        b.iter(PrivateKey::generate);
    });
}

fn bench_sign_digest(c: &mut Criterion) {
    let key = PrivateKey::generate();
    let digest = keccak256(b"send 500 DNERO; sequence=42");

    c.bench_function("secp256k1/sign_digest", |b| {
        b.iter(|| key.sign_digest(&digest, TX_SIGNATURE_V_OFFSET).unwrap());
    });
}

fn bench_recover_address(c: &mut Criterion) {
    let key = PrivateKey::generate();
    let digest = keccak256(b"send 500 DNERO; sequence=42");
    let signature = key.sign_digest(&digest, TX_SIGNATURE_V_OFFSET).unwrap();

    c.bench_function("secp256k1/recover_address", |b| {
        b.iter(|| signature.recover_address(&digest, TX_SIGNATURE_V_OFFSET).unwrap());
    });
}

fn bench_sign_bytes(c: &mut Criterion) {
    let mut tx = send_with_outputs(1);

    c.bench_function("rlp/sign_bytes_send", |b| {
        b.iter(|| signable_bytes(&mut tx, CHAIN_ID_MAINNET));
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let key = PrivateKey::generate();
    let mut group = c.benchmark_group("send/sign_transaction");

    for outputs in [1, 10, 100] {
        let mut tx = send_with_outputs(outputs);
        group.throughput(Throughput::Elements(outputs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(outputs), &outputs, |b, _| {
            b.iter(|| sign_transaction(&mut tx, CHAIN_ID_MAINNET, &key).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_generation,
    bench_sign_digest,
    bench_recover_address,
    bench_sign_bytes,
    bench_sign_transaction,
);
criterion_main!(benches);
