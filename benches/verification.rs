use alloy::primitives::{Address, U256};
use alloy::signers::{local::PrivateKeySigner, SignerSync};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use transfer_verifier::{
    context::{FixedBlock, InMemoryLedger},
    security::{build_domain, signing_hash},
    types::TransferRequest,
    Deployment, Verifier,
};

const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn bench_signing_hash(c: &mut Criterion) {
    let domain = build_domain("Verifier", "1", U256::from(1u64), Address::repeat_byte(0xaa));
    let request = TransferRequest::new(U256::from(100u64), U256::from(1_000u64));

    c.bench_function("signing_hash", |b| {
        b.iter(|| signing_hash(black_box(&domain), black_box(&request)))
    });
}

fn bench_is_correct_signer(c: &mut Criterion) {
    let signer: PrivateKeySigner = KEY.parse().unwrap();
    let verifier = Verifier::new(
        "Verifier",
        "1",
        &Deployment::new(U256::from(1u64), Address::repeat_byte(0xaa)),
        InMemoryLedger::default(),
        FixedBlock(0),
    );
    let request = TransferRequest::new(U256::from(100u64), U256::from(1_000u64));
    let signature = signer
        .sign_hash_sync(&verifier.signing_hash(&request))
        .unwrap()
        .as_bytes();

    c.bench_function("is_correct_signer", |b| {
        b.iter(|| {
            verifier.is_correct_signer(
                black_box(&signature),
                black_box(signer.address()),
                black_box(&request),
            )
        })
    });
}

criterion_group!(benches, bench_signing_hash, bench_is_correct_signer);
criterion_main!(benches);
