use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fncon_consensus::{FnResponse, VoteSet};
use fncon_crypto::Ed25519Signer;
use fncon_types::{PrivateKey, ResponseHash};

const VALIDATORS: u32 = 100;

fn response() -> FnResponse {
    FnResponse {
        hash: ResponseHash::new([7u8; 32]),
        oracle_signature: vec![0xAB; 64],
    }
}

fn half_set(offset: u32) -> VoteSet {
    let mut vs = VoteSet::new("bench", "oracle-1", 1, VALIDATORS);
    for i in (offset..VALIDATORS).step_by(2) {
        let signer = Ed25519Signer::new(PrivateKey([(i % 251) as u8 + 1; 32]));
        vs.add_vote(&response(), i, &signer).expect("fresh index");
    }
    vs
}

fn add_vote_bench(c: &mut Criterion) {
    let signer = Ed25519Signer::new(PrivateKey([9u8; 32]));
    c.bench_function("vote_set_add_vote", |b| {
        b.iter(|| {
            let mut vs = VoteSet::new("bench", "oracle-1", 1, VALIDATORS);
            vs.add_vote(black_box(&response()), 42, &signer).expect("fresh index");
            vs
        })
    });
}

fn merge_bench(c: &mut Criterion) {
    let even = half_set(0);
    let odd = half_set(1);
    c.bench_function("vote_set_merge_50_into_50", |b| {
        b.iter(|| {
            let mut target = even.clone();
            target.merge(black_box(&odd)).expect("same round")
        })
    });
}

fn codec_bench(c: &mut Criterion) {
    let vs = half_set(0);
    let bytes = vs.encode().expect("encodable");
    c.bench_function("vote_set_encode_50_votes", |b| {
        b.iter(|| black_box(&vs).encode().expect("encodable"))
    });
    c.bench_function("vote_set_decode_50_votes", |b| {
        b.iter(|| VoteSet::decode(black_box(&bytes)).expect("decodable"))
    });
}

criterion_group!(benches, add_vote_bench, merge_bench, codec_bench);
criterion_main!(benches);
