use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pda_vanity::crypto::{find_program_address, is_on_curve};
use pda_vanity::{derive, Address, Suffix};

fn program() -> Address {
    "7d4pygUVej17wWKY6uiPdFSVPTDKEEAzR4YMmkc1Bss1".parse().unwrap()
}

fn bench_derive(c: &mut Criterion) {
    let pid = program();
    let mut seed = 0u64;

    c.bench_function("derive", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            derive(black_box(&pid), black_box(seed))
        })
    });
}

fn bench_find_program_address(c: &mut Criterion) {
    let pid = program();
    let seed_le = 5_270_498_306_774_619_999u64.to_le_bytes();
    let seeds: [&[u8]; 1] = [&seed_le];

    c.bench_function("find_program_address", |b| {
        b.iter(|| find_program_address(black_box(&seeds[..]), black_box(&pid)))
    });
}

fn bench_curve_check(c: &mut Criterion) {
    let (addr, _) = derive(&program(), 1).unwrap();

    c.bench_function("is_on_curve", |b| {
        b.iter(|| is_on_curve(black_box(addr.as_bytes())))
    });
}

fn bench_suffix_match(c: &mut Criterion) {
    let suffix = Suffix::new("pump").unwrap();
    let (hit, _) = derive(&program(), 5_270_498_306_774_619_999).unwrap();
    let (miss, _) = derive(&program(), 1).unwrap();

    c.bench_function("suffix_match_miss", |b| {
        b.iter(|| suffix.matches(black_box(&miss)))
    });
    c.bench_function("suffix_match_hit", |b| {
        b.iter(|| suffix.matches(black_box(&hit)))
    });
}

criterion_group!(
    benches,
    bench_derive,
    bench_find_program_address,
    bench_curve_check,
    bench_suffix_match
);
criterion_main!(benches);
