use criterion::*;
use poly1305_engine::crypto::poly1305::Poly1305;
use poly1305_engine::utils::human_readable_size;
use poly1305_engine::{_impl_bench_trait_for_criterion, _bench_main};

_impl_bench_trait_for_criterion!(Criterion);

#[inline(always)]
fn bench_poly1305_mac(c: &mut impl BenchTrait, size: usize) {
    let key = [0x5au8; 32];
    let message = vec![0u8; size];

    let test_name = format!("poly1305 mac {}", human_readable_size(size));
    c.bench(&test_name, #[inline(always)] || {
        let tag = Poly1305::oneshot(&key, &message);
        let _ = std::hint::black_box(tag);
    });
}

#[inline(always)]
fn bench_poly1305_incremental(c: &mut impl BenchTrait, size: usize) {
    let key = [0x5au8; 32];
    let message = vec![0u8; size];

    let test_name = format!("poly1305 mac (13-byte updates) {}", human_readable_size(size));
    c.bench(&test_name, #[inline(always)] || {
        let mut mac = Poly1305::new(key);
        for chunk in message.chunks(13) {
            mac.update(chunk);
        }
        let _ = std::hint::black_box(mac.finalize());
    });
}

fn bench_poly1305(c: &mut Criterion) {
    bench_poly1305_mac(c, 64);
    bench_poly1305_incremental(c, 64);
    bench_poly1305_mac(c, 1024);
    bench_poly1305_incremental(c, 1024);
    bench_poly1305_mac(c, 65536);
    bench_poly1305_incremental(c, 65536);
}

criterion_group!(benches, bench_poly1305);
_bench_main!(benches, bench_poly1305_mac, 65536);
