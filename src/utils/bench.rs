/// Bridges a criterion instance and a plain iteration range behind one
/// `bench` call, so the same bench body can run under `cargo bench` or under
/// a profiler.
#[macro_export]
macro_rules! _impl_bench_trait_for_criterion {
    ($name:ident) => {
        pub trait BenchTrait {
            fn bench<F>(&mut self, name: &str, f: F) where F: FnMut();
        }

        impl BenchTrait for std::ops::Range<usize> {
            #[inline(always)]
            fn bench<F>(&mut self, _name: &str, mut f: F) where F: FnMut() {
                for _ in self {
                    f();
                }
            }
        }

        impl BenchTrait for $name {
            #[inline(always)]
            fn bench<F>(&mut self, name: &str, mut f: F) where F: FnMut() {
                self.bench_function(name, |b| b.iter(|| {
                    f();
                }));
            }
        }
    };
}

/// Entry point for bench binaries.
///
/// With `--bench` the criterion group runs. Without it the bench body runs
/// in a tight loop over `$size` bytes, which is what a profiler wants to see.
#[macro_export]
macro_rules! _bench_main {
    ($group:ident, $fn:ident, $size:expr$(,)?) => {
        fn main() {
            if std::env::args().any(|arg| arg == "--bench") {
                $group();
                Criterion::default().configure_from_args().final_summary();
                return;
            }

            let mut range = 0..1000000;
            $fn(&mut range, $size);
        }
    };
}
