use criterion::{criterion_group, criterion_main, Criterion};

use bridge::Handle;

fn acquire_release(c: &mut Criterion) {
    c.bench_function("owning_acquire_release", |b| {
        b.iter(|| {
            let handle = Handle::owning(0x1000, |_| {});
            handle.release();
            handle.is_released()
        });
    });

    c.bench_function("borrowed_acquire_drop", |b| {
        b.iter(|| {
            let handle = Handle::borrowed(0x2000);
            handle.addr()
        });
    });
}

criterion_group!(benches, acquire_release);
criterion_main!(benches);
