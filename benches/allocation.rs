//! 短码分配与限流基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use snaplink::services::{LinkService, RateLimiter};
use snaplink::storage::MemoryLinkStore;
use snaplink::utils::generate_random_code;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

// ============== 短码生成 ==============

fn bench_generate_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("code/generate");
    for length in [4, 6, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &len| {
            b.iter(|| generate_random_code(black_box(len)));
        });
    }
    group.finish();
}

// ============== 分配 ==============

fn bench_allocate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = Arc::new(LinkService::new(Arc::new(MemoryLinkStore::new()), 6, 32));

    c.bench_function("link/allocate", |b| {
        b.to_async(&rt).iter(|| {
            let s = Arc::clone(&service);
            async move { s.allocate("https://example.com/some/path").await.unwrap() }
        });
    });
}

fn bench_resolve(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = Arc::new(LinkService::new(Arc::new(MemoryLinkStore::new()), 6, 32));

    // 预填充
    let ids: Vec<String> = rt.block_on(async {
        let mut ids = Vec::with_capacity(1000);
        for i in 0..1000 {
            let mapping = service
                .allocate(&format!("https://example.com/{}", i))
                .await
                .unwrap();
            ids.push(mapping.short_id);
        }
        ids
    });

    let hit = ids[500].clone();
    let svc_hit = Arc::clone(&service);
    c.bench_function("link/resolve_hit", |b| {
        b.to_async(&rt).iter(|| {
            let s = Arc::clone(&svc_hit);
            let id = hit.clone();
            async move { s.resolve(&id).await.is_ok() }
        });
    });

    let svc_miss = Arc::clone(&service);
    c.bench_function("link/resolve_miss", |b| {
        b.to_async(&rt).iter(|| {
            let s = Arc::clone(&svc_miss);
            async move { s.resolve("zzzzzzzz").await.is_err() }
        });
    });
}

// ============== 限流 ==============

fn bench_admit(c: &mut Criterion) {
    let limiter = RateLimiter::new(u32::MAX, Duration::from_secs(60));
    c.bench_function("rate_limit/admit_single_client", |b| {
        b.iter(|| limiter.admit(black_box("203.0.113.1")).is_admitted());
    });

    let spread = RateLimiter::new(10, Duration::from_secs(60));
    let clients: Vec<String> = (0..1024).map(|i| format!("10.0.{}.{}", i / 256, i % 256)).collect();
    let mut i = 0usize;
    c.bench_function("rate_limit/admit_many_clients", |b| {
        b.iter(|| {
            i = (i + 1) % clients.len();
            spread.admit(black_box(&clients[i])).is_admitted()
        });
    });
}

criterion_group!(
    benches,
    bench_generate_code,
    bench_allocate,
    bench_resolve,
    bench_admit
);
criterion_main!(benches);
