use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use beacon_core::{use_store, Component, RenderTrigger, StateMap, Store};

fn store_read_benchmark(c: &mut Criterion) {
    let store = Store::new(StateMap::new().with("count", 0));

    c.bench_function("store_read", |b| {
        b.iter(|| {
            black_box(store.read());
        });
    });
}

fn store_update_benchmark(c: &mut Criterion) {
    let store = Store::new(StateMap::new().with("count", 0).with("name", "bench"));

    c.bench_function("store_update", |b| {
        let mut i = 0i64;
        b.iter(|| {
            store.update(StateMap::new().with("count", black_box(i)));
            i += 1;
        });
    });
}

fn notify_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify_observers");

    for observers in [1usize, 4, 16, 64] {
        let store = Store::<StateMap>::default();
        let _subscriptions: Vec<_> = (0..observers)
            .map(|_| {
                store.subscribe(|previous, next| {
                    black_box((previous.len(), next.len()));
                })
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(observers), &observers, |b, _| {
            b.iter(|| store.update(StateMap::new().with("tick", 1)));
        });
    }

    group.finish();
}

fn render_benchmark(c: &mut Criterion) {
    let store = Store::new(StateMap::new().with("count", 0));
    let component = Component::mount(RenderTrigger::new(|| {}));

    c.bench_function("component_render", |b| {
        b.iter(|| black_box(component.render(|| use_store(&store).len())));
    });
}

criterion_group!(
    benches,
    store_read_benchmark,
    store_update_benchmark,
    notify_benchmark,
    render_benchmark,
);
criterion_main!(benches);
