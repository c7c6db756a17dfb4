use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use easel_core::{expand, AppContext, Component, Element, HostTree, InjectionKey, Scope, VNode};
use std::hint::black_box;

const DEPTH: InjectionKey<u32> = InjectionKey::new("depth");

struct Reader;

impl Component for Reader {
    fn name(&self) -> &str {
        "Reader"
    }

    fn render(&self, scope: &mut Scope) -> VNode {
        let depth = scope.inject(DEPTH).map(|d| *d).unwrap_or(0);
        Element::new("text").attr("depth", depth).into()
    }
}

/// Benchmark: expand N components that each inject a value
fn bench_expand_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand_components");

    let mut host = HostTree::new();
    let root = host.mount_root(AppContext::new("bench"), "App");
    host.provide(root, DEPTH, 3).unwrap();
    let scope = Scope::new(host.context(root).unwrap());

    for count in [100, 1_000] {
        let tree = VNode::fragment((0..count).map(|_| VNode::component(Reader, vec![])));
        group.bench_with_input(BenchmarkId::from_parameter(count), &tree, |b, tree| {
            b.iter(|| black_box(expand(tree, &scope)));
        });
    }

    group.finish();
}

/// Benchmark: lookup through a deep provide chain
fn bench_deep_lookup(c: &mut Criterion) {
    let mut host = HostTree::new();
    let mut id = host.mount_root(AppContext::new("bench"), "App");
    host.provide(id, DEPTH, 0).unwrap();
    for _ in 0..64 {
        id = host.create_child(id, "Layer").unwrap();
        host.provide(id, InjectionKey::<String>::new("noise"), String::new()).unwrap();
    }
    let ctx = host.context(id).unwrap();

    c.bench_function("inject_depth_64", |b| {
        b.iter(|| black_box(ctx.inject(DEPTH)));
    });
}

criterion_group!(benches, bench_expand_components, bench_deep_lookup);
criterion_main!(benches);
