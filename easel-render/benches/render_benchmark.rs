use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use easel_core::{Element, VNode};
use easel_render::scene::{collect_commands, paginate};
use easel_render::PageLayout;
use std::hint::black_box;

fn rect_tree(n: usize) -> VNode {
    VNode::fragment((0..n).map(|i| {
        Element::new("rect")
            .attr("x", i as f64)
            .attr("y", i as f64)
            .attr("width", 10)
            .attr("height", 10)
            .into()
    }))
}

/// Benchmark: collect draw commands from N rects
fn bench_collect_commands(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_commands");

    for count in [100, 1_000] {
        let tree = rect_tree(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &tree, |b, tree| {
            b.iter(|| black_box(collect_commands(tree)));
        });
    }

    group.finish();
}

/// Benchmark: paginate 1000 paragraphs onto A4-ish pages
fn bench_paginate(c: &mut Criterion) {
    let tree = VNode::fragment(
        (0..1_000).map(|i| Element::new("p").child(VNode::text(format!("line {i}"))).into()),
    );
    let layout = PageLayout { width: 595.0, height: 842.0, margin: 36.0 };

    c.bench_function("paginate_1000_paragraphs", |b| {
        b.iter(|| black_box(paginate(&tree, layout, 16.0)));
    });
}

criterion_group!(benches, bench_collect_commands, bench_paginate);
criterion_main!(benches);
