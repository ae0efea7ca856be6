use criterion::{Criterion, black_box, criterion_group, criterion_main};

use osmflow_core::{Location, Node, NodeId, Tags};
use osmflow_handler::{DynamicHandler, NodeHandler, bind};

#[derive(Default)]
struct Sum {
    total: i64,
}

impl NodeHandler for Sum {
    fn node(&mut self, node: &Node) {
        self.total = self.total.wrapping_add(node.id.get());
    }
}

fn test_nodes(n: i64) -> Vec<Node> {
    (0..n)
        .map(|i| Node {
            id: NodeId::new(i),
            version: 1,
            timestamp: None,
            location: Location::new(0.0, 0.0).unwrap(),
            tags: Tags::new(),
        })
        .collect()
}

fn bench_dispatch(c: &mut Criterion) {
    let nodes = test_nodes(10_000);
    let mut group = c.benchmark_group("node_dispatch");

    group.bench_function("direct", |b| {
        b.iter(|| {
            let mut sum = Sum::default();
            for node in &nodes {
                sum.node(black_box(node));
            }
            sum.total
        })
    });

    group.bench_function("dynamic_unbound", |b| {
        let mut handler = DynamicHandler::new();
        b.iter(|| {
            for node in &nodes {
                handler.node(black_box(node));
            }
        })
    });

    group.bench_function("dynamic_named", |b| {
        let mut handler = DynamicHandler::new();
        bind!(handler, Sum::default());
        b.iter(|| {
            for node in &nodes {
                handler.node(black_box(node));
            }
        })
    });

    group.bench_function("dynamic_closure", |b| {
        let mut handler = DynamicHandler::new();
        let mut total = 0i64;
        bind!(handler, move |node: &Node| total = total.wrapping_add(node.id.get()));
        b.iter(|| {
            for node in &nodes {
                handler.node(black_box(node));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
