use algograph::graph::*;
use quickcheck::{Arbitrary, Gen};

// 1 -> {2, 3}, 2 -> {3}, 3 -> {2}
pub fn tiny_web() -> (directed::TreeBackedGraph, [VertexId; 3]) {
    let mut g = directed::TreeBackedGraph::new();
    let v1 = g.add_vertex();
    let v2 = g.add_vertex();
    let v3 = g.add_vertex();
    g.add_edge(v1, v2);
    g.add_edge(v1, v3);
    g.add_edge(v2, v3);
    g.add_edge(v3, v2);
    (g, [v1, v2, v3])
}

// 1 -> {2}, 2 -> {3}, 3 -> {}
pub fn chain_with_dangling_tail() -> (directed::TreeBackedGraph, [VertexId; 3]) {
    let mut g = directed::TreeBackedGraph::new();
    let v1 = g.add_vertex();
    let v2 = g.add_vertex();
    let v3 = g.add_vertex();
    g.add_edge(v1, v2);
    g.add_edge(v2, v3);
    (g, [v1, v2, v3])
}

#[derive(Debug, Clone)]
pub struct RandomGraph {
    pub graph: directed::TreeBackedGraph,
}

impl Arbitrary for RandomGraph {
    fn arbitrary(g: &mut Gen) -> Self {
        const N: usize = 10;

        let n: usize = usize::arbitrary(g) % N + 1;
        let mut graph = directed::TreeBackedGraph::new();
        let vertices: Vec<_> = (0..n).map(|_| graph.add_vertex()).collect();
        for _ in 0..(n * 2) {
            let v0 = vertices[usize::arbitrary(g) % vertices.len()];
            let v1 = vertices[usize::arbitrary(g) % vertices.len()];
            if v0 != v1 {
                graph.add_edge(v0, v1);
            }
        }
        Self { graph }
    }
}
