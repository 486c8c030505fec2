use algograph::graph::*;
use std::collections::{HashMap, HashSet};

pub fn transition_model<G: QueryableGraph>(
    graph: &G,
    page: VertexId,
    damping: f64,
) -> HashMap<VertexId, f64, ahash::RandomState> {
    assert!(damping > 0.0 && damping < 1.0, "damping={damping}");
    assert!(graph.contains_vertex(&page), "page={page:?}");

    let n = graph.vertex_size() as f64;
    let links: HashSet<VertexId, ahash::RandomState> = graph
        .out_edges(&page)
        .map(|e| e.sink)
        .filter(|v| *v != page)
        .collect();

    let mut dist = HashMap::with_hasher(ahash::RandomState::new());
    if links.is_empty() {
        // a dangling page sends the surfer anywhere, uniformly
        for v in graph.iter_vertices() {
            dist.insert(v, 1.0 / n);
        }
        return dist;
    }

    let jump = (1.0 - damping) / n;
    let follow = damping / (links.len() as f64);
    for v in graph.iter_vertices() {
        dist.insert(v, jump);
    }
    for v in links {
        *dist.get_mut(&v).unwrap() += follow;
    }
    dist
}
