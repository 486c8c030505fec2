use super::*;
use crate::*;
use algograph::graph::{QueryableGraph, VertexId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub struct IteratedPageRank<'a, G>
where
    G: QueryableGraph,
{
    graph: &'a G,
    damping: f64,
    epsilon: f64,
    max_rounds: usize,
    redistribute_dangling: bool,
    dangling: Vec<VertexId>,
    transitions: BTreeMap<(VertexId, VertexId), f64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    pub epsilon: f64,
    pub max_rounds: usize,
    pub redistribute_dangling: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: 0.85,
            epsilon: 0.001,
            max_rounds: 10000,
            redistribute_dangling: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Result {
    pub page_rank: HashMap<VertexId, f64, ahash::RandomState>,
    pub delta: HashMap<VertexId, f64, ahash::RandomState>,
    pub rounds: usize,
    pub converged: bool,
}

impl<'a, G: QueryableGraph> IteratedPageRank<'a, G> {
    pub fn new(g: &'a G, config: &Config) -> Self {
        let damping = config.damping;
        assert!(damping > 0.0 && damping < 1.0, "damping={damping}");
        let epsilon = config.epsilon;
        assert!(epsilon > 0.0, "epsilon={epsilon}");
        let max_rounds = config.max_rounds;
        assert!(max_rounds > 0, "max_rounds={max_rounds}");
        assert!(g.vertex_size() > 0, "vertex size={}", g.vertex_size());

        let mut dangling = vec![];
        let mut transitions = BTreeMap::new();
        for u in g.iter_vertices() {
            let sinks: BTreeSet<_> = g
                .out_edges(&u)
                .map(|e| e.sink)
                .filter(|v| *v != u)
                .collect();
            if sinks.is_empty() {
                // A dangling page has no row here. It still receives the
                // random-jump share each round but spreads nothing back, so
                // the total mass dips below 1 unless `redistribute_dangling`
                // is set.
                dangling.push(u);
                continue;
            }
            let unit = damping / (sinks.len() as f64);
            for v in sinks {
                transitions.insert((u, v), unit);
            }
        }
        Self {
            graph: g,
            damping,
            epsilon,
            max_rounds,
            redistribute_dangling: config.redistribute_dangling,
            dangling,
            transitions,
        }
    }

    fn relax(
        &self,
        p: &HashMap<VertexId, f64, ahash::RandomState>,
    ) -> HashMap<VertexId, f64, ahash::RandomState> {
        let n = self.graph.vertex_size() as f64;
        let mut base = (1.0 - self.damping) / n;
        if self.redistribute_dangling {
            let stuck: f64 = self.dangling.iter().map(|u| *p.get(u).unwrap()).sum();
            base += self.damping * stuck / n;
        }
        let mut r = HashMap::with_hasher(ahash::RandomState::new());
        for v in self.graph.iter_vertices() {
            r.insert(v, base);
        }
        for ((u, v), w) in self.transitions.iter() {
            let from = p.get(u).unwrap();
            let to = r.get_mut(v).unwrap();
            *to += from * w;
        }
        r
    }
}

impl<G: QueryableGraph> PageRank for IteratedPageRank<'_, G> {
    type Result = self::Result;

    fn calc(&self) -> Self::Result {
        let n = self.graph.vertex_size() as f64;
        let mut p = {
            let mut p = HashMap::with_hasher(ahash::RandomState::new());
            for v in self.graph.iter_vertices() {
                p.insert(v, 1.0 / n);
            }
            p
        };
        let mut delta = HashMap::with_hasher(ahash::RandomState::new());
        for round in 1..=self.max_rounds {
            // every new value comes from the previous round's snapshot
            let r = self.relax(&p);

            delta.clear();
            for v in self.graph.iter_vertices() {
                let a = p.get(&v).unwrap();
                let b = r.get(&v).unwrap();
                delta.insert(v, a - b);
            }
            p = r;

            if norm_inf(&delta) <= self.epsilon {
                return Self::Result {
                    page_rank: p,
                    delta,
                    rounds: round,
                    converged: true,
                };
            }
        }
        Self::Result {
            page_rank: p,
            delta,
            rounds: self.max_rounds,
            converged: false,
        }
    }
}

impl PageRankResult for self::Result {
    fn page_rank(&self) -> &HashMap<VertexId, f64, ahash::RandomState> {
        &self.page_rank
    }

    fn debug<'a, G: QueryableGraph>(&'a self, graph: &'a G) -> impl std::fmt::Debug + 'a {
        ResultDebug {
            graph,
            result: self,
        }
    }
}

pub struct ResultDebug<'a, G: QueryableGraph> {
    graph: &'a G,
    result: &'a self::Result,
}

impl<G: QueryableGraph> std::fmt::Debug for ResultDebug<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for v in self.graph.iter_vertices() {
            let p = self.result.page_rank.get(&v).unwrap();
            let d = self.result.delta.get(&v).unwrap();
            writeln!(f, "{v:?}: {p:?}, {d:?}")?;
        }
        Ok(())
    }
}
