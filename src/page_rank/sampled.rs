use super::*;
use crate::transition_model;
use algograph::graph::*;
use rand::{prelude::*, rngs::SmallRng};
use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
};

pub struct SampledPageRank<'a, G>
where
    G: QueryableGraph,
{
    graph: &'a G,
    samples: usize,
    rng: RefCell<SmallRng>,
    starts: Vec<VertexId>,
    transitions: HashMap<VertexId, Vec<(VertexId, f64)>, ahash::RandomState>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    pub samples: usize,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: 0.85,
            samples: 10000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Result {
    pub page_rank: HashMap<VertexId, f64, ahash::RandomState>,
    pub visits: HashMap<VertexId, u64, ahash::RandomState>,
}

impl<'a, G: QueryableGraph> SampledPageRank<'a, G> {
    pub fn new(g: &'a G, config: &Config) -> Self {
        let damping = config.damping;
        assert!(damping > 0.0 && damping < 1.0, "damping={damping}");
        let samples = config.samples;
        assert!(samples >= 1, "samples={samples}");
        assert!(g.vertex_size() > 0, "vertex size={}", g.vertex_size());

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let starts = {
            let mut starts: Vec<_> = g.iter_vertices().collect();
            starts.sort();
            starts
        };
        /*
        Each row keeps running sums of the transition probabilities in
        VertexId order, so one step is a uniform sample against the row
        total plus a binary search. The fixed order makes a seeded run
        replay the exact same walk.
         */
        let transitions = {
            let mut transitions = HashMap::with_hasher(ahash::RandomState::new());
            for u in starts.iter() {
                let dist: BTreeMap<_, _> = transition_model(g, *u, damping).into_iter().collect();
                let mut row = Vec::with_capacity(dist.len());
                let mut total = 0.0;
                for (v, w) in dist {
                    total += w;
                    row.push((v, total));
                }
                transitions.insert(*u, row);
            }
            transitions
        };
        Self {
            graph: g,
            samples,
            rng: RefCell::new(rng),
            starts,
            transitions,
        }
    }

    fn step(&self, u: VertexId, rng: &mut SmallRng) -> VertexId {
        let row = self.transitions.get(&u).unwrap();
        let (_, total) = row.last().unwrap();
        let x = rng.random::<f64>() * total;
        let at = row.partition_point(|(_, acc)| *acc <= x);
        row[at.min(row.len() - 1)].0
    }
}

impl<G: QueryableGraph> PageRank for SampledPageRank<'_, G> {
    type Result = self::Result;

    fn calc(&self) -> Self::Result {
        let mut rng = self.rng.borrow_mut();
        let mut visits = {
            let mut visits = HashMap::with_hasher(ahash::RandomState::new());
            for v in self.graph.iter_vertices() {
                visits.insert(v, 0u64);
            }
            visits
        };
        let mut current = *self.starts.choose(&mut *rng).unwrap();
        *visits.get_mut(&current).unwrap() += 1;
        for _ in 1..self.samples {
            current = self.step(current, &mut rng);
            *visits.get_mut(&current).unwrap() += 1;
        }

        let page_rank = visits
            .iter()
            .map(|(v, c)| (*v, *c as f64 / self.samples as f64))
            .collect();
        Self::Result { page_rank, visits }
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
            let c = self.result.visits.get(&v).unwrap();
            writeln!(f, "{v:?}: {p:?}, {c:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::norm_1;
    use quickcheck_macros::quickcheck;

    #[test]
    fn tracks_the_stationary_distribution() {
        let (g, [v1, v2, v3]) = tiny_web();
        let cfg = Config {
            seed: Some(3407),
            ..Config::default()
        };
        let res = SampledPageRank::new(&g, &cfg).calc();
        assert_eq!(res.page_rank.len(), 3);
        assert!((res.page_rank.get(&v1).unwrap() - 0.05).abs() < 0.01, "{res:?}");
        assert!((res.page_rank.get(&v2).unwrap() - 0.475).abs() < 0.01, "{res:?}");
        assert!((res.page_rank.get(&v3).unwrap() - 0.475).abs() < 0.01, "{res:?}");
    }

    #[test]
    fn visits_add_up_to_the_sample_count() {
        let (g, _) = tiny_web();
        let cfg = Config {
            samples: 1000,
            seed: Some(7),
            ..Config::default()
        };
        let res = SampledPageRank::new(&g, &cfg).calc();
        let total: u64 = res.visits.values().sum();
        assert_eq!(total, 1000);
        assert!((norm_1(&res.page_rank) - 1.0).abs() < 1e-12, "{res:?}");
    }

    #[test]
    fn seeded_runs_replay() {
        let (g, _) = tiny_web();
        let cfg = Config {
            samples: 500,
            seed: Some(42),
            ..Config::default()
        };
        let a = SampledPageRank::new(&g, &cfg).calc();
        let b = SampledPageRank::new(&g, &cfg).calc();
        assert_eq!(a.visits, b.visits);
    }

    #[test]
    fn single_sample_is_the_start_page() {
        let (g, _) = tiny_web();
        let cfg = Config {
            samples: 1,
            seed: Some(0),
            ..Config::default()
        };
        let res = SampledPageRank::new(&g, &cfg).calc();
        let total: u64 = res.visits.values().sum();
        assert_eq!(total, 1);
        let ranked: Vec<_> = res.page_rank.values().filter(|w| **w == 1.0).collect();
        assert_eq!(ranked.len(), 1, "{res:?}");
    }

    #[test]
    fn walks_through_dangling_pages() {
        let (g, _) = chain_with_dangling_tail();
        let cfg = Config {
            samples: 2000,
            seed: Some(1),
            ..Config::default()
        };
        let res = SampledPageRank::new(&g, &cfg).calc();
        assert!((norm_1(&res.page_rank) - 1.0).abs() < 1e-12, "{res:?}");
        res.page_rank
            .values()
            .for_each(|w| assert!(*w > 0.0, "{res:?}"));
    }

    #[quickcheck]
    fn ranks_form_a_distribution(g: RandomGraph, seed: u64) {
        let g = &g.graph;
        let cfg = Config {
            samples: 200,
            seed: Some(seed),
            ..Config::default()
        };
        let res = SampledPageRank::new(g, &cfg).calc();
        assert_eq!(res.page_rank.len(), g.vertex_size());
        assert!((norm_1(&res.page_rank) - 1.0).abs() < 1e-9, "{res:?}");
    }
}
