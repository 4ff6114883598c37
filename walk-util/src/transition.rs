use crate::graph::GeneNetwork;

use fnv::FnvHashMap as HashMap;
use indicatif::ParallelProgressIterator;
use log::info;
use rayon::prelude::*;

/// Next-step options for one `(current, previous)` state
#[derive(Clone, Debug)]
pub struct Transition {
    /// one entry per incident edge of the current node
    pub neighbors: Vec<usize>,
    /// normalized probabilities, parallel to `neighbors`
    pub probs: Vec<f64>,
}

impl Transition {
    /// Pick the first neighbour whose cumulative probability exceeds
    /// `r`, a uniform draw in `[0, 1)`.
    ///
    /// Falls back to the last neighbour when rounding leaves the total
    /// mass just below `r`. Returns `None` only for a node without
    /// neighbours.
    pub fn choose(&self, r: f64) -> Option<usize> {
        let mut cum = 0.0;
        for (&n, &prob) in self.neighbors.iter().zip(self.probs.iter()) {
            cum += prob;
            if r < cum {
                return Some(n);
            }
        }
        self.neighbors.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

/// Second-order transition probabilities of a node2vec-style walk.
///
/// Keys are `(current, previous)` where `previous` is `None` at the
/// start of a walk. Unnormalized weights over the neighbours `n` of
/// `current`, given `previous = m`:
///
/// * `1/p` if `n == m` (return)
/// * `1` if `n` is also adjacent to `m` (stay close)
/// * `1/q` otherwise (move outward)
///
/// The first step of a walk is uniform over neighbours.
#[derive(Clone, Debug)]
pub struct TransitionTable {
    p: f64,
    q: f64,
    table: HashMap<(usize, Option<usize>), Transition>,
}

/// Both walk biases must be finite and strictly positive
pub fn check_bias(p: f64, q: f64) -> anyhow::Result<()> {
    if !(p.is_finite() && p > 0.0) {
        anyhow::bail!("return parameter p must be strictly positive, got {}", p);
    }
    if !(q.is_finite() && q > 0.0) {
        anyhow::bail!("in-out parameter q must be strictly positive, got {}", q);
    }
    Ok(())
}

impl TransitionTable {
    /// Precompute transitions for every node and every possible
    /// predecessor (distinct neighbours plus the walk start).
    ///
    /// * `graph` - gene network
    /// * `p` - return parameter
    /// * `q` - in-out parameter
    pub fn build(graph: &GeneNetwork, p: f64, q: f64) -> anyhow::Result<Self> {
        check_bias(p, q)?;

        let nn = graph.num_nodes();
        info!(
            "Building transition table: {} nodes, {} edges, p={}, q={}",
            nn,
            graph.num_edges(),
            p,
            q
        );

        let table: HashMap<(usize, Option<usize>), Transition> = (0..nn)
            .into_par_iter()
            .progress_count(nn as u64)
            .flat_map_iter(|current| {
                std::iter::once(None)
                    .chain(graph.distinct_neighbors(current).into_iter().map(Some))
                    .map(move |previous| {
                        (
                            (current, previous),
                            transition_probs(graph, current, previous, p, q),
                        )
                    })
            })
            .collect();

        info!("{} transition states", table.len());

        Ok(Self { p, q, table })
    }

    pub fn get(&self, current: usize, previous: Option<usize>) -> Option<&Transition> {
        self.table.get(&(current, previous))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(usize, Option<usize>), &Transition)> {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn q(&self) -> f64 {
        self.q
    }
}

fn transition_probs(
    graph: &GeneNetwork,
    current: usize,
    previous: Option<usize>,
    p: f64,
    q: f64,
) -> Transition {
    let neighbors: Vec<usize> = graph.neighbors(current).collect();

    let weights: Vec<f64> = match previous {
        None => vec![1.0; neighbors.len()],
        Some(m) => neighbors
            .iter()
            .map(|&n| {
                if n == m {
                    1.0 / p
                } else if graph.has_edge(m, n) {
                    1.0
                } else {
                    1.0 / q
                }
            })
            .collect(),
    };

    let denom: f64 = weights.iter().sum();
    let probs = if denom > 0.0 {
        weights.into_iter().map(|w| w / denom).collect()
    } else {
        weights
    };

    Transition { neighbors, probs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeKind, NO_LABEL};
    use approx::assert_abs_diff_eq;

    /// triangle a-b-c with a tail c-d
    fn triangle_with_tail() -> anyhow::Result<GeneNetwork> {
        let mut g = GeneNetwork::new();
        for x in ["a", "b", "c", "d"] {
            g.add_node(x, NodeKind::Gene)?;
        }
        for (s, t) in [("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")] {
            g.add_edge_by_name(s, t, NO_LABEL)?;
        }
        Ok(g)
    }

    #[test]
    fn biased_weights() -> anyhow::Result<()> {
        let g = triangle_with_tail()?;
        let (p, q) = (2.0, 0.5);
        let table = TransitionTable::build(&g, p, q)?;

        // at c coming from a: back to a (1/p), b shared with a (1), d outward (1/q)
        let tr = table.get(2, Some(0)).unwrap();
        let mut expected = vec![];
        for &n in tr.neighbors.iter() {
            expected.push(match n {
                0 => 1.0 / p,
                1 => 1.0,
                3 => 1.0 / q,
                _ => unreachable!(),
            });
        }
        let denom: f64 = expected.iter().sum();
        for (prob, w) in tr.probs.iter().zip(expected) {
            assert_abs_diff_eq!(*prob, w / denom, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn start_state_is_uniform() -> anyhow::Result<()> {
        let g = triangle_with_tail()?;
        let table = TransitionTable::build(&g, 4.0, 0.25)?;
        let tr = table.get(2, None).unwrap();
        assert_eq!(tr.neighbors.len(), 3);
        for prob in tr.probs.iter() {
            assert_abs_diff_eq!(*prob, 1.0 / 3.0, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn number_of_states() -> anyhow::Result<()> {
        let g = triangle_with_tail()?;
        let table = TransitionTable::build(&g, 1.0, 1.0)?;
        // one start state per node plus one state per (node, neighbour)
        assert_eq!(table.len(), 4 + 2 + 2 + 3 + 1);
        assert!(table.get(3, Some(0)).is_none());
        Ok(())
    }

    #[test]
    fn reject_non_positive_bias() {
        let g = GeneNetwork::new();
        assert!(TransitionTable::build(&g, 0.0, 1.0).is_err());
        assert!(TransitionTable::build(&g, 1.0, -1.0).is_err());
        assert!(TransitionTable::build(&g, f64::NAN, 1.0).is_err());
        assert!(TransitionTable::build(&g, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn choose_by_cumulative_sum() {
        let tr = Transition {
            neighbors: vec![7, 8, 9],
            probs: vec![0.2, 0.3, 0.5],
        };
        assert_eq!(tr.choose(0.0), Some(7));
        assert_eq!(tr.choose(0.19), Some(7));
        assert_eq!(tr.choose(0.2), Some(8));
        assert_eq!(tr.choose(0.6), Some(9));
        assert_eq!(tr.choose(1.0), Some(9));

        let empty = Transition {
            neighbors: vec![],
            probs: vec![],
        };
        assert_eq!(empty.choose(0.5), None);
    }
}
