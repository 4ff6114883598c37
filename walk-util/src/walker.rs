use crate::graph::GeneNetwork;
use crate::transition::{check_bias, TransitionTable};

use indicatif::{ParallelProgressIterator, ProgressStyle};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

pub const DEFAULT_WALK_LENGTH: usize = 10;
pub const DEFAULT_NITER: usize = 100;

/// Node indices visited by one walk, start node first
pub type Walk = Vec<usize>;

#[derive(Clone, Debug)]
pub struct WalkArgs {
    /// number of nodes per walk (including the start node)
    pub length: usize,
    /// walks per node = `niter × degree`
    pub niter: usize,
    /// return parameter
    pub p: f64,
    /// in-out parameter
    pub q: f64,
    /// 1 = sequential; otherwise the size of a dedicated thread pool
    pub workers: usize,
    /// `None` draws a fresh seed from the thread-local generator
    pub seed: Option<u64>,
}

impl Default for WalkArgs {
    fn default() -> Self {
        Self {
            length: DEFAULT_WALK_LENGTH,
            niter: DEFAULT_NITER,
            p: 1.0,
            q: 1.0,
            workers: 1,
            seed: None,
        }
    }
}

impl WalkArgs {
    pub fn validate(&self) -> anyhow::Result<()> {
        check_bias(self.p, self.q)?;
        if self.workers == 0 {
            anyhow::bail!("need at least one worker");
        }
        Ok(())
    }
}

/// Sample a single walk of `length` nodes starting at `start`.
///
/// A walk that reaches a state with no transition entry, or a node
/// without neighbours, before `length` nodes is an error. On an
/// undirected graph this only happens when the table was built for a
/// different graph or `start` is isolated.
pub fn sample_walk<R: Rng>(
    start: usize,
    table: &TransitionTable,
    length: usize,
    rng: &mut R,
) -> anyhow::Result<Walk> {
    let mut walk = Vec::with_capacity(length);
    if length == 0 {
        return Ok(walk);
    }
    walk.push(start);

    let mut previous: Option<usize> = None;
    let mut current = start;

    for step in 1..length {
        let next = table
            .get(current, previous)
            .and_then(|tr| tr.choose(rng.random::<f64>()))
            .ok_or_else(|| {
                anyhow::anyhow!("stalled walk at node {} after {} steps", current, step)
            })?;

        walk.push(next);
        previous = Some(current);
        current = next;
    }

    Ok(walk)
}

/// Number of walks started from `node`: `niter × degree`
pub fn walks_per_node(graph: &GeneNetwork, node: usize, niter: usize) -> anyhow::Result<usize> {
    let degree = graph.degree(node);
    niter.checked_mul(degree).ok_or_else(|| {
        anyhow::anyhow!("walk count overflows: niter {} × degree {}", niter, degree)
    })
}

/// Total number of walks over all nodes
pub fn num_walks(graph: &GeneNetwork, niter: usize) -> anyhow::Result<usize> {
    (0..graph.num_nodes()).try_fold(0_usize, |acc, v| {
        acc.checked_add(walks_per_node(graph, v, niter)?)
            .ok_or_else(|| anyhow::anyhow!("walk count overflows with niter {}", niter))
    })
}

/// Every start node repeated `niter × degree` times, in node order
pub fn start_nodes(graph: &GeneNetwork, niter: usize) -> anyhow::Result<Vec<usize>> {
    let mut starts = Vec::with_capacity(num_walks(graph, niter)?);
    for v in 0..graph.num_nodes() {
        starts.extend(std::iter::repeat(v).take(walks_per_node(graph, v, niter)?));
    }
    Ok(starts)
}

/// Build the transition table from `args.p`, `args.q` and generate
/// the full walk corpus.
pub fn run_walks(graph: &GeneNetwork, args: &WalkArgs) -> anyhow::Result<Vec<Walk>> {
    args.validate()?;
    let table = TransitionTable::build(graph, args.p, args.q)?;
    generate_walks(graph, &table, args)
}

/// Generate `niter × degree(v)` walks from every node `v`.
///
/// The biases come from `table`; `args.p` and `args.q` are not
/// consulted here. With `workers == 1` nodes are visited in index
/// order on the calling thread. Otherwise the start nodes are split
/// into chunks that run on a pool of `workers` threads, each chunk
/// with its own generator seeded `seed + chunk`. Either way the
/// corpus is reproducible for a fixed seed, and any failed walk fails
/// the whole call.
pub fn generate_walks(
    graph: &GeneNetwork,
    table: &TransitionTable,
    args: &WalkArgs,
) -> anyhow::Result<Vec<Walk>> {
    if args.workers == 0 {
        anyhow::bail!("need at least one worker");
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    debug!("walk seed: {}", seed);

    let timer = Instant::now();
    info!(
        "Running random walks (p = {}, q = {}, length {}, niter {})...",
        table.p(),
        table.q(),
        args.length,
        args.niter
    );

    let walks = if args.workers == 1 {
        generate_walks_sequential(graph, table, args, seed, &timer)?
    } else {
        generate_walks_parallel(graph, table, args, seed, &timer)?
    };

    info!(
        "Running random walks done in {:.2}s: {} walks",
        timer.elapsed().as_secs_f32(),
        walks.len()
    );
    Ok(walks)
}

fn generate_walks_sequential(
    graph: &GeneNetwork,
    table: &TransitionTable,
    args: &WalkArgs,
    seed: u64,
    timer: &Instant,
) -> anyhow::Result<Vec<Walk>> {
    let nn = graph.num_nodes();
    let total = num_walks(graph, args.niter)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut walks = Vec::with_capacity(total);

    for node in 0..nn {
        for _ in 0..walks_per_node(graph, node, args.niter)? {
            walks.push(sample_walk(node, table, args.length, &mut rng)?);
        }
        if (node + 1) % 100 == 0 {
            info!(
                "Walks for {}/{} nodes complete in {:.2}s",
                node + 1,
                nn,
                timer.elapsed().as_secs_f32()
            );
        }
    }
    Ok(walks)
}

fn generate_walks_parallel(
    graph: &GeneNetwork,
    table: &TransitionTable,
    args: &WalkArgs,
    seed: u64,
    timer: &Instant,
) -> anyhow::Result<Vec<Walk>> {
    let starts = start_nodes(graph, args.niter)?;
    let total = starts.len();
    if total == 0 {
        return Ok(vec![]);
    }

    // ~90% of the work spread evenly; the remainder forms a tail chunk
    let chunk_size = ((0.9 * total as f64 / args.workers as f64).floor() as usize).max(1);
    let chunks: Vec<&[usize]> = starts.chunks(chunk_size).collect();
    info!(
        "{} walks in {} chunks of {} on {} workers",
        total,
        chunks.len(),
        chunk_size,
        args.workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.workers)
        .build()?;

    let pb_style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} chunks")?;

    let ndone = AtomicUsize::new(0);
    let length = args.length;

    let batches = pool.install(|| {
        chunks
            .par_iter()
            .enumerate()
            .progress_with_style(pb_style)
            .map(|(i, chunk)| -> anyhow::Result<Vec<Walk>> {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                let batch = chunk
                    .iter()
                    .map(|&s| sample_walk(s, table, length, &mut rng))
                    .collect::<anyhow::Result<Vec<_>>>()?;

                let done = ndone.fetch_add(batch.len(), Ordering::Relaxed) + batch.len();
                info!(
                    "{}/{} walks complete in {:.2}s",
                    done,
                    total,
                    timer.elapsed().as_secs_f32()
                );
                Ok(batch)
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    Ok(batches.into_iter().flatten().collect())
}

/// Replace node indices by node names, the tokens an embedding
/// trainer consumes
pub fn walks_to_sentences(graph: &GeneNetwork, walks: &[Walk]) -> Vec<Vec<Box<str>>> {
    walks
        .iter()
        .map(|w| w.iter().map(|&v| graph.node_names()[v].clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeKind, NO_LABEL};

    fn path3() -> anyhow::Result<GeneNetwork> {
        let mut g = GeneNetwork::new();
        for x in ["x", "y", "z"] {
            g.add_node(x, NodeKind::Gene)?;
        }
        g.add_edge_by_name("x", "y", NO_LABEL)?;
        g.add_edge_by_name("y", "z", NO_LABEL)?;
        Ok(g)
    }

    #[test]
    fn walk_has_requested_length() -> anyhow::Result<()> {
        let g = path3()?;
        let table = TransitionTable::build(&g, 1.0, 1.0)?;
        let mut rng = StdRng::seed_from_u64(1);

        assert!(sample_walk(0, &table, 0, &mut rng)?.is_empty());
        assert_eq!(sample_walk(0, &table, 1, &mut rng)?, vec![0]);

        let walk = sample_walk(0, &table, 25, &mut rng)?;
        assert_eq!(walk.len(), 25);
        // path graph: every step moves to an adjacent node
        for w in walk.windows(2) {
            assert!(g.has_edge(w[0], w[1]));
        }
        Ok(())
    }

    #[test]
    fn stalled_walk_is_an_error() -> anyhow::Result<()> {
        let g = path3()?;
        let mut isolated = GeneNetwork::empty_like(&g);
        isolated.add_node("w", NodeKind::Gene)?;
        let table = TransitionTable::build(&isolated, 1.0, 1.0)?;
        let mut rng = StdRng::seed_from_u64(1);

        let err = sample_walk(3, &table, 3, &mut rng).unwrap_err();
        assert!(err.to_string().contains("stalled"));
        Ok(())
    }

    #[test]
    fn start_nodes_follow_degree() -> anyhow::Result<()> {
        let g = path3()?;
        assert_eq!(start_nodes(&g, 2)?, vec![0, 0, 1, 1, 1, 1, 2, 2]);
        assert_eq!(num_walks(&g, 2)?, 8);
        assert_eq!(walks_per_node(&g, 1, 3)?, 6);
        Ok(())
    }

    #[test]
    fn walk_count_overflow_is_an_error() -> anyhow::Result<()> {
        let g = path3()?;
        let err = walks_per_node(&g, 1, usize::MAX).unwrap_err();
        assert!(err.to_string().contains("overflows"));
        assert!(num_walks(&g, usize::MAX / 2).is_err());
        assert!(start_nodes(&g, usize::MAX).is_err());
        Ok(())
    }

    #[test]
    fn invalid_args() {
        let args = WalkArgs {
            workers: 0,
            ..Default::default()
        };
        assert!(args.validate().is_err());

        let args = WalkArgs {
            q: 0.0,
            ..Default::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn sentences_use_node_names() -> anyhow::Result<()> {
        let g = path3()?;
        let sentences = walks_to_sentences(&g, &[vec![0, 1, 2]]);
        assert_eq!(sentences[0].iter().map(|s| s.as_ref()).collect::<Vec<_>>(), ["x", "y", "z"]);
        Ok(())
    }
}
