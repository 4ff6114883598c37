use crate::embedding::{EmbeddingTrainer, NodeEmbedding, Word2VecArgs};
use crate::graph::GeneNetwork;
use crate::null_graph::generate_null_graph;
use crate::walker::{run_walks, walks_to_sentences, WalkArgs};

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_NREPS: usize = 3;

/// Similarity scores `1 - distance` collected from null graphs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NullDistribution {
    scores: Vec<f32>,
}

impl NullDistribution {
    pub fn from_scores(scores: Vec<f32>) -> Self {
        Self { scores }
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn append(&mut self, other: NullDistribution) {
        self.scores.extend(other.scores);
    }

    /// One-sided tail probability: the fraction of null scores at
    /// least as large as `similarity`. `None` if the null is empty.
    pub fn p_value(&self, similarity: f32) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let ntail = self.scores.iter().filter(|&&s| s >= similarity).count();
        Some(ntail as f64 / self.scores.len() as f64)
    }
}

/// Similarities `1 - distance` between every gene and its
/// `GO:annotation` neighbours. With cosine distances they lie in
/// `[-1, 1]`.
///
/// Genes without annotation edges contribute nothing; a gene annotated
/// twice to the same term contributes twice.
pub fn null_distribution<E: NodeEmbedding>(
    null_graph: &GeneNetwork,
    embedding: &E,
) -> anyhow::Result<NullDistribution> {
    let mut scores = vec![];
    for g in (0..null_graph.num_nodes()).filter(|&v| null_graph.is_gene(v)) {
        let go_terms: Vec<&str> = null_graph
            .go_annotation_neighbors(g)
            .into_iter()
            .map(|t| null_graph.node_name(t))
            .collect();

        if go_terms.is_empty() {
            continue;
        }

        let dist = embedding.distances(null_graph.node_name(g), &go_terms)?;
        scores.extend(dist.into_iter().map(|d| 1.0 - d));
    }
    Ok(NullDistribution { scores })
}

#[derive(Clone, Debug)]
pub struct NullArgs {
    /// number of null graphs
    pub nreps: usize,
    pub walk: WalkArgs,
    pub word2vec: Word2VecArgs,
    /// replicate `r` is seeded `seed + r`; `None` draws a fresh seed
    pub seed: Option<u64>,
}

impl Default for NullArgs {
    fn default() -> Self {
        Self {
            nreps: DEFAULT_NREPS,
            walk: WalkArgs::default(),
            word2vec: Word2VecArgs::default(),
            seed: None,
        }
    }
}

/// Build the null distribution from `args.nreps` independent null
/// graphs: null graph, walks, embedding, similarities.
pub fn simulate_null_distribution<T: EmbeddingTrainer>(
    graph: &GeneNetwork,
    trainer: &T,
    args: &NullArgs,
) -> anyhow::Result<NullDistribution> {
    args.walk.validate()?;
    if args.nreps == 0 {
        anyhow::bail!("need at least one null replicate");
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut ret = NullDistribution::default();

    for rep in 0..args.nreps {
        info!("Null replicate {}/{}", rep + 1, args.nreps);

        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(rep as u64));
        let null_graph = generate_null_graph(graph, &mut rng)?;

        let walk_args = WalkArgs {
            seed: Some(rng.random()),
            ..args.walk.clone()
        };
        let walks = run_walks(&null_graph, &walk_args)?;
        let sentences = walks_to_sentences(&null_graph, &walks);

        let model = trainer.train(&sentences, &args.word2vec)?;
        let null_rep = null_distribution(&null_graph, &model)?;
        info!("{} null similarities", null_rep.len());
        ret.append(null_rep);
    }

    Ok(ret)
}
