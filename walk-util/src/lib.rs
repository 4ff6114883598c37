//! Biased random walks and degree-preserving null graphs over gene
//! networks.
//!
//! A gene network mixes gene and GO term nodes; genes link to the GO
//! terms they are annotated with through `GO:annotation` edges. Walks
//! sampled here feed a word2vec-style trainer, and the null graphs give
//! the reference distribution of gene-to-GO similarities that observed
//! similarities are tested against.

/// Typed multigraph of genes and GO terms
pub mod graph;

/// Second-order (p, q) transition probabilities
pub mod transition;

/// Walk sampling, sequential or on a worker pool
pub mod walker;

/// Gene / GO term node classes
pub mod partition;

/// Configuration-model null graphs
pub mod null_graph;

/// Embedding trainer and distance interfaces
pub mod embedding;

/// Null similarity distribution
pub mod null_distribution;

pub use embedding::{EmbeddingTrainer, NodeEmbedding, NodeVectors, Word2VecAlgorithm, Word2VecArgs};
pub use graph::{Edge, GeneNetwork, NodeKind, GO_ANNOTATION, NO_LABEL};
pub use null_distribution::{null_distribution, simulate_null_distribution, NullArgs, NullDistribution};
pub use null_graph::generate_null_graph;
pub use partition::NodePartition;
pub use transition::{Transition, TransitionTable};
pub use walker::{
    generate_walks, num_walks, run_walks, sample_walk, walks_to_sentences, Walk, WalkArgs,
};
