use fnv::FnvHashMap as HashMap;
use nalgebra::DVector;

/// Pairwise distances between embedded nodes, looked up by node name
pub trait NodeEmbedding {
    /// Cosine distance `1 - cos(a, b)`, in `[0, 2]`. Opposite vectors
    /// are at distance 2, so the similarity `1 - distance` can be
    /// negative.
    fn distance(&self, a: &str, b: &str) -> anyhow::Result<f32>;

    /// Distances from `node` to each of `others`, in order
    fn distances(&self, node: &str, others: &[&str]) -> anyhow::Result<Vec<f32>> {
        others.iter().map(|o| self.distance(node, o)).collect()
    }
}

/// Fits node embeddings on walk sentences
pub trait EmbeddingTrainer {
    type Model: NodeEmbedding;

    fn train(&self, sentences: &[Vec<Box<str>>], args: &Word2VecArgs) -> anyhow::Result<Self::Model>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Word2VecAlgorithm {
    SkipGram,
    Cbow,
}

/// Word2vec settings handed to an [`EmbeddingTrainer`]
#[derive(Clone, Debug)]
pub struct Word2VecArgs {
    pub algorithm: Word2VecAlgorithm,
    /// dimensionality of node vectors
    pub dimension: usize,
    /// context window; 1 keeps to directly connected nodes
    pub window: usize,
    /// ignore tokens seen fewer times than this
    pub min_count: usize,
    /// noise words per positive sample (0 = no negative sampling)
    pub negative: usize,
    /// downsampling threshold for frequent tokens (0 = off)
    pub sample: f32,
    pub workers: usize,
}

impl Default for Word2VecArgs {
    fn default() -> Self {
        Self {
            algorithm: Word2VecAlgorithm::SkipGram,
            dimension: 8,
            window: 1,
            min_count: 1,
            negative: 5,
            sample: 0.0,
            workers: 1,
        }
    }
}

/// Named node vectors with cosine distance `1 - cos(a, b)`
#[derive(Clone, Debug, Default)]
pub struct NodeVectors {
    vectors: HashMap<Box<str>, DVector<f32>>,
}

impl NodeVectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, vector: DVector<f32>) {
        self.vectors.insert(name.into(), vector);
    }

    pub fn get(&self, name: &str) -> Option<&DVector<f32>> {
        self.vectors.get(name)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    fn lookup(&self, name: &str) -> anyhow::Result<&DVector<f32>> {
        self.get(name)
            .ok_or(anyhow::anyhow!("{} not in vocabulary", name))
    }
}

impl NodeEmbedding for NodeVectors {
    fn distance(&self, a: &str, b: &str) -> anyhow::Result<f32> {
        let va = self.lookup(a)?;
        let vb = self.lookup(b)?;
        if va.len() != vb.len() {
            anyhow::bail!("vector sizes differ: {} vs {}", va.len(), vb.len());
        }

        let denom = va.norm() * vb.norm();
        let cos = if denom > 0.0 { va.dot(vb) / denom } else { 0.0 };
        Ok(1.0 - cos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cosine_distance() -> anyhow::Result<()> {
        let mut nv = NodeVectors::new();
        nv.insert("a", DVector::from_vec(vec![1.0, 0.0]));
        nv.insert("b", DVector::from_vec(vec![0.0, 2.0]));
        nv.insert("c", DVector::from_vec(vec![-3.0, 0.0]));

        assert_abs_diff_eq!(nv.distance("a", "a")?, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(nv.distance("a", "b")?, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(nv.distance("a", "c")?, 2.0, epsilon = 1e-6);

        let d = nv.distances("a", &["b", "c"])?;
        assert_eq!(d.len(), 2);
        assert!(nv.distance("a", "zzz").is_err());
        Ok(())
    }
}
