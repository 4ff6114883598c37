//! Degree-preserving randomization of a gene network.
//!
//! Gene-gene edges and gene → GO annotation edges are rewired by
//! (bipartite) configuration models and relabelled through random
//! bijections. Edges among GO terms are carried over unchanged.

use crate::graph::{GeneNetwork, GO_ANNOTATION, NO_LABEL};
use crate::partition::NodePartition;

use log::info;
use rand::prelude::SliceRandom;
use rand::Rng;

/// Random multigraph with the given degree sequence.
///
/// Every node `i` contributes `degrees[i]` stubs; the shuffled stubs
/// are paired off. Self-loops and parallel edges are kept.
///
/// * `degrees` - degree of each anonymous node `0..degrees.len()`
///
/// Returns the edge list over the anonymous nodes.
pub fn configuration_model<R: Rng>(
    degrees: &[usize],
    rng: &mut R,
) -> anyhow::Result<Vec<(usize, usize)>> {
    let total: usize = degrees.iter().sum();
    if total % 2 != 0 {
        anyhow::bail!("invalid degree sequence: odd sum {}", total);
    }

    let mut stubs = stub_list(degrees);
    stubs.shuffle(rng);

    let half = stubs.len() / 2;
    let (out_stubs, in_stubs) = stubs.split_at(half);
    Ok(out_stubs
        .iter()
        .copied()
        .zip(in_stubs.iter().copied())
        .collect())
}

/// Random bipartite multigraph with the given degree sequences.
///
/// Returns `(a, b)` pairs where `a` indexes `a_degrees` and `b`
/// indexes `b_degrees`.
pub fn bipartite_configuration_model<R: Rng>(
    a_degrees: &[usize],
    b_degrees: &[usize],
    rng: &mut R,
) -> anyhow::Result<Vec<(usize, usize)>> {
    let a_total: usize = a_degrees.iter().sum();
    let b_total: usize = b_degrees.iter().sum();
    if a_total != b_total {
        anyhow::bail!(
            "invalid bipartite degree sequences: sums {} and {} differ",
            a_total,
            b_total
        );
    }

    let mut a_stubs = stub_list(a_degrees);
    let mut b_stubs = stub_list(b_degrees);
    a_stubs.shuffle(rng);
    b_stubs.shuffle(rng);

    Ok(a_stubs.into_iter().zip(b_stubs).collect())
}

fn stub_list(degrees: &[usize]) -> Vec<usize> {
    degrees
        .iter()
        .enumerate()
        .flat_map(|(i, &d)| std::iter::repeat(i).take(d))
        .collect()
}

fn shuffled<R: Rng>(nodes: &[usize], rng: &mut R) -> Vec<usize> {
    let mut ret = nodes.to_vec();
    ret.shuffle(rng);
    ret
}

fn sorted_desc(mut degrees: Vec<usize>) -> Vec<usize> {
    degrees.sort_unstable_by(|a, b| b.cmp(a));
    degrees
}

/// Generate a null graph from `graph`.
///
/// 1. partition nodes into (annotated) genes and (annotated) GO terms
/// 2. rewire the gene-gene subgraph with a configuration model
/// 3. rewire `GO:annotation` edges with a bipartite configuration model
/// 4. add back the GO ontology edges unchanged
///
/// The result has the same nodes, at the same indices, as `graph`.
/// Degree multisets are preserved within the gene-gene subgraph and on
/// both sides of the annotation subgraph, but which node carries which
/// degree is randomized too.
pub fn generate_null_graph<R: Rng>(graph: &GeneNetwork, rng: &mut R) -> anyhow::Result<GeneNetwork> {
    let partition = NodePartition::from_network(graph);

    let genes = partition.all_genes();
    if genes.is_empty() {
        anyhow::bail!("degenerate network: no gene nodes");
    }
    if partition.annotated_genes.is_empty() {
        anyhow::bail!("degenerate network: no gene with a {} edge", GO_ANNOTATION);
    }
    if partition.annotated_go_terms.is_empty() {
        anyhow::bail!("degenerate network: no GO term with a {} edge", GO_ANNOTATION);
    }

    let mut null_graph = GeneNetwork::empty_like(graph);

    ///////////////////////////////
    // step 1: gene-gene edges   //
    ///////////////////////////////

    let gene_degrees = sorted_desc(
        genes
            .iter()
            .map(|&g| graph.neighbors(g).filter(|&n| graph.is_gene(n)).count())
            .collect(),
    );

    let gene_edges = configuration_model(&gene_degrees, rng)?;
    let gene_map = shuffled(&genes, rng);
    for &(a, b) in gene_edges.iter() {
        null_graph.add_edge(gene_map[a], gene_map[b], NO_LABEL)?;
    }

    /////////////////////////////////////
    // step 2: gene → GO annotations   //
    /////////////////////////////////////

    let annotation_degree = |v: usize, to_gene: bool| -> usize {
        graph
            .incident(v)
            .iter()
            .filter(|&&(n, e)| graph.edges()[e].is_go_annotation() && graph.is_gene(n) == to_gene)
            .count()
    };

    let anno_gene_degrees = sorted_desc(
        partition
            .annotated_genes
            .iter()
            .map(|&g| annotation_degree(g, false))
            .collect(),
    );
    let anno_go_degrees = sorted_desc(
        partition
            .annotated_go_terms
            .iter()
            .map(|&t| annotation_degree(t, true))
            .collect(),
    );

    let anno_edges = bipartite_configuration_model(&anno_gene_degrees, &anno_go_degrees, rng)?;
    let anno_gene_map = shuffled(&partition.annotated_genes, rng);
    let anno_go_map = shuffled(&partition.annotated_go_terms, rng);
    for &(a, b) in anno_edges.iter() {
        null_graph.add_edge(anno_gene_map[a], anno_go_map[b], GO_ANNOTATION)?;
    }

    ///////////////////////////////////
    // step 3: GO ontology, as is    //
    ///////////////////////////////////

    let mut n_ontology = 0;
    for edge in graph.edges() {
        if !graph.is_gene(edge.source) && !graph.is_gene(edge.target) {
            null_graph.add_edge(edge.source, edge.target, &edge.label)?;
            n_ontology += 1;
        }
    }

    info!(
        "Null graph: {} gene-gene, {} annotation, {} ontology edges",
        gene_edges.len(),
        anno_edges.len(),
        n_ontology
    );

    Ok(null_graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn configuration_model_keeps_degrees() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let degrees = vec![3, 2, 2, 1, 0];
        for _ in 0..20 {
            let edges = configuration_model(&degrees, &mut rng)?;
            assert_eq!(edges.len(), 4);
            let mut deg = vec![0; degrees.len()];
            for (a, b) in edges {
                deg[a] += 1;
                deg[b] += 1;
            }
            assert_eq!(deg, degrees);
        }
        Ok(())
    }

    #[test]
    fn odd_degree_sum_is_an_error() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(configuration_model(&[1, 1, 1], &mut rng).is_err());
    }

    #[test]
    fn bipartite_model_keeps_degrees() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let a = vec![2, 1, 1];
        let b = vec![3, 1];
        let edges = bipartite_configuration_model(&a, &b, &mut rng)?;
        let mut da = vec![0; a.len()];
        let mut db = vec![0; b.len()];
        for (i, j) in edges {
            da[i] += 1;
            db[j] += 1;
        }
        assert_eq!(da, a);
        assert_eq!(db, b);

        assert!(bipartite_configuration_model(&[1], &[2], &mut rng).is_err());
        Ok(())
    }
}
