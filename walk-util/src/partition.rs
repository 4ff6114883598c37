use crate::graph::{GeneNetwork, NodeKind};

/// Four-way split of the nodes of a gene network.
///
/// Annotated nodes are those with at least one incident
/// `GO:annotation` edge; the four lists are disjoint and each is in
/// node index order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodePartition {
    pub genes: Vec<usize>,
    pub annotated_genes: Vec<usize>,
    pub go_terms: Vec<usize>,
    pub annotated_go_terms: Vec<usize>,
}

impl NodePartition {
    pub fn from_network(graph: &GeneNetwork) -> Self {
        let mut ret = NodePartition::default();
        for v in 0..graph.num_nodes() {
            let annotated = graph.has_go_annotation(v);
            match (graph.node_kind(v), annotated) {
                (NodeKind::Gene, false) => ret.genes.push(v),
                (NodeKind::Gene, true) => ret.annotated_genes.push(v),
                (NodeKind::GoTerm, false) => ret.go_terms.push(v),
                (NodeKind::GoTerm, true) => ret.annotated_go_terms.push(v),
            }
        }
        ret
    }

    /// Every gene node, annotated or not
    pub fn all_genes(&self) -> Vec<usize> {
        merge_sorted(&self.genes, &self.annotated_genes)
    }

    /// Every GO term node, annotated or not
    pub fn all_go_terms(&self) -> Vec<usize> {
        merge_sorted(&self.go_terms, &self.annotated_go_terms)
    }
}

fn merge_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut ret = Vec::with_capacity(a.len() + b.len());
    ret.extend_from_slice(a);
    ret.extend_from_slice(b);
    ret.sort_unstable();
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GO_ANNOTATION, NO_LABEL};

    #[test]
    fn four_way_split() -> anyhow::Result<()> {
        let mut g = GeneNetwork::new();
        g.add_node("A", NodeKind::Gene)?;
        g.add_node("B", NodeKind::Gene)?;
        g.add_node("GO:1", NodeKind::GoTerm)?;
        g.add_node("GO:2", NodeKind::GoTerm)?;
        g.add_node("C", NodeKind::Gene)?;

        g.add_edge_by_name("A", "B", NO_LABEL)?;
        g.add_edge_by_name("C", "GO:1", GO_ANNOTATION)?;
        g.add_edge_by_name("GO:1", "GO:2", "GO:is_a")?;

        let part = NodePartition::from_network(&g);
        assert_eq!(part.genes, vec![0, 1]);
        assert_eq!(part.annotated_genes, vec![4]);
        assert_eq!(part.go_terms, vec![3]);
        assert_eq!(part.annotated_go_terms, vec![2]);
        assert_eq!(part.all_genes(), vec![0, 1, 4]);
        assert_eq!(part.all_go_terms(), vec![2, 3]);
        Ok(())
    }
}
