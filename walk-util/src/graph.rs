use fnv::{FnvHashMap as HashMap, FnvHashSet as HashSet};

/// Edge label marking a gene → GO term annotation
pub const GO_ANNOTATION: &str = "GO:annotation";

/// Edge label used when the source did not provide one
pub const NO_LABEL: &str = "NA";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Gene,
    GoTerm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub label: Box<str>,
}

impl Edge {
    pub fn is_go_annotation(&self) -> bool {
        self.label.as_ref() == GO_ANNOTATION
    }
}

/// Undirected multigraph over named, typed nodes.
///
/// Node indices are dense (`0..num_nodes()`) and stable; edges are kept
/// in insertion order. Each node keeps one adjacency entry per incident
/// edge endpoint, so parallel edges show up as repeated neighbours and a
/// self-loop shows up twice. `degree(v)` is therefore the usual multigraph
/// degree.
#[derive(Clone, Debug, Default)]
pub struct GeneNetwork {
    names: Vec<Box<str>>,
    kinds: Vec<NodeKind>,
    name_to_index: HashMap<Box<str>, usize>,
    edges: Vec<Edge>,
    /// adjacency[v] = [(neighbour, edge index)]
    adjacency: Vec<Vec<(usize, usize)>>,
    /// unordered pairs (lo, hi) with at least one edge
    connected: HashSet<(usize, usize)>,
}

impl GeneNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// A network with the same nodes (same indices, names and kinds) and
    /// no edges.
    pub fn empty_like(other: &GeneNetwork) -> Self {
        Self {
            names: other.names.clone(),
            kinds: other.kinds.clone(),
            name_to_index: other.name_to_index.clone(),
            edges: vec![],
            adjacency: vec![vec![]; other.names.len()],
            connected: HashSet::default(),
        }
    }

    /// Add a node, or return the index of an existing node with the
    /// same name. Re-adding a name with a different kind is an error.
    pub fn add_node(&mut self, name: &str, kind: NodeKind) -> anyhow::Result<usize> {
        if let Some(&idx) = self.name_to_index.get(name) {
            if self.kinds[idx] != kind {
                anyhow::bail!(
                    "node {} already exists as {:?}, not {:?}",
                    name,
                    self.kinds[idx],
                    kind
                );
            }
            return Ok(idx);
        }

        let idx = self.names.len();
        let name: Box<str> = name.into();
        self.name_to_index.insert(name.clone(), idx);
        self.names.push(name);
        self.kinds.push(kind);
        self.adjacency.push(vec![]);
        Ok(idx)
    }

    /// Add an undirected edge between two existing nodes and return its
    /// edge index.
    pub fn add_edge(&mut self, source: usize, target: usize, label: &str) -> anyhow::Result<usize> {
        let nn = self.num_nodes();
        if source >= nn || target >= nn {
            anyhow::bail!(
                "edge ({}, {}) out of range for {} nodes",
                source,
                target,
                nn
            );
        }

        let e = self.edges.len();
        self.edges.push(Edge {
            source,
            target,
            label: label.into(),
        });

        self.adjacency[source].push((target, e));
        self.adjacency[target].push((source, e));
        self.connected.insert(ordered_pair(source, target));
        Ok(e)
    }

    pub fn add_edge_by_name(&mut self, source: &str, target: &str, label: &str) -> anyhow::Result<usize> {
        let s = self
            .index_of(source)
            .ok_or(anyhow::anyhow!("unknown node: {}", source))?;
        let t = self
            .index_of(target)
            .ok_or(anyhow::anyhow!("unknown node: {}", target))?;
        self.add_edge(s, t, label)
    }

    pub fn num_nodes(&self) -> usize {
        self.names.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_genes(&self) -> usize {
        self.kinds.iter().filter(|&&k| k == NodeKind::Gene).count()
    }

    pub fn num_go_terms(&self) -> usize {
        self.kinds.iter().filter(|&&k| k == NodeKind::GoTerm).count()
    }

    pub fn num_go_annotations(&self) -> usize {
        self.edges.iter().filter(|e| e.is_go_annotation()).count()
    }

    pub fn node_name(&self, node: usize) -> &str {
        &self.names[node]
    }

    pub fn node_names(&self) -> &[Box<str>] {
        &self.names
    }

    pub fn node_kind(&self, node: usize) -> NodeKind {
        self.kinds[node]
    }

    pub fn is_gene(&self, node: usize) -> bool {
        self.kinds[node] == NodeKind::Gene
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Incident `(neighbour, edge index)` pairs of a node
    pub fn incident(&self, node: usize) -> &[(usize, usize)] {
        &self.adjacency[node]
    }

    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[node].iter().map(|&(n, _)| n)
    }

    /// Neighbours without repetition, in first-seen order
    pub fn distinct_neighbors(&self, node: usize) -> Vec<usize> {
        let mut seen = HashSet::default();
        self.neighbors(node).filter(|n| seen.insert(*n)).collect()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.connected.contains(&ordered_pair(a, b))
    }

    /// Whether any edge incident on `node` is a GO annotation
    pub fn has_go_annotation(&self, node: usize) -> bool {
        self.adjacency[node]
            .iter()
            .any(|&(_, e)| self.edges[e].is_go_annotation())
    }

    /// Neighbours reached through GO annotation edges, one entry per edge
    pub fn go_annotation_neighbors(&self, node: usize) -> Vec<usize> {
        self.adjacency[node]
            .iter()
            .filter(|&&(_, e)| self.edges[e].is_go_annotation())
            .map(|&(n, _)| n)
            .collect()
    }
}

fn ordered_pair(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multigraph_degrees() -> anyhow::Result<()> {
        let mut g = GeneNetwork::new();
        let a = g.add_node("A", NodeKind::Gene)?;
        let b = g.add_node("B", NodeKind::Gene)?;
        let go = g.add_node("GO:0001", NodeKind::GoTerm)?;

        g.add_edge(a, b, NO_LABEL)?;
        g.add_edge(a, b, NO_LABEL)?;
        g.add_edge(a, a, NO_LABEL)?;
        g.add_edge(a, go, GO_ANNOTATION)?;

        assert_eq!(g.degree(a), 5);
        assert_eq!(g.degree(b), 2);
        assert_eq!(g.degree(go), 1);
        assert_eq!(g.distinct_neighbors(a), vec![b, a, go]);
        assert!(g.has_edge(b, a));
        assert!(!g.has_edge(b, go));
        assert_eq!(g.go_annotation_neighbors(a), vec![go]);
        assert!(g.has_go_annotation(go));
        assert!(!g.has_go_annotation(b));
        Ok(())
    }

    #[test]
    fn node_kind_conflict() -> anyhow::Result<()> {
        let mut g = GeneNetwork::new();
        let a = g.add_node("A", NodeKind::Gene)?;
        assert_eq!(g.add_node("A", NodeKind::Gene)?, a);
        assert!(g.add_node("A", NodeKind::GoTerm).is_err());
        assert!(g.add_edge_by_name("A", "missing", NO_LABEL).is_err());
        Ok(())
    }

    #[test]
    fn empty_like_keeps_nodes() -> anyhow::Result<()> {
        let mut g = GeneNetwork::new();
        g.add_node("A", NodeKind::Gene)?;
        g.add_node("GO:1", NodeKind::GoTerm)?;
        g.add_edge_by_name("A", "GO:1", GO_ANNOTATION)?;

        let h = GeneNetwork::empty_like(&g);
        assert_eq!(h.num_nodes(), 2);
        assert_eq!(h.num_edges(), 0);
        assert_eq!(h.index_of("GO:1"), Some(1));
        assert_eq!(h.node_kind(1), NodeKind::GoTerm);
        Ok(())
    }
}
