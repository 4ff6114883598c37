use crate::common_io::{read_lines_of_words_delim, write_types};

use log::info;
use std::fmt;
use walk_util::graph::{Edge, GeneNetwork, NodeKind, NO_LABEL};
use walk_util::walker::Walk;

pub const EDGE_DELIMITERS: [char; 3] = ['\t', ',', ' '];

/// GO identifiers look like `GO:0008150`
fn node_kind_of(name: &str) -> NodeKind {
    if name.starts_with("GO:") {
        NodeKind::GoTerm
    } else {
        NodeKind::Gene
    }
}

/// Read a gene network from an edge list.
///
/// Each line holds `source target [label]`, separated by tabs, commas
/// or spaces. Nodes named `GO:*` are GO terms, everything else is a
/// gene. A missing label becomes `NA`.
pub fn read_gene_network(edge_file: &str) -> anyhow::Result<GeneNetwork> {
    let lines = read_lines_of_words_delim(edge_file, &EDGE_DELIMITERS)?;

    let mut graph = GeneNetwork::new();
    let mut n_skipped = 0;

    for words in lines.iter() {
        if words.len() < 2 {
            n_skipped += 1;
            continue;
        }
        let source = graph.add_node(&words[0], node_kind_of(&words[0]))?;
        let target = graph.add_node(&words[1], node_kind_of(&words[1]))?;
        let label = words.get(2).map(|x| x.as_ref()).unwrap_or(NO_LABEL);
        graph.add_edge(source, target, label)?;
    }

    info!(
        "Read {}: {} genes, {} GO terms, {} edges ({} GO annotations), {} lines skipped",
        edge_file,
        graph.num_genes(),
        graph.num_go_terms(),
        graph.num_edges(),
        graph.num_go_annotations(),
        n_skipped
    );

    Ok(graph)
}

/// One walk as tab-separated node names
struct WalkLine<'a> {
    graph: &'a GeneNetwork,
    walk: &'a Walk,
}

impl fmt::Display for WalkLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &v) in self.walk.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            f.write_str(self.graph.node_name(v))?;
        }
        Ok(())
    }
}

/// One edge as `source\ttarget\tlabel`
struct EdgeLine<'a> {
    graph: &'a GeneNetwork,
    edge: &'a Edge,
}

impl fmt::Display for EdgeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.graph.node_name(self.edge.source),
            self.graph.node_name(self.edge.target),
            self.edge.label
        )
    }
}

/// Write one walk per line, node names separated by tabs
pub fn write_walks(graph: &GeneNetwork, walks: &[Walk], output_file: &str) -> anyhow::Result<()> {
    let nlines = write_types(
        walks.iter().map(|walk| WalkLine { graph, walk }),
        output_file,
    )?;
    info!("Wrote {} walks to {}", nlines, output_file);
    Ok(())
}

/// Write `source\ttarget\tlabel` for every edge
pub fn write_edges(graph: &GeneNetwork, output_file: &str) -> anyhow::Result<()> {
    let nlines = write_types(
        graph.edges().iter().map(|edge| EdgeLine { graph, edge }),
        output_file,
    )?;
    info!("Wrote {} edges to {}", nlines, output_file);
    Ok(())
}
