use crate::common_io::mkdir;
use crate::input::{read_gene_network, write_edges};

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use walk_util::null_graph::generate_null_graph;

#[derive(Args, Debug)]
pub struct NullGraphCmdArgs {
    /// gene network edge list (`source target [label]`, `.gz` ok)
    #[arg(short = 'e', long, required = true)]
    pub edge_file: Box<str>,

    /// output edge list (`.gz` ok, or `stdout`)
    #[arg(short, long, required = true)]
    pub output: Box<str>,

    /// random seed (fresh entropy if omitted)
    #[arg(short = 's', long)]
    pub rseed: Option<u64>,
}

pub fn run_null_graph(args: &NullGraphCmdArgs) -> anyhow::Result<()> {
    let graph = read_gene_network(&args.edge_file)?;

    let mut rng = match args.rseed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let null_graph = generate_null_graph(&graph, &mut rng)?;

    mkdir(&args.output)?;
    write_edges(&null_graph, &args.output)?;
    Ok(())
}
