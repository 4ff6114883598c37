use crate::common_io::mkdir;
use crate::input::{read_gene_network, write_walks};

use clap::Args;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use walk_util::null_graph::generate_null_graph;
use walk_util::transition::TransitionTable;
use walk_util::walker::{generate_walks, WalkArgs, DEFAULT_NITER, DEFAULT_WALK_LENGTH};

#[derive(Args, Debug)]
pub struct WalkCmdArgs {
    /// gene network edge list (`source target [label]`, `.gz` ok)
    #[arg(short = 'e', long, required = true)]
    pub edge_file: Box<str>,

    /// output file for walks, one per line (`.gz` ok, or `stdout`)
    #[arg(short, long, required = true)]
    pub output: Box<str>,

    /// return parameter: large p discourages going straight back
    #[arg(short, default_value_t = 1.0)]
    pub p: f64,

    /// in-out parameter: large q keeps walks local
    #[arg(short, default_value_t = 1.0)]
    pub q: f64,

    /// number of nodes per walk
    #[arg(short = 'l', long, default_value_t = DEFAULT_WALK_LENGTH)]
    pub walk_length: usize,

    /// walks per node = niter × degree
    #[arg(short = 'n', long, default_value_t = DEFAULT_NITER)]
    pub niter: usize,

    /// number of worker threads (1 = sequential)
    #[arg(short = 'w', long, default_value_t = num_cpus::get())]
    pub workers: usize,

    /// random seed (fresh entropy if omitted)
    #[arg(short = 's', long)]
    pub rseed: Option<u64>,

    /// walk on a degree-preserving null graph instead
    #[arg(long, default_value_t = false)]
    pub null: bool,
}

pub fn run_walk(args: &WalkCmdArgs) -> anyhow::Result<()> {
    let walk_args = WalkArgs {
        length: args.walk_length,
        niter: args.niter,
        p: args.p,
        q: args.q,
        workers: args.workers.max(1),
        seed: args.rseed,
    };
    walk_args.validate()?;

    let graph = read_gene_network(&args.edge_file)?;

    let graph = if args.null {
        let mut rng = match args.rseed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!("Generating a null graph");
        generate_null_graph(&graph, &mut rng)?
    } else {
        graph
    };

    let table = TransitionTable::build(&graph, walk_args.p, walk_args.q)?;
    let walks = generate_walks(&graph, &table, &walk_args)?;

    mkdir(&args.output)?;
    write_walks(&graph, &walks, &args.output)?;
    Ok(())
}
