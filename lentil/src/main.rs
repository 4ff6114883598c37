use lentil::run_null_graph::*;
use lentil::run_walk::*;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

const LOGO: &str = include_str!("../logo.txt");

fn colorize_logo_line(line: &str) -> String {
    line.replace('o', &"o".truecolor(160, 120, 60).to_string())
        .replace('~', &"~".truecolor(139, 90, 43).to_string())
        .replace('(', &"(".truecolor(139, 90, 43).to_string())
        .replace(')', &")".truecolor(139, 90, 43).to_string())
        .replace('=', &"=".green().to_string())
        .replace('>', &">".bright_green().to_string())
        .replace('-', &"-".green().to_string())
}

fn print_logo() {
    for line in LOGO.lines() {
        println!("  {}", colorize_logo_line(line));
    }
    println!(
        " {}",
        "Random walks and null graphs for gene-function networks".bold()
    );
    println!();
}

/// Random walks and null graphs for gene-function networks
#[derive(Parser)]
#[command(name = "lentil")]
#[command(version, about, long_about, term_width = 80)]
struct Cli {
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample biased (p, q) random walks over a gene network
    Walk(WalkCmdArgs),
    /// Generate a degree-preserving null graph of a gene network
    NullGraph(NullGraphCmdArgs),
}

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--help" || arg == "-h") {
        print_logo();
    }

    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    match &cli.commands {
        Commands::Walk(args) => {
            run_walk(args)?;
        }
        Commands::NullGraph(args) => {
            run_null_graph(args)?;
        }
    }

    Ok(())
}
