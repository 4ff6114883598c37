pub mod common_io;
pub mod input;
pub mod run_null_graph;
pub mod run_walk;
