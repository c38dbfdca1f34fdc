// Pipelines: each subcommand's end-to-end flow over the artifacts on disk.

pub mod collect;
pub mod process;
pub mod reddit;
