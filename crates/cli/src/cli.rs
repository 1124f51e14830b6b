use std::path::PathBuf;

use clap::Parser;

/// Redis JSON + search walkthrough over a small inventory dataset.
///
/// Loads the dataset into the store, builds a search index over it, runs the
/// predefined queries, then applies a fixed sequence of updates and a delete.
#[derive(Parser, Debug)]
#[command(name = "inventory-demo", version, about)]
pub struct CliArgs {
    /// Env file holding REDIS_URL and friends.
    #[arg(long, env = "INVENTORY_ENV_FILE", default_value = ".env")]
    pub env_file: PathBuf,

    /// Dataset path (overrides INVENTORY_DATASET).
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Config profile (overrides INVENTORY_PROFILE).
    #[arg(long)]
    pub profile: Option<String>,

    /// Drop an existing index of the same name (and its documents) before loading.
    #[arg(long)]
    pub reset: bool,

    /// Print results as single-line JSON instead of indented.
    #[arg(long)]
    pub compact: bool,
}
