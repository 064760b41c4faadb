//! CLI entry point for the `fgraph` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use follow_graph::cli::commands;
use follow_graph::engine::{FanoutParams, RecommendParams};
use follow_graph::types::{DEFAULT_FANOUT_MAX_HOPS, DEFAULT_RECOMMENDATION_LIMIT};
use follow_graph::GraphError;

#[derive(Parser)]
#[command(
    name = "fgraph",
    about = "Shortest connections between students over accepted follow relationships"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Snapshot size and build report for a dataset
    Stats {
        /// Path to the dataset JSON file
        file: PathBuf,
    },
    /// Shortest weighted distance between two students
    Distance {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Source student ID
        source: u64,
        /// Target student ID
        target: u64,
        /// Report unreachable when the distance exceeds this weight
        #[arg(long)]
        max_weight: Option<u64>,
    },
    /// Shortest path between two students
    Path {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Source student ID
        source: u64,
        /// Target student ID
        target: u64,
    },
    /// Hop count of the shortest path
    Degrees {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Source student ID
        source: u64,
        /// Target student ID
        target: u64,
    },
    /// Distance, path and degrees together
    Connection {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Source student ID
        source: u64,
        /// Target student ID
        target: u64,
        /// Abort after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// All students reachable within a weight or hop bound
    Fanout {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Source student ID
        source: u64,
        /// Maximum cumulative weight
        #[arg(long)]
        max_weight: Option<u64>,
        /// Maximum number of hops
        #[arg(long)]
        max_hops: Option<u32>,
        /// Maximum students to return
        #[arg(long)]
        limit: Option<usize>,
        /// Abort after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Nearby students the source does not follow yet
    Recommend {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Source student ID
        source: u64,
        /// Maximum number of hops
        #[arg(long, default_value_t = DEFAULT_FANOUT_MAX_HOPS)]
        max_hops: u32,
        /// Maximum cumulative weight
        #[arg(long)]
        max_weight: Option<u64>,
        /// Maximum recommendations
        #[arg(long, default_value_t = DEFAULT_RECOMMENDATION_LIMIT)]
        limit: usize,
        /// Abort after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Every student the source does not follow
    Suggest {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Source student ID
        source: u64,
        /// Maximum students to list
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let result = match cli.command {
        Commands::Stats { file } => commands::cmd_stats(&file, json),
        Commands::Distance {
            file,
            source,
            target,
            max_weight,
        } => commands::cmd_distance(&file, source, target, max_weight, json),
        Commands::Path {
            file,
            source,
            target,
        } => commands::cmd_path(&file, source, target, json),
        Commands::Degrees {
            file,
            source,
            target,
        } => commands::cmd_degrees(&file, source, target, json),
        Commands::Connection {
            file,
            source,
            target,
            timeout_ms,
        } => commands::cmd_connection(&file, source, target, timeout_ms, json),
        Commands::Fanout {
            file,
            source,
            max_weight,
            max_hops,
            limit,
            timeout_ms,
        } => {
            let params = FanoutParams {
                source,
                max_weight,
                max_hops,
                max_results: limit,
            };
            commands::cmd_fanout(&file, params, timeout_ms, json)
        }
        Commands::Recommend {
            file,
            source,
            max_hops,
            max_weight,
            limit,
            timeout_ms,
        } => {
            let params = RecommendParams {
                source,
                max_hops,
                max_weight,
                limit,
            };
            commands::cmd_recommend(&file, params, timeout_ms, json)
        }
        Commands::Suggest {
            file,
            source,
            limit,
        } => commands::cmd_suggest(&file, source, limit, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            GraphError::Io(_) => 1,
            GraphError::Json(_) => 2,
            GraphError::VertexNotFound(_) => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
