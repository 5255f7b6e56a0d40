use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use temporal_communities::{Params, SnapshotGraph, read_snapshot, run};

#[derive(Parser)]
#[command(name = "tcgen")]
#[command(about = "Generate temporal social networks with ground-truth communities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sequence of network windows
    Generate {
        /// TOML file with generator parameters; replaces the parameter flags
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for the random stream (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Directory receiving the window files
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        #[command(flatten)]
        params: Params,
    },

    /// Summarize a written edge-list snapshot
    Inspect {
        /// Snapshot file (`a|b|weight` lines)
        file: PathBuf,

        /// Also write a Graphviz rendering to this path
        #[arg(long)]
        dot: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            config,
            seed,
            out,
            params,
        } => {
            // 1. Resolve parameters
            let params = match config {
                Some(path) => Params::from_toml_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => params,
            };

            // 2. Generate and write every window
            let reports = run(&params, &out, seed).context("generation failed")?;

            // 3. Print per-window info
            for report in &reports {
                println!(
                    "window {}: {} vertices, {}/{} live communities, {} active edges (weight {}), {} components, {} transitions",
                    report.window,
                    report.summary.nodes,
                    report.live_communities,
                    report.communities,
                    report.summary.edges,
                    report.summary.total_weight,
                    report.summary.components,
                    report.transitions
                );
            }
        }
        Commands::Inspect { file, dot } => {
            let records = read_snapshot(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let snapshot = SnapshotGraph::from_records(&records);
            let summary = snapshot.summary();
            println!(
                "{}: {} vertices, {} edges, total weight {}, {} components, max degree {}",
                file.display(),
                summary.nodes,
                summary.edges,
                summary.total_weight,
                summary.components,
                summary.max_degree
            );

            if let Some(path) = dot {
                snapshot
                    .save_dot(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
        }
    }

    Ok(())
}
