//! Offline indexer CLI: one pass over a folder of sorted part-files,
//! emitting a sparse offset index saved next to it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "hostgraph-indexer")]
#[command(about = "Build a sparse offset index over a sorted part-file folder", long_about = None)]
struct Cli {
    /// Which index to build.
    #[arg(long, value_enum)]
    kind: Kind,

    /// Folder holding the sorted, line-oriented part-files.
    #[arg(long)]
    data_dir: PathBuf,

    /// Where to write the resulting offset index.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Vertices,
    Edges,
    EdgesReversed,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.kind {
        Kind::Vertices => {
            let index = hostgraph_index::build_vertex_index(&cli.data_dir)
                .with_context(|| format!("building vertex index from {}", cli.data_dir.display()))?;
            let file = std::fs::File::create(&cli.out)
                .with_context(|| format!("creating {}", cli.out.display()))?;
            index.save(std::io::BufWriter::new(file))?;
            tracing::info!(entries = index.len(), out = %cli.out.display(), "vertex index written");
        }
        Kind::Edges | Kind::EdgesReversed => {
            let index = hostgraph_index::build_edge_index(&cli.data_dir)
                .with_context(|| format!("building edge index from {}", cli.data_dir.display()))?;
            let file = std::fs::File::create(&cli.out)
                .with_context(|| format!("creating {}", cli.out.display()))?;
            index.save(std::io::BufWriter::new(file))?;
            tracing::info!(entries = index.len(), out = %cli.out.display(), "edge index written");
        }
    }

    Ok(())
}
