//! `uscript` CLI: transpile Blueprint graph assets into script source, or
//! dump a graph's raw structure for debugging.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uscript::TranspileOptions;
use uscript_graph::{asset, debug};

#[derive(Parser)]
#[command(name = "uscript", version, about = "Transpile Blueprint node graphs into script source")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transpile one asset, or every `*.bp.json` under a directory
    Build {
        /// Asset file or directory to search
        input: PathBuf,

        /// Root the emitted scripts are placed under
        #[arg(long, default_value = ".")]
        content_root: PathBuf,

        /// Folder below the content root
        #[arg(long, default_value = "Scripts")]
        folder: String,

        /// Annotate output names with their pin types
        #[arg(long)]
        typed: bool,

        /// Positional call arguments instead of `name = value`
        #[arg(long)]
        compact: bool,
    },

    /// Log the raw node/pin structure of an asset's graphs
    Dump {
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Build { input, content_root, folder, typed, compact } => {
            build(&input, &content_root, folder, typed, compact)
        }
        Command::Dump { input } => dump(&input),
    }
}

fn build(
    input: &Path,
    content_root: &Path,
    folder: String,
    typed: bool,
    compact: bool,
) -> anyhow::Result<()> {
    let options = TranspileOptions { named_arguments: !compact, typed_outputs: typed, folder };

    let assets = collect_assets(input)?;
    anyhow::ensure!(!assets.is_empty(), "no graph assets found under {}", input.display());

    let mut failed = 0usize;
    for path in &assets {
        // A malformed unit is logged and skipped; the batch continues.
        match asset::load_blueprint(path) {
            Ok(blueprint) => {
                let sink = uscript::transpile_to_file(&blueprint, content_root, &options);
                tracing::info!(
                    "[CLI] {} -> {}.us ({} diagnostics)",
                    path.display(),
                    blueprint.name,
                    sink.len()
                );
            }
            Err(err) => {
                tracing::error!("[CLI] Failed to load {}: {err}", path.display());
                failed += 1;
            }
        }
    }

    anyhow::ensure!(failed < assets.len(), "every unit failed to load");
    Ok(())
}

fn dump(input: &Path) -> anyhow::Result<()> {
    let blueprint =
        asset::load_blueprint(input).with_context(|| format!("loading {}", input.display()))?;

    for graph in &blueprint.graphs {
        debug::dump_graph(graph);
        debug::traverse_graph(graph);
    }
    Ok(())
}

fn collect_assets(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut found: Vec<PathBuf> = walkdir::WalkDir::new(input)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(".bp.json"))
        })
        .collect();
    found.sort();
    Ok(found)
}
