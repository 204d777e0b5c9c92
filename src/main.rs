mod app;
mod decay;
mod layout;
mod nuclide;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::decay::GraphLimits;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Fixed-width nuclide table (NUBASE layout).
    #[arg(long, default_value = "data/nubase.txt")]
    table: PathBuf,

    /// Precomputed decay index; a missing file falls back to derived branches.
    #[arg(long, default_value = "data/decay_index.json")]
    decay_index: PathBuf,

    /// Ignore the decay index and derive every branch from the table.
    #[arg(long, conflicts_with = "decay_index")]
    no_decay_index: bool,

    /// Deepest traversal level of a decay chain.
    #[arg(long, default_value_t = 15)]
    max_depth: usize,

    /// Total edges a single decay chain may create.
    #[arg(long, default_value_t = 100)]
    max_branches: usize,

    /// Tracing filter directive, overridden by RUST_LOG when set.
    #[arg(long, default_value = "info")]
    log_filter: String,
}

impl Args {
    fn index_path(&self) -> Option<PathBuf> {
        (!self.no_decay_index).then(|| self.decay_index.clone())
    }
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let decay_index = args.index_path();
    let sources = app::DataSources {
        table: args.table,
        decay_index,
    };
    let limits = GraphLimits {
        max_depth: args.max_depth,
        max_branches: args.max_branches,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "nuclide-chart",
        options,
        Box::new(move |cc| Ok(Box::new(app::NuclideChartApp::new(cc, sources, limits)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_index_defaults_on_and_can_be_disabled() {
        let args = Args::try_parse_from(["nuclide-chart"]).expect("defaults parse");
        assert_eq!(args.index_path(), Some(PathBuf::from("data/decay_index.json")));

        let args =
            Args::try_parse_from(["nuclide-chart", "--no-decay-index"]).expect("flag parses");
        assert_eq!(args.index_path(), None);

        let args = Args::try_parse_from(["nuclide-chart", "--decay-index", "other.json"])
            .expect("path parses");
        assert_eq!(args.index_path(), Some(PathBuf::from("other.json")));
    }

    #[test]
    fn explicit_index_conflicts_with_disabling_it() {
        let parsed = Args::try_parse_from([
            "nuclide-chart",
            "--decay-index",
            "other.json",
            "--no-decay-index",
        ]);
        assert!(parsed.is_err());
    }
}
