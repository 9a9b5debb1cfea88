use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use trialviz::compiler;
use trialviz::data::{read_rows, read_sample_sets, HistogramRow, RiskResponseRow, ScatterRow, ShapRow, StratificationRow};
use trialviz::histogram::HistogramSpec;
use trialviz::ir::SceneGraph;
use trialviz::rank::order_groups;
use trialviz::EngineOptions;

#[derive(Parser, Debug)]
#[command(name = "trialviz")]
#[command(about = "Turn trial analysis results into renderer-ready chart scenes", long_about = None)]
struct Args {
    #[command(subcommand)]
    chart: Chart,

    /// Input rows (JSON or CSV); reads stdin when omitted
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// JSON file with engine options; missing fields take defaults
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    /// Emit resolved pixel-space primitives instead of the scene
    #[arg(long, global = true)]
    primitives: bool,
}

#[derive(Subcommand, Debug)]
enum Chart {
    /// Density curves of named sample sets on a shared grid
    Density {
        #[arg(long)]
        stacked: bool,
    },
    /// One sample set split into colored regions at threshold boundaries
    Segmented {
        /// Sample set to split; defaults to the first set
        #[arg(long)]
        set: Option<String>,
        /// Region boundary (at most two)
        #[arg(long = "boundary")]
        boundaries: Vec<f64>,
    },
    /// Grouped bars over pre-binned counts
    Histogram {
        #[arg(long)]
        feature: Option<String>,
        #[arg(long)]
        normalize: bool,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Per-group lines with error bars over time
    Stratification {
        #[arg(long)]
        feature: Option<String>,
        /// Month to mark with a guide line
        #[arg(long)]
        month: Option<f64>,
    },
    /// Points with a linear fit
    Scatter {
        #[arg(long)]
        feature: Option<String>,
        /// Fit a least-squares line when the row carries none
        #[arg(long)]
        fit: bool,
    },
    /// One forest panel per metric for an outcome
    Forest {
        #[arg(long)]
        outcome: Option<String>,
    },
    /// Jittered attribution scatter of the top features
    Shap,
    /// Mean absolute attribution per top feature
    Importance,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read input from stdin")?;
            Ok(text)
        }
    }
}

fn load_options(path: Option<&PathBuf>) -> Result<EngineOptions> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            serde_json::from_str(&text).context("Failed to parse options file")
        }
        None => Ok(EngineOptions::default()),
    }
}

/// Row for `feature`, or the first row when no feature is requested
fn pick_row<'a, T>(rows: &'a [T], feature: Option<&str>, key: impl Fn(&T) -> Option<&str>) -> Option<&'a T> {
    match feature {
        Some(f) => rows.iter().find(|r| key(r) == Some(f)),
        None => rows.first(),
    }
}

fn build_scene(chart: &Chart, text: &str, options: &EngineOptions) -> Result<SceneGraph> {
    let scene = match chart {
        Chart::Density { stacked } => {
            let sets = read_sample_sets(text)?;
            compiler::density_chart(&sets, *stacked, options)
        }
        Chart::Segmented { set, boundaries } => {
            let sets = read_sample_sets(text)?;
            let samples = match set {
                Some(name) => sets
                    .sets
                    .get(name)
                    .with_context(|| format!("No sample set named '{}'", name))?
                    .clone(),
                None => order_groups(sets.sets.keys().map(String::as_str))
                    .first()
                    .and_then(|name| sets.sets.get(name))
                    .cloned()
                    .unwrap_or_default(),
            };
            compiler::segmented_density_chart(&samples, boundaries, options)?
        }
        Chart::Histogram { feature, normalize, threshold } => {
            let rows: Vec<HistogramRow> = read_rows(text)?;
            let spec = pick_row(&rows, feature.as_deref(), |r| r.feature.as_deref())
                .map(HistogramSpec::from)
                .unwrap_or_default();
            compiler::histogram_chart(&spec, *normalize, *threshold, options)
        }
        Chart::Stratification { feature, month } => {
            let rows: Vec<StratificationRow> = read_rows(text)?;
            compiler::stratification_chart(&rows, feature.as_deref(), *month, options)
        }
        Chart::Scatter { feature, fit } => {
            let rows: Vec<ScatterRow> = read_rows(text)?;
            match pick_row(&rows, feature.as_deref(), |r| r.feature.as_deref()) {
                Some(row) => compiler::scatter_chart(row, *fit, options),
                None => compiler::scatter_chart(&ScatterRow::default(), false, options),
            }
        }
        Chart::Forest { outcome } => {
            let rows: Vec<RiskResponseRow> = read_rows(text)?;
            compiler::forest_matrix(&rows, outcome.as_deref(), options)
        }
        Chart::Shap => {
            let rows: Vec<ShapRow> = read_rows(text)?;
            compiler::shap_scatter(&rows, options)
        }
        Chart::Importance => {
            let rows: Vec<ShapRow> = read_rows(text)?;
            compiler::importance_chart(&rows, options)
        }
    };
    Ok(scene)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let options = load_options(args.options.as_ref())?;
    let text = read_input(args.input.as_ref())?;
    let scene = build_scene(&args.chart, &text, &options).context("Failed to build chart")?;
    if scene.is_empty() {
        tracing::warn!("no data series in chart");
    }

    let json = if args.primitives {
        serde_json::to_string_pretty(&compiler::resolve_scene(&scene))
    } else {
        serde_json::to_string_pretty(&scene)
    }
    .context("Failed to serialize output")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
