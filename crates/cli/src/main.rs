use anyhow::Context;
use clap::Parser;
use salesmap_core::export;
use salesmap_core::label::AverageCharWidth;
use salesmap_core::{FileSource, HttpSource, Orchestrator, PlotConfig, SalesSource};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "salesmap-cli", about = "Video game sales treemap renderer")]
struct Args {
    /// Data URL (defaults to the published sales dataset)
    #[arg(long, conflicts_with = "input")]
    url: Option<String>,
    /// Read the dataset from a local JSON file instead
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// JSON file with plot settings
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    legend_height: Option<f64>,
    /// Output SVG path
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Output HTML page with hover tooltips
    #[arg(long)]
    html: Option<PathBuf>,
    /// Output JSON layout path
    #[arg(short, long)]
    json: Option<PathBuf>,
    /// Output CSV layout path
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Args {
    fn plot_config(&self) -> anyhow::Result<PlotConfig> {
        let mut cfg = match &self.config {
            Some(path) => PlotConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => PlotConfig::default(),
        };
        if let Some(url) = &self.url {
            cfg.data_url = url.clone();
        }
        if let Some(w) = self.width {
            cfg.width = w;
        }
        if let Some(h) = self.height {
            cfg.height = h;
        }
        if let Some(l) = self.legend_height {
            cfg.legend_height = l;
        }
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let cfg = args.plot_config()?;
    let source: Box<dyn SalesSource> = match &args.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(HttpSource::new(cfg.data_url.clone())),
    };

    let mut orch = Orchestrator::new(cfg);
    if orch.run(source.as_ref(), &AverageCharWidth::default()).await.is_err() {
        // Already logged by the orchestrator.
        std::process::exit(1);
    }

    if let Some(path) = &args.svg {
        write_output(path, export::to_svg(orch.scene()))?;
    }
    if let Some(path) = &args.html {
        let page = export::to_html(orch.scene(), "Video Game Sales", orch.config().tooltip_offset);
        write_output(path, page)?;
    }
    if let (Some(path), Some(scale)) = (&args.json, orch.color_scale()) {
        let json = export::to_json(orch.leaves(), scale);
        write_output(path, serde_json::to_string_pretty(&json)?)?;
    }
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        export::to_csv(orch.leaves(), std::io::BufWriter::new(file))?;
        info!(path = %path.display(), "wrote csv");
    }

    println!(
        "Rendered {} tiles across {} categories",
        orch.leaves().len(),
        orch.color_scale().map_or(0, |s| s.len())
    );
    Ok(())
}

fn write_output(path: &Path, contents: String) -> anyhow::Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote output");
    Ok(())
}
