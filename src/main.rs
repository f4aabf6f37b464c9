use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use newton_explorer::{EngineConfig, RenderStrategy, ViewRequest, render_to_file};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Exhaustive,
    BoundaryTrace,
}

impl From<Strategy> for RenderStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Exhaustive => RenderStrategy::Exhaustive,
            Strategy::BoundaryTrace => RenderStrategy::BoundaryTrace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "newton_explorer", version, about = "Render one Newton fractal frame to a 16-bit PGM")]
struct Cli {
    /// JSON engine config; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    formula: Option<String>,
    #[arg(long)]
    size: Option<u32>,
    #[arg(long)]
    max_iter: Option<u16>,
    #[arg(long)]
    strategy: Option<Strategy>,
    /// Zoom steps about the center; negative zooms out.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    zoom: i32,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    move_x: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    move_y: f64,
    #[arg(short, long, default_value = "output/newton.pgm")]
    output: PathBuf,
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };

        if let Some(formula) = &self.formula {
            config.formula = formula.clone();
        }
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(max_iter) = self.max_iter {
            config.max_iterations = max_iter;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        config.validate()?;

        Ok(config)
    }

    fn view_request(&self) -> ViewRequest {
        ViewRequest {
            zoom: self.zoom,
            move_x: self.move_x,
            move_y: self.move_y,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = cli.engine_config()?;

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let summary = render_to_file(config, &cli.view_request(), &cli.output)?;
    println!("center {} scale {}", summary.center, summary.scale);

    Ok(())
}
