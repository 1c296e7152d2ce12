use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storygraph::geometry::Rect;
use storygraph::render::RenderStats;
use storygraph::{
    Camera, DrawCommand, EngineInfo, GraphConfig, GraphData, GraphEngine, RecordingSurface,
};

/// Headless layout and rendering for story relationship graphs.
#[derive(Parser)]
#[command(name = "storygraph")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the layout until stable and print node positions as JSON
    Layout(LayoutArgs),
    /// Run the layout, fit a camera and print the draw commands as JSON
    Render {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Viewport width in pixels
        #[arg(long, default_value_t = 800.0)]
        width: f32,

        /// Viewport height in pixels
        #[arg(long, default_value_t = 600.0)]
        height: f32,
    },
}

#[derive(Args)]
struct LayoutArgs {
    /// Graph document (.json, .yaml or .yml) with `nodes` and `edges`
    #[arg(short, long)]
    input: PathBuf,

    /// Engine configuration (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Layout algorithm
    #[arg(short, long, default_value = "force_directed")]
    algorithm: String,

    /// Give up after this many ticks if the layout has not stabilized
    #[arg(long, default_value_t = 1000)]
    max_ticks: u64,
}

#[derive(Serialize)]
struct NodePosition<'a> {
    id: &'a str,
    x: f32,
    y: f32,
    fixed: bool,
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    info: EngineInfo,
    nodes: Vec<NodePosition<'a>>,
}

#[derive(Serialize)]
struct RenderReport<'a> {
    info: EngineInfo,
    zoom: f32,
    visible_region: Rect,
    stats: RenderStats,
    commands: &'a [DrawCommand],
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GraphConfig> {
    match path {
        Some(path) => GraphConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GraphConfig::default()),
    }
}

fn run_layout(args: &LayoutArgs) -> anyhow::Result<GraphEngine> {
    let config = load_config(args.config.as_deref())?;
    let data: GraphData = storygraph::io::read_document(&args.input)
        .with_context(|| format!("failed to read graph {}", args.input.display()))?;

    let mut engine = GraphEngine::new(config)?;
    engine.set_layout_algorithm(&args.algorithm)?;
    engine.load(data);

    let ticks = engine.run_to_convergence(args.max_ticks);
    let info = engine.info();
    if info.is_stable {
        info!(ticks, "layout stabilized");
    } else if info.node_count > 0 {
        warn!(ticks, "layout did not stabilize");
    }
    Ok(engine)
}

fn layout(args: &LayoutArgs) -> anyhow::Result<String> {
    let engine = run_layout(args)?;
    let report = LayoutReport {
        info: engine.info(),
        nodes: engine
            .graph()
            .nodes()
            .iter()
            .map(|n| NodePosition {
                id: &n.id,
                x: n.x,
                y: n.y,
                fixed: n.fixed,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn render(args: &LayoutArgs, width: f32, height: f32) -> anyhow::Result<String> {
    let engine = run_layout(args)?;

    let mut camera = Camera::new(width, height);
    camera.fit_to_content(engine.content_bounds());
    let visible_region = camera.visible_region();

    let mut surface = RecordingSurface::new();
    let stats = engine.render(&mut surface, visible_region);
    let report = RenderReport {
        info: engine.info(),
        zoom: camera.zoom,
        visible_region,
        stats,
        commands: &surface.commands,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = match &cli.command {
        Commands::Layout(args) => layout(args)?,
        Commands::Render {
            layout,
            width,
            height,
        } => render(layout, *width, *height)?,
    };
    println!("{output}");

    Ok(())
}
