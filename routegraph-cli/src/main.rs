//! Command-line front end for walking-graph generation.
//!
//! - `build`: fetch routes from openrouteservice and write the cleaned graph
//! - `clean`: re-run cleaning and reindexing on an exported graph
//! - `route`: print the shortest path between two node ids

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use routegraph::{
    Error, LatLon,
    directions::OrsClient,
    output::write_outputs,
    pipeline::run_pipeline,
};
use routegraph_core::{
    cleaning::clean_graph, export::from_json_str, model::RouteGraph, reindex::reindex,
    routing::shortest_path_by_id,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

mod config;

use config::{AppConfig, Overrides};

#[derive(Parser)]
#[command(name = "routegraph-cli", version, propagate_version = true)]
#[command(about = "Build cleaned walking graphs between two points")]
struct Cli {
    /// Verbosity (-v debug, -vv trace); RUST_LOG takes over when unset
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request routes and write the cleaned graph
    Build(BuildArgs),
    /// Clean and reindex an existing graph JSON file offline
    Clean(CleanArgs),
    /// Print the shortest path between two node ids of a graph JSON file
    Route(RouteArgs),
}

#[derive(Args)]
struct PipelineArgs {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Start as `lat,lon`
    #[arg(long, allow_hyphen_values = true)]
    start: Option<LatLon>,
    /// Destination as `lat,lon`
    #[arg(long, allow_hyphen_values = true)]
    destination: Option<LatLon>,
    /// JSON output path
    #[arg(long)]
    json: Option<PathBuf>,
    /// KML output path
    #[arg(long)]
    kml: Option<PathBuf>,
    /// Also write a GeoJSON feature collection here
    #[arg(long)]
    geojson: Option<PathBuf>,
}

impl PipelineArgs {
    fn load(self, alternates: Option<usize>) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        Overrides {
            start: self.start,
            destination: self.destination,
            alternates,
            json: self.json,
            kml: self.kml,
            geojson: self.geojson,
        }
        .apply(&mut config.pipeline);
        config.pipeline.validate()?;
        Ok(config)
    }
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,
    /// Alternate routes besides the primary one (0-2)
    #[arg(long)]
    alternates: Option<usize>,
}

#[derive(Args)]
struct CleanArgs {
    /// Graph JSON file to clean
    input: PathBuf,
    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Args)]
struct RouteArgs {
    /// Graph JSON file
    input: PathBuf,
    from: usize,
    to: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build(args) => build(args),
        Command::Clean(args) => clean(args),
        Command::Route(args) => route(args),
    }
}

fn build(args: BuildArgs) -> Result<()> {
    dotenvy::dotenv().ok();
    let config = args.pipeline.load(args.alternates)?;
    let client = OrsClient::from_env(config.ors.clone())
        .context("Set ORS_API_KEY in the environment or a .env file")?;

    let output = match run_pipeline(&client, &config.pipeline) {
        Ok(output) => output,
        Err(Error::NoRoutes) => {
            warn!("No routes returned, nothing written");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        "{} base and {} connector route(s): {} raw nodes -> {} nodes",
        output.base_routes,
        output.connector_routes,
        output.report.nodes_before,
        output.nodes.len()
    );
    write_outputs(&output.nodes, &config.pipeline.output)?;
    Ok(())
}

fn clean(args: CleanArgs) -> Result<()> {
    let config = args.pipeline.load(None)?.pipeline;
    let graph = read_graph(&args.input)?;
    info!(
        "Loaded {} nodes and {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        args.input.display()
    );

    let (cleaned, report) = clean_graph(&graph, &config.cleaner);
    let nodes = reindex(&cleaned, config.start.point(), config.destination.point());
    info!(
        "Merged {} nodes, added {} edges, pruned {}",
        report.nodes_merged,
        report.edges_connected + report.bridges_added + report.snap_edges_added,
        report.edges_pruned
    );
    write_outputs(&nodes, &config.output)?;
    Ok(())
}

fn route(args: RouteArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let nodes = from_json_str(&text)?;

    match shortest_path_by_id(&nodes, args.from, args.to)? {
        Some(path) => {
            let ids: Vec<String> = path.nodes.iter().map(ToString::to_string).collect();
            println!("{}", ids.join(" -> "));
            println!("{:.1} m", path.length_m);
        }
        None => warn!("Node {} is not reachable from node {}", args.to, args.from),
    }
    Ok(())
}

fn read_graph(path: &Path) -> Result<RouteGraph> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let nodes = from_json_str(&text).with_context(|| format!("Invalid graph {}", path.display()))?;
    Ok(RouteGraph::from_nodes(&nodes))
}
