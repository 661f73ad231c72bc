//! `component-graph` command line driver.
//!
//! Plays the external component registry: loads a registry file, registers and
//! detects every component, runs one query or export and prints JSON on stdout.
//! Logs go to stderr so stdout stays machine-readable.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use component_graph::ComponentGraph;
use component_graph_protocol::{serialize_json, wire_schemas};
use serde::Serialize;
use std::path::PathBuf;

mod registry;

pub use registry::{build_graph, load_config, load_registry};

#[derive(Parser)]
#[command(name = "component-graph")]
#[command(about = "Relationship graph queries over a UI component registry", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Component registry (JSON array, or object with a `components` array)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a visualization snapshot
    Export {
        #[command(subcommand)]
        kind: ExportKind,
    },

    /// Children, siblings and dependencies of one component
    Summary(IdArgs),

    /// Components reachable from one component
    Affected(AffectedArgs),

    /// Shortest undirected path between two components
    Path(PathArgs),

    /// Directed cycles reachable from a component
    Cycles(CyclesArgs),

    /// Most connected components
    Hubs(ThresholdArgs),

    /// Least connected components
    Isolated(ThresholdArgs),

    /// Dependency depth below one component
    Depth(IdArgs),

    /// Dependencies shared by several components
    Common(CommonArgs),

    /// Components ordered dependencies-first
    Topo,

    /// JSON schemas of every exported payload
    Schema,
}

#[derive(Subcommand)]
enum ExportKind {
    /// Every node and edge
    Graph,

    /// One component with its direct neighbors
    Focused {
        #[arg(long)]
        id: String,
    },

    /// Parent-child tree under a root
    Hierarchy {
        #[arg(long)]
        root: String,
    },

    /// Strength matrix over all components
    Matrix,

    /// Relationship types present with counts
    Legend,

    /// Node/edge counts, degree and density
    Stats,
}

#[derive(Args)]
struct IdArgs {
    #[arg(long)]
    id: String,
}

#[derive(Args)]
struct AffectedArgs {
    #[arg(long)]
    id: String,

    /// Follow relationships transitively
    #[arg(long)]
    recursive: bool,
}

#[derive(Args)]
struct PathArgs {
    #[arg(long)]
    from: String,

    #[arg(long)]
    to: String,
}

#[derive(Args)]
struct CyclesArgs {
    #[arg(long)]
    start: String,
}

#[derive(Args)]
struct ThresholdArgs {
    /// Neighbor-count threshold (defaults to the configured one)
    #[arg(long)]
    threshold: Option<usize>,
}

#[derive(Args)]
struct CommonArgs {
    /// Comma-separated component ids
    #[arg(long, value_delimiter = ',', required = true)]
    ids: Vec<String>,
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    if let Commands::Schema = cli.command {
        return emit(&wire_schemas()?, cli.pretty);
    }

    let Some(registry_path) = cli.registry.as_deref() else {
        bail!("--registry is required for this command");
    };
    let config = load_config(cli.config.as_deref())?;
    let components = load_registry(registry_path)?;
    let graph = build_graph(components, config)?;

    run(&graph, cli.command, cli.pretty)
}

fn run(graph: &ComponentGraph, command: Commands, pretty: bool) -> Result<()> {
    let analyzer = graph.analyzer();
    let exporter = graph.exporter();
    let analysis = &graph.config().analysis;

    match command {
        Commands::Export { kind } => match kind {
            ExportKind::Graph => emit(&exporter.export_graph(), pretty),
            ExportKind::Focused { id } => {
                require(graph, &id)?;
                emit(&exporter.export_focused(&id), pretty)
            }
            ExportKind::Hierarchy { root } => {
                let tree = exporter
                    .export_hierarchy(&root)
                    .with_context(|| format!("Component {root} is not registered"))?;
                emit(&tree, pretty)
            }
            ExportKind::Matrix => emit(&exporter.export_adjacency_matrix(), pretty),
            ExportKind::Legend => emit(&exporter.export_legend(), pretty),
            ExportKind::Stats => emit(&exporter.export_statistics(), pretty),
        },
        Commands::Summary(args) => {
            require(graph, &args.id)?;
            emit(&graph.summary(&args.id), pretty)
        }
        Commands::Affected(args) => {
            require(graph, &args.id)?;
            emit(
                &graph
                    .manager()
                    .affected_components(&args.id, args.recursive),
                pretty,
            )
        }
        Commands::Path(args) => {
            require(graph, &args.from)?;
            require(graph, &args.to)?;
            emit(&analyzer.shortest_path(&args.from, &args.to), pretty)
        }
        Commands::Cycles(args) => {
            require(graph, &args.start)?;
            emit(&analyzer.find_cycles(&args.start), pretty)
        }
        Commands::Hubs(args) => emit(
            &analyzer.find_hubs(args.threshold.unwrap_or(analysis.hub_threshold)),
            pretty,
        ),
        Commands::Isolated(args) => emit(
            &analyzer.find_isolated(args.threshold.unwrap_or(analysis.isolation_threshold)),
            pretty,
        ),
        Commands::Depth(args) => {
            require(graph, &args.id)?;
            emit(&analyzer.dependency_depth(&args.id), pretty)
        }
        Commands::Common(args) => {
            for id in &args.ids {
                require(graph, id)?;
            }
            let ids: Vec<&str> = args.ids.iter().map(String::as_str).collect();
            emit(&analyzer.common_dependencies(&ids), pretty)
        }
        Commands::Topo => emit(&analyzer.topological_order(), pretty),
        Commands::Schema => emit(&wire_schemas()?, pretty),
    }
}

fn require(graph: &ComponentGraph, id: &str) -> Result<()> {
    if graph.manager().component(id).is_none() {
        bail!("Component {id} is not registered");
    }
    Ok(())
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    println!("{}", serialize_json(value, pretty)?);
    Ok(())
}
