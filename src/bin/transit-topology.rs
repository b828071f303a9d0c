use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_topology::{Config, DirectionClass, LineName, Network};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Cypher,
}

/// Infer a transit network from a station score table.
#[derive(Debug, Parser)]
#[command(name = "transit-topology", version)]
struct Args {
    /// Station table (CSV with header row)
    input: PathBuf,

    /// JSON config file (table layout, tolerance catalogue, palette)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Only infer these lines (repeatable)
    #[arg(short, long = "line")]
    lines: Vec<String>,

    /// Worker threads for inference
    #[arg(short, long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("transit_topology=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if !args.lines.is_empty() {
        config.lines = Some(args.lines.iter().map(|l| LineName::from(l.as_str())).collect());
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }

    let network = Network::load_csv_path(&args.input, &config)
        .with_context(|| format!("loading station table {}", args.input.display()))?;

    let graph = network.graph();
    let directional = graph.edges().iter().filter(|e| e.direction == DirectionClass::Directional).count();
    info!(
        stations = graph.node_count(),
        edges = graph.edge_count(),
        directional,
        lines = graph.lines().len(),
        "inference finished"
    );

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match args.format {
        Format::Json => network.export_json(&mut *writer)?,
        Format::Cypher => network.export_cypher_dump(&mut *writer)?,
    }
    writer.flush()?;

    Ok(())
}
