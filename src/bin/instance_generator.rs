use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};
use vf2_subgraph::{
    generator::{generate_instance, InstanceParams},
    parser::format_graph,
};

/// Input Generator for VF2 subgraph matching instances.
///
/// Writes a random host graph followed by a pattern graph cut out of it as
/// an induced subgraph, in the format read by `vf2-match`:
///
/// <n_host>
/// [L <labels>]
/// <adjacency matrix of the host>
///
/// <n_pattern>
/// [L <labels>]
/// <adjacency matrix of the pattern>
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate random host/pattern instances with a planted embedding"
)]
struct Args {
    /// Number of vertices in the host graph
    #[arg(long)]
    host_size: usize,

    /// Number of vertices in the pattern graph, at most the host size
    #[arg(long)]
    pattern_size: usize,

    /// Density (probability of an edge) for the host, excluding self-loops
    #[arg(long, default_value_t = 0.25)]
    density: f64,

    /// Probability that a generated edge becomes a multiedge
    #[arg(long, default_value_t = 0.0)]
    multiedge_prob: f64,

    /// Maximum multiplicity for a multiedge (uniformly sampled in [2, max])
    #[arg(long, default_value_t = 3)]
    max_multiedge: usize,

    /// Number of distinct vertex labels
    #[arg(long, default_value_t = 1)]
    labels: usize,

    /// Random seed (if omitted, uses entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Output file path
    #[arg(long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().without_time().with_target(false))
        .with(LevelFilter::from_level(Level::INFO))
        .init();

    let args = Args::parse();

    if args.host_size == 0 {
        bail!("host size must be positive");
    }
    if args.pattern_size > args.host_size {
        bail!("pattern size must not exceed host size");
    }
    if !(0.0..=1.0).contains(&args.density) || !(0.0..=1.0).contains(&args.multiedge_prob) {
        bail!("density and multiedge_prob must be in [0,1]");
    }
    if args.max_multiedge < 2 && args.multiedge_prob > 0.0 {
        warn!("max_multiedge < 2 makes multiedge_prob ineffective");
    }

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);

    let params = InstanceParams {
        host_size: args.host_size,
        pattern_size: args.pattern_size,
        density: args.density,
        multiedge_prob: args.multiedge_prob,
        max_multiedge: args.max_multiedge,
        labels: args.labels,
    };
    let instance = generate_instance(&params, &mut rng);

    info!(
        seed,
        host_edges = instance.host.edge_count(),
        pattern_edges = instance.pattern.edge_count(),
        "generated instance"
    );
    info!("planted mapping (pattern -> host): {:?}", instance.planted);

    let mut writer = File::create(&args.output)
        .with_context(|| format!("could not create {}", args.output.display()))?;
    write!(writer, "{}", format_graph(&instance.host))?;
    writeln!(writer)?;
    write!(writer, "{}", format_graph(&instance.pattern))?;
    writer.flush()?;

    info!("wrote {}", args.output.display());
    Ok(())
}
