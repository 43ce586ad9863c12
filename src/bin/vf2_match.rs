use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vf2_subgraph::{
    mapping::find_all_embeddings, parser::parse_input_file, Graph, MatchOptions,
    SubgraphInspector,
};

/// VF2 Subgraph Matcher: find induced copies of a pattern graph in a host graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input file containing host and pattern graphs
    #[arg(short, long)]
    input: PathBuf,

    /// Stop after this many mappings
    #[arg(short, long)]
    limit: Option<usize>,

    /// Require equal vertex labels
    #[arg(long)]
    match_labels: bool,

    /// Require equal edge multiplicities
    #[arg(long)]
    match_multiplicity: bool,

    /// Visit host vertices by descending degree
    #[arg(long)]
    order_by_degree: bool,

    /// Explore root branches in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Cross-check the result against brute-force enumeration
    #[arg(long)]
    verify: bool,

    /// Log search progress (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> MatchOptions {
        MatchOptions {
            match_labels: self.match_labels,
            match_multiplicity: self.match_multiplicity,
            order_by_degree: self.order_by_degree,
            limit: self.limit,
            parallel: self.parallel,
        }
    }
}

fn print_graph(name: &str, g: &Graph) {
    println!("Graph {} adjacency matrix:", name);
    for row in &g.adj {
        println!("  {:?}", row);
    }
    if g.labels.iter().any(|&l| l != 0) {
        println!("  labels: {:?}", g.labels);
    }
    println!();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().without_time().with_target(false))
        .with(filter)
        .init();

    let (host, pattern) = parse_input_file(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    println!("VF2 Subgraph Matcher");
    println!("====================");
    println!();
    println!("Graph H (host): {} vertices", host.num_vertices());
    println!("Graph P (pattern): {} vertices", pattern.num_vertices());
    println!();
    print_graph("H", &host);
    print_graph("P", &pattern);

    let options = args.options();
    debug!(?options, "search options");
    let inspector = SubgraphInspector::with_options(
        &host,
        &pattern,
        options.vertex_comparator(),
        options.edge_comparator(),
        &options,
    );

    let start_time = std::time::Instant::now();
    let mappings = inspector.find_mappings(&options);
    let elapsed = start_time.elapsed();

    for (i, mapping) in mappings.iter().enumerate() {
        println!("  Mapping {}: {}", i + 1, mapping);
    }
    println!();
    println!("Mappings found: {}", mappings.len());
    println!("Search time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);

    if args.verify {
        info!("verifying against brute-force enumeration");
        let mut expected = find_all_embeddings(
            &host,
            &pattern,
            &options.vertex_comparator(),
            &options.edge_comparator(),
        );
        let mut actual = mappings.clone();
        if let Some(limit) = options.limit {
            // a capped search must still be a subset
            if actual.iter().any(|m| !expected.contains(m)) {
                bail!("VF2 produced a mapping the brute-force search rejects");
            }
            if actual.len() < limit.min(expected.len()) {
                bail!("VF2 stopped early: {} of {} mappings", actual.len(), expected.len());
            }
        } else {
            expected.sort_by_key(|m| m.images());
            actual.sort_by_key(|m| m.images());
            if actual != expected {
                bail!(
                    "VF2 found {} mappings but brute force found {}",
                    actual.len(),
                    expected.len()
                );
            }
        }
        println!("Verification: OK ({} brute-force mappings)", expected.len());
    }

    Ok(())
}
