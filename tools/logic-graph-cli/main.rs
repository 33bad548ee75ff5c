use clap::Parser;
use log::info;
use logic_graph::operator::catalog;
use logic_graph::prelude::*;
use std::fs;
use std::time::Instant;

/// Validate and evaluate logic graph definitions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph definition JSON file
    graph_path: Option<String>,
    /// Path to the data context JSON file (`source` and optional `__snapshot`)
    context_path: Option<String>,

    /// Write the new change detection snapshot to this file
    #[arg(short, long)]
    snapshot_out: Option<String>,

    /// Only validate the graph, do not evaluate it
    #[arg(long)]
    validate_only: bool,

    /// Print the operator catalog as JSON and exit
    #[arg(long)]
    catalog: bool,

    /// Node count the definition is expected to have
    #[arg(long)]
    declared_nodes: Option<usize>,

    /// Fixed evaluation time in epoch milliseconds
    #[arg(long)]
    now: Option<i64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.catalog {
        print_catalog();
        return;
    }

    let graph_path = cli
        .graph_path
        .clone()
        .unwrap_or_else(|| exit_with_error("A graph definition path is required."));
    let definition = load_definition(&graph_path, cli.declared_nodes);

    let errors = validate(&definition.nodes, definition.declared_node_count());
    if !errors.is_empty() {
        eprintln!("\nGraph '{}' is invalid:", definition.name);
        for error in &errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(2);
    }
    println!(
        "Graph '{}' is valid ({} nodes).",
        definition.name,
        definition.nodes.len()
    );
    if cli.validate_only {
        return;
    }

    let context_path = cli
        .context_path
        .clone()
        .unwrap_or_else(|| exit_with_error("A data context path is required for evaluation."));
    run_evaluation(definition, &context_path, &cli);
}

fn load_definition(path: &str, declared_nodes: Option<usize>) -> GraphDefinition {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read graph file '{}': {}", path, e))
    });
    let mut definition = GraphDefinition::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph '{}': {}", path, e)));
    if let Some(count) = declared_nodes {
        definition = definition.with_node_count(count);
    }
    definition
}

fn run_evaluation(definition: GraphDefinition, context_path: &str, cli: &Cli) {
    let context_json = fs::read_to_string(context_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read context file '{}': {}",
            context_path, e
        ))
    });
    let mut context: DataContext = serde_json::from_str(&context_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse context JSON: {}", e)));
    if let Some(now) = cli.now {
        context = context.with_clock(now);
    }

    let graph = LogicGraph::new(definition.nodes)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to build graph: {}", e)));

    let start = Instant::now();
    let outcome = Evaluator::new()
        .evaluate(&graph, &context)
        .unwrap_or_else(|e| {
            exit_with_error(&format!("Evaluation failed ({:?}): {}", e.kind(), e))
        });
    info!("Evaluated {} nodes in {:?}", graph.len(), start.elapsed());

    println!("\nVerdict: {}", outcome.verdict);
    println!("Snapshot entries: {}", outcome.snapshot.len());

    if let Some(path) = &cli.snapshot_out {
        let json = serde_json::to_string_pretty(&outcome.snapshot)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode snapshot: {}", e)));
        fs::write(path, json).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write snapshot to '{}': {}", path, e))
        });
        println!("Snapshot written to '{}'", path);
    }
}

fn print_catalog() {
    let json = serde_json::to_string_pretty(&catalog())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode catalog: {}", e)));
    println!("{}", json);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
