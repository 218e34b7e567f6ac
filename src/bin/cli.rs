use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;
use medcode::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mcli")]
#[command(about = "Medical coding CLI - search ICD-10-CM codes, suggest modifiers, check NCCI pair edits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search ICD-10-CM codes for a clinical description
    Search(SearchArgs),
    /// Suggest CPT/HCPCS modifiers for a clinical description
    Modifier(ModifierArgs),
    /// Check a pair of CPT codes against the NCCI pair-edit table
    Ncci(NcciArgs),
    /// Show summary statistics for the loaded datasets
    Stats(StatsArgs),
    /// Serve the HTTP API
    Serve(ServeArgs),
}

/// Dataset override paths shared by every subcommand
#[derive(Args)]
struct DataArgs {
    /// Path to an ICD-10-CM dataset (JSON)
    #[arg(long, env = "MEDCODE_ICD10_DATA")]
    icd10_data: Option<PathBuf>,
    /// Path to a modifier table (CSV)
    #[arg(long, env = "MEDCODE_MODIFIER_TABLE")]
    modifier_table: Option<PathBuf>,
    /// Path to an NCCI pair-edit table (CSV)
    #[arg(long, env = "MEDCODE_PAIR_EDITS")]
    pair_edits: Option<PathBuf>,
}

#[derive(Args)]
struct SearchArgs {
    /// Free-text clinical description to match
    query: String,
    /// Limit number of results
    #[arg(long, default_value_t = 5)]
    limit: usize,
    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args)]
struct ModifierArgs {
    /// Description of the clinical scenario
    query: String,
    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args)]
struct NcciArgs {
    /// First CPT code
    cpt_a: String,
    /// Second CPT code
    cpt_b: String,
    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args)]
struct StatsArgs {
    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address for the HTTP API
    #[arg(long, env = "MEDCODE_HOST")]
    host: Option<String>,
    /// Bind port for the HTTP API
    #[arg(long, env = "MEDCODE_PORT")]
    port: Option<u16>,
    #[command(flatten)]
    data: DataArgs,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => cmd_search(args),
        Commands::Modifier(args) => cmd_modifier(args),
        Commands::Ncci(args) => cmd_ncci(args),
        Commands::Stats(args) => cmd_stats(args),
        Commands::Serve(args) => cmd_serve(args)?,
    }
    Ok(())
}

fn load_dataset(args: &DataArgs) -> CodingDataset {
    let mut builder = CodingDatasetBuilder::new();
    if let Some(path) = &args.icd10_data {
        builder = builder.icd10_data(path);
    }
    if let Some(path) = &args.modifier_table {
        builder = builder.modifier_table(path);
    }
    if let Some(path) = &args.pair_edits {
        builder = builder.pair_edits(path);
    }
    match builder.build() {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Error loading dataset: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn cmd_search(args: SearchArgs) {
    let dataset = load_dataset(&args.data);
    let results = search_icd10(&dataset, &args.query, args.limit);
    if results.is_empty() {
        println!("No matches.");
        return;
    }
    for result in &results {
        println!(
            "{:<8} | {:.2} | {}",
            result.entry.code, result.score, result.entry.title
        );
    }
}

fn cmd_modifier(args: ModifierArgs) {
    let dataset = load_dataset(&args.data);
    match suggest_modifiers(&dataset, &args.query) {
        Ok(suggestions) => {
            if suggestions.is_empty() {
                println!("No modifier suggestions.");
                return;
            }
            for modifier in &suggestions {
                println!("{:<2} | {} | {}", modifier.code, modifier.title, modifier.reason);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn cmd_ncci(args: NcciArgs) {
    let dataset = load_dataset(&args.data);
    let cpt_a = parse_cpt(&args.cpt_a);
    let cpt_b = parse_cpt(&args.cpt_b);
    let result = check_ncci_pair(&dataset, &cpt_a, &cpt_b);
    println!("{} + {}: {}", result.cpt_a, result.cpt_b, result.status);
    println!("{}", result.message);
    if result.modifier_required {
        println!("A modifier is required to report these codes together.");
    }
}

fn parse_cpt(raw: &str) -> CptCode {
    match CptCode::new(raw) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn cmd_stats(args: StatsArgs) {
    let dataset = load_dataset(&args.data);
    dataset.statistics().print_summary();
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = MedcodeConfig::load();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.data.icd10_data.is_some() {
        config.icd10_data = args.data.icd10_data.clone();
    }
    if args.data.modifier_table.is_some() {
        config.modifier_table = args.data.modifier_table.clone();
    }
    if args.data.pair_edits.is_some() {
        config.pair_edits = args.data.pair_edits.clone();
    }

    let addr = config.socket_addr()?;

    // Dataset overrides may come from the config file as well as the CLI
    let merged = DataArgs {
        icd10_data: config.icd10_data.clone(),
        modifier_table: config.modifier_table.clone(),
        pair_edits: config.pair_edits.clone(),
    };
    let dataset = Arc::new(load_dataset(&merged));

    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
    rt.block_on(async {
        tokio::select! {
            _ = medcode::api::serve(dataset, addr) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received interrupt, shutting down");
            }
        }
    });
    Ok(())
}
