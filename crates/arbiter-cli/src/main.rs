//! CLI for inspecting and validating scenario corpora.
//!
//! The model run itself happens elsewhere; this binary covers the corpus
//! side: which schema every scenario would be graded under (`analyze`), and
//! whether every scenario file parses and resolves to a buildable schema
//! (`validate`).

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use arbiter_core::{classify, load_dir, resolve_schema, yaml_files, Scenario, SchemaRegistry};

#[derive(Parser)]
#[command(name = "arbiter", version, about = "Scenario corpus tools for arbiter")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify every scenario and print the schema distribution
    Analyze {
        /// Directory tree of scenario YAML files
        dir: PathBuf,
    },

    /// Check that every scenario file parses and resolves to a schema
    Validate {
        /// Directory tree of scenario YAML files
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Analyze { dir } => analyze(&dir),
        Command::Validate { dir } => validate(&dir),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn analyze(dir: &PathBuf) -> anyhow::Result<ExitCode> {
    let scenarios = load_dir(dir)
        .with_context(|| format!("Failed to load scenarios from {}", dir.display()))?;
    tracing::info!(total = scenarios.len(), "Loaded scenario corpus");

    let mut by_schema: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_category: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();

    for scenario in &scenarios {
        let classification = classify(scenario);
        *by_schema.entry(classification.schema_name.clone()).or_default() += 1;

        let cat_sub = category_key(scenario);
        *by_category
            .entry(cat_sub)
            .or_default()
            .entry(classification.schema_name)
            .or_default() += 1;
    }

    println!("SCHEMA DISTRIBUTION:");
    println!("{}", "-".repeat(30));
    for (schema, count) in &by_schema {
        println!("  {:<24} {:>3}", format!("{schema}:"), count);
    }

    println!("\nCATEGORY/SUBCATEGORY BREAKDOWN:");
    println!("{}", "-".repeat(40));
    for (cat_sub, schemas) in &by_category {
        println!("  {cat_sub}");
        for (schema, count) in schemas {
            println!("    {:<22} {:>2}", format!("{schema}:"), count);
        }
        println!();
    }

    println!("SUMMARY:");
    println!("{}", "-".repeat(20));
    println!("  Total scenarios: {}", scenarios.len());
    println!("  Unique schemas:  {}", by_schema.len());

    Ok(ExitCode::SUCCESS)
}

fn validate(dir: &PathBuf) -> anyhow::Result<ExitCode> {
    let registry = SchemaRegistry::new();
    let paths = yaml_files(dir)
        .with_context(|| format!("Failed to read scenario directory {}", dir.display()))?;

    let mut problems = 0usize;
    let mut checked = 0usize;

    for path in &paths {
        match Scenario::from_yaml_file(path) {
            Ok(scenario) => {
                checked += 1;
                let classification = classify(&scenario);
                if let Err(e) = resolve_schema(&registry, &classification) {
                    problems += 1;
                    println!("FAIL {} ({}): {}", path.display(), scenario.id, e);
                }
            }
            Err(e) => {
                problems += 1;
                println!("FAIL {}: {}", path.display(), e);
            }
        }
    }

    println!(
        "\nValidated {} of {} files, {} problem(s)",
        checked,
        paths.len(),
        problems
    );

    if problems == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn category_key(scenario: &Scenario) -> String {
    let category = if scenario.category.is_empty() {
        "uncategorized"
    } else {
        &scenario.category
    };
    let subcategory = if scenario.subcategory.is_empty() {
        "-"
    } else {
        &scenario.subcategory
    };
    format!("{category}/{subcategory}")
}
