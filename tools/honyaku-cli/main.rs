use clap::{Parser, ValueEnum};
use honyaku::prelude::*;
use itertools::Itertools;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// CLI-specific mirror of `Language` for clap to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LanguageCli {
    Php,
    Python,
    #[value(alias = "js")]
    Javascript,
}

impl From<LanguageCli> for Language {
    fn from(value: LanguageCli) -> Self {
        match value {
            LanguageCli::Php => Language::Php,
            LanguageCli::Python => Language::Python,
            LanguageCli::Javascript => Language::JavaScript,
        }
    }
}

/// Compiles an exported automation workflow into standalone classes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow JSON export
    workflow_path: PathBuf,

    /// Target language; repeat to generate several
    #[arg(short, long, value_enum, env = "HONYAKU_LANGUAGE", default_value = "php")]
    language: Vec<LanguageCli>,

    /// Directory with template overrides (classes/<language>.tpl, nodes/<language>/<type>.tpl)
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Directory to write generated files into; prints to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Credentials directory as referenced from the generated files
    #[arg(long)]
    credentials_dir: Option<String>,

    /// Version tag written into the generated class header
    #[arg(long)]
    version_tag: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli);
}

fn run(cli: Cli) {
    let total_start = Instant::now();

    // --- 1. Load and convert the workflow ---
    let workflow_json = fs::read_to_string(&cli.workflow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read workflow file '{}': {}",
            cli.workflow_path.display(),
            e
        ))
    });
    let graph = WorkflowGraph::from_json(&workflow_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load workflow: {}", e)));

    // --- 2. Templates and compiler configuration ---
    let mut catalogue = TemplateCatalogue::builtin();
    if let Some(dir) = &cli.templates {
        let loaded = catalogue
            .load_dir(dir)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load templates: {}", e)));
        eprintln!("Loaded {} template(s) from '{}'", loaded, dir.display());
    }

    let mut builder = Compiler::builder(catalogue);
    if let Some(dir) = &cli.credentials_dir {
        builder = builder.with_credentials_dir(dir);
    }
    if let Some(tag) = &cli.version_tag {
        builder = builder.with_version(tag);
    }
    let compiler = builder.build();

    if let Some(dir) = &cli.output {
        fs::create_dir_all(dir).unwrap_or_else(|e| {
            exit_with_error(&format!(
                "Failed to create output directory '{}': {}",
                dir.display(),
                e
            ))
        });
    }

    // --- 3. Generate every requested language ---
    let languages: Vec<Language> = cli
        .language
        .iter()
        .copied()
        .map(Language::from)
        .unique()
        .collect();

    let mut failures = 0;
    for (language, result) in compiler.compile_all(&graph, &languages) {
        let unit = match result {
            Ok(unit) => unit,
            Err(e) => {
                eprintln!("Error ({}): {}", language, e);
                failures += 1;
                continue;
            }
        };

        match &cli.output {
            Some(dir) => {
                let path = dir.join(unit.file_name());
                fs::write(&path, &unit.source).unwrap_or_else(|e| {
                    exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
                });
                eprintln!(
                    "Generated {} ({} parameter(s), {} credential class(es))",
                    path.display(),
                    unit.inventory.len(),
                    unit.credentials.len()
                );
            }
            None => println!("{}", unit.source),
        }
    }

    eprintln!("Finished in {:?}", total_start.elapsed());
    if failures > 0 {
        std::process::exit(1);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
