use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use richpath::config::{Config, OutputFormat};
use richpath::file::corpus::{check_accepted, check_rejected, load_corpus, CorpusReport};
use richpath::file::output::format_node;
use richpath::ypath::AttributeConflictPolicy;

/// richpath - Parse and render rich YPath expressions
#[derive(Parser)]
#[command(name = "richpath")]
#[command(version)]
#[command(about = "Parse and render rich YPath expressions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse expressions and print their tree form
    Parse {
        /// Rich path expressions, e.g. '<a=b>//home/table{x,y}[#0:#10]'
        #[arg(required = true)]
        expressions: Vec<String>,

        /// Output format (default: from config, else yson)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Policy for literal `columns`/`ranges` attributes (default: from config)
        #[arg(short, long, value_enum)]
        conflict: Option<AttributeConflictPolicy>,
    },

    /// Print expressions in canonical rich path form
    Canonical {
        #[arg(required = true)]
        expressions: Vec<String>,
    },

    /// Check a fixture corpus file
    Check {
        /// Corpus file with one case per line
        file: PathBuf,

        /// Every line must fail to parse instead of matching its expected tree
        #[arg(long)]
        rejected: bool,
    },
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Command::Parse {
            expressions,
            format,
            conflict,
        } => {
            let format = format.unwrap_or(config.output_format);
            let policy = conflict.unwrap_or(config.attribute_conflict);
            for expression in &expressions {
                let node = richpath::parse(expression)
                    .and_then(|path| path.to_tree_with(policy))
                    .with_context(|| format!("Failed to parse '{}'", expression))?;
                println!("{}", format_node(&node, format, config.pretty)?);
            }
        }
        Command::Canonical { expressions } => {
            for expression in &expressions {
                let path = richpath::parse(expression)
                    .with_context(|| format!("Failed to parse '{}'", expression))?;
                println!("{}", path);
            }
        }
        Command::Check { file, rejected } => {
            let cases = load_corpus(&file)?;
            let report = if rejected {
                check_rejected(&cases)
            } else {
                check_accepted(&cases, config.attribute_conflict)
            };
            print_report(&report);
            if !report.is_success() {
                bail!(
                    "{} of {} cases failed in {}",
                    report.failures.len(),
                    report.total,
                    file.display()
                );
            }
            info!(cases = report.total, "corpus passed");
        }
    }

    Ok(())
}

fn print_report(report: &CorpusReport) {
    for failure in &report.failures {
        eprintln!("line {}: {}: {}", failure.line, failure.expression, failure.reason);
    }
    println!("{}/{} cases passed", report.passed(), report.total);
}
