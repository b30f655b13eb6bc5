use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use root_core::keyword_csv::{read_rows, write_output_file};
use root_core::{AnalysisReport, Mode, RootEngine};
use std::path::PathBuf;
use tracing::{debug, info};

const VOCABULARY_PATH: &str = "root_analysis_config.json";
const VOCABULARY_ENV: &str = "ROOT_ANALYSIS_CONFIG";
const SUMMARY_ROOTS: usize = 10;

/// Generate normalized root analysis from a keyword CSV
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the keyword export CSV
    keywords_csv: PathBuf,

    /// Path to write the generated root analysis CSV
    output_csv: PathBuf,

    /// Output mode: 'full' expands every sub-phrase, 'simple' consolidates whole keywords
    #[arg(long, default_value = "full")]
    mode: String,

    /// Vocabulary file (overrides ROOT_ANALYSIS_CONFIG)
    #[arg(long)]
    vocab: Option<PathBuf>,

    /// Also write the full JSON report, members included
    #[arg(long)]
    report: Option<PathBuf>,

    /// Report learned vocabulary without saving it
    #[arg(long)]
    no_learn: bool,
}

fn vocabulary_path(args: &Args) -> PathBuf {
    if let Some(path) = &args.vocab {
        return path.clone();
    }
    std::env::var(VOCABULARY_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(VOCABULARY_PATH))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mode: Mode = args.mode.parse()?;

    let vocab_path = vocabulary_path(&args);
    debug!("Using vocabulary file: {}", vocab_path.display());
    let mut engine = RootEngine::from_file_or_default(&vocab_path)
        .with_context(|| format!("loading vocabulary {}", vocab_path.display()))?;

    let rows = read_rows(&args.keywords_csv)
        .with_context(|| format!("reading {}", args.keywords_csv.display()))?;
    if rows.is_empty() {
        anyhow::bail!("No keyword rows found in input");
    }

    let report = if args.no_learn {
        engine.analyze(&rows, mode)?
    } else {
        engine.run(&rows, mode)?
    };

    write_output_file(&args.output_csv, &report.results, mode)
        .with_context(|| format!("writing {}", args.output_csv.display()))?;
    info!("Wrote {} roots to {}", report.results.len(), args.output_csv.display());

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote JSON report to {}", path.display());
    }

    print_summary(&report, args.no_learn);
    Ok(())
}

fn print_summary(report: &AnalysisReport, dry_run: bool) {
    println!(
        "{} {} keywords -> {} roots ({} mode)",
        "Root analysis:".bold(),
        report.total_keywords,
        report.results.len(),
        report.mode
    );
    for root in report.results.iter().take(SUMMARY_ROOTS) {
        println!(
            "  {} freq {:>5}  volume {:>9}",
            format!("{:<40}", root.normalized_term).green(),
            root.frequency,
            root.search_volume
        );
    }

    let updates = &report.auto_config_updates;
    if updates.is_empty() {
        return;
    }
    let verb = if dry_run { "would add" } else { "added" };
    if !updates.new_stopwords.is_empty() {
        let words: Vec<&str> = updates.new_stopwords.iter().map(String::as_str).collect();
        println!("{} {verb} stopwords: {}", "[auto-config]".yellow(), words.join(", "));
    }
    if !updates.new_irregular_singulars.is_empty() {
        let pairs: Vec<String> = updates
            .new_irregular_singulars
            .iter()
            .map(|(plural, singular)| format!("{plural}->{singular}"))
            .collect();
        println!("{} {verb} irregulars: {}", "[auto-config]".yellow(), pairs.join(", "));
    }
}
