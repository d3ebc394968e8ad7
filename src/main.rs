use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use script_scan::{
    format_block, format_diagnostic, log_extraction_summary, log_scan_summary, Extractor,
    ScanConfig, Scanner,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::exit;

#[derive(Parser)]
#[command(
    name = "script-scan",
    version,
    about = "Extracts fenced code blocks from free-form text and scans script source for syntax problems"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract fenced code blocks from FILE (or stdin) and classify them
    Extract {
        /// Input file; stdin when absent or "-"
        file: Option<PathBuf>,

        /// TOML config file with marker sets and indent unit
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Emit the block list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scan script source from FILE (or stdin) for syntax problems
    Lint {
        /// Input file; stdin when absent or "-"
        file: Option<PathBuf>,

        /// TOML config file with marker sets and indent unit
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Emit the diagnostic list as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();

    match run() {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract { file, config, json } => {
            run_extract(file.as_deref(), config.as_deref(), json)
        }
        Command::Lint { file, config, json } => run_lint(file.as_deref(), config.as_deref(), json),
    }
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(p) => ScanConfig::from_path(p),
        None => Ok(ScanConfig::default()),
    }
}

/// Reads the input text plus a display name for diagnostics.
fn read_input(file: Option<&Path>) -> Result<(String, String)> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok((path.display().to_string(), text))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(("<stdin>".to_string(), text))
        }
    }
}

fn run_extract(file: Option<&Path>, config: Option<&Path>, json: bool) -> Result<i32> {
    let extractor = Extractor::new(load_config(config)?)?;
    let (_name, text) = read_input(file)?;

    let blocks = extractor.extract(&text);

    if json {
        serde_json::to_writer(io::stdout(), &blocks)?;
        println!();
    } else {
        for (index, block) in blocks.iter().enumerate() {
            println!("{}", format_block(index, block));
        }
    }

    log_extraction_summary(&blocks);
    Ok(0)
}

fn run_lint(file: Option<&Path>, config: Option<&Path>, json: bool) -> Result<i32> {
    let scanner = Scanner::new(load_config(config)?)?;
    let (name, source) = read_input(file)?;

    let diagnostics = scanner.scan(&source);

    if json {
        serde_json::to_writer(io::stdout(), &diagnostics)?;
        println!();
    } else {
        for diagnostic in &diagnostics {
            println!("{}", format_diagnostic(&name, diagnostic));
        }
    }

    log_scan_summary(&diagnostics);
    Ok(if diagnostics.is_empty() { 0 } else { 1 })
}
