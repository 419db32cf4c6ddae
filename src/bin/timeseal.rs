//! # timeseal CLI
//!
//! Seal documents, re-verify them later, and find near-duplicates.
//!
//! ## Usage
//! ```bash
//! # Seal a file (writes report.txt.seal.json)
//! timeseal seal report.txt
//!
//! # Check the file against its seal
//! timeseal verify report.txt report.txt.seal.json
//!
//! # Fingerprint files and group near-duplicates
//! timeseal fingerprint notes/*.md
//! timeseal dedupe notes/*.md --cluster --threshold 8
//!
//! # Capture a page as a notarized evidence record
//! timeseal evidence capture page.html --url https://example.com --title "Example"
//! timeseal evidence verify page.html.evidence.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use humantime::format_duration;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use timeseal::{
    similarity, FingerprintBuilder, NotaryEvidence, SealError, SealManager, SealVerification,
    SimHash64, SimilarityComparator, SimilarityConfig, TimeLockSeal, DEFAULT_SIMILARITY_THRESHOLD,
};
use tracing_subscriber::EnvFilter;

/// timeseal - tamper-evident seals and near-duplicate detection for documents
#[derive(Parser)]
#[command(name = "timeseal")]
#[command(version)]
#[command(about = "Seal documents in time and find near-duplicates")]
#[command(long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a time-lock seal for a file
    Seal {
        /// File to seal
        file: PathBuf,

        /// Where to write the seal (defaults to <file>.seal.json, "-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a file against a seal
    Verify {
        /// File to check
        file: PathBuf,

        /// Seal JSON file
        seal: PathBuf,
    },

    /// Print the SimHash fingerprint of each file
    #[command(alias = "fp")]
    Fingerprint {
        /// Files to fingerprint
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compare two files by fingerprint
    Compare {
        /// First file
        a: PathBuf,

        /// Second file
        b: PathBuf,

        /// Maximum Hamming distance to count as similar
        #[arg(short, long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
        threshold: u32,
    },

    /// Find near-duplicate files
    Dedupe {
        /// Files to compare
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Maximum Hamming distance to count as similar
        #[arg(short, long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
        threshold: u32,

        /// Group files into clusters instead of listing pairs
        #[arg(long)]
        cluster: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Capture and verify notarized evidence records
    #[command(subcommand)]
    Evidence(EvidenceCommands),
}

#[derive(Subcommand)]
enum EvidenceCommands {
    /// Seal an HTML file as evidence
    Capture {
        /// HTML file to capture
        file: PathBuf,

        /// Source URL of the content
        #[arg(long)]
        url: String,

        /// Title of the content
        #[arg(long, default_value = "")]
        title: String,

        /// Where to write the record (defaults to <file>.evidence.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-verify an evidence record
    Verify {
        /// Evidence JSON file
        record: PathBuf,
    },
}

#[derive(Serialize)]
struct PairReport<'a> {
    a: &'a str,
    b: &'a str,
    distance: u32,
    similarity: u32,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            match e.downcast_ref::<SealError>() {
                Some(seal_err) => eprintln!("{}: {}", "Error".red().bold(), seal_err.user_message()),
                None => eprintln!("{}: {:#}", "Error".red().bold(), e),
            }
            std::process::exit(2);
        }
    }
}

/// Main command runner; `Ok(false)` means a check ran and failed
fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Seal { file, output } => cmd_seal(&file, output),
        Commands::Verify { file, seal } => cmd_verify(&file, &seal),
        Commands::Fingerprint { files } => cmd_fingerprint(&files),
        Commands::Compare { a, b, threshold } => cmd_compare(&a, &b, threshold),
        Commands::Dedupe {
            files,
            threshold,
            cluster,
            json,
        } => cmd_dedupe(&files, threshold, cluster, json),
        Commands::Evidence(EvidenceCommands::Capture {
            file,
            url,
            title,
            output,
        }) => cmd_evidence_capture(&file, url, title, output),
        Commands::Evidence(EvidenceCommands::Verify { record }) => cmd_evidence_verify(&record),
    }
}

fn cmd_seal(file: &Path, output: Option<PathBuf>) -> anyhow::Result<bool> {
    let content = read_content(file)?;
    let seal = SealManager::new().create_seal(&content)?;
    let json = seal.to_json_pretty()?;

    let output = output.unwrap_or_else(|| with_suffix(file, "seal.json"));
    if output.as_os_str() == "-" {
        println!("{}", json);
        return Ok(true);
    }

    fs::write(&output, &json).with_context(|| format!("writing {}", output.display()))?;
    println!(
        "{} Sealed {} -> {}",
        "✓".green().bold(),
        file.display(),
        output.display()
    );
    println!("  Content hash: {}", seal.content_hash.yellow());
    println!("  Seal hash:    {}", seal.seal_hash.yellow());
    Ok(true)
}

fn cmd_verify(file: &Path, seal_path: &Path) -> anyhow::Result<bool> {
    let content = read_content(file)?;
    let seal_json = read_content(seal_path)?;
    let manager = SealManager::new();
    let report = manager.verify_json(&content, &seal_json);

    print_verification(&report);
    if report.valid {
        if let Ok(seal) = TimeLockSeal::from_json(&seal_json) {
            print_seal_age(&seal);
        }
    }
    Ok(report.valid)
}

fn cmd_fingerprint(files: &[PathBuf]) -> anyhow::Result<bool> {
    let builder = FingerprintBuilder::new();
    for file in files {
        let fingerprint = builder.fingerprint(&read_content(file)?);
        println!("{}  {}", fingerprint, file.display());
    }
    Ok(true)
}

fn cmd_compare(a: &Path, b: &Path, threshold: u32) -> anyhow::Result<bool> {
    let config = similarity_config(threshold);
    let builder = FingerprintBuilder::from_config(&config);
    let fa = builder.fingerprint(&read_content(a)?);
    let fb = builder.fingerprint(&read_content(b)?);

    let distance = similarity::hamming_distance(fa, fb);
    let percent = similarity::distance_to_similarity(distance);
    let similar = SimilarityComparator::from_config(&config).is_similar(fa, fb);

    println!("  {}  {}", fa, a.display());
    println!("  {}  {}", fb, b.display());
    println!("  Hamming distance: {}", distance);
    println!("  Similarity: {}%", percent);
    println!(
        "  Near-duplicate: {}",
        if similar { "yes".green() } else { "no".normal() }
    );
    Ok(true)
}

fn cmd_dedupe(files: &[PathBuf], threshold: u32, cluster: bool, json: bool) -> anyhow::Result<bool> {
    let config = similarity_config(threshold);
    let builder = FingerprintBuilder::from_config(&config);
    let comparator = SimilarityComparator::from_config(&config);
    let fingerprints = files
        .iter()
        .map(|f| read_content(f).map(|c| builder.fingerprint(&c)))
        .collect::<anyhow::Result<Vec<SimHash64>>>()?;
    let names: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();

    if cluster {
        let clusters = comparator.cluster(&fingerprints);
        if json {
            let named: Vec<Vec<&str>> = clusters
                .iter()
                .map(|c| c.iter().map(|&i| names[i].as_str()).collect())
                .collect();
            println!("{}", serde_json::to_string_pretty(&named)?);
        } else {
            for (n, members) in clusters.iter().enumerate().filter(|(_, c)| c.len() > 1) {
                println!("{} {}", "Cluster".bold(), n + 1);
                for &i in members {
                    println!("  {}", names[i]);
                }
            }
        }
        return Ok(true);
    }

    let pairs = comparator.find_similar_pairs(&fingerprints);
    if json {
        let report: Vec<PairReport> = pairs
            .iter()
            .map(|p| PairReport {
                a: &names[p.i],
                b: &names[p.j],
                distance: p.distance,
                similarity: p.similarity,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if pairs.is_empty() {
        println!("No near-duplicates within {} bits", threshold);
    } else {
        for p in &pairs {
            println!(
                "{:>3}%  {}  {}",
                p.similarity.to_string().green(),
                names[p.i],
                names[p.j]
            );
        }
    }
    Ok(true)
}

fn cmd_evidence_capture(
    file: &Path,
    url: String,
    title: String,
    output: Option<PathBuf>,
) -> anyhow::Result<bool> {
    let html = read_content(file)?;
    let evidence = NotaryEvidence::capture(url, title, html, &SealManager::new())?;

    let output = output.unwrap_or_else(|| with_suffix(file, "evidence.json"));
    evidence
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "{} Captured evidence {} -> {}",
        "✓".green().bold(),
        evidence.short_id().yellow(),
        output.display()
    );
    Ok(true)
}

fn cmd_evidence_verify(record: &Path) -> anyhow::Result<bool> {
    let evidence = NotaryEvidence::load(record)?;
    let report = evidence.verify(&SealManager::new());

    println!("{} {}", "Evidence".bold(), evidence.short_id().yellow());
    println!("  Source: {}", evidence.source_url);
    if !evidence.title.is_empty() {
        println!("  Title:  {}", evidence.title);
    }
    print_verification(&report);
    if report.valid {
        print_seal_age(&evidence.seal);
    }
    Ok(report.valid)
}

fn print_verification(report: &SealVerification) {
    match report.reason_text() {
        None => println!("{} Seal is valid", "✓".green().bold()),
        Some(reason) => println!("{} {}", "✗".red().bold(), reason.red()),
    }
}

fn print_seal_age(seal: &TimeLockSeal) {
    if let (Some(at), Some(age)) = (seal.sealed_at(), seal.age()) {
        println!(
            "  Sealed at {} ({} ago)",
            at.format("%Y-%m-%d %H:%M:%S UTC"),
            format_duration(Duration::from_secs(age.as_secs()))
        );
    }
}

fn similarity_config(threshold: u32) -> SimilarityConfig {
    SimilarityConfig {
        threshold,
        ..Default::default()
    }
}

fn read_content(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
