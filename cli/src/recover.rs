//! Secret Recovery Runner
//!
//! Reads share documents, reconstructs each secret and prints the results.
//! A failing document is reported and the remaining ones are still processed.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;
use quorum_config::{OutputFormat, QuorumConfig};
use quorum_threshold::{Reconstruction, Reconstructor, ShareSet, decode_document};
use serde_json::json;

const RULE: &str = "-----------------------------------------------------";

/// Options for a `recover` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverConfig {
    /// Share documents, processed in order
    pub files: Vec<PathBuf>,
    pub format: OutputFormat,
    /// Print every candidate with its vote count
    pub show_tally: bool,
    /// Refuse documents whose C(n, k) exceeds this
    pub max_combinations: Option<u64>,
}

impl RecoverConfig {
    pub fn from_config(config: &QuorumConfig) -> Self {
        Self {
            files: config.inputs.files.iter().map(PathBuf::from).collect(),
            format: config.output.format,
            show_tally: config.output.show_tally,
            max_combinations: config.engine.max_combinations,
        }
    }
}

/// Read and decode one share document
pub fn load_share_set(path: &Path) -> anyhow::Result<ShareSet> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read share file: {}", path.display()))?;
    let shares = decode_document(&contents)
        .with_context(|| format!("Failed to decode share file: {}", path.display()))?;
    debug!(
        "{}: {} shares, threshold {}",
        path.display(),
        shares.len(),
        shares.threshold()
    );
    Ok(shares)
}

/// Reconstruct the secret held in one share document
pub fn recover_file(path: &Path, reconstructor: &Reconstructor) -> anyhow::Result<Reconstruction> {
    let shares = load_share_set(path)?;
    reconstructor
        .run(&shares)
        .with_context(|| format!("Failed to reconstruct secret from: {}", path.display()))
}

/// Process every configured document; returns the number that failed
pub fn run_recover(config: &RecoverConfig) -> usize {
    let reconstructor = Reconstructor::new().with_max_combinations(config.max_combinations);
    let results: Vec<Outcome<'_>> = config
        .files
        .iter()
        .map(|path| (path, recover_file(path, &reconstructor)))
        .collect();

    match config.format {
        OutputFormat::Text => {
            let written = write_text(
                &results,
                config.show_tally,
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            );
            if let Err(e) = written {
                eprintln!("❌ Error writing output: {}", e);
            }
        }
        OutputFormat::Json => print_json(&results),
    }

    results.iter().filter(|(_, r)| r.is_err()).count()
}

type Outcome<'a> = (&'a PathBuf, anyhow::Result<Reconstruction>);

fn write_text(
    results: &[Outcome<'_>],
    show_tally: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "Starting secret computation for {} share file(s)...", results.len())?;
    writeln!(out, "{}", RULE)?;

    for (i, (path, result)) in results.iter().enumerate() {
        match result {
            Ok(r) => {
                writeln!(
                    out,
                    "Secret for Test Case {} ({}): {}",
                    i + 1,
                    path.display(),
                    r.secret
                )?;
                if show_tally {
                    writeln!(
                        out,
                        "   votes {}/{}, {} skipped, {} non-integral{}",
                        r.votes,
                        r.combinations,
                        r.skipped,
                        r.non_integral,
                        if r.tied { " (tied)" } else { "" }
                    )?;
                    for (candidate, count) in &r.tally {
                        writeln!(out, "     {:>6}  {}", count, candidate)?;
                    }
                }
            }
            Err(e) => {
                writeln!(err, "❌ Error processing '{}': {:#}", path.display(), e)?;
            }
        }
    }

    writeln!(out, "{}", RULE)?;
    writeln!(out, "Computation finished.")
}

fn print_json(results: &[Outcome<'_>]) {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|(path, result)| match result {
            Ok(r) => json!({ "file": path.display().to_string(), "result": r }),
            Err(e) => json!({ "file": path.display().to_string(), "error": format!("{:#}", e) }),
        })
        .collect();

    match serde_json::to_string_pretty(&entries) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("❌ Error rendering JSON output: {}", e),
    }
}
