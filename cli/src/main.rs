mod recover;

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use log::LevelFilter;
use quorum_config::{OutputFormat, QuorumConfig};
use quorum_threshold::ShareSet;

use crate::recover::{RecoverConfig, load_share_set, run_recover};

fn main() {
    let from_env = init_logging();

    let config = match QuorumConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error loading config: {:#}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins; otherwise the configured level applies.
    if !from_env {
        match config.log_level.parse::<LevelFilter>() {
            Ok(level) => log::set_max_level(level),
            Err(_) => log::warn!("Ignoring unknown log_level {}", config.log_level),
        }
    }

    let args: Vec<String> = env::args().collect();

    // No command behaves like `recover` over the configured documents.
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("recover");

    match cmd {
        "recover" => {
            let options = parse_recover_args(&args[args.len().min(2)..], &config);
            let failures = run_recover(&options);
            if failures > 0 {
                std::process::exit(1);
            }
        }
        "decode" => {
            let Some(path) = args.get(2) else {
                println!("Usage: decode <file>");
                return;
            };
            if let Err(e) = decode(path) {
                eprintln!("❌ Error decoding shares: {:#}", e);
                std::process::exit(1);
            }
        }
        "config" => {
            print!("{}", QuorumConfig::generate_sample());
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        _ => {
            println!("❌ Unknown command: {}", cmd);
            println!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Quorum - Threshold Secret Recovery");
    println!();
    println!("USAGE:");
    println!("  quorum <command> [args]");
    println!();
    println!("COMMANDS:");
    println!("  recover [files...] [options]   Reconstruct the secret in each share file");
    println!("  decode <file>                  Print the decoded (x, y) shares");
    println!("  config                         Print a sample quorum.toml");
    println!("  help                           Show this help message");
    println!();
    println!("RECOVER OPTIONS:");
    println!("  --json                         Emit results as JSON");
    println!("  --tally                        Show vote counts per candidate");
    println!("  --max-combinations <n>         Refuse files with more than n subsets");
    println!();
    println!("EXAMPLES:");
    println!("  quorum                                   # Recover configured files");
    println!("  quorum recover shares.json --tally       # Show the vote breakdown");
    println!("  quorum decode shares.json                # Inspect decoded shares");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("  QUORUM_CONFIG            Path to quorum.toml");
    println!("  QUORUM_MAX_COMBINATIONS  Combination limit");
    println!("  QUORUM_OUTPUT_FORMAT     text or json");
    println!("  RUST_LOG                 Log level (debug/info/warn/error)");
}

fn parse_recover_args(args: &[String], config: &QuorumConfig) -> RecoverConfig {
    let mut options = RecoverConfig::from_config(config);
    let mut files = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => options.format = OutputFormat::Json,
            "--tally" => options.show_tally = true,
            "--max-combinations" => {
                if let Some(limit) = args.get(i + 1) {
                    match limit.parse() {
                        Ok(limit) => options.max_combinations = Some(limit),
                        Err(_) => log::warn!("Ignoring invalid --max-combinations {}", limit),
                    }
                    i += 1;
                }
            }
            other => files.push(PathBuf::from(other)),
        }
        i += 1;
    }

    if !files.is_empty() {
        options.files = files;
    }
    options
}

/// Install the logger before anything else can log.
///
/// Returns true when `RUST_LOG` controls the filter.
fn init_logging() -> bool {
    let from_env = env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace")).init();
    if !from_env {
        log::set_max_level(LevelFilter::Info);
    }
    from_env
}

fn decode(path: &str) -> anyhow::Result<()> {
    let shares = load_share_set(path.as_ref())?;
    write_points(&shares, &mut io::stdout().lock())?;
    Ok(())
}

fn write_points(shares: &ShareSet, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "threshold k = {}, shares n = {}", shares.threshold(), shares.len())?;
    for point in shares.points() {
        writeln!(out, "  ({}, {})", point.x, point.y)?;
    }
    Ok(())
}
