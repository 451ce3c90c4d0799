// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Nuuskija - LLM Service Fingerprinting Tool
 * Standalone CLI for probing and identifying LLM services
 *
 * Features:
 * - Declarative YAML probe catalog (embedded or on-disk)
 * - Concurrent probing with response memoization
 * - Model enumeration for matched services
 * - Table, JSON and JSONL output
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets, ContentArrangement, Table};
use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, Level};
use validator::Validate;

use nuuskija::config::{ScannerConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT_SECS};
use nuuskija::output::{self, OutputFormat};
use nuuskija::probe_loader;
use nuuskija::scanner::Scanner;
use nuuskija::target::{extract_port, normalize_targets};
use nuuskija::types::Probe;

/// Nuuskija - LLM Service Fingerprinting Tool
#[derive(Parser)]
#[command(name = "nuuskija")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version)]
#[command(about = "Fingerprints LLM services by HTTP probing. Fast, declarative, Rust.", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    output: OutputFormatArg,

    /// Override probe definitions directory
    #[arg(short, long, global = true)]
    probes_dir: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(short, long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Maximum concurrent probe requests per target
    #[arg(short, long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Maximum response body size in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RESPONSE_BYTES)]
    max_response_size: usize,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Path to custom CA certificate file
    #[arg(long, global = true)]
    ca_cert: Option<PathBuf>,

    /// Suppress non-match output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe targets to identify LLM services
    ///
    /// Targets can be given as arguments, read from a file with -f, or
    /// piped on stdin (use "-" or just pipe with no arguments).
    Probe {
        /// Target URL(s) to probe
        targets: Vec<String>,

        /// Read targets from file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Include generator configs in output for matched probes
        #[arg(long)]
        generator_configs: bool,
    },

    /// List all available probe definitions
    List,

    /// Validate probe definition files in a directory
    Validate {
        /// Directory containing probe YAML files
        dir: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormatArg {
    Table,
    Json,
    Jsonl,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(format: OutputFormatArg) -> Self {
        match format {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Jsonl => OutputFormat::Jsonl,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("nuuskija-worker")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(async_main(cli)) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Probe {
            targets,
            file,
            generator_configs,
        } => run_probe(&cli, targets, file.as_deref(), *generator_configs).await,
        Commands::List => run_list(&cli),
        Commands::Validate { dir } => run_validate(dir.clone()),
    }
}

async fn run_probe(
    cli: &Cli,
    targets: &[String],
    targets_file: Option<&Path>,
    generator_configs: bool,
) -> Result<()> {
    let targets = load_targets(targets, targets_file).context("loading targets")?;
    let targets = normalize_targets(&targets);
    if targets.is_empty() {
        bail!("no targets specified. Use --help for usage information");
    }

    let probes = load_probes(cli)?;
    if probes.is_empty() {
        bail!("no probe definitions found");
    }

    let config = ScannerConfig {
        concurrency: cli.concurrency,
        timeout_secs: cli.timeout,
        max_response_bytes: cli.max_response_size,
        insecure_skip_verify: cli.insecure,
        ca_cert_path: cli.ca_cert.clone(),
        emit_generator_configs: generator_configs,
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid scanner configuration: {e}"))?;

    info!(
        "scanning {} target(s) with {} probes, concurrency {}",
        targets.len(),
        probes.len(),
        config.concurrency
    );

    let scanner = Scanner::new(&config)?;
    let start = Instant::now();

    let mut results = Vec::new();
    for target in &targets {
        let target_port = extract_port(target);
        let sorted = probe_loader::sort_by_port_hint(&probes, target_port);

        let target_results = scanner.scan(target, &sorted).await;
        if target_results.is_empty() && !cli.quiet {
            eprintln!("No match found for {target}");
        }
        results.extend(target_results);
    }

    info!(
        "scan complete: {} match(es) in {:.2}s",
        results.len(),
        start.elapsed().as_secs_f64()
    );

    let mut writer = output::new_writer(cli.output.into(), std::io::stdout());
    writer.write(&results).context("writing output")?;

    Ok(())
}

fn run_list(cli: &Cli) -> Result<()> {
    let probes = load_probes(cli)?;
    if probes.is_empty() {
        println!("No probe definitions found");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "NAME",
            "DESCRIPTION",
            "PORT HINT",
            "SPECIFICITY",
            "REQUESTS",
            "CATEGORY",
        ]);

    for probe in &probes {
        let port_hint = if probe.port_hint == 0 {
            "-".to_string()
        } else {
            probe.port_hint.to_string()
        };

        table.add_row(vec![
            probe.name.clone(),
            probe.description.clone(),
            port_hint,
            probe.effective_specificity().to_string(),
            probe.requests.len().to_string(),
            probe.category.clone(),
        ]);
    }

    println!("{table}");
    println!("\nTotal: {} probe definitions", probes.len());
    Ok(())
}

fn run_validate(dir: PathBuf) -> Result<()> {
    let entries = std::fs::read_dir(&dir)
        .with_context(|| format!("reading directory {}", dir.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    paths.sort();

    let mut valid_count = 0;
    let mut error_count = 0;

    for path in paths {
        if path.is_dir() {
            continue;
        }

        let filename = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        if !filename.ends_with(".yaml") && !filename.ends_with(".yml") {
            continue;
        }

        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) => {
                println!("ERROR: {filename} - failed to read: {e}");
                error_count += 1;
                continue;
            }
        };

        let probe = match probe_loader::parse_probe(&data) {
            Ok(probe) => probe,
            Err(e) => {
                println!("ERROR: {filename} - invalid YAML: {e}");
                error_count += 1;
                continue;
            }
        };

        let errors = probe_loader::validate_probe(&probe);
        if !errors.is_empty() {
            for e in errors {
                println!("ERROR: {filename} - {e}");
            }
            error_count += 1;
            continue;
        }

        println!("OK: {filename}");
        valid_count += 1;
    }

    println!("\nValidation complete: {valid_count} valid, {error_count} errors");

    if error_count > 0 {
        bail!("validation failed with {error_count} errors");
    }
    Ok(())
}

fn load_probes(cli: &Cli) -> Result<Vec<Probe>> {
    let probes = match &cli.probes_dir {
        Some(dir) => probe_loader::load_probes_from_dir(dir)
            .with_context(|| format!("loading probes from {}", dir.display()))?,
        None => probe_loader::load_embedded_probes().context("loading embedded probes")?,
    };
    Ok(probes)
}

/// Resolve targets from arguments, a file, or stdin. A lone "-" argument
/// or piped stdin with no arguments reads one target per line.
fn load_targets(args: &[String], targets_file: Option<&Path>) -> Result<Vec<String>> {
    if let Some(path) = targets_file {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening targets file {}", path.display()))?;
        return read_targets(std::io::BufReader::new(file));
    }

    if args.len() == 1 && args[0] == "-" {
        return read_targets(std::io::stdin().lock());
    }

    if args.is_empty() {
        if !std::io::stdin().is_terminal() {
            return read_targets(std::io::stdin().lock());
        }
        return Ok(Vec::new());
    }

    Ok(args.to_vec())
}

fn read_targets<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut targets = Vec::new();
    for line in reader.lines() {
        let line = line.context("reading targets")?;
        if !line.trim().is_empty() {
            targets.push(line);
        }
    }
    Ok(targets)
}
