//! Domain Verify CLI Application
//!
//! Reads a CSV of email addresses, flags domains that are disposable or have
//! no MX records, and writes the invalid ones to two CSV reports.

mod logging;
mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_verify_lib::{
    extract_domains, load_env_config, parse_timeout, read_emails, run_pipeline, BlocklistConfig,
    CheckConfig, ConfigManager, DisposableDomains, DnsResolver, DomainVerifier, EnvConfig,
    FileConfig, PipelineOptions, MAX_CONCURRENCY,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{debug, info};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-verify
#[derive(Parser, Debug)]
#[command(name = "domain-verify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Flag disposable and undeliverable email domains in a CSV file")]
#[command(
    long_about = "Flag disposable and undeliverable email domains in a CSV file.\n\nEvery domain is checked against a disposable-domain blocklist and, if it passes, queried for MX records. Invalid domains are written to two CSV reports."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Input CSV with an 'email' column [default: emails.csv]
    #[arg(short = 'i', long = "input", value_name = "FILE", help_heading = "Files")]
    pub input: Option<String>,

    /// Report of every invalid domain [default: invalid_domains.csv]
    #[arg(short = 'o', long = "output", value_name = "FILE", help_heading = "Files")]
    pub output: Option<String>,

    /// Report of unique invalid domains [default: unique_invalid_domains.csv]
    #[arg(
        short = 'u',
        long = "unique-output",
        value_name = "FILE",
        help_heading = "Files"
    )]
    pub unique_output: Option<String>,

    /// Max simultaneous DNS queries [default: 10, max: 100]
    #[arg(short = 'c', long = "concurrency", value_name = "N", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// DNS query timeout, e.g. "5s", "2m" [default: 5s]
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Extra disposable domains, one per line
    #[arg(long = "blocklist", value_name = "FILE", help_heading = "Blocklist")]
    pub blocklist: Option<String>,

    /// Do not include the built-in disposable list
    #[arg(long = "no-builtin-blocklist", help_heading = "Blocklist")]
    pub no_builtin_blocklist: bool,

    /// Extract and classify domains without DNS queries or output files
    #[arg(long = "dry-run", help_heading = "Output")]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(short = 'j', long = "json", help_heading = "Output")]
    pub json: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Everything a run needs after config files, environment and flags are merged.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub check: CheckConfig,
    pub options: PipelineOptions,
    pub blocklist: BlocklistConfig,
}

/// Dry-run report for `--json`.
#[derive(Debug, Serialize)]
struct DryRunSummary {
    total_domains: usize,
    disposable: usize,
    dns_checks: usize,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    logging::init_cli_logger(args.verbose);
    debug!("domain-verify v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_domain_verify(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "Concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            ));
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    if let (Some(output), Some(unique)) = (&args.output, &args.unique_output) {
        if output == unique {
            return Err("--output and --unique-output must be different files".to_string());
        }
    }

    Ok(())
}

/// Check the merged file locations before any work starts.
fn validate_settings(settings: &Settings) -> Result<(), String> {
    let options = &settings.options;
    if options.invalid_output == options.unique_output {
        return Err(format!(
            "Both reports would be written to '{}'",
            options.invalid_output.display()
        ));
    }
    if options.input == options.invalid_output || options.input == options.unique_output {
        return Err(format!(
            "Input file '{}' would be overwritten by a report",
            options.input.display()
        ));
    }
    Ok(())
}

async fn run_domain_verify(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = build_settings(&args)?;
    validate_settings(&settings)?;

    let classifier = settings.blocklist.load()?;

    if args.dry_run {
        return run_dry_run(&settings, &classifier, args.json);
    }

    let resolver = Arc::new(DnsResolver::new(settings.check.dns_timeout));
    let verifier = DomainVerifier::with_parts(settings.check.clone(), classifier, resolver);

    if !args.json {
        ui::print_header(&settings, verifier.classifier().len());
    }

    let quiet = args.json;
    let summary = run_pipeline(&verifier, &settings.options, |done, total| {
        if !quiet {
            ui::print_progress(done, total);
        }
    })
    .await?;

    info!(
        total = summary.total_domains,
        invalid = summary.invalid_count,
        "run finished in {:.2}s",
        summary.elapsed_seconds
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        ui::print_summary(&summary);
    }

    Ok(())
}

/// Classify every extracted domain without touching DNS or the output paths.
fn run_dry_run(
    settings: &Settings,
    classifier: &DisposableDomains,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let emails = read_emails(&settings.options.input)?;
    let classified: Vec<(String, bool)> = extract_domains(&emails)
        .into_iter()
        .map(|domain| {
            let disposable = classifier.is_disposable(&domain);
            (domain, disposable)
        })
        .collect();

    let disposable = classified.iter().filter(|(_, d)| *d).count();
    let report = DryRunSummary {
        total_domains: classified.len(),
        disposable,
        dns_checks: classified.len() - disposable,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        ui::print_dry_run(&classified);
        eprintln!(
            "{} domains found, {} disposable, {} would be queried",
            report.total_domains, report.disposable, report.dns_checks
        );
    }
    Ok(())
}

/// Merge config files, environment and CLI flags, lowest precedence first.
fn build_settings(args: &Args) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::default();

    // Create config manager for file discovery
    let config_manager = ConfigManager::new(args.verbose);
    let env_config = load_env_config(args.verbose);

    // Step 1: Determine config file path and load config files
    if let Some(explicit_config_path) = &args.config {
        debug!("Using explicit config file (CLI --config): {}", explicit_config_path);
        let file_config = config_manager
            .load_file(explicit_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit_config_path, e))?;
        settings = merge_file_config(settings, file_config);
    } else if let Some(env_config_path) = &env_config.config {
        debug!("Using explicit config file (DV_CONFIG): {}", env_config_path);
        let file_config = config_manager
            .load_file(env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?;
        settings = merge_file_config(settings, file_config);
    } else {
        debug!("Discovering config files");
        let file_config = config_manager.discover_and_load()?;
        settings = merge_file_config(settings, file_config);
    }

    // Step 2: Apply environment variables (DV_*)
    settings = apply_environment_config(settings, &env_config);

    // Step 3: Apply CLI arguments (highest precedence)
    settings = apply_cli_args(settings, args);

    Ok(settings)
}

/// Merge FileConfig into the settings.
fn merge_file_config(mut settings: Settings, file_config: FileConfig) -> Settings {
    if let Some(defaults) = file_config.defaults {
        if let Some(concurrency) = defaults.concurrency {
            settings.check = settings.check.with_concurrency(concurrency);
        }
        if let Some(timeout) = defaults.timeout.as_deref().and_then(parse_timeout) {
            settings.check = settings.check.with_dns_timeout(timeout);
        }
        if let Some(input) = defaults.input {
            settings.options.input = PathBuf::from(input);
        }
        if let Some(output) = defaults.output {
            settings.options.invalid_output = PathBuf::from(output);
        }
        if let Some(unique_output) = defaults.unique_output {
            settings.options.unique_output = PathBuf::from(unique_output);
        }
    }

    if let Some(blocklist) = file_config.blocklist {
        settings.blocklist = blocklist;
    }

    settings
}

/// Apply environment variables to the settings.
fn apply_environment_config(mut settings: Settings, env_config: &EnvConfig) -> Settings {
    if let Some(concurrency) = env_config.concurrency {
        settings.check = settings.check.with_concurrency(concurrency);
    }
    if let Some(timeout) = env_config.timeout.as_deref().and_then(parse_timeout) {
        settings.check = settings.check.with_dns_timeout(timeout);
    }
    if let Some(input) = &env_config.input {
        settings.options.input = PathBuf::from(input);
    }
    if let Some(output) = &env_config.output {
        settings.options.invalid_output = PathBuf::from(output);
    }
    if let Some(unique_output) = &env_config.unique_output {
        settings.options.unique_output = PathBuf::from(unique_output);
    }
    if let Some(blocklist) = &env_config.blocklist {
        settings.blocklist.file = Some(blocklist.clone());
    }
    settings
}

/// Apply CLI arguments to the settings (highest precedence).
fn apply_cli_args(mut settings: Settings, args: &Args) -> Settings {
    if let Some(concurrency) = args.concurrency {
        settings.check = settings.check.with_concurrency(concurrency);
    }
    if let Some(timeout) = args.timeout.as_deref().and_then(parse_timeout) {
        settings.check = settings.check.with_dns_timeout(timeout);
    }
    if let Some(input) = &args.input {
        settings.options.input = PathBuf::from(input);
    }
    if let Some(output) = &args.output {
        settings.options.invalid_output = PathBuf::from(output);
    }
    if let Some(unique_output) = &args.unique_output {
        settings.options.unique_output = PathBuf::from(unique_output);
    }
    if let Some(blocklist) = &args.blocklist {
        settings.blocklist.file = Some(blocklist.clone());
    }
    // Only override when the flag is passed, so config files can still opt out.
    if args.no_builtin_blocklist {
        settings.blocklist.builtin = Some(false);
    }
    settings
}
