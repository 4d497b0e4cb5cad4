//! Command implementations for the geonames harvester CLI
//!
//! This module contains the command execution logic, progress reporting,
//! and result rendering for the CLI interface.

use crate::app::adapters::object_store::{FilesystemStore, MemoryStore, ObjectStore};
use crate::app::models::{HarvestMode, HeaderMap};
use crate::app::services::delimited_reader::DelimitedReader;
use crate::app::services::harvester::{
    CountryHarvester, FeatureHarvester, HarvestResult, HarvestStats, Harvester,
};
use crate::app::services::header_resolver::locate_header;
use crate::cli::args::{Args, Commands, HeaderArgs, OutputFormat};
use crate::config::HarvestConfig;
use crate::{Error, Result};
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Label used in reports for the dry-run store
const MEMORY_STORE_LABEL: &str = "<memory>";

/// Outcome of a harvest command, as rendered to the user
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    pub harvester_id: &'static str,
    pub harvester_name: &'static str,
    pub mode: HarvestMode,
    pub store: String,
    pub dry_run: bool,
    pub object_ids: BTreeSet<String>,
    pub stats: HarvestStats,
}

/// Column map of a reference file, as rendered to the user
#[derive(Debug, Clone, Serialize)]
pub struct HeaderReport {
    pub source: String,
    /// `None` when the file has no `#ISO` header line
    pub fields: Option<HeaderMap>,
}

/// Main command runner
///
/// 1. Set up logging
/// 2. Validate arguments and load layered configuration
/// 3. Run the selected command and print its report
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    info!("Starting geonames harvester");
    debug!("Command line arguments: {:?}", args);
    execute(&args)
}

/// Run the selected command without touching global logging state
pub fn execute(args: &Args) -> Result<()> {
    args.validate()?;
    let config = load_configuration(args)?;
    debug!("Effective configuration: {:?}", config);

    if let Some(mode) = args.mode() {
        let report = run_harvest(args, mode, config)?;
        return print_harvest_report(args.output_format, &report);
    }

    match &args.command {
        Some(Commands::Header(header_args)) => {
            let report = inspect_header(header_args, &config)?;
            print_header_report(args.output_format, &report)
        }
        _ => Err(Error::configuration("No command given")),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("geonames_harvester={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> args)
fn load_configuration(args: &Args) -> Result<HarvestConfig> {
    let from_file = HarvestConfig::load(args.config_file.as_deref())?;
    Ok(from_file
        .merge(args.config_overrides())
        .with_skip_policy(args.skip_malformed_override()))
}

/// Run a harvest into the configured store, or into memory for a dry run
pub fn run_harvest(args: &Args, mode: HarvestMode, config: HarvestConfig) -> Result<HarvestReport> {
    if args.dry_run {
        let store = MemoryStore::new();
        info!("Dry run: harvesting into memory");
        return harvest_into(args, mode, config, &store, MEMORY_STORE_LABEL.to_string());
    }

    let store = FilesystemStore::open(config.storage_root())?;
    let label = store.root().display().to_string();
    harvest_into(args, mode, config, &store, label)
}

fn harvest_into<S: ObjectStore>(
    args: &Args,
    mode: HarvestMode,
    config: HarvestConfig,
    store: &S,
    store_label: String,
) -> Result<HarvestReport> {
    let spinner = args
        .show_progress()
        .then(|| create_spinner(&format!("Harvesting {}...", mode)));

    let outcome = match mode {
        HarvestMode::Countries => {
            let mut harvester = CountryHarvester::new(config, store)?;
            if let Some(pb) = &spinner {
                harvester = harvester.with_progress(pb.clone());
            }
            run_plugin(&harvester)
        }
        HarvestMode::Features => {
            let mut harvester = FeatureHarvester::new(config, store)?;
            if let Some(pb) = &spinner {
                harvester = harvester.with_progress(pb.clone());
            }
            run_plugin(&harvester)
        }
    };

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let (id, name, result) = outcome?;
    for message in &result.stats.warnings {
        warn!("{}", message);
    }

    Ok(HarvestReport {
        harvester_id: id,
        harvester_name: name,
        mode,
        store: store_label,
        dry_run: args.dry_run,
        object_ids: result.object_ids,
        stats: result.stats,
    })
}

fn run_plugin<H: Harvester>(
    harvester: &H,
) -> Result<(&'static str, &'static str, HarvestResult)> {
    info!("Running {} ({})", harvester.name(), harvester.id());
    let result = harvester.object_id_list()?;
    debug!("More objects pending: {}", harvester.has_more_objects());
    Ok((harvester.id(), harvester.name(), result))
}

/// Resolve the header of the given or configured reference file
pub fn inspect_header(header_args: &HeaderArgs, config: &HarvestConfig) -> Result<HeaderReport> {
    let mut reader = match &header_args.file {
        Some(path) => DelimitedReader::open(path)?,
        None => config.reference_reader()?,
    };
    let source = reader.source().display().to_string();
    let fields = locate_header(&mut reader)?;
    Ok(HeaderReport { source, fields })
}

/// Create a spinner for the row-by-row harvest
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg} ({pos} rows, {per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_harvest_report(format: OutputFormat, report: &HarvestReport) -> Result<()> {
    match format {
        OutputFormat::Human => {
            println!("{}", render_harvest_summary(report));
            Ok(())
        }
        OutputFormat::Json => print_json(report),
    }
}

fn print_header_report(format: OutputFormat, report: &HeaderReport) -> Result<()> {
    match format {
        OutputFormat::Human => {
            println!("{}", render_header(report));
            Ok(())
        }
        OutputFormat::Json => print_json(report),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::output("cannot render JSON report", e))?;
    println!("{}", json);
    Ok(())
}

/// Coloured multi-line harvest summary
pub fn render_harvest_summary(report: &HarvestReport) -> String {
    let stats = &report.stats;
    let mut lines = vec![
        format!(
            "\n{}",
            format!("{} Complete", report.harvester_name).bright_green().bold()
        ),
        format!(
            "  {} {}",
            "Objects harvested:".bright_cyan(),
            report.object_ids.len().to_string().bright_white().bold()
        ),
        format!(
            "  {} {}",
            "Rows processed:".bright_cyan(),
            stats.rows_processed.to_string().bright_white()
        ),
        format!(
            "  {} {}",
            "Rows filtered:".bright_cyan(),
            stats.rows_filtered.to_string().bright_white()
        ),
    ];
    if stats.rows_skipped > 0 {
        lines.push(format!(
            "  {} {}",
            "Rows skipped:".bright_red(),
            stats.rows_skipped.to_string().bright_red().bold()
        ));
    }
    lines.push(format!(
        "  {} {}",
        "Store:".bright_cyan(),
        if report.dry_run {
            format!("{} (dry run)", report.store).yellow().to_string()
        } else {
            report.store.bright_white().to_string()
        }
    ));
    lines.push(format!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(stats.duration).to_string().bright_white()
    ));
    lines.join("\n")
}

/// Index/name table of a resolved header
pub fn render_header(report: &HeaderReport) -> String {
    match &report.fields {
        Some(header) => {
            let mut lines = vec![format!(
                "{} {}",
                "Header of".bright_green().bold(),
                report.source.bright_white()
            )];
            for (index, name) in header.iter() {
                lines.push(format!("  {:>3}  {}", index, name));
            }
            lines.join("\n")
        }
        None => format!(
            "{} {}",
            "No #ISO header line found in".yellow(),
            report.source
        ),
    }
}
