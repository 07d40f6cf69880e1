//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::console_report::{ConsoleReportAdapter, STDOUT_PATH};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report::{DEFAULT_TABLE_ROWS, HtmlReportAdapter, ReportOptions};
use crate::domain::config_validation::{parse_date, parse_names, validate_dashboard_config};
use crate::domain::dashboard::{DashboardParams, assemble_dashboard, fetch_prices};
use crate::domain::error::DashboardError;
use crate::domain::metrics::RowPolicy;
use crate::domain::registry::Registry;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_OUTPUT: &str = "dashboard.html";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(
    name = "equitydash",
    about = "Equity price and performance dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the dashboard and write the HTML report
    Report {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory holding <SYMBOL>.csv files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// First date, YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,
        /// Last date, YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,
        /// Comma-separated instrument names
        #[arg(long)]
        select: Option<String>,
        /// Row policy: complete or independent
        #[arg(long)]
        policy: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also print the tables to stdout
        #[arg(long)]
        console: bool,
    },
    /// List configured instruments
    Instruments {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List configured events
    Events {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a dashboard configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ParamOverrides {
    pub start: Option<String>,
    pub end: Option<String>,
    pub select: Option<String>,
    pub policy: Option<String>,
}

/// Settings for the report outputs of one run.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub output: PathBuf,
    pub options: ReportOptions,
    pub template_path: Option<PathBuf>,
    pub console: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Report {
            config,
            data_dir,
            start,
            end,
            select,
            policy,
            output,
            console,
        } => {
            let overrides = ParamOverrides {
                start,
                end,
                select,
                policy,
            };
            run_report(
                config.as_ref(),
                data_dir.as_ref(),
                &overrides,
                output.as_ref(),
                console,
            )
        }
        Command::Instruments { config } => run_instruments(config.as_ref()),
        Command::Events { config } => run_events(config.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = DashboardError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => load_config(p),
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn load_registry(config: &dyn ConfigPort) -> Result<Registry, ExitCode> {
    Registry::from_config(config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Resolves run parameters: flag, then `[dashboard]` key, then default.
pub fn build_dashboard_params(
    config: &dyn ConfigPort,
    overrides: &ParamOverrides,
    today: NaiveDate,
) -> Result<DashboardParams, DashboardError> {
    let mut params = DashboardParams::new(today);

    if let Some(start) = overrides
        .start
        .clone()
        .or_else(|| config.get_string("dashboard", "start_date"))
    {
        params.start_date = parse_date(&start, "dashboard", "start_date")?;
    }
    if let Some(end) = overrides
        .end
        .clone()
        .or_else(|| config.get_string("dashboard", "end_date"))
    {
        params.end_date = parse_date(&end, "dashboard", "end_date")?;
    }
    if let Some(selected) = overrides
        .select
        .clone()
        .or_else(|| config.get_string("dashboard", "selected"))
    {
        params.selection = Some(parse_names(&selected));
    }
    if let Some(policy) = overrides
        .policy
        .clone()
        .or_else(|| config.get_string("dashboard", "row_policy"))
    {
        params.row_policy = policy
            .parse::<RowPolicy>()
            .map_err(|reason| DashboardError::config_invalid("dashboard", "row_policy", reason))?;
    }

    let bins = config.get_int("dashboard", "histogram_bins", params.histogram_bins as i64);
    if bins <= 0 {
        return Err(DashboardError::config_invalid(
            "dashboard",
            "histogram_bins",
            "histogram_bins must be a positive integer",
        ));
    }
    params.histogram_bins = bins as usize;

    params.validate()?;
    Ok(params)
}

/// Reads the `[report]` section. The output flag wins over `[report] output`.
pub fn build_report_settings(
    config: &dyn ConfigPort,
    output_override: Option<&PathBuf>,
    console: bool,
) -> ReportSettings {
    let defaults = ReportOptions::default();
    let table_rows = config.get_int("report", "table_rows", DEFAULT_TABLE_ROWS as i64);

    ReportSettings {
        output: output_override.cloned().unwrap_or_else(|| {
            config
                .get_string("report", "output")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
        }),
        options: ReportOptions {
            title: config.get_string("report", "title").unwrap_or(defaults.title),
            description: config
                .get_string("report", "description")
                .unwrap_or(defaults.description),
            table_rows: if table_rows > 0 {
                table_rows as usize
            } else {
                DEFAULT_TABLE_ROWS
            },
        },
        template_path: config.get_string("report", "template_path").map(PathBuf::from),
        console,
    }
}

/// Builds the data source named by `[data] source`.
pub fn build_data_port(
    config: &dyn ConfigPort,
    data_dir_override: Option<&PathBuf>,
) -> Result<Box<dyn DataPort>, DashboardError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string())
        .to_lowercase();

    match source.as_str() {
        "csv" => {
            let dir = data_dir_override.cloned().unwrap_or_else(|| {
                config
                    .get_string("data", "data_dir")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
            });
            info!(dir = %dir.display(), "reading prices from CSV files");
            Ok(Box::new(CsvAdapter::new(dir)))
        }
        #[cfg(feature = "yahoo")]
        "yahoo" => {
            use crate::adapters::yahoo_adapter::YahooAdapter;
            info!("reading prices from Yahoo Finance");
            Ok(Box::new(YahooAdapter::new()?))
        }
        #[cfg(not(feature = "yahoo"))]
        "yahoo" => Err(DashboardError::config_invalid(
            "data",
            "source",
            "the yahoo source requires the `yahoo` feature",
        )),
        other => Err(DashboardError::config_invalid(
            "data",
            "source",
            format!("unknown source '{other}' (expected csv or yahoo)"),
        )),
    }
}

fn run_report(
    config_path: Option<&PathBuf>,
    data_dir: Option<&PathBuf>,
    overrides: &ParamOverrides,
    output: Option<&PathBuf>,
    console: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    if let Some(path) = config_path {
        eprintln!("Loading config from {}", path.display());
    }
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_dashboard_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Registry and parameters
    let registry = match load_registry(&config) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let today = Local::now().date_naive();
    let params = match build_dashboard_params(&config, overrides, today) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Data source
    let data_port = match build_data_port(&config, data_dir) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let settings = build_report_settings(&config, output, console);
    run_report_pipeline(data_port.as_ref(), &registry, &params, &settings)
}

/// Builds the dashboard and writes the configured reports.
pub fn run_report_pipeline(
    data_port: &dyn DataPort,
    registry: &Registry,
    params: &DashboardParams,
    settings: &ReportSettings,
) -> ExitCode {
    eprintln!(
        "Building dashboard: {} instruments, {} to {}",
        registry.list_instruments().len(),
        params.start_date,
        params.end_date
    );

    let acquisition = match fetch_prices(data_port, registry, params) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    // Printed before selection so an empty selection still names its cause.
    for missing in &acquisition.missing {
        eprintln!(
            "warning: no data obtained for {} ({}): {}",
            missing.name, missing.symbol, missing.reason
        );
    }

    let dashboard = match assemble_dashboard(acquisition, registry, params) {
        Ok(d) => d,
        Err(DashboardError::EmptySelection) => {
            eprintln!("warning: no instruments with data selected; nothing to display");
            return (&DashboardError::EmptySelection).into();
        }
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "  Selected: {} ({} rows)",
        dashboard.selected.join(", "),
        dashboard.close_prices.len()
    );

    let mut html = HtmlReportAdapter::new(settings.options.clone());
    if let Some(template) = &settings.template_path {
        html = html.with_template_path(template.clone());
    }
    let output = settings.output.to_string_lossy();
    if let Err(e) = html.write(&dashboard, &output) {
        eprintln!("error: failed to write report: {e}");
        return (&e).into();
    }

    if settings.console {
        let console = ConsoleReportAdapter::new(settings.options.table_rows);
        if let Err(e) = console.write(&dashboard, STDOUT_PATH) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("\nReport written to: {output}");
    ExitCode::SUCCESS
}

fn run_instruments(config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let registry = match load_registry(&config) {
        Ok(r) => r,
        Err(code) => return code,
    };

    for instrument in registry.list_instruments() {
        println!("{}\t{}", instrument.display_name, instrument.symbol);
    }
    eprintln!("{} instruments", registry.list_instruments().len());
    ExitCode::SUCCESS
}

fn run_events(config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let registry = match load_registry(&config) {
        Ok(r) => r,
        Err(code) => return code,
    };

    for event in registry.list_events() {
        println!("{}\t{}", event.date, event.label);
    }
    eprintln!("{} events", registry.list_events().len());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_dashboard_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let registry = match load_registry(&config) {
        Ok(r) => r,
        Err(code) => return code,
    };

    eprintln!(
        "  {} instruments, {} events",
        registry.list_instruments().len(),
        registry.list_events().len()
    );
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
