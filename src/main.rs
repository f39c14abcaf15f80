//! RiskSight - AI business-risk analysis from the terminal.
//!
//! Validates a document locally, has the analysis service extract its text
//! and identify risks, then prints or exports the report.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use risksight::api::{ApiClient, HttpRiskAnalysisService};
use risksight::core::{Config, ProgressConfig, TEMPLATE_CONTENT};
use risksight::document::{format_file_size, validate_file, UploadedFile};
use risksight::report::{
    export_json, read_json, render_text_report, report_file_name, write_json, DEFAULT_JSON_FILE,
};
use risksight::workflow::{
    spawn_ticker, AnalysisForm, RiskAnalysisStore, SimulatedProgress, TickerHandle,
    ANALYSIS_FOCUS_OPTIONS, COMPANY_SCALES, DOCUMENT_TYPES, INDUSTRIES,
};

/// AI business-risk analysis from the terminal
#[derive(Parser)]
#[command(name = "risksight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default locations
    #[arg(short, long, global = true, env = "RISKSIGHT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file can be uploaded (type and size)
    Validate {
        /// Document to check
        file: PathBuf,
    },

    /// Extract the text of a document
    Extract {
        /// Document to extract
        file: PathBuf,

        /// Server-side size limit in MB
        #[arg(long)]
        max_size_mb: Option<u32>,

        /// Write the text to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract and analyze a document for business risks
    Analyze {
        /// Document to analyze
        file: PathBuf,

        /// Industry of the company
        #[arg(short, long, value_parser = PossibleValuesParser::new(INDUSTRIES))]
        industry: Option<String>,

        /// Company scale
        #[arg(short, long, value_parser = PossibleValuesParser::new(COMPANY_SCALES))]
        scale: Option<String>,

        /// Kind of document
        #[arg(short, long, value_parser = PossibleValuesParser::new(DOCUMENT_TYPES))]
        document_type: Option<String>,

        /// Focus of the analysis (free text; see --list-focus for suggestions)
        #[arg(long)]
        focus: Option<String>,

        /// List suggested focus areas and exit
        #[arg(long)]
        list_focus: bool,

        /// Send only the extracted text, not the original file
        #[arg(long)]
        no_attach: bool,

        /// Output format printed to stdout
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also export the result as JSON
        #[arg(long)]
        json: bool,

        /// Also export the text report
        #[arg(long)]
        report: bool,
    },

    /// Render a report from an exported JSON result
    Report {
        /// Exported analysis JSON
        input: PathBuf,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print an example meeting transcript to try the analysis with
    Template,

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Write a default config file
        #[arg(long)]
        init: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Validate { file } => {
            cmd_validate(&file)?;
        }
        Commands::Extract { file, max_size_mb, output } => {
            cmd_extract(config_path, &file, max_size_mb, output.as_deref())?;
        }
        Commands::Analyze {
            file,
            industry,
            scale,
            document_type,
            focus,
            list_focus,
            no_attach,
            format,
            json,
            report,
        } => {
            if list_focus {
                for focus in ANALYSIS_FOCUS_OPTIONS {
                    println!("{focus}");
                }
                return Ok(());
            }

            let config = load_config(config_path)?;
            let defaults = &config.analysis;
            let form = AnalysisForm {
                industry: industry.or_else(|| defaults.industry.clone()).unwrap_or_default(),
                company_scale: scale
                    .or_else(|| defaults.company_scale.clone())
                    .unwrap_or_default(),
                document_type: document_type.unwrap_or_else(|| defaults.document_type.clone()),
                analysis_focus: focus.unwrap_or_else(|| defaults.analysis_focus.clone()),
                attach_file: defaults.attach_file && !no_attach,
            };
            cmd_analyze(&config, &file, &form, format, json, report)?;
        }
        Commands::Report { input, output } => {
            cmd_report(&input, output.as_deref())?;
        }
        Commands::Template => {
            println!("{TEMPLATE_CONTENT}");
        }
        Commands::Config { path, init } => {
            cmd_config(config_path, path, init)?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Load the configuration and apply environment overrides.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    config.apply_env();
    Ok(config)
}

fn build_store(config: &Config) -> Result<RiskAnalysisStore> {
    let client = ApiClient::new(&config.api)?;
    tracing::debug!(base_url = client.base_url(), "Using analysis service");
    let service = HttpRiskAnalysisService::new(client);
    Ok(RiskAnalysisStore::new(Arc::new(service)).with_max_upload_mb(config.upload.max_size_mb))
}

async fn open_file(path: &Path) -> Result<UploadedFile> {
    UploadedFile::from_path(path).await.with_context(|| format!("Failed to open {}", path.display()))
}

/// Which call a progress line is shown for.
#[derive(Clone, Copy)]
enum Phase {
    Extraction,
    Analysis,
}

/// Start a progress line on stderr, unless disabled or not a terminal.
fn start_progress(config: &ProgressConfig, phase: Phase) -> Option<TickerHandle> {
    if !config.enabled || !io::stderr().is_terminal() {
        return None;
    }

    let (label, ticker, interval) = match phase {
        Phase::Extraction => (
            "Extracting text",
            SimulatedProgress::extraction(config),
            config.extraction_interval_ms,
        ),
        Phase::Analysis => (
            "Analyzing risks",
            SimulatedProgress::analysis(config),
            config.analysis_interval_ms,
        ),
    };

    Some(spawn_ticker(ticker, Duration::from_millis(interval.max(1)), move |value| {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "\r{label}... {value:>3.0}%");
        let _ = stderr.flush();
    }))
}

async fn stop_progress(handle: Option<TickerHandle>) {
    if let Some(handle) = handle {
        handle.finish().await;
        eprintln!();
    }
}

/// Validate a file without contacting the service.
fn cmd_validate(path: &Path) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let file = rt.block_on(open_file(path))?;

    validate_file(&file)?;

    let mime = if file.mime_type.is_empty() { "unknown type" } else { file.mime_type.as_str() };
    println!("✓ {} ({}, {}) can be analyzed", file.name, format_file_size(file.size), mime);
    Ok(())
}

/// Extract text only.
fn cmd_extract(
    config_path: Option<&Path>,
    path: &Path,
    max_size_mb: Option<u32>,
    output: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if max_size_mb.is_some() {
        config.upload.max_size_mb = max_size_mb;
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let store = build_store(&config)?;
        let file = open_file(path).await?;
        store.select_file(file.clone())?;

        let progress = start_progress(&config.progress, Phase::Extraction);
        let result = store.extract_text(&file).await;
        stop_progress(progress).await;
        let extracted = result?;

        eprintln!("Text extracted successfully! ({} characters)", extracted.char_count());
        match output {
            Some(output) => {
                std::fs::write(output, &extracted.extracted_text)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                eprintln!("Wrote {}", output.display());
            }
            None => println!("{}", extracted.extracted_text),
        }

        Ok::<_, anyhow::Error>(())
    })
}

/// Run the full extract → analyze workflow.
fn cmd_analyze(
    config: &Config,
    path: &Path,
    form: &AnalysisForm,
    format: OutputFormat,
    export_json_file: bool,
    export_report: bool,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let store = build_store(config)?;
        let file = open_file(path).await?;
        store.select_file(file.clone())?;

        // Catch missing metadata before spending an extraction call.
        let missing = form.missing_fields();
        if !missing.is_empty() {
            anyhow::bail!(
                "Please complete all required fields! (missing: {})",
                missing.join(", ").replace('_', " ")
            );
        }

        let progress = start_progress(&config.progress, Phase::Extraction);
        let extracted = store.extract_text(&file).await;
        stop_progress(progress).await;
        let extracted = extracted?;
        eprintln!("Text extracted successfully! ({} characters)", extracted.char_count());

        let progress = start_progress(&config.progress, Phase::Analysis);
        let result = form.submit(&store).await;
        stop_progress(progress).await;
        let result = result?;
        eprintln!("{}", result.completion_message());

        match format {
            OutputFormat::Text => print!("{}", render_text_report(&result, chrono::Local::now())),
            OutputFormat::Json => println!("{}", export_json(&result)?),
        }

        if export_json_file {
            let path = config.export_path(DEFAULT_JSON_FILE);
            write_json(&result, &path)?;
            eprintln!("Saved {}", path.display());
        }

        if export_report {
            let path = config.export_path(&report_file_name(&file.name));
            let report = render_text_report(&result, chrono::Local::now());
            std::fs::write(&path, report)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Saved {}", path.display());
        }

        Ok::<_, anyhow::Error>(())
    })
}

/// Render a text report from an exported result.
fn cmd_report(input: &Path, output: Option<&Path>) -> Result<()> {
    let result = read_json(input)?;
    let report = render_text_report(&result, chrono::Local::now());

    match output {
        Some(output) => {
            std::fs::write(output, report)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Wrote {}", output.display());
        }
        None => print!("{report}"),
    }

    Ok(())
}

fn cmd_config(config_path: Option<&Path>, show_path: bool, init: bool) -> Result<()> {
    if show_path {
        match config_path {
            Some(path) => println!("{}", path.display()),
            None => {
                if let Some(path) = Config::config_dir() {
                    println!("{}", path.join("config.toml").display());
                }
            }
        }
        return Ok(());
    }

    if init {
        if let Some(existing) = Config::config_dir().map(|d| d.join("config.toml")) {
            if existing.exists() {
                anyhow::bail!("Config file already exists: {}", existing.display());
            }
        }
        let path = Config::default().save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut config = load_config(config_path)?;
    if config.api.api_key.is_some() {
        config.api.api_key = Some("********".to_string());
    }
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "risksight", &mut io::stdout());
}
