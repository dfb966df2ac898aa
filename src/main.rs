// Command-line entry point for nibcheck.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use nibcheck::application::AnalyzeUsecase;
use nibcheck::domain::config::{Configuration, Rule};
use nibcheck::domain::connection_analyzer::ConnectionAnalyzer;
use nibcheck::domain::framework::FrameworkClasses;
use nibcheck::infrastructure::class_loader::{load_framework_classes, load_segue_identifiers};
use nibcheck::infrastructure::concurrency::init_thread_pool;
use nibcheck::infrastructure::config_loader::load_configuration;
use nibcheck::infrastructure::{JsonClassSource, ProjectLoader, XmlNibParser};
use nibcheck::ports::issue_exporter::{JsonExporter, TextExporter};
use nibcheck::ports::{Analyzer, ClassSource, IssueExporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project directory, or a single .storyboard/.xib file
    path: PathBuf,

    /// Class symbol table (JSON, className -> record)
    #[arg(long)]
    classes: Option<PathBuf>,

    /// Segue identifiers referenced in source (JSON, className -> [identifier])
    #[arg(long)]
    segue_identifiers: Option<PathBuf>,

    /// Replaces the built-in framework class table (JSON)
    #[arg(long)]
    framework_classes: Option<PathBuf>,

    /// TOML file with a [rules] section
    #[arg(long)]
    config: Option<PathBuf>,

    /// Don't report unused outlets that are declared optional
    #[arg(long)]
    ignore_optional_property: bool,

    /// Report missing outlets and actions as errors
    #[arg(long)]
    report_missing_as_error: bool,

    /// Report missing outlets at the owning class declaration
    #[arg(long)]
    report_missing_to_controller: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Worker threads for parsing documents
    #[arg(short, long)]
    jobs: Option<usize>,
}

impl Cli {
    fn configuration(&self) -> Result<Configuration> {
        let from_file = match &self.config {
            Some(path) => load_configuration(path)?,
            None => Configuration::new(),
        };

        let mut from_flags = Configuration::new();
        for (rule, enabled) in [
            (Rule::IgnoreOptionalProperty, self.ignore_optional_property),
            (Rule::ReportMissingAsError, self.report_missing_as_error),
            (Rule::ReportMissingToController, self.report_missing_to_controller),
        ] {
            if enabled {
                from_flags.enable(rule);
            }
        }

        Ok(from_file.union(&from_flags))
    }
}

fn init_logging(verbose: bool) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("nibcheck=debug")
    } else {
        EnvFilter::new("nibcheck=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<bool> {
    init_thread_pool(cli.jobs)?;
    let configuration = cli.configuration()?;
    debug!(?configuration, "resolved rules");

    let documents = ProjectLoader::nib_files(&cli.path)?;

    let classes = match &cli.classes {
        Some(path) => JsonClassSource::new(path).classes()?,
        None => Default::default(),
    };
    let segue_identifiers = match &cli.segue_identifiers {
        Some(path) => load_segue_identifiers(path)?,
        None => Default::default(),
    };
    let custom_framework = cli
        .framework_classes
        .as_deref()
        .map(load_framework_classes)
        .transpose()?;
    let framework = custom_framework.as_ref().unwrap_or_else(|| FrameworkClasses::builtin());

    let analyzer = ConnectionAnalyzer::new();
    let analyzers: [&dyn Analyzer; 1] = [&analyzer];
    let usecase = AnalyzeUsecase {
        nib_parser: &XmlNibParser,
        analyzers: &analyzers,
        framework,
    };
    let report = usecase.run(&documents, classes, segue_identifiers, &configuration);

    let exporter: &dyn IssueExporter = match cli.format {
        Format::Text => &TextExporter,
        Format::Json => &JsonExporter,
    };
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    exporter.export(&report.issues, &configuration, &report.classes, &mut out)?;
    out.flush()?;

    for failure in &report.failures {
        error!(path = %failure.path.display(), "{}", failure.error);
    }

    Ok(!report.has_errors(&configuration))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(2)
        }
    }
}
