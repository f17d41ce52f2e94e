//! blocklify: Convert JavaScript to block documents and back.
//!
//! Usage:
//!   blocklify import <file> [--strategy atomic|pattern|mixed] [--format xml|json]
//!   blocklify generate <file.xml|file.json>
//!   blocklify roundtrip <file>
//!   blocklify tokens <file>
//!
//! Exit codes: 0 on success, 1 on I/O or configuration errors, 2 on syntax
//! or generation errors.

use blocklify_ast::dump::dump_program;
use blocklify_blocks::{BlockDocument, BlockError};
use blocklify_diagnostics::SyntaxError;
use blocklify_generator::{GenerateError, Generator};
use blocklify_importer::{ImportError, ImportReport, Importer};
use blocklify_options::{BlocklifyConfig, ImportStrategy};
use blocklify_scanner::Scanner;
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use miette::{NamedSource, SourceSpan};
use std::path::Path;
use std::process;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "blocklify", about = "blocklify - JavaScript to visual blocks and back", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a blocklify JSON configuration file.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long = "json-logs", global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a JavaScript file and print its block document.
    Import {
        #[arg(value_name = "FILE")]
        file: String,

        /// Mapping strategy; overrides the configuration file.
        #[arg(long)]
        strategy: Option<ImportStrategy>,

        #[arg(long, value_enum, default_value_t = Format::Xml)]
        format: Format,
    },
    /// Generate JavaScript from a block document.
    Generate {
        /// A `.json` document, or XML otherwise.
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Import a JavaScript file, generate it back and print the result.
    Roundtrip {
        #[arg(value_name = "FILE")]
        file: String,

        #[arg(long)]
        strategy: Option<ImportStrategy>,
    },
    /// Print the token stream of a JavaScript file.
    Tokens {
        #[arg(value_name = "FILE")]
        file: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Xml,
    Json,
}

// ============================================================================
// Errors
// ============================================================================

/// A syntax error located in its source file.
#[derive(Debug, Error, miette::Diagnostic)]
#[error("{error}")]
#[diagnostic(code(blocklify::syntax))]
struct LocatedSyntaxError {
    error: SyntaxError,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
}

impl LocatedSyntaxError {
    fn new(error: SyntaxError, path: &str, source: &str) -> Self {
        // Scanner offsets count chars; miette wants bytes.
        let offset = source
            .char_indices()
            .nth(error.pos as usize)
            .map_or(source.len(), |(i, _)| i);
        Self {
            error,
            source_code: NamedSource::new(path, source.to_string()),
            span: SourceSpan::from((offset, 0)),
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to load configuration '{path}': {message}")]
    Config { path: String, message: String },
    #[error(transparent)]
    Syntax(Box<LocatedSyntaxError>),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Document(#[from] BlockError),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Read { .. } | CliError::Config { .. } => 1,
            CliError::Syntax(_) | CliError::Generate(_) | CliError::Document(_) => 2,
        }
    }

    fn from_import(error: ImportError, path: &str, source: &str) -> Self {
        match error {
            ImportError::Syntax(error) => {
                CliError::Syntax(Box::new(LocatedSyntaxError::new(error, path, source)))
            }
            ImportError::Block(error) => CliError::Document(error),
        }
    }
}

// ============================================================================
// Entry
// ============================================================================

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            let code = error.exit_code();
            report(error);
            code
        }
    };
    process::exit(exit_code);
}

fn init_logging(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().with_current_span(false).init();
    } else {
        builder.init();
    }
}

fn report(error: CliError) {
    match error {
        CliError::Syntax(error) => eprintln!("{:?}", miette::Report::new(*error)),
        CliError::Generate(error) => eprintln!("{:?}", miette::Report::new(error)),
        other => eprintln!("error: {}", other),
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Command::Import {
            file,
            strategy,
            format,
        } => run_import(&config, file, *strategy, *format),
        Command::Generate { file } => run_generate(&config, file),
        Command::Roundtrip { file, strategy } => run_roundtrip(&config, file, *strategy),
        Command::Tokens { file } => run_tokens(&config, file),
    }
}

fn load_config(path: Option<&str>) -> Result<BlocklifyConfig, CliError> {
    let Some(path) = path else {
        return Ok(BlocklifyConfig::default());
    };
    let config = blocklify_options::parse_config_file(path).map_err(|e| CliError::Config {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    debug!(path, "configuration loaded");
    Ok(config)
}

fn read_source(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

// ============================================================================
// Commands
// ============================================================================

fn import(
    config: &BlocklifyConfig,
    path: &str,
    strategy: Option<ImportStrategy>,
) -> Result<ImportReport, CliError> {
    let source = read_source(path)?;
    let mut options = config.importer.clone();
    if let Some(strategy) = strategy {
        options.strategy = strategy;
    }
    let importer = Importer::new(options);
    let report = importer
        .code_to_block_tree(&source, &config.parser)
        .map_err(|e| CliError::from_import(e, path, &source))?;

    for gap in &report.gaps {
        let mut gap = gap.clone();
        gap.file = Some(path.to_string());
        eprintln!("{}", gap);
    }
    info!(
        path,
        strategy = %importer.options().strategy,
        blocks = report.document.blocks.len(),
        gaps = report.gaps.len(),
        "imported"
    );
    Ok(report)
}

fn run_import(
    config: &BlocklifyConfig,
    path: &str,
    strategy: Option<ImportStrategy>,
    format: Format,
) -> Result<(), CliError> {
    let report = import(config, path, strategy)?;
    let output = match format {
        Format::Xml => report.document.to_xml_pretty()?,
        Format::Json => report.document.to_json_pretty()?,
    };
    println!("{}", output);
    Ok(())
}

fn run_generate(config: &BlocklifyConfig, path: &str) -> Result<(), CliError> {
    let text = read_source(path)?;
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let document = if is_json {
        BlockDocument::from_json(&text)?
    } else {
        BlockDocument::from_xml(&text)?
    };
    let code = Generator::new(config.generator.clone()).generate(&document)?;
    println!("{}", code);
    Ok(())
}

fn run_roundtrip(
    config: &BlocklifyConfig,
    path: &str,
    strategy: Option<ImportStrategy>,
) -> Result<(), CliError> {
    let report = import(config, path, strategy)?;
    let code = Generator::new(config.generator.clone()).generate(&report.document)?;
    println!("{}", code);

    let source = read_source(path)?;
    let before = bumpalo::Bump::new();
    let after = bumpalo::Bump::new();
    let original = blocklify_parser::parse(&before, &source, &config.parser)
        .map_err(|e| CliError::Syntax(Box::new(LocatedSyntaxError::new(e, path, &source))))?;
    match blocklify_parser::parse(&after, &code, &config.parser) {
        Ok(regenerated) if dump_program(&regenerated) == dump_program(&original) => {
            info!(path, "round trip preserved the program structure");
        }
        Ok(_) => warn!(path, "regenerated program differs structurally from the input"),
        Err(e) => warn!(path, error = %e, "regenerated program does not parse"),
    }
    Ok(())
}

fn run_tokens(config: &BlocklifyConfig, path: &str) -> Result<(), CliError> {
    let source = read_source(path)?;
    let mut scanner = Scanner::with_options(&source, &config.parser);
    let tokens = scanner
        .tokenize()
        .map_err(|e| CliError::Syntax(Box::new(LocatedSyntaxError::new(e, path, &source))))?;
    for token in &tokens {
        println!(
            "{:>6}..{:<6} {:<12} {}",
            token.pos,
            token.end,
            token.kind.token_text(),
            token.raw
        );
    }
    Ok(())
}
