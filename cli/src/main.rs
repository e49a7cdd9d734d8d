use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use formkey_core::FormCapture;
use formkey_pipeline::session::{SessionState, SessionStore};
use formkey_pipeline::{AnswerClient, DEFAULT_BASE_URL, Pipeline, parse_capture};

/// Default location of the persisted session next to the capture being
/// worked on.
const DEFAULT_SESSION_FILE: &str = "formkey-session.json";

#[derive(Debug, Parser)]
#[command(name = "formkey")]
#[command(about = "Extract form questions and reconcile service answers onto option texts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a capture's items into questions without contacting the service.
    Parse(ParseArgs),
    /// Run the full pipeline: parse, submit, mark matched options.
    Solve(SolveArgs),
    /// Strip answer marks from a capture's option texts.
    Clear(ClearArgs),
    /// Re-apply the answers cached by the last successful solve.
    Reapply(ReapplyArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Capture JSON file; reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format for the parsed questions.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct SolveArgs {
    /// Capture JSON file; reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Answer service deployment to submit to.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Where to persist the session for later `reapply`.
    #[arg(long, default_value = DEFAULT_SESSION_FILE)]
    session: PathBuf,
    /// File for the marked option texts; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format for the marked option texts.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ClearArgs {
    /// Capture JSON file; reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// File for the cleaned option texts; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format for the cleaned option texts.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ReapplyArgs {
    /// Capture JSON file; reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Session file written by a previous `solve`.
    #[arg(long, default_value = DEFAULT_SESSION_FILE)]
    session: PathBuf,
    /// File for the marked option texts; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format for the marked option texts.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

/// Serialization format for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Solve(args) => run_solve(args),
        Command::Clear(args) => run_clear(args),
        Command::Reapply(args) => run_reapply(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let capture = load_capture(args.input.as_deref())?;
    let questions = parse_capture(&capture);
    info!(questions = questions.len(), "parsed capture");

    let rendered = render(&questions, args.format)?;
    println!("{rendered}");
    Ok(())
}

fn run_solve(args: SolveArgs) -> Result<(), String> {
    let capture = load_capture(args.input.as_deref())?;

    let client = AnswerClient::with_base_url(&args.base_url)
        .map_err(|err| format!("Failed to build answer client: {err}"))?;
    let mut pipeline = Pipeline::with_client(client);
    let mut nodes = capture.option_texts.clone();

    // The solve trigger is the only async path; everything else stays on
    // the caller's thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to start runtime: {err}"))?;
    runtime
        .block_on(pipeline.solve(&capture, &mut nodes))
        .map_err(|err| err.to_string())?;

    SessionStore::new(args.session.clone())
        .save(pipeline.session())
        .map_err(|err| format!("Failed to save session '{}': {err}", args.session.display()))?;

    emit(&nodes, args.format, args.output.as_deref())
}

fn run_clear(args: ClearArgs) -> Result<(), String> {
    let capture = load_capture(args.input.as_deref())?;
    let mut nodes = capture.option_texts.clone();
    formkey_pipeline::reconcile::clear_marks(&mut nodes);
    emit(&nodes, args.format, args.output.as_deref())
}

fn run_reapply(args: ReapplyArgs) -> Result<(), String> {
    let capture = load_capture(args.input.as_deref())?;

    let session: SessionState = SessionStore::new(args.session.clone())
        .load()
        .ok_or_else(|| {
            format!(
                "No cached session at '{}'; run `formkey solve` first",
                args.session.display()
            )
        })?;

    let client = AnswerClient::new().map_err(|err| format!("Failed to build answer client: {err}"))?;
    let mut pipeline = Pipeline::with_client(client);
    pipeline.restore_session(session);

    let mut nodes = capture.option_texts.clone();
    pipeline.reapply(&mut nodes).map_err(|err| err.to_string())?;

    emit(&nodes, args.format, args.output.as_deref())
}

/// Reads a capture from a file, or stdin when no path is given.
fn load_capture(path: Option<&std::path::Path>) -> Result<FormCapture, String> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            buffer
        }
    };
    serde_json::from_str(&raw).map_err(|err| format!("Failed to parse capture JSON: {err}"))
}

fn render<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("JSON serialization failed: {err}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|err| format!("YAML serialization failed: {err}"))
        }
    }
}

/// Writes rendered output to a file or stdout.
fn emit<T: serde::Serialize>(
    value: &T,
    format: OutputFormat,
    output: Option<&std::path::Path>,
) -> Result<(), String> {
    let rendered = render(value, format)?;
    match output {
        Some(path) => fs::write(path, rendered)
            .map_err(|err| format!("Failed to write '{}': {err}", path.display())),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}
