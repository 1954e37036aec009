use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dietnerd::citation::{
    NO_REFERENCES, build_reference_list, reference_detail, render_references_html,
};
use dietnerd::render::inline_format;
use dietnerd::utils::ensure_cache_directory;
use dietnerd::{
    AnswerCache, AnswerPipeline, AnswerRecord, BackendClientTrait, Config, EXPORT_FILE_NAME,
    Generation, Lookup, ReferenceMarker, save_pdf,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DISCLAIMER: &str = "DietNerd is an exploratory tool designed to enrich your conversations \
with a registered dietitian or registered dietitian nutritionist, who can then review your \
profile before providing recommendations. Please be aware that the insights provided by \
DietNerd may not fully take into consideration all potential medication interactions or \
pre-existing conditions. To find a local expert near you, use this website: \
https://www.eatright.org/find-a-nutrition-expert";

/// dietnerd - evidence-backed answers to nutrition questions
#[derive(Parser)]
#[command(name = "dietnerd")]
#[command(about = "Ask nutrition questions and get answers with cited research")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Show the answer to a question with its references
    Ask(AskCommand),
    /// List answered questions similar to a question
    Similar(SimilarCommand),
    /// Show the summary behind one reference of an answer
    Reference(ReferenceCommand),
    /// Export an answer and its citation summaries as a PDF
    Export(ExportCommand),
}

#[derive(Parser)]
struct AskCommand {
    /// The question to answer
    #[arg(value_name = "QUESTION")]
    question: String,

    /// Generate an answer when none is stored (may take minutes)
    #[arg(short, long)]
    generate: bool,

    /// Print HTML instead of plain text
    #[arg(long)]
    html: bool,

    /// Ignore the local cache
    #[arg(long)]
    refresh: bool,
}

#[derive(Parser)]
struct SimilarCommand {
    #[arg(value_name = "QUESTION")]
    question: String,
}

#[derive(Parser)]
struct ReferenceCommand {
    /// The answered question
    #[arg(value_name = "QUESTION")]
    question: String,

    /// Reference marker, e.g. `[3]`, `3.` or `3`
    #[arg(value_name = "MARKER")]
    marker: String,

    /// Print HTML instead of plain text
    #[arg(long)]
    html: bool,
}

#[derive(Parser)]
struct ExportCommand {
    /// The answered question
    #[arg(value_name = "QUESTION")]
    question: String,

    /// Output file
    #[arg(short, long, value_name = "PATH", default_value = EXPORT_FILE_NAME)]
    output: PathBuf,
}

/// An error caused by the user's input rather than by the system.
#[derive(Debug, Error)]
#[error("{0}")]
struct UsageError(String);

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load();

    let result = match &cli.command {
        Commands::Ask(cmd) => handle_ask(cmd, &config),
        Commands::Similar(cmd) => handle_similar(cmd, &config),
        Commands::Reference(cmd) => handle_reference(cmd, &config),
        Commands::Export(cmd) => handle_export(cmd, &config),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dietnerd=info,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// User errors include empty questions, unknown questions and bad markers.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<UsageError>().is_some()
}

fn require_question(question: &str) -> Result<&str> {
    let question = question.trim();
    if question.is_empty() {
        return Err(UsageError("Question cannot be empty".to_string()).into());
    }
    Ok(question)
}

fn open_cache(config: &Config) -> Result<AnswerCache> {
    let path = config.cache_path()?;
    ensure_cache_directory(&path)?;
    AnswerCache::open(&path).context("Failed to open answer cache")
}

fn pipeline(config: &Config) -> Result<AnswerPipeline> {
    let client = config
        .backend_client()
        .context("Failed to create backend client")?;
    Ok(AnswerPipeline::new(Arc::new(client)).with_options(config.pipeline_options()))
}

/// Looks the question up locally, then on the backend, caching what it finds.
fn load_answer(question: &str, config: &Config, refresh: bool) -> Result<Lookup> {
    let cache = open_cache(config)?;
    if !refresh && let Some(record) = cache.get(question)? {
        tracing::debug!(question, "answer served from cache");
        return Ok(Lookup::Answered(record));
    }

    let lookup = pipeline(config)?
        .lookup(question)
        .context("Failed to look up answer")?;
    if let Lookup::Answered(record) = &lookup {
        cache.put(record)?;
    }
    Ok(lookup)
}

fn require_answer(question: &str, config: &Config) -> Result<AnswerRecord> {
    match load_answer(question, config, false)? {
        Lookup::Answered(record) => Ok(record),
        Lookup::Missing { .. } => Err(UsageError(format!(
            "No answer stored for {question:?}; run `dietnerd ask --generate` first"
        ))
        .into()),
    }
}

fn handle_ask(cmd: &AskCommand, config: &Config) -> Result<()> {
    let question = require_question(&cmd.question)?;

    match load_answer(question, config, cmd.refresh)? {
        Lookup::Answered(record) => print_answer(&record, cmd.html),
        Lookup::Missing { similar } if !cmd.generate => {
            if similar.is_empty() {
                println!("We have no answers for questions similar to yours.");
            } else {
                println!("No stored answer. Similar questions:");
                for s in &similar {
                    println!("  - {}", s.question);
                }
            }
            println!("Run again with --generate to build an answer (about 2 minutes).");
            Ok(())
        }
        Lookup::Missing { .. } => generate(question, cmd.html, config),
    }
}

fn generate(question: &str, html: bool, config: &Config) -> Result<()> {
    let generation = pipeline(config)?
        .generate(question, |stage| eprintln!("{stage}"))
        .context("Failed to generate answer")?;

    match generation {
        Generation::Answered(record) => {
            open_cache(config)?.put(&record)?;
            print_answer(&record, html)
        }
        Generation::Rejected(message) => {
            println!("{message}");
            Ok(())
        }
        Generation::Pending(output) => {
            println!("{output}");
            eprintln!("The answer is not stored yet; references will be available shortly.");
            Ok(())
        }
    }
}

fn print_answer(record: &AnswerRecord, html: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if html {
        writeln!(out, "{}", inline_format(&record.output))?;
        writeln!(
            out,
            "{}",
            render_references_html(&record.output, &record.citations, &record.metadata)
        )?;
    } else {
        writeln!(out, "{}", record.output.trim())?;
        writeln!(out)?;
        match build_reference_list(&record.output, &record.citations, &record.metadata) {
            Some(list) => write!(out, "{list}")?,
            None => writeln!(out, "{NO_REFERENCES}")?,
        }
        writeln!(out)?;
        writeln!(out, "{DISCLAIMER}")?;
    }
    Ok(())
}

fn handle_similar(cmd: &SimilarCommand, config: &Config) -> Result<()> {
    let question = require_question(&cmd.question)?;
    let client = config
        .backend_client()
        .context("Failed to create backend client")?;
    let similar = client
        .similar_questions(question)
        .context("Failed to search similar questions")?;

    if similar.is_empty() {
        println!("No similar questions found.");
    }
    for s in similar {
        println!("{:.2}  {}", s.score, s.question);
    }
    Ok(())
}

fn handle_reference(cmd: &ReferenceCommand, config: &Config) -> Result<()> {
    let question = require_question(&cmd.question)?;
    let marker = ReferenceMarker::parse(&cmd.marker)
        .ok_or_else(|| UsageError(format!("Invalid reference marker: {}", cmd.marker)))?;
    let record = require_answer(question, config)?;

    let detail = reference_detail(&marker, &record.metadata)
        .ok_or_else(|| UsageError(format!("Unknown reference {marker} for {question:?}")))?;
    if cmd.html {
        println!("{}", detail.to_html());
    } else {
        print!("{detail}");
    }
    Ok(())
}

fn handle_export(cmd: &ExportCommand, config: &Config) -> Result<()> {
    let question = require_question(&cmd.question)?;
    let record = require_answer(question, config)?;
    let pages = save_pdf(&cmd.output, &record)?;
    println!("Exported {} ({pages} pages)", cmd.output.display());
    Ok(())
}
