//! Guru CLI
//!
//! Interactive terminal front end for tutoring sessions. Renders the
//! current question or material, forwards the learner's keystrokes to the
//! orchestrator, and can dump the trace log or write the study-pack export.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use guru_export::{json::JsonExporter, SessionExport};
use guru_gateway::{ModelGateway, OpenAiClient};
use guru_session::{Config, Orchestrator, Phase, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Default file name for the study-pack export.
const DEFAULT_EXPORT_FILE: &str = "guru-session.json";

/// Guru - Adaptive Tutoring Session
///
/// Runs an adaptive quiz/content loop on a topic: answer questions, read
/// curated material when the tutor decides you need it, and export the
/// session as a study pack when you are done.
#[derive(Parser, Debug)]
#[command(name = "guru")]
#[command(version, about, long_about = None)]
struct Args {
    /// Topic to study (e.g. "Algebra")
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Grade level of the learner
    #[arg(short, long, value_name = "GRADE")]
    grade: Option<String>,

    /// Examination board or curriculum for course context (e.g. "CBSE")
    #[arg(short, long, value_name = "BOARD")]
    board: Option<String>,

    /// Path to configuration file (default: guru.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Model identifier, overriding the configured one
    #[arg(short, long, value_name = "MODEL")]
    model: Option<String>,

    /// Base URL of the generative-content service
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Path for the study-pack export written on 'e' or quit
    #[arg(short, long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Guru starting");
    tracing::debug!(config = ?args.config, "Config file");
    tracing::debug!(export = ?args.export, "Export path");

    match run_session(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Runs one interactive tutoring session to completion.
async fn run_session(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    // Apply CLI argument overrides
    if let Some(ref model) = args.model {
        config.model.clone_from(model);
    }
    if let Some(ref api_base) = args.api_base {
        config.api_base = Some(api_base.clone());
    }
    if let Some(ref grade) = args.grade {
        config.grade.clone_from(grade);
    }
    if let Some(ref board) = args.board {
        config.board.clone_from(board);
    }

    // Re-validate after overrides
    config.validate()?;
    tracing::debug!(model = %config.model, grade = %config.grade, "Configuration resolved");

    let course = course_context(&config, &args.topic);
    print_config(&config, &args.topic, &course);

    let client = OpenAiClient::new(config.api_base.as_deref(), &config.model, None);
    let gateway = ModelGateway::new(client).with_safety_policy(config.safety_policy);
    let mut orchestrator = Orchestrator::new(gateway);

    println!();
    println!("Starting session on {}...", args.topic);
    tracing::info!(topic = %args.topic, grade = %config.grade, "Starting tutoring session");
    orchestrator
        .start_session(&args.topic, &config.grade, &course)
        .await?;

    render_screen(&orchestrator);
    print_help();

    let export_path = args
        .export
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "q" => break,
            "t" => print_trace(&orchestrator),
            "e" => write_export(&orchestrator, &export_path)?,
            "" => {
                if orchestrator.phase() == Phase::Learning {
                    handle_transition(orchestrator.continue_from_content().await);
                    render_screen(&orchestrator);
                } else {
                    print_help();
                }
            }
            digits => match digits.parse::<usize>() {
                Ok(choice) if choice >= 1 => {
                    handle_transition(orchestrator.submit_answer(choice - 1).await);
                    render_screen(&orchestrator);
                }
                _ => print_help(),
            },
        }
    }

    print_summary(&orchestrator);
    let (prompt, completion, total) = orchestrator.gateway().client().usage().totals();
    println!("Tokens used: {prompt} prompt + {completion} completion = {total}");
    write_export(&orchestrator, &export_path)?;
    Ok(())
}

/// Loads configuration from an explicit path or the working directory.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    let config = match config_path {
        Some(path) => Config::load_from_file(Path::new(path))?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Builds the course-context string sent with curation requests.
fn course_context(config: &Config, topic: &str) -> String {
    if config.board.trim().is_empty() {
        String::new()
    } else {
        format!("{} {}", config.board.trim(), topic)
    }
}

/// Reports a failed transition without ending the session.
fn handle_transition(result: Result<(), SessionError>) {
    if let Err(e) = result {
        eprintln!();
        eprintln!("  {e}");
        eprintln!("  The session is unchanged; try again.");
    }
}

/// Renders the current question or material.
fn render_screen<C: guru_gateway::GenerativeClient>(orchestrator: &Orchestrator<C>) {
    println!();
    if let Some(question) = orchestrator.current_question() {
        let mastery = orchestrator.session().map_or(0, |s| s.mastery());
        println!("[mastery {mastery}] ({}) {}", question.difficulty, question.question);
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }
        println!();
        println!("Answer with 1-{}:", question.options.len());
    } else if let Some(material) = orchestrator.current_material() {
        println!("--- {} ---", material.title);
        println!("{}", material.body);
        println!();
        println!("({} | {})", material.reading_level, material.attribution);
        println!();
        println!("Press Enter to continue with a question.");
    }
}

/// Prints the single-key command reference.
fn print_help() {
    println!();
    println!("Commands: 1-4 answer | Enter continue | t trace | e export | q quit");
}

/// Prints the effective configuration before the session starts.
fn print_config(config: &Config, topic: &str, course: &str) {
    println!("Configuration loaded:");
    println!("  Topic: {topic}");
    println!("  Grade: {}", config.grade);
    if !course.is_empty() {
        println!("  Course: {course}");
    }
    println!("  Model: {}", config.model);
    if let Some(api_base) = &config.api_base {
        println!("  API base: {api_base}");
    }
}

/// Dumps the trace log to the terminal.
fn print_trace<C: guru_gateway::GenerativeClient>(orchestrator: &Orchestrator<C>) {
    println!();
    println!("=== Trace ===");
    for entry in orchestrator.trace().entries() {
        println!(
            "[{}] {:>10} {:<11} {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.agent,
            entry.action,
            entry.detail
        );
    }
}

/// Prints the end-of-session summary.
fn print_summary<C: guru_gateway::GenerativeClient>(orchestrator: &Orchestrator<C>) {
    println!();
    println!("=== Session Summary ===");
    if let Some(session) = orchestrator.session() {
        println!("Topic: {}", session.topic);
        println!("Mastery: {}/100", session.mastery());
        println!("Questions answered: {}", session.quiz_count());
        println!("Materials read: {}", session.content_count());
    }
}

/// Writes the study-pack export for the active session.
fn write_export<C: guru_gateway::GenerativeClient>(
    orchestrator: &Orchestrator<C>,
    path: &Path,
) -> anyhow::Result<()> {
    let Some(session) = orchestrator.session() else {
        return Ok(());
    };
    let export = SessionExport::from_session(session, orchestrator.trace());
    JsonExporter::new(&export).write_to_file(path, true)?;
    tracing::info!(path = %path.display(), "Study pack written");
    println!("Study pack written to {}", path.display());
    Ok(())
}
