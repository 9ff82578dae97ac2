//! ATLAS CLI binary: ask the academic assistant from the command line.
//!
//! One-shot with `-m/--message` (or a positional message), or `-i` for an
//! interactive session. Loads the student documents from the data directory
//! and talks to the NVIDIA-hosted oracle.

mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use atlas::{AtlasRunner, ChatNvidia, DataManager, LlmClient, DEFAULT_HORIZON_DAYS};

const API_KEY_ENV: &str = "NEMOTRON_4_340B_INSTRUCT_KEY";

#[derive(Parser, Debug)]
#[command(name = "atlas")]
#[command(about = "ATLAS — academic task and learning agent system")]
struct Args {
    /// User message (or pass as first positional argument)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: user message when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Directory with profile.json, calendar.json and task.json
    #[arg(long, value_name = "DIR", default_value = "demos/data")]
    data_dir: PathBuf,

    /// Student id to look up in profile.json
    #[arg(long, value_name = "ID", default_value = "student_123")]
    student: String,

    /// Calendar look-ahead window in days
    #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_HORIZON_DAYS)]
    horizon_days: i64,

    /// Interactive REPL: after output, prompt for the next request
    #[arg(short, long)]
    interactive: bool,

    /// Skip the startup authentication probe
    #[arg(long)]
    skip_auth_check: bool,

    /// Verbose: debug-level logs for the atlas library
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "atlas=debug,cli=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_documents(args: &Args) -> Result<DataManager, Box<dyn std::error::Error>> {
    let read = |name: &str| -> Result<String, Box<dyn std::error::Error>> {
        let path = args.data_dir.join(name);
        std::fs::read_to_string(&path)
            .map_err(|e| format!("read {}: {}", path.display(), e).into())
    };
    let mut data = DataManager::new();
    data.load_data(
        &read("profile.json")?,
        &read("calendar.json")?,
        &read("task.json")?,
    )?;
    Ok(data)
}

fn print_response(response: &atlas::AtlasResponse) {
    let agents: Vec<&str> = response
        .analysis
        .required_agents
        .iter()
        .map(|kind| kind.wire_name())
        .collect();
    println!("Selected agents: {}", agents.join(", "));
    println!("Reasoning: {}", response.analysis.reasoning);
    println!();
    println!("{}", response.answer);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // env > .env > ~/.config/atlas/config.toml
    config::load_and_apply("atlas", None)?;
    init_tracing(args.verbose);

    let api_key = std::env::var(API_KEY_ENV)
        .map_err(|_| format!("{API_KEY_ENV} is not set (env, .env or XDG config.toml)"))?;
    let llm = Arc::new(ChatNvidia::new(api_key));

    if !args.skip_auth_check && !llm.check_auth().await {
        eprintln!("warning: authentication probe failed; continuing anyway");
    }

    let data = load_documents(&args)?;
    let runner = AtlasRunner::new(data, llm as Arc<dyn LlmClient>)
        .with_student(&args.student)
        .with_horizon_days(args.horizon_days);

    let message = args
        .message
        .clone()
        .or_else(|| (!args.rest.is_empty()).then(|| args.rest.join(" ")));

    if let Some(message) = message {
        let response = runner.ask(&message).await;
        print_response(&response);
        if !args.interactive {
            return Ok(());
        }
    } else if !args.interactive {
        eprintln!("no message given; pass -m/--message or use -i for interactive mode");
        std::process::exit(2);
    }

    repl::run_repl_loop(&runner).await
}
