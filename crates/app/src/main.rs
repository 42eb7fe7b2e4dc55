use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{Clock, ExamPlanBuilder, ExamService};
use storage::JsonFileRepository;
use tracing_subscriber::EnvFilter;

mod console;

#[derive(Parser, Debug)]
#[command(name = "exam", version, about = "Multiple-choice practice exam in the terminal")]
struct Args {
    /// Question bank (JSON array, or object with a `questions` key)
    #[arg(long, env = "EXAM_QUESTIONS", default_value = "data/questions.json")]
    questions: PathBuf,

    /// Candidate name; prompted for when omitted
    #[arg(long, env = "EXAM_NAME")]
    name: Option<String>,

    /// Seed for a reproducible question and option order
    #[arg(long, env = "EXAM_SEED")]
    seed: Option<u64>,

    /// Keep questions in the order of the bank
    #[arg(long)]
    keep_order: bool,

    /// Keep options in the order of the bank
    #[arg(long)]
    keep_option_order: bool,

    /// Ask at most this many questions
    #[arg(long, env = "EXAM_LIMIT")]
    limit: Option<usize>,

    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Logs go to stderr so they never interleave with the exam screen.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    let name = match args.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => match console::prompt_name(&mut input, &mut out)? {
            Some(name) => name,
            None => return Ok(()),
        },
    };

    let plan = ExamPlanBuilder::new()
        .with_shuffle_questions(!args.keep_order)
        .with_shuffle_options(!args.keep_option_order)
        .with_limit(args.limit);
    let repo = Arc::new(JsonFileRepository::new(&args.questions));
    let service = ExamService::new(Clock::default(), repo).with_plan(plan);

    let launch = match args.seed {
        Some(seed) => {
            service
                .start_exam_with_rng(&name, &mut StdRng::seed_from_u64(seed))
                .await
        }
        None => service.start_exam(&name).await,
    }
    .with_context(|| format!("could not start exam from {}", args.questions.display()))?;

    tracing::info!(
        candidate = %name,
        questions = launch.session.question_count(),
        skipped = launch.skipped.len(),
        seed = ?args.seed,
        "exam started"
    );
    if !launch.skipped.is_empty() {
        writeln!(
            out,
            "Note: {} invalid question(s) in the bank were skipped.",
            launch.skipped.len()
        )?;
    }

    let mut session = launch.session;
    console::run(&mut session, &mut input, &mut out)?;
    out.flush()?;

    let summary = session.summary();
    tracing::info!(
        correct = summary.correct,
        incorrect = summary.incorrect,
        unanswered = summary.unanswered,
        "exam finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
