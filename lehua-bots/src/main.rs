//! lehua-adventure: "The Spirit of the Lehua Tree" in the terminal.
//!
//! With an OpenAI-compatible API key the player answers in their own words
//! and a chat model maps the answer onto the options shown. Without one,
//! every decision is made by number.
//!
//! Reads `.env` from the working directory if present.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lehua_story::config::{Config, Overrides, Resolved};
use lehua_story::journal::Journal;

use lehua_bots::adventure::{self, Adventure, InputMode};
use lehua_bots::terminal::Terminal;

#[derive(Parser)]
#[command(name = "lehua-adventure", about = "The Spirit of the Lehua Tree — a Hawaiian text adventure")]
struct Args {
    /// OpenAI API key (or set OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat model used to interpret free-form answers
    #[arg(long, env = "LEHUA_MODEL")]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Typewriter speed in characters per second (0 = instant)
    #[arg(long)]
    typing_speed: Option<u32>,

    /// Don't clear the screen between scenes
    #[arg(long)]
    no_clear: bool,

    /// Always choose by number, even with an API key
    #[arg(long)]
    numbered: bool,

    /// Journal database path
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Don't record journeys
    #[arg(long)]
    no_journal: bool,

    /// Show past journeys and exit
    #[arg(long)]
    history: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            typing_speed: self.typing_speed,
            no_clear: self.no_clear,
            journal: self.journal.clone(),
        }
    }
}

fn open_journal(resolved: &Resolved) -> Option<Journal> {
    match Journal::open(&resolved.journal) {
        Ok(j) => Some(j),
        Err(e) => {
            tracing::warn!(error = %e, "Journeys won't be recorded");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lehua_bots=warn,lehua_story=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let resolved = Resolved::merge(&args.overrides(), &Config::load());

    if args.history {
        let journal = Journal::open(&resolved.journal)?;
        print!("{}", adventure::history_report(&journal, 20)?);
        return Ok(());
    }

    let mode = InputMode::select(resolved.api_key.as_deref(), args.numbered);
    if mode == InputMode::MissingKey {
        eprintln!("Warning: OPENAI_API_KEY not found in environment variables.");
        eprintln!("You'll need to set this for the LLM functionality to work.");
        eprintln!("For now, the game will fall back to numbered choices.");
    }
    let interpreter = mode.interpreter(&resolved);

    tracing::info!(
        model = %resolved.model,
        free_form = interpreter.is_some(),
        typing_speed = resolved.typing_speed,
        "Starting lehua-adventure"
    );

    let term = Terminal::new(
        tokio::io::BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
        resolved.typing_speed,
        resolved.clear_screen,
    );
    let mut game = Adventure::new(term, interpreter).with_mode(mode);
    if !args.no_journal {
        if let Some(journal) = open_journal(&resolved) {
            game = game.with_journal(journal);
        }
    }

    let outcome = game.run().await?;
    tracing::info!(
        journeys = outcome.journeys.len(),
        input_closed = outcome.input_closed,
        "Session over"
    );
    Ok(())
}
