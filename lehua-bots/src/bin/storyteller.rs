//! lehua-storyteller: a conversational narrator for the Lehua Tree story.
//!
//! The storyteller greets you, confirms your name, and guides you through
//! the scenes, adapting to whatever you say. Type `/pages` to reread the
//! story so far, `/quit` to leave.
//!
//! Usage:
//!   OPENAI_API_KEY=sk-... cargo run --release --bin lehua-storyteller
//!
//! Reads `.env` from the working directory if present.

use anyhow::{Context, Result};
use clap::Parser;
use lehua_story::config::{Config, Overrides, Resolved};
use lehua_story::journal::Journal;
use lehua_story::llm::LlmClient;
use lehua_story::storyteller::Storyteller;

use lehua_bots::session::StorySession;
use lehua_bots::terminal::Terminal;

#[derive(Parser)]
#[command(name = "lehua-storyteller", about = "Conversational storyteller for The Spirit of the Lehua Tree")]
struct Args {
    /// OpenAI API key (or set OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat model
    #[arg(long, env = "LEHUA_MODEL")]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Typewriter speed in characters per second (0 = instant)
    #[arg(long)]
    typing_speed: Option<u32>,

    /// Don't keep a transcript in the journal
    #[arg(long)]
    no_journal: bool,

    /// Reprint the pages of a past session and exit
    #[arg(long, value_name = "SESSION")]
    replay: Option<String>,
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
    let overrides = Overrides {
        api_key: args.api_key.clone(),
        model: args.model.clone(),
        base_url: args.base_url.clone(),
        typing_speed: args.typing_speed,
        no_clear: true,
        journal: None,
    };
    let resolved = Resolved::merge(&overrides, &Config::load());

    if let Some(session) = &args.replay {
        let journal = Journal::open(&resolved.journal)?;
        for page in journal.pages(session)? {
            println!("── Page {} ──\n{}\n", page.number, page.text);
        }
        return Ok(());
    }

    let api_key = resolved
        .api_key
        .clone()
        .context("OPENAI_API_KEY is required for the storyteller (set it in .env or pass --api-key)")?;

    let llm = LlmClient::new(api_key)
        .with_model(&resolved.model)
        .with_base_url(&resolved.base_url);

    let journal = if args.no_journal {
        None
    } else {
        Some(Journal::open(&resolved.journal)?)
    };

    let session_id = chrono::Utc::now().format("%Y%m%d-%H%M%S").to_string();
    tracing::info!(model = %resolved.model, session = %session_id, "Starting lehua-storyteller");

    let term = Terminal::new(
        tokio::io::BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
        resolved.typing_speed,
        false,
    );
    let mut session = StorySession::new(Storyteller::new(llm), term, session_id.clone());
    if let Some(journal) = &journal {
        session = session.with_journal(journal);
    }
    session.run().await?;

    if journal.is_some() {
        eprintln!("Transcript saved. Replay with: lehua-storyteller --replay {session_id}");
    }
    Ok(())
}
