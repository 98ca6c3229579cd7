//! The text adventure session: welcome, playthroughs, endings, play again.

use std::io::Write;

use anyhow::Result;
use lehua_story::choice::{self, Choice, ChoiceInterpreter, LlmInterpreter};
use lehua_story::config::Resolved;
use lehua_story::journal::Journal;
use lehua_story::llm::LlmClient;
use lehua_story::scene::{ChoiceCategory, Exit};
use lehua_story::{Game, JourneySummary, script};
use tokio::io::AsyncBufRead;

use crate::terminal::{RULE_WIDTH, Terminal};

/// What happened during a session.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outcome {
    /// Completed journeys in play order.
    pub journeys: Vec<JourneySummary>,
    /// Input ran out before the player chose to stop.
    pub input_closed: bool,
}

/// How the player answers decisions, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Free-form answers interpreted by the chat model.
    FreeForm,
    /// Numbered because no API key is configured.
    MissingKey,
    /// Numbered because the player asked for it.
    Numbered,
}

impl InputMode {
    pub fn select(api_key: Option<&str>, numbered: bool) -> Self {
        match (api_key, numbered) {
            (_, true) => InputMode::Numbered,
            (Some(_), false) => InputMode::FreeForm,
            (None, false) => InputMode::MissingKey,
        }
    }

    /// The interpreter for free-form mode; `None` otherwise.
    pub fn interpreter(self, resolved: &Resolved) -> Option<LlmInterpreter> {
        let key = resolved.api_key.as_ref()?;
        (self == InputMode::FreeForm).then(|| {
            LlmInterpreter::new(
                LlmClient::new(key.clone())
                    .with_model(&resolved.model)
                    .with_base_url(&resolved.base_url),
            )
        })
    }
}

/// Control flow when input may end at any prompt.
enum Step<T> {
    Go(T),
    Eof,
}

pub struct Adventure<I, R, W> {
    term: Terminal<R, W>,
    interpreter: Option<I>,
    mode: InputMode,
    journal: Option<Journal>,
    game: Game,
}

impl<I, R, W> Adventure<I, R, W>
where
    I: ChoiceInterpreter,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Without an interpreter every decision is made by number.
    pub fn new(term: Terminal<R, W>, interpreter: Option<I>) -> Self {
        let mode = if interpreter.is_some() { InputMode::FreeForm } else { InputMode::MissingKey };
        Self { term, interpreter, mode, journal: None, game: Game::new() }
    }

    /// Record why numbered choices are in use, for the welcome note.
    /// Has no effect when an interpreter is present.
    pub fn with_mode(mut self, mode: InputMode) -> Self {
        if self.interpreter.is_none() && mode != InputMode::FreeForm {
            self.mode = mode;
        }
        self
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn journal(&self) -> Option<&Journal> {
        self.journal.as_ref()
    }

    pub fn into_terminal(self) -> Terminal<R, W> {
        self.term
    }

    /// Run the whole session until the player declines to play again or
    /// input ends.
    pub async fn run(&mut self) -> Result<Outcome> {
        let mut outcome = Outcome::default();

        if let Step::Eof = self.welcome().await? {
            outcome.input_closed = true;
            return Ok(outcome);
        }

        loop {
            self.game.reset();
            match self.play_through().await? {
                Step::Go(summary) => outcome.journeys.push(summary),
                Step::Eof => {
                    outcome.input_closed = true;
                    break;
                }
            }
            match self.end_screen().await? {
                Step::Go(true) => continue,
                Step::Go(false) => break,
                Step::Eof => {
                    outcome.input_closed = true;
                    break;
                }
            }
        }

        self.term.line("\nThank you for playing! A hui hou (Until we meet again)!")?;
        Ok(outcome)
    }

    async fn welcome(&mut self) -> Result<Step<()>> {
        let rule = "=".repeat(RULE_WIDTH);
        let title = format!("Welcome to {}", script::TITLE);
        self.term.line(&format!("\n{rule}"))?;
        self.term.line(&format!("{title:^RULE_WIDTH$}"))?;
        self.term.line(&format!("{:^RULE_WIDTH$}", script::SUBTITLE))?;
        self.term.line(&format!("{rule}\n"))?;

        self.term.line("In this adventure, you will play as Keola, a young guardian in training,")?;
        self.term.line("chosen to protect the sacred island of Moku Huna.")?;
        self.term.line("\nYour choices will shape the story and determine the fate of the island.")?;

        match self.mode {
            InputMode::FreeForm => {
                self.term.line("\nYou can respond to choices using natural language instead of numbers.")?;
            }
            InputMode::MissingKey => {
                self.term.line("\nNote: OpenAI API key not found. The game will use numbered choices.")?;
                self.term.line("To enable free-form text input, set the OPENAI_API_KEY environment variable.")?;
            }
            InputMode::Numbered => {
                self.term.line("\nNote: Numbered choices only. Free-form input is turned off.")?;
            }
        }

        self.term.line("\nPress Enter to begin your journey...")?;
        Ok(match self.term.read_line("").await? {
            Some(_) => Step::Go(()),
            None => Step::Eof,
        })
    }

    async fn play_through(&mut self) -> Result<Step<JourneySummary>> {
        while let Some(scene) = self.game.scene() {
            self.term.clear()?;
            self.term.beats(scene.beats).await?;

            let choice = match scene.exit {
                Exit::Continue(_) => match self.term.read_line("\nPress Enter to continue...").await? {
                    Some(_) => None,
                    None => return Ok(Step::Eof),
                },
                Exit::Choose(prompt) => {
                    match self.ask_choice(&prompt.labels(), prompt.category).await? {
                        Step::Go(choice) => Some(choice),
                        Step::Eof => return Ok(Step::Eof),
                    }
                }
                Exit::Finale => None,
            };

            let transition = self.game.advance(choice)?;
            self.term.beats(transition.reaction).await?;
        }

        let summary = self.game.summary();
        tracing::info!(ending = %summary.ending, visited = summary.locations_visited, "journey complete");
        if let Some(journal) = &self.journal {
            if let Err(e) = journal.record_journey(&summary, &self.game.choices()) {
                tracing::warn!(error = %e, "Failed to record journey");
            }
        }
        Ok(Step::Go(summary))
    }

    /// Show the ending recap and ask about another round.
    async fn end_screen(&mut self) -> Result<Step<bool>> {
        let stars = "*".repeat(RULE_WIDTH);
        let summary = self.game.summary();

        self.term.clear()?;
        self.term.line(&format!("\n{stars}"))?;
        self.term.type_out("THE END", 0.5).await?;
        self.term.line(&format!("{stars}\n"))?;

        self.term.type_out("Thank you for playing The Spirit of the Lehua Tree!", 1.5).await?;
        self.term.pause(500).await;

        self.term.line("\nYour Journey Summary:")?;
        self.term.line(&format!("- Locations visited: {}", summary.locations_visited))?;
        self.term.line(&format!("- Story choices made: {}", summary.choices_made))?;
        self.term.line(&format!("- Ending achieved: {}", summary.ending))?;

        self.term.line("\nWould you like to play again?")?;
        Ok(match self.ask_choice(&["Yes", "No"], ChoiceCategory::PlayAgain).await? {
            Step::Go(choice) => Step::Go(choice.number() == 1),
            Step::Eof => Step::Eof,
        })
    }

    async fn ask_choice(&mut self, options: &[&str], category: ChoiceCategory) -> Result<Step<Choice>> {
        self.term.line("\nWhat will you do?")?;
        for (i, option) in options.iter().enumerate() {
            self.term.line(&format!("{}. {option}", i + 1))?;
        }

        let Some(interpreter) = &self.interpreter else {
            return self.numbered_choice(options.len()).await;
        };

        self.term.line("\nDescribe your choice in your own words:")?;
        let Some(answer) = self.term.read_line("> ").await? else {
            return Ok(Step::Eof);
        };

        match interpreter.interpret(&answer, options, category).await {
            Ok(choice) => Ok(Step::Go(choice)),
            Err(e) => {
                tracing::warn!(error = %e, category = category.as_str(), "choice interpretation failed");
                self.term.line(&format!("\nError processing input with LLM: {e}"))?;
                self.term.line("Falling back to numbered choice selection.")?;
                self.numbered_choice(options.len()).await
            }
        }
    }

    async fn numbered_choice(&mut self, options: usize) -> Result<Step<Choice>> {
        loop {
            let Some(input) = self.term.read_line("\nEnter your choice (number): ").await? else {
                return Ok(Step::Eof);
            };
            match choice::parse_numbered(&input, options) {
                Ok(choice) => return Ok(Step::Go(choice)),
                Err(e) => self.term.line(&e.to_string())?,
            }
        }
    }
}

/// Text for `--history`: recent journeys and how often each ending was reached.
pub fn history_report(journal: &Journal, limit: usize) -> Result<String> {
    let journeys = journal.recent_journeys(limit)?;
    if journeys.is_empty() {
        return Ok("No journeys recorded yet.\n".to_string());
    }

    let mut out = String::from("Recent journeys:\n");
    for j in &journeys {
        out += &format!(
            "  #{:<4} {:<12} {} locations, {} choices  ({})\n",
            j.id, j.summary.ending.as_str(), j.summary.locations_visited, j.summary.choices_made, j.finished_at
        );
    }

    out += "\nEndings reached:\n";
    for (ending, count) in journal.ending_counts()? {
        out += &format!("  {:<12} {count}\n", ending.as_str());
    }
    Ok(out)
}
