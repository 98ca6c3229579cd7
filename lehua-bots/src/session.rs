//! Storyteller chat session over the terminal.
//!
//! Commands:
//!   /pages   — reprint the story so far
//!   /quit    — end the session (so does end of input)

use std::io::Write;

use anyhow::Result;
use lehua_story::journal::Journal;
use lehua_story::storyteller::{StoryPage, Storyteller};
use tokio::io::AsyncBufRead;

use crate::terminal::Terminal;

const NARRATION_PACE: f32 = 1.2;

pub struct StorySession<'j, R, W> {
    teller: Storyteller,
    term: Terminal<R, W>,
    journal: Option<&'j Journal>,
    session_id: String,
}

impl<'j, R, W> StorySession<'j, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(teller: Storyteller, term: Terminal<R, W>, session_id: impl Into<String>) -> Self {
        Self { teller, term, journal: None, session_id: session_id.into() }
    }

    pub fn with_journal(mut self, journal: &'j Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn storyteller(&self) -> &Storyteller {
        &self.teller
    }

    pub fn into_terminal(self) -> Terminal<R, W> {
        self.term
    }

    /// Greet the listener, then converse until `/quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        let greeting = self.teller.open().await?.clone();
        self.show(&greeting).await?;

        loop {
            let Some(line) = self.term.read_line("\n> ").await? else {
                break;
            };
            let line = line.trim();
            match line {
                "" => continue,
                "/quit" | "/exit" => break,
                "/pages" => self.reprint().await?,
                text => match self.teller.reply(text).await {
                    Ok(page) => {
                        let page = page.clone();
                        self.show(&page).await?;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "storyteller reply failed");
                        self.term.line(&format!("(The storyteller is silent: {e})"))?;
                    }
                },
            }
        }

        tracing::info!(session = %self.session_id, pages = self.teller.pages().len(), "story session ended");
        self.term.line("\nA hui hou.")?;
        Ok(())
    }

    async fn show(&mut self, page: &StoryPage) -> Result<()> {
        self.term.line("")?;
        self.term.type_out(&page.text, NARRATION_PACE).await?;
        if let Some(journal) = self.journal {
            if let Err(e) = journal.save_page(&self.session_id, page) {
                tracing::warn!(error = %e, "Failed to save story page");
            }
        }
        Ok(())
    }

    async fn reprint(&mut self) -> Result<()> {
        let pages = self.teller.pages().to_vec();
        for page in &pages {
            self.term.line(&format!("\n── Page {} ──", page.number))?;
            self.term.line(&page.text)?;
        }
        Ok(())
    }
}
