//! Typewriter-style terminal output and line input.
//!
//! Output goes through any `std::io::Write`; input comes from any async
//! buffered reader, so sessions can be scripted in tests.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use lehua_story::scene::Beat;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const RULE_WIDTH: usize = 80;

pub struct Terminal<R, W> {
    input: R,
    out: W,
    /// Characters per second; 0 prints instantly and skips pauses.
    typing_speed: u32,
    clear_screen: bool,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W, typing_speed: u32, clear_screen: bool) -> Self {
        Self { input, out, typing_speed, clear_screen }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.out)
    }

    fn char_delay(&self, pace: f32) -> Option<Duration> {
        if self.typing_speed == 0 || pace <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(1.0 / (f64::from(self.typing_speed) * f64::from(pace))))
    }

    /// Write a line instantly.
    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Write a line one character at a time.
    pub async fn type_out(&mut self, text: &str, pace: f32) -> Result<()> {
        let Some(delay) = self.char_delay(pace) else {
            return self.line(text);
        };
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            self.out.flush()?;
            tokio::time::sleep(delay).await;
        }
        self.line("")
    }

    pub async fn pause(&mut self, millis: u64) {
        if self.typing_speed > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    /// Framed scene description.
    pub async fn banner(&mut self, text: &str) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        self.line(&format!("\n{rule}"))?;
        self.type_out(text, Beat::BANNER_PACE).await?;
        self.line(&format!("{rule}\n"))
    }

    pub async fn beat(&mut self, beat: &Beat) -> Result<()> {
        match *beat {
            Beat::Banner(text) => self.banner(text).await,
            Beat::Say(speaker, text) => {
                self.type_out(&speaker.format_line(text), speaker.pace()).await
            }
            Beat::Pause(ms) => {
                self.pause(ms).await;
                Ok(())
            }
        }
    }

    pub async fn beats(&mut self, beats: &[Beat]) -> Result<()> {
        for beat in beats {
            self.beat(beat).await?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        if self.clear_screen {
            crossterm::execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
                .context("Failed to clear screen")?;
        }
        Ok(())
    }

    /// Show `prompt` and read one line. `None` at end of input.
    pub async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .await
            .context("Failed to read input")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
