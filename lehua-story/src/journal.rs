//! Persistent journal backed by SQLite.
//!
//! Keeps a record of finished journeys (for the history screen) and the
//! pages narrated in storyteller sessions.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;

use crate::choice::Choice;
use crate::game::JourneySummary;
use crate::scene::{Ending, SceneId};
use crate::storyteller::StoryPage;

/// A finished playthrough as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyRecord {
    pub id: i64,
    pub summary: JourneySummary,
    pub choices: Vec<(SceneId, Choice)>,
    pub finished_at: String,
}

pub struct Journal {
    db: Mutex<Connection>,
}

impl Journal {
    /// Open or create a journal database, creating its directory if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if path != Path::new(":memory:") {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create journal directory {}", parent.display())
                })?;
            }
        }
        let db = Connection::open(path)
            .with_context(|| format!("Failed to open journal at {}", path.display()))?;
        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS journeys (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ending TEXT NOT NULL,
                locations_visited INTEGER NOT NULL,
                choices_made INTEGER NOT NULL,
                choices TEXT NOT NULL,
                finished_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS story_pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session TEXT NOT NULL,
                number INTEGER NOT NULL,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_story_pages_session
                ON story_pages(session, number);",
        )?;
        Ok(Self { db: Mutex::new(db) })
    }

    /// Open an in-memory journal (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::open(Path::new(":memory:"))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| anyhow::anyhow!("journal lock poisoned"))
    }

    /// Store a finished journey. Returns its row id.
    pub fn record_journey(
        &self,
        summary: &JourneySummary,
        choices: &[(SceneId, Choice)],
    ) -> Result<i64> {
        let encoded: Vec<(&str, usize)> = choices
            .iter()
            .map(|(scene, choice)| (scene.key(), choice.number()))
            .collect();
        let encoded = serde_json::to_string(&encoded)?;
        let db = self.conn()?;
        db.execute(
            "INSERT INTO journeys (ending, locations_visited, choices_made, choices, finished_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                summary.ending.as_str(),
                summary.locations_visited as i64,
                summary.choices_made as i64,
                encoded,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(db.last_insert_rowid())
    }

    /// Most recent journeys first.
    pub fn recent_journeys(&self, limit: usize) -> Result<Vec<JourneyRecord>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT id, ending, locations_visited, choices_made, choices, finished_at
             FROM journeys ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(rusqlite::params![limit as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, ending, visited, made, choices, finished_at)| {
                Ok(JourneyRecord {
                    id,
                    summary: JourneySummary {
                        locations_visited: visited as usize,
                        choices_made: made as usize,
                        ending: ending.parse().map_err(anyhow::Error::msg)?,
                    },
                    choices: decode_choices(&choices)?,
                    finished_at,
                })
            })
            .collect()
    }

    /// How often each ending has been reached, most common first.
    pub fn ending_counts(&self) -> Result<Vec<(Ending, u32)>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT ending, COUNT(*) FROM journeys GROUP BY ending
             ORDER BY COUNT(*) DESC, ending ASC",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(ending, n)| Ok((ending.parse().map_err(anyhow::Error::msg)?, n)))
            .collect()
    }

    /// Append a storyteller page to a session transcript.
    pub fn save_page(&self, session: &str, page: &StoryPage) -> Result<()> {
        let db = self.conn()?;
        db.execute(
            "INSERT INTO story_pages (session, number, text, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![session, page.number, page.text, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// All pages of a session in order.
    pub fn pages(&self, session: &str) -> Result<Vec<StoryPage>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT number, text FROM story_pages WHERE session = ?1
             ORDER BY number ASC, id ASC",
        )?;
        let pages = stmt
            .query_map(rusqlite::params![session], |row| {
                Ok(StoryPage { number: row.get(0)?, text: row.get(1)? })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pages)
    }
}

fn decode_choices(encoded: &str) -> Result<Vec<(SceneId, Choice)>> {
    let raw: Vec<(String, usize)> =
        serde_json::from_str(encoded).context("Corrupt choices column")?;
    raw.into_iter()
        .map(|(key, n)| {
            let scene: SceneId = key.parse().map_err(anyhow::Error::msg)?;
            // Stored choices were validated when made; only the lower bound matters here.
            let choice = Choice::new(n, n).with_context(|| format!("invalid choice {n} for {key}"))?;
            Ok((scene, choice))
        })
        .collect()
}
