//! lehua-story: engine for "The Spirit of the Lehua Tree".
//!
//! Everything here is free of terminal I/O:
//! - Scene vocabulary and the authored script
//! - The scene state machine and journey summary
//! - Choice parsing and LLM-backed interpretation of free-form answers
//! - The storyteller conversation (persona prompt + message history)
//! - Journal persistence and configuration layering

pub mod config;
pub mod error;
pub mod scene;
pub mod script;
pub mod game;
pub mod choice;
pub mod llm;
pub mod storyteller;
pub mod journal;

pub use choice::Choice;
pub use error::StoryError;
pub use game::{Game, GameState, JourneySummary, Transition};
pub use scene::{Beat, Character, ChoiceCategory, Ending, Exit, Prompt, Scene, SceneId};
