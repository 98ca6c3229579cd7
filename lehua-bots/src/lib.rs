//! lehua-bots: terminal front ends for "The Spirit of the Lehua Tree".
//!
//! - `lehua-adventure`: the branching text adventure, with free-form answers
//!   interpreted by a chat model when an API key is available
//! - `lehua-storyteller`: a conversational narrator driven by the same story

pub mod terminal;
pub mod adventure;
pub mod session;
