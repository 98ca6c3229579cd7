//! Turning player input into a choice.
//!
//! Two routes: a plain number typed at the prompt, or free-form text that an
//! interpreter maps onto one of the presented options.

use std::fmt;
use std::future::Future;

use crate::llm::{ChatOptions, LlmClient};
use crate::scene::ChoiceCategory;

/// A 1-based option index, validated against the number of options shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Choice(usize);

impl Choice {
    pub fn new(n: usize, options: usize) -> Option<Self> {
        (1..=options).contains(&n).then_some(Self(n))
    }

    pub fn number(self) -> usize {
        self.0
    }

    /// 0-based index into the option list.
    pub fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceError {
    #[error("Please enter a valid number.")]
    NotANumber,
    #[error("Please enter a number between 1 and {options}.")]
    OutOfRange { given: i64, options: usize },
}

/// Parse a typed option number.
pub fn parse_numbered(input: &str, options: usize) -> Result<Choice, ChoiceError> {
    let n: i64 = input.trim().parse().map_err(|_| ChoiceError::NotANumber)?;
    usize::try_from(n)
        .ok()
        .and_then(|n| Choice::new(n, options))
        .ok_or(ChoiceError::OutOfRange { given: n, options })
}

/// First whitespace-separated all-digit token that names a valid option.
pub fn extract_choice(reply: &str, options: usize) -> Option<Choice> {
    reply
        .split_whitespace()
        .filter(|w| w.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|w| w.parse::<usize>().ok())
        .find_map(|n| Choice::new(n, options))
}

pub const INTERPRETER_SYSTEM_PROMPT: &str = "You are a helpful assistant that determines which predefined option a user's free-form text response corresponds to in a text adventure game.";

/// The user turn sent to the model when interpreting an answer.
pub fn interpretation_prompt(input: &str, options: &[&str]) -> String {
    let listed = options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("{}. {o}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "In a text adventure game, the user has been presented with the following options:\n\n\
         {listed}\n\n\
         The user responded with: \"{input}\"\n\n\
         Based on their response, which option (1 to {n}) did they choose?\n\
         Respond with just the number of the best matching option.",
        n = options.len()
    )
}

/// Maps a free-form answer onto one of the presented options.
pub trait ChoiceInterpreter {
    fn interpret(
        &self,
        input: &str,
        options: &[&str],
        category: ChoiceCategory,
    ) -> impl Future<Output = anyhow::Result<Choice>> + Send;
}

/// Interprets answers with a chat model.
pub struct LlmInterpreter {
    llm: LlmClient,
}

impl LlmInterpreter {
    pub const OPTIONS: ChatOptions = ChatOptions { temperature: 0.3, max_tokens: 10 };

    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

impl ChoiceInterpreter for LlmInterpreter {
    async fn interpret(
        &self,
        input: &str,
        options: &[&str],
        category: ChoiceCategory,
    ) -> anyhow::Result<Choice> {
        anyhow::ensure!(!options.is_empty(), "no options to choose from");

        if let Ok(choice) = parse_numbered(input, options.len()) {
            return Ok(choice);
        }

        let prompt = interpretation_prompt(input, options);
        let reply = self
            .llm
            .complete(INTERPRETER_SYSTEM_PROMPT, &prompt, Self::OPTIONS)
            .await?;

        match extract_choice(&reply, options.len()) {
            Some(choice) => {
                tracing::debug!(category = category.as_str(), %choice, "interpreted free-form answer");
                Ok(choice)
            }
            None => {
                tracing::warn!(category = category.as_str(), reply = %reply, "no option in model reply, using option 1");
                Ok(Choice(1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_input_is_trimmed_and_range_checked() {
        assert_eq!(parse_numbered(" 2\n", 3).unwrap().number(), 2);
        assert_eq!(parse_numbered("x", 3), Err(ChoiceError::NotANumber));
        assert_eq!(parse_numbered("", 3), Err(ChoiceError::NotANumber));
        assert_eq!(
            parse_numbered("4", 3),
            Err(ChoiceError::OutOfRange { given: 4, options: 3 })
        );
        assert_eq!(
            parse_numbered("-1", 2).unwrap_err().to_string(),
            "Please enter a number between 1 and 2."
        );
    }

    #[test]
    fn choice_rejects_zero() {
        assert!(Choice::new(0, 3).is_none());
        assert_eq!(Choice::new(3, 3).unwrap().index(), 2);
    }

    #[test]
    fn extraction_takes_first_valid_number() {
        assert_eq!(extract_choice("2", 3).map(Choice::number), Some(2));
        assert_eq!(extract_choice("Option 3", 3).map(Choice::number), Some(3));
        assert_eq!(extract_choice("9 then 1", 3).map(Choice::number), Some(1));
        // Punctuation glued to the digit does not count.
        assert_eq!(extract_choice("2.", 3), None);
        assert_eq!(extract_choice("none of them", 3), None);
    }

    #[test]
    fn prompt_lists_options_and_quotes_input() {
        let p = interpretation_prompt("go up high", &["Climb.", "Descend."]);
        assert!(p.contains("1. Climb., 2. Descend."));
        assert!(p.contains("\"go up high\""));
        assert!(p.contains("(1 to 2)"));
    }
}
