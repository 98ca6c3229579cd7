//! The scene state machine.
//!
//! A `Game` sits on one scene at a time. The front end shows the scene's
//! beats, collects input when the scene ends in a decision, and calls
//! [`Game::advance`] to record the outcome and move on.

use std::collections::{BTreeMap, BTreeSet};

use crate::choice::Choice;
use crate::error::StoryError;
use crate::scene::{Beat, Ending, Exit, Scene, SceneId};
use crate::script;

/// Everything a playthrough accumulates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub visited: BTreeSet<SceneId>,
    pub choices: BTreeMap<SceneId, Choice>,
    pub inventory: Vec<String>,
    pub relationships: BTreeMap<String, i32>,
    /// Number of scenes played through so far.
    pub progress: u32,
    pub game_over: bool,
}

/// Result of leaving a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Beats to play before the next scene, e.g. a guardian's verdict.
    pub reaction: &'static [Beat],
    pub next: SceneId,
}

/// End-of-game recap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneySummary {
    pub locations_visited: usize,
    pub choices_made: usize,
    pub ending: Ending,
}

#[derive(Debug, Clone)]
pub struct Game {
    player: &'static str,
    current: SceneId,
    state: GameState,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            player: script::PLAYER_NAME,
            current: SceneId::Intro,
            state: GameState::default(),
        }
    }

    pub fn player(&self) -> &'static str {
        self.player
    }

    pub fn current(&self) -> SceneId {
        self.current
    }

    /// Content of the current scene; `None` once the story is over.
    pub fn scene(&self) -> Option<&'static Scene> {
        script::scene(self.current)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.game_over
    }

    /// Leave the current scene.
    ///
    /// `choice` must be present exactly when the scene ends in a decision.
    /// Finale scenes end the game without counting as a visited location.
    pub fn advance(&mut self, choice: Option<Choice>) -> Result<Transition, StoryError> {
        let scene = self.scene().ok_or(StoryError::Finished)?;
        let id = scene.id;

        let transition = match (scene.exit, choice) {
            (Exit::Continue(next), None) => {
                self.record(id, None);
                Transition { reaction: &[], next }
            }
            (Exit::Choose(prompt), Some(choice)) => {
                let option = prompt.options.get(choice.index()).ok_or(
                    StoryError::ChoiceOutOfRange {
                        scene: id,
                        choice: choice.number(),
                        options: prompt.options.len(),
                    },
                )?;
                self.record(id, Some(choice));
                Transition { reaction: option.reaction, next: option.next }
            }
            (Exit::Choose(_), None) => return Err(StoryError::ChoiceRequired(id)),
            (Exit::Finale, None) => {
                self.state.game_over = true;
                Transition { reaction: &[], next: SceneId::End }
            }
            (Exit::Continue(_) | Exit::Finale, Some(_)) => {
                return Err(StoryError::UnexpectedChoice(id));
            }
        };

        tracing::debug!(from = %id, to = %transition.next, ?choice, "scene transition");
        self.current = transition.next;
        Ok(transition)
    }

    fn record(&mut self, scene: SceneId, choice: Option<Choice>) {
        self.state.visited.insert(scene);
        if let Some(choice) = choice {
            self.state.choices.insert(scene, choice);
        }
        self.state.progress += 1;
    }

    /// Which ending the choices in the secret chamber led to.
    pub fn ending(&self) -> Ending {
        match self.state.choices.get(&SceneId::Scene3).map(|c| c.number()) {
            Some(1) => Ending::Restoration,
            Some(2) => Ending::Sacrifice,
            Some(_) => Ending::Harmony,
            None => Ending::Unknown,
        }
    }

    pub fn summary(&self) -> JourneySummary {
        JourneySummary {
            locations_visited: self.state.visited.len(),
            choices_made: self.state.choices.len(),
            ending: self.ending(),
        }
    }

    /// Choices in scene order, for the journal.
    pub fn choices(&self) -> Vec<(SceneId, Choice)> {
        self.state.choices.iter().map(|(s, c)| (*s, *c)).collect()
    }

    /// Start over from the opening.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(n: usize) -> Option<Choice> {
        Some(Choice::new(n, 3).unwrap())
    }

    /// Play from the opening, feeding `picks` to each decision point.
    fn play(picks: &[usize]) -> Game {
        let mut game = Game::new();
        let mut picks = picks.iter();
        while !game.is_over() {
            let choice = match game.scene().unwrap().exit {
                Exit::Choose(_) => pick(*picks.next().unwrap()),
                _ => None,
            };
            game.advance(choice).unwrap();
        }
        game
    }

    #[test]
    fn starts_at_the_opening() {
        let game = Game::new();
        assert_eq!(game.current(), SceneId::Intro);
        assert_eq!(game.player(), "Keola");
        assert_eq!(game.ending(), Ending::Unknown);
        assert!(!game.is_over());
    }

    #[test]
    fn ridge_and_chant_restores_the_island() {
        let game = play(&[1, 3, 1]);
        assert_eq!(game.current(), SceneId::End);
        assert_eq!(
            game.summary(),
            JourneySummary { locations_visited: 4, choices_made: 3, ending: Ending::Restoration }
        );
        assert!(game.state().visited.contains(&SceneId::Scene2Ridge));
        assert!(!game.state().visited.contains(&SceneId::FinalRestore));
    }

    #[test]
    fn lava_tube_and_shatter_is_a_sacrifice() {
        let game = play(&[2, 1, 2]);
        assert_eq!(game.ending(), Ending::Sacrifice);
        assert!(game.state().visited.contains(&SceneId::Scene2Lava));
    }

    #[test]
    fn asking_ahi_then_negotiating_brings_harmony() {
        let game = play(&[3, 2, 3, 3, 1]);
        let summary = game.summary();
        assert_eq!(summary.ending, Ending::Harmony);
        // intro, scene 1, more info, lava, scene 3, negotiate
        assert_eq!(summary.locations_visited, 6);
        assert_eq!(summary.choices_made, 5);
        assert_eq!(game.state().progress, 6);
    }

    #[test]
    fn reaction_depends_on_the_answer() {
        let mut game = Game::new();
        game.advance(None).unwrap();
        game.advance(pick(1)).unwrap();
        assert_eq!(game.current(), SceneId::Scene2Ridge);
        let t = game.advance(pick(3)).unwrap();
        assert_eq!(t.next, SceneId::Scene3);
        assert!(matches!(t.reaction.first(), Some(Beat::Say(_, text)) if text.starts_with("Wise answer")));
    }

    #[test]
    fn decisions_are_enforced() {
        let mut game = Game::new();
        assert_eq!(game.advance(pick(1)), Err(StoryError::UnexpectedChoice(SceneId::Intro)));
        game.advance(None).unwrap();
        assert_eq!(game.advance(None), Err(StoryError::ChoiceRequired(SceneId::Scene1)));

        game.advance(pick(3)).unwrap();
        assert_eq!(game.current(), SceneId::Scene1MoreInfo);
        // More-info only offers two paths.
        assert_eq!(
            game.advance(pick(3)),
            Err(StoryError::ChoiceOutOfRange { scene: SceneId::Scene1MoreInfo, choice: 3, options: 2 })
        );
        assert_eq!(game.current(), SceneId::Scene1MoreInfo);
    }

    #[test]
    fn nothing_follows_the_end() {
        let mut game = play(&[1, 1, 1]);
        assert_eq!(game.advance(None), Err(StoryError::Finished));
    }

    #[test]
    fn reset_forgets_the_journey() {
        let mut game = play(&[2, 3, 2]);
        game.reset();
        assert_eq!(game.current(), SceneId::Intro);
        assert_eq!(game.state(), &GameState::default());
    }
}
