//! Errors raised by the scene state machine.

use crate::scene::SceneId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoryError {
    /// The scene ends in a decision but no choice was supplied.
    #[error("scene {0} needs a choice")]
    ChoiceRequired(SceneId),
    /// A choice was supplied to a scene that has no decision point.
    #[error("scene {0} does not take a choice")]
    UnexpectedChoice(SceneId),
    #[error("choice {choice} is out of range for scene {scene} ({options} options)")]
    ChoiceOutOfRange {
        scene: SceneId,
        choice: usize,
        options: usize,
    },
    /// The story already reached its end.
    #[error("the story is over")]
    Finished,
}
