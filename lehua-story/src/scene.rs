//! Story vocabulary: scenes, voices, beats and decision points.

use std::fmt;
use std::str::FromStr;

/// Every place the story can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SceneId {
    Intro,
    Scene1,
    Scene1MoreInfo,
    Scene2Ridge,
    Scene2Lava,
    Scene3,
    Scene3Negotiate,
    FinalRestore,
    FinalShatter,
    FinalNegotiate,
    End,
}

impl SceneId {
    pub const ALL: [SceneId; 11] = [
        SceneId::Intro,
        SceneId::Scene1,
        SceneId::Scene1MoreInfo,
        SceneId::Scene2Ridge,
        SceneId::Scene2Lava,
        SceneId::Scene3,
        SceneId::Scene3Negotiate,
        SceneId::FinalRestore,
        SceneId::FinalShatter,
        SceneId::FinalNegotiate,
        SceneId::End,
    ];

    /// Stable key used in the journal and in logs.
    pub fn key(self) -> &'static str {
        match self {
            SceneId::Intro => "intro",
            SceneId::Scene1 => "scene_1",
            SceneId::Scene1MoreInfo => "scene_1_more_info",
            SceneId::Scene2Ridge => "scene_2_ridge",
            SceneId::Scene2Lava => "scene_2_lava",
            SceneId::Scene3 => "scene_3",
            SceneId::Scene3Negotiate => "scene_3_negotiate",
            SceneId::FinalRestore => "final_scene_restore",
            SceneId::FinalShatter => "final_scene_shatter",
            SceneId::FinalNegotiate => "final_scene_negotiate",
            SceneId::End => "end",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SceneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneId::ALL
            .into_iter()
            .find(|id| id.key() == s)
            .ok_or_else(|| format!("unknown scene: {s}"))
    }
}

/// Voices that speak in the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Character {
    Host,
    Ahi,
    MooWahine,
    NightFogSpirit,
    Menehune,
    Player,
    /// Unattributed text.
    None,
}

impl Character {
    pub fn label(self) -> &'static str {
        match self {
            Character::Host => "HOST",
            Character::Ahi => "AHI",
            Character::MooWahine => "MOʻO WAHINE",
            Character::NightFogSpirit => "NIGHT FOG SPIRIT",
            Character::Menehune => "MENEHUNE",
            Character::Player => "KEOLA",
            Character::None => "",
        }
    }

    /// Typing pace multiplier. The host narrates faster than the spirits speak.
    pub fn pace(self) -> f32 {
        match self {
            Character::Host => 1.2,
            _ => 0.8,
        }
    }

    /// `"LABEL: text"`, or the bare text for unattributed lines.
    pub fn format_line(self, text: &str) -> String {
        match self {
            Character::None => text.to_string(),
            speaker => format!("{}: {text}", speaker.label()),
        }
    }
}

/// What kind of decision the player is making.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceCategory {
    Path,
    Answer,
    Action,
    Negotiation,
    PlayAgain,
}

impl ChoiceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ChoiceCategory::Path => "path",
            ChoiceCategory::Answer => "answer",
            ChoiceCategory::Action => "action",
            ChoiceCategory::Negotiation => "negotiation",
            ChoiceCategory::PlayAgain => "play_again",
        }
    }
}

/// How a playthrough concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ending {
    Restoration,
    Sacrifice,
    Harmony,
    Unknown,
}

impl Ending {
    pub fn as_str(self) -> &'static str {
        match self {
            Ending::Restoration => "Restoration",
            Ending::Sacrifice => "Sacrifice",
            Ending::Harmony => "Harmony",
            Ending::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ending {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Restoration" => Ok(Ending::Restoration),
            "Sacrifice" => Ok(Ending::Sacrifice),
            "Harmony" => Ok(Ending::Harmony),
            "Unknown" => Ok(Ending::Unknown),
            other => Err(format!("unknown ending: {other}")),
        }
    }
}

/// One unit of presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Beat {
    /// Scene-setting description, shown framed.
    Banner(&'static str),
    Say(Character, &'static str),
    /// Dramatic pause in milliseconds.
    Pause(u64),
}

impl Beat {
    /// Pace of banner text.
    pub const BANNER_PACE: f32 = 1.5;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub next: SceneId,
    /// Beats played after the option is picked, before moving on.
    pub reaction: &'static [Beat],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prompt {
    pub category: ChoiceCategory,
    pub options: &'static [ChoiceOption],
}

impl Prompt {
    pub fn labels(&self) -> Vec<&'static str> {
        self.options.iter().map(|o| o.label).collect()
    }
}

/// How a scene hands control onward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exit {
    /// Wait for the player, then go to the given scene.
    Continue(SceneId),
    Choose(Prompt),
    /// The story is over after this scene.
    Finale,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub id: SceneId,
    pub beats: &'static [Beat],
    pub exit: Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_keys_parse_back() {
        for id in SceneId::ALL {
            assert_eq!(id.key().parse::<SceneId>().unwrap(), id);
        }
        assert!("scene_9".parse::<SceneId>().is_err());
    }

    #[test]
    fn dialogue_formatting() {
        assert_eq!(Character::Ahi.format_line("Hoot."), "AHI: Hoot.");
        assert_eq!(
            Character::MooWahine.format_line("Answer me."),
            "MOʻO WAHINE: Answer me."
        );
        assert_eq!(Character::None.format_line("Silence."), "Silence.");
    }

    #[test]
    fn host_narrates_faster() {
        assert!(Character::Host.pace() > Character::Ahi.pace());
        assert_eq!(Character::Player.pace(), Character::NightFogSpirit.pace());
    }

    #[test]
    fn endings_round_trip_through_display() {
        for e in [Ending::Restoration, Ending::Sacrifice, Ending::Harmony, Ending::Unknown] {
            assert_eq!(e.to_string().parse::<Ending>().unwrap(), e);
        }
    }
}
