//! The authored story. Pure data: scene beats, decision points, branches.

use crate::scene::{Beat, Character, ChoiceCategory, ChoiceOption, Exit, Prompt, Scene, SceneId};

use Beat::{Banner, Pause, Say};
use Character::{Ahi, Host, Menehune, MooWahine, NightFogSpirit, Player};

/// Title shown on the welcome screen.
pub const TITLE: &str = "THE SPIRIT OF THE LEHUA TREE";
pub const SUBTITLE: &str = "A Hawaiian Text Adventure";
pub const PLAYER_NAME: &str = "Keola";

/// Look up a scene's content. `End` has none.
pub fn scene(id: SceneId) -> Option<&'static Scene> {
    let scene = match id {
        SceneId::Intro => &INTRO,
        SceneId::Scene1 => &SCENE_1,
        SceneId::Scene1MoreInfo => &SCENE_1_MORE_INFO,
        SceneId::Scene2Ridge => &SCENE_2_RIDGE,
        SceneId::Scene2Lava => &SCENE_2_LAVA,
        SceneId::Scene3 => &SCENE_3,
        SceneId::Scene3Negotiate => &SCENE_3_NEGOTIATE,
        SceneId::FinalRestore => &FINAL_RESTORE,
        SceneId::FinalShatter => &FINAL_SHATTER,
        SceneId::FinalNegotiate => &FINAL_NEGOTIATE,
        SceneId::End => return None,
    };
    Some(scene)
}

// ── Opening ────────────────────────────────────────────────────────────

static INTRO: Scene = Scene {
    id: SceneId::Intro,
    beats: &[
        Banner("[Opening - Calm ocean sounds, soft ukulele playing in background]"),
        Say(Host, "Aloha, traveler. Tonight, we walk the path between worlds—where mountains breathe, waves speak, and spirits remember. You are Keola, a young guardian in training, chosen by the forest goddess Laka to protect the sacred island of Moku Huna."),
        Pause(1000),
        Say(Host, "But something ancient has awakened in the valleys. The winds no longer sing, and the lehua trees are weeping red blossoms before their time. The spirit of the island is calling you… Will you answer?"),
        Pause(1000),
        Say(Host, "Let's begin."),
    ],
    exit: Exit::Continue(SceneId::Scene1),
};

// ── Scene 1: the valley ────────────────────────────────────────────────

const CLIMB_RIDGE: &str = "Climb the ridge to search from above.";
const ENTER_LAVA_TUBE: &str = "Enter the lava tube and follow the underground river.";

static SCENE_1: Scene = Scene {
    id: SceneId::Scene1,
    beats: &[
        Banner("[Scene 1 – Deep Forest, Morning Birds Chirping]"),
        Say(Host, "You arrive at the base of the Wailoa Valley, where mist curls around giant ferns and the scent of guava clings to the breeze. At the center of a clearing stands your guide—Ahi, a talking pueo, or Hawaiian owl."),
        Pause(500),
        Say(Ahi, "Keola, the heart of the forest is fading. The Night Fog Spirit has stolen the seed stone from the mother lehua tree. Without it, balance will unravel."),
        Pause(500),
        Say(Ahi, "You must retrieve it before moonrise."),
        Pause(500),
        Say(Host, "Ahi points to two paths: one climbs the windy ridge to the cliffs, the other descends into a lava tube that winds beneath the forest floor."),
        Pause(500),
    ],
    exit: Exit::Choose(Prompt {
        category: ChoiceCategory::Path,
        options: &[
            ChoiceOption { label: CLIMB_RIDGE, next: SceneId::Scene2Ridge, reaction: &[] },
            ChoiceOption { label: ENTER_LAVA_TUBE, next: SceneId::Scene2Lava, reaction: &[] },
            ChoiceOption {
                label: "Ask Ahi for more information before deciding.",
                next: SceneId::Scene1MoreInfo,
                reaction: &[],
            },
        ],
    }),
};

static SCENE_1_MORE_INFO: Scene = Scene {
    id: SceneId::Scene1MoreInfo,
    beats: &[
        Say(Host, "You decide to ask Ahi for more information before making your choice."),
        Pause(500),
        Say(Ahi, "The ridge path is faster but exposed to the elements and perhaps watchful eyes. The lava tube is ancient and protected by guardians who test those who enter."),
        Pause(500),
        Say(Ahi, "Choose wisely, for each path reveals different aspects of the island's spirit."),
        Pause(500),
    ],
    exit: Exit::Choose(Prompt {
        category: ChoiceCategory::Path,
        options: &[
            ChoiceOption { label: CLIMB_RIDGE, next: SceneId::Scene2Ridge, reaction: &[] },
            ChoiceOption { label: ENTER_LAVA_TUBE, next: SceneId::Scene2Lava, reaction: &[] },
        ],
    }),
};

// ── Scene 2: the guardians' riddles ────────────────────────────────────

const RIDGE_INCOMPLETE: &[Beat] = &[
    Say(Menehune, "A good thought, but incomplete. Remember that no journey is truly alone. Still, I will help you—look there, where the dark mist gathers."),
    Pause(1000),
];

static SCENE_2_RIDGE: Scene = Scene {
    id: SceneId::Scene2Ridge,
    beats: &[
        Banner("[Scene 2 – Windy Ridge, Overlooking the Valley]"),
        Say(Host, "The climb is steep, but the view from the ridge reveals the island's secrets. You can see the pattern of the forest below, where a dark mist gathers unnaturally in one area."),
        Pause(500),
        Say(Host, "As you follow the ridge, a strong gust nearly knocks you off balance. A menehune—a small forest guardian—appears from behind a rock."),
        Pause(500),
        Say(Menehune, "The high path shows much but protects little. To find what you seek, you must answer: What guides the lost traveler home?"),
        Pause(500),
    ],
    exit: Exit::Choose(Prompt {
        category: ChoiceCategory::Answer,
        options: &[
            ChoiceOption { label: "The stars above.", next: SceneId::Scene3, reaction: RIDGE_INCOMPLETE },
            ChoiceOption {
                label: "The memory of where they came from.",
                next: SceneId::Scene3,
                reaction: RIDGE_INCOMPLETE,
            },
            ChoiceOption {
                label: "The help of those they meet along the way.",
                next: SceneId::Scene3,
                reaction: &[
                    Say(Menehune, "Wise answer. No journey is truly alone. Look there—the dark mist parts to reveal a hidden cave entrance."),
                    Pause(1000),
                ],
            },
        ],
    }),
};

const LAVA_NOT_QUITE: &[Beat] = &[
    Say(MooWahine, "Not quite. The lehua thrives not alone, but with the land, the wind, the rain, and the hearts who remember her. Remember this wisdom as you continue."),
    Pause(1000),
];

static SCENE_2_LAVA: Scene = Scene {
    id: SceneId::Scene2Lava,
    beats: &[
        Banner("[Scene 2 – Underground Lava Tube, Dripping Water Echoes]"),
        Say(Host, "The lava tube is narrow and pulsing with ancient energy. As your footsteps echo through the dark, you hear soft chanting… a ghostly mele. Suddenly, glowing red eyes appear. A moʻo wahine—a guardian lizard spirit—emerges."),
        Pause(500),
        Say(MooWahine, "Why do you walk the bones of this mountain, child? Only those who carry truth may pass."),
        Pause(500),
        Say(MooWahine, "Answer me this, and I shall let you through: What gives the lehua tree its strength—its blossoms, its roots, or its kin?"),
        Pause(500),
    ],
    exit: Exit::Choose(Prompt {
        category: ChoiceCategory::Answer,
        options: &[
            ChoiceOption { label: "Its blossoms.", next: SceneId::Scene3, reaction: LAVA_NOT_QUITE },
            ChoiceOption { label: "Its roots.", next: SceneId::Scene3, reaction: LAVA_NOT_QUITE },
            ChoiceOption {
                label: "Its kin.",
                next: SceneId::Scene3,
                reaction: &[
                    Say(MooWahine, "Well spoken. The lehua thrives not alone, but with the land, the wind, the rain, and the hearts who remember her. Go in peace."),
                    Pause(1000),
                ],
            },
        ],
    }),
};

// ── Scene 3: the secret chamber ────────────────────────────────────────

static SCENE_3: Scene = Scene {
    id: SceneId::Scene3,
    beats: &[
        Banner("[Scene 3 – Secret Chamber, Drumming in the Distance]"),
        Say(Host, "You emerge into a hidden chamber filled with glowing carvings and the scent of plumeria. In the center lies the stolen seed stone, pulsing with life."),
        Pause(500),
        Say(Host, "But before you can grab it, the Night Fog Spirit forms before you—mist shaped like a serpent, eyes like black pearls."),
        Pause(500),
        Say(NightFogSpirit, "This stone is no longer yours. Leave now, or be forgotten like the rest."),
        Pause(500),
        Say(Host, "You must act quickly. Ahi lands beside you."),
        Pause(500),
        Say(Ahi, "You can restore the stone through chant and light, or shatter it to sever its power forever. But know this: one heals the island… the other saves only you."),
        Pause(500),
    ],
    exit: Exit::Choose(Prompt {
        category: ChoiceCategory::Action,
        options: &[
            ChoiceOption {
                label: "Chant the ancient prayer and restore the seed stone.",
                next: SceneId::FinalRestore,
                reaction: &[],
            },
            ChoiceOption {
                label: "Shatter the stone to banish the spirit, risking the island's balance.",
                next: SceneId::FinalShatter,
                reaction: &[],
            },
            ChoiceOption {
                label: "Try to negotiate with the Night Fog Spirit.",
                next: SceneId::Scene3Negotiate,
                reaction: &[],
            },
        ],
    }),
};

const SPIRIT_RELENTS: &[Beat] = &[
    Say(NightFogSpirit, "Your words... they carry truth I have not heard in many generations."),
    Pause(500),
    Say(Host, "The spirit wavers, its misty form becoming less serpentine and more humanoid."),
    Pause(500),
    Say(NightFogSpirit, "I will return the seed stone, but you must keep your promise to remember the night fog in your stories and chants."),
    Pause(500),
];

static SCENE_3_NEGOTIATE: Scene = Scene {
    id: SceneId::Scene3Negotiate,
    beats: &[
        Say(Host, "You step forward, facing the Night Fog Spirit directly."),
        Pause(500),
        Say(Player, "Why have you taken the seed stone? Perhaps we can find another way to address your needs without harming the island."),
        Pause(500),
        Say(NightFogSpirit, "For centuries, I have been forgotten, pushed to the shadows while the lehua receives all praise and offerings. I took what was never truly appreciated."),
        Pause(500),
        Say(Host, "You sense a deep loneliness in the spirit's voice."),
        Pause(500),
    ],
    exit: Exit::Choose(Prompt {
        category: ChoiceCategory::Negotiation,
        options: &[
            ChoiceOption {
                label: "Offer to establish a new tradition honoring both the lehua and the night fog.",
                next: SceneId::FinalNegotiate,
                reaction: SPIRIT_RELENTS,
            },
            ChoiceOption {
                label: "Explain that balance requires all elements, including the night fog, and promise to teach others.",
                next: SceneId::FinalNegotiate,
                reaction: SPIRIT_RELENTS,
            },
            ChoiceOption {
                label: "Suggest that taking the stone will only bring more isolation, not the recognition it seeks.",
                next: SceneId::FinalNegotiate,
                reaction: SPIRIT_RELENTS,
            },
        ],
    }),
};

// ── Finales ────────────────────────────────────────────────────────────

static FINAL_RESTORE: Scene = Scene {
    id: SceneId::FinalRestore,
    beats: &[
        Banner("[Final Scene – Forest Restored, Gentle Rain Falls]"),
        Say(Host, "Your voice rises like wind through the leaves, and the cavern shimmers with golden light. The Night Fog Spirit shrieks once… and dissolves."),
        Pause(500),
        Say(Host, "The seed stone glows, roots itself into the earth, and sprouts a single, red lehua blossom. You have restored balance."),
        Pause(500),
        Say(Ahi, "Well done, Keola. You have honored the land, and the land will remember you."),
        Pause(500),
        Say(Host, "The winds sing again. The lehua stands tall. But remember—every choice carries mana, and with mana comes kuleana, responsibility."),
        Pause(500),
        Say(Host, "Until next time, guardian… A hui hou."),
    ],
    exit: Exit::Finale,
};

static FINAL_SHATTER: Scene = Scene {
    id: SceneId::FinalShatter,
    beats: &[
        Banner("[Final Scene – Shattered Stone, Fading Mist]"),
        Say(Host, "You bring the stone down hard against the cavern floor. It shatters with a sound like thunder, and a wave of energy knocks you backward."),
        Pause(500),
        Say(Host, "The Night Fog Spirit wails as it is pulled into the fragments, trapped forever in the broken pieces."),
        Pause(500),
        Say(Ahi, "The immediate danger is gone, but at what cost? The island will feel this loss for generations."),
        Pause(500),
        Say(Host, "As you exit the cavern, you notice the forest seems quieter. The lehua trees stand, but their blossoms are fewer. You have saved yourself and many others, but something sacred has been lost."),
        Pause(500),
        Say(Host, "Remember, guardian—power comes in many forms, and sometimes the hardest choice is not the wisest one."),
        Pause(500),
        Say(Host, "Until we meet again… A hui hou."),
    ],
    exit: Exit::Finale,
};

static FINAL_NEGOTIATE: Scene = Scene {
    id: SceneId::FinalNegotiate,
    beats: &[
        Banner("[Final Scene – Harmony Restored, Dual Mist and Light]"),
        Say(Host, "The seed stone floats between you and the Night Fog Spirit, glowing with a light that now contains swirls of gentle mist."),
        Pause(500),
        Say(Host, "As it returns to the earth, both golden light and silver mist spread through the cavern and beyond, into the forest."),
        Pause(500),
        Say(Ahi, "You have found a third path, Keola. Not just restoration, not just destruction, but transformation."),
        Pause(500),
        Say(Host, "In the days that follow, the island changes. The lehua trees bloom as before, but now at twilight they are embraced by a gentle, protective mist that the villagers come to cherish."),
        Pause(500),
        Say(Host, "You have taught an important lesson—that balance is not just about preserving what was, but finding harmony in what could be."),
        Pause(500),
        Say(Host, "Until our paths cross again, guardian of new traditions... A hui hou."),
    ],
    exit: Exit::Finale,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scene_but_end_has_content() {
        for id in SceneId::ALL {
            match scene(id) {
                Some(s) => assert_eq!(s.id, id),
                None => assert_eq!(id, SceneId::End),
            }
        }
    }

    #[test]
    fn every_branch_target_is_playable() {
        for id in SceneId::ALL {
            let Some(s) = scene(id) else { continue };
            match s.exit {
                Exit::Continue(next) => assert!(scene(next).is_some()),
                Exit::Choose(prompt) => {
                    assert!(!prompt.options.is_empty(), "{id} has an empty prompt");
                    for opt in prompt.options {
                        assert!(scene(opt.next).is_some(), "{id} branches to {}", opt.next);
                    }
                }
                Exit::Finale => {}
            }
        }
    }

    #[test]
    fn only_the_three_finales_end_the_story() {
        let finales: Vec<SceneId> = SceneId::ALL
            .into_iter()
            .filter(|id| matches!(scene(*id).map(|s| s.exit), Some(Exit::Finale)))
            .collect();
        assert_eq!(
            finales,
            vec![SceneId::FinalRestore, SceneId::FinalShatter, SceneId::FinalNegotiate]
        );
    }

    #[test]
    fn wise_answers_get_their_own_reaction() {
        let Some(Exit::Choose(ridge)) = scene(SceneId::Scene2Ridge).map(|s| s.exit) else {
            panic!("ridge scene should end in a choice");
        };
        assert_eq!(ridge.options[0].reaction, ridge.options[1].reaction);
        assert_ne!(ridge.options[0].reaction, ridge.options[2].reaction);

        let Some(Exit::Choose(lava)) = scene(SceneId::Scene2Lava).map(|s| s.exit) else {
            panic!("lava scene should end in a choice");
        };
        assert_eq!(lava.options[2].label, "Its kin.");
        assert_ne!(lava.options[1].reaction, lava.options[2].reaction);
    }
}
