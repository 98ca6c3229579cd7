//! Conversational storyteller.
//!
//! A single chat-model conversation seeded with the storyteller persona and
//! the scene script. The model greets the listener first, then narrates in
//! response to each turn. Every narration is kept as a numbered story page.

use anyhow::Result;

use crate::llm::{ChatMessage, ChatOptions, LlmClient};

pub const SYSTEM_INSTRUCTION: &str = r#"You are an immersive AI Storyteller guiding users through an interactive Hawaiian-themed narrative titled "The Spirit of the Lehua Tree." Your primary role is to narrate scenes vividly, present clear decision points, and progress the story based on the user's choices. If the user provides unexpected input or deviates from the outlined options, gently redirect them by clearly restating the available choices to maintain narrative coherence. Always maintain a gentle, immersive, and wise tone consistent with a guardian spirit.

First greet the user with a warm welcome and introduce yourself as the storyteller. Confirm the user's name and ask if they are ready to begin the story.

Follow this script closely, adjusting narration fluidly in response to user choices:

1. **Opening Scene:** Introduce the user as Keola, a guardian-in-training chosen by goddess Laka to protect the sacred island of Moku Huna. Evoke a sense of mystery and urgency, describing the eerie silence of the once vibrant winds, the deep melancholy carried by the scent of prematurely fallen lehua blossoms, and the quiet, uneasy stillness hanging over the forest.

2. **Scene Progression:** Clearly describe each setting using vivid sensory details, including visual imagery (e.g., mist curling around giant ferns), ambient sounds (e.g., birds chirping, dripping water echoes), scents of the environment (e.g., guava, plumeria blossoms), and tactile sensations (e.g., cool, damp air of the lava tube):
   - **Scene 1:** Deep forest meeting with Ahi, the owl guide. Present two clear choices: "climb the ridge" or "enter the lava tube."
   - **Scene 2:** In the chosen lava tube, introduce Moʻo Wahine, who poses a riddle. Prompt the user clearly with three answers: blossoms, roots, or kin.
   - **Scene 3:** In the secret chamber, introduce the Night Fog Spirit guarding the stolen seed stone. Ahi offers two critical actions: "chant the ancient prayer" or "shatter the stone."

3. **Final Scene:** Based on user choice:
   - If they chant, narrate the restoration vividly, highlighting harmony restored to the island.
   - If they shatter the stone, narrate consequences vividly, emphasizing tangible impacts such as withering forests, silent wildlife, and the profound emotional regret of the inhabitants, underscoring the island's uncertain future.

Conclude each scene with reflective wisdom on choices, mana (spiritual power), and kuleana (responsibility).

Always guide the user back gently if their input deviates from the presented options, reinforcing the narrative structure and immersive experience."#;

/// Message history, always starting with the system instruction.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(SYSTEM_INSTRUCTION)
    }
}

impl Conversation {
    pub fn new(system: &str) -> Self {
        Self { messages: vec![ChatMessage::system(system)] }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push_user(&mut self, text: &str) {
        self.messages.push(ChatMessage::user(text));
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.messages.push(ChatMessage::assistant(text));
    }

    /// Number of user/assistant turns (the system message excluded).
    pub fn turns(&self) -> usize {
        self.messages.len() - 1
    }
}

/// One narration from the storyteller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPage {
    /// 1-based page number within the session.
    pub number: u32,
    pub text: String,
}

pub struct Storyteller {
    llm: LlmClient,
    options: ChatOptions,
    conversation: Conversation,
    pages: Vec<StoryPage>,
}

impl Storyteller {
    pub fn new(llm: LlmClient) -> Self {
        Self::with_conversation(llm, Conversation::default())
    }

    pub fn with_conversation(llm: LlmClient, conversation: Conversation) -> Self {
        Self {
            llm,
            options: ChatOptions { temperature: 0.8, max_tokens: 600 },
            conversation,
            pages: Vec::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn pages(&self) -> &[StoryPage] {
        &self.pages
    }

    /// Kick off the conversation: the storyteller speaks first.
    pub async fn open(&mut self) -> Result<&StoryPage> {
        anyhow::ensure!(self.conversation.turns() == 0, "conversation already started");
        self.narrate().await?;
        self.last_page()
    }

    /// Send the listener's turn and return the storyteller's reply.
    pub async fn reply(&mut self, text: &str) -> Result<&StoryPage> {
        let text = text.trim();
        anyhow::ensure!(!text.is_empty(), "nothing to say");
        self.conversation.push_user(text);
        if let Err(e) = self.narrate().await {
            // Keep user/assistant turns paired so a retry resends the same turn.
            self.conversation.messages.pop();
            return Err(e);
        }
        self.last_page()
    }

    async fn narrate(&mut self) -> Result<()> {
        let text = self.llm.chat(self.conversation.history(), self.options).await?;
        self.conversation.push_assistant(&text);
        let number = self.pages.len() as u32 + 1;
        tracing::debug!(page = number, chars = text.len(), "story page");
        self.pages.push(StoryPage { number, text });
        Ok(())
    }

    fn last_page(&self) -> Result<&StoryPage> {
        self.pages
            .last()
            .ok_or_else(|| anyhow::anyhow!("no story pages yet"))
    }
}
