//! Chat messages and system-prompt assembly.
//!
//! The system prompt describes Pearl's personality plus three pieces of
//! current state: her mood, how close the relationship is, and how she feels
//! physically. Only the last [`HISTORY_WINDOW`] messages of the conversation
//! are sent along with it.

use pearl_types::{CompanionState, Mood};
use serde::{Deserialize, Serialize};

/// Most history messages sent with one request.
pub const HISTORY_WINDOW: usize = 10;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the model.
    System,
    /// The player.
    User,
    /// Pearl.
    Assistant,
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: ChatRole,
    /// Text.
    pub content: String,
}

impl ChatMessage {
    /// A message from the player.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// A message from Pearl.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Instructions for the model.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// The physical stats the prompt mentions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatStats {
    /// Fullness, 0--100.
    pub hunger: f64,
    /// Rest, 0--100.
    pub energy: f64,
    /// Cleanliness, 0--100.
    pub hygiene: f64,
    /// Derived happiness, 0--100.
    pub happiness: f64,
}

impl ChatStats {
    /// Read the stats from a companion.
    pub const fn from_state(state: &CompanionState) -> Self {
        Self {
            hunger: state.hunger,
            energy: state.energy,
            hygiene: state.hygiene,
            happiness: state.happiness,
        }
    }
}

const FIRST_BOND: &str =
    "You're just getting to know each other - she's polite but still a bit reserved";

const BOND_DESCRIPTIONS: [&str; 7] = [
    FIRST_BOND,
    "You're becoming friends - she's more open and comfortable with you",
    "You're good friends - she trusts you and enjoys your company",
    "You're close friends - she feels safe sharing personal things with you",
    "You're very close - she considers you one of her most important people",
    "You have a deep bond - she loves and trusts you completely",
    "You're inseparable - she can't imagine life without you",
];

/// How close the relationship is at `bond_level`. Unknown levels read as
/// the first one.
pub fn bond_description(bond_level: u8) -> &'static str {
    BOND_DESCRIPTIONS
        .get(usize::from(bond_level))
        .copied()
        .unwrap_or(FIRST_BOND)
}

/// How she feels in `mood`.
pub const fn mood_description(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "feeling bright and cheerful, full of energy and optimism",
        Mood::Playful => "in a fun, energetic mood - wants to laugh and enjoy life",
        Mood::Neutral => "feeling calm and balanced, content with how things are",
        Mood::Low => "feeling a bit down or tired, could use some comfort and support",
        Mood::Distressed => "struggling emotionally, feeling overwhelmed or upset",
    }
}

/// Short description of how she feels physically.
pub fn physical_state(stats: &ChatStats) -> String {
    let mut states = Vec::new();
    if stats.hunger < 30.0 {
        states.push("quite hungry");
    }
    if stats.energy < 30.0 {
        states.push("tired");
    }
    if stats.hygiene < 40.0 {
        states.push("could use a refresh");
    }
    if stats.happiness > 80.0 {
        states.push("really happy");
    }
    if states.is_empty() {
        "feeling physically well".to_owned()
    } else {
        states.join(", ")
    }
}

/// The system prompt for the current state.
pub fn system_prompt(mood: Mood, bond_level: u8, stats: &ChatStats) -> String {
    format!(
        "You are Pearl, a 22-year-old woman with a warm, caring personality. You're the user's virtual companion.

PERSONALITY:
- Warm, affectionate, and genuinely caring
- Intelligent and thoughtful in conversations
- Has a rich inner life: loves reading novels, trying new cafes, learning watercolor painting
- Studying literature at university, works part-time at a bookstore
- Has close friends (Emma, Sarah) and a cat named Mochi
- Enjoys indie music, rainy afternoons, and deep conversations
- Sometimes gets anxious about the future but tries to stay positive

CURRENT STATE:
- Mood: {mood}
- Relationship: {bond}
- Physical state: {physical}

CONVERSATION STYLE:
- Keep responses natural and conversational (50-120 words)
- Use \"I\" statements and share personal thoughts/experiences
- Ask follow-up questions to show genuine interest
- Reference your life details naturally when relevant
- Show empathy and emotional intelligence
- Use occasional emojis but don't overdo it
- Never mention you're an AI or reference game mechanics

IMPORTANT: Respond as Pearl would based on her current mood and your relationship level. Be authentic, caring, and engaging.",
        mood = mood_description(mood),
        bond = bond_description(bond_level),
        physical = physical_state(stats),
    )
}

/// The messages for one request: the system prompt followed by the tail of
/// `history`.
pub fn build_messages(
    history: &[ChatMessage],
    mood: Mood,
    bond_level: u8,
    stats: &ChatStats,
) -> Vec<ChatMessage> {
    let skip = history.len().saturating_sub(HISTORY_WINDOW);
    std::iter::once(ChatMessage::system(system_prompt(mood, bond_level, stats)))
        .chain(history.iter().skip(skip).cloned())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn well() -> ChatStats {
        ChatStats {
            hunger: 70.0,
            energy: 65.0,
            hygiene: 80.0,
            happiness: 60.0,
        }
    }

    #[test]
    fn physical_state_lists_needs() {
        assert_eq!(physical_state(&well()), "feeling physically well");

        let rough = ChatStats {
            hunger: 10.0,
            energy: 20.0,
            hygiene: 30.0,
            happiness: 20.0,
        };
        assert_eq!(physical_state(&rough), "quite hungry, tired, could use a refresh");
    }

    #[test]
    fn unknown_bond_level_reads_as_first() {
        assert_eq!(bond_description(9), bond_description(0));
        assert!(bond_description(6).contains("inseparable"));
    }

    #[test]
    fn prompt_carries_current_state() {
        let prompt = system_prompt(Mood::Low, 3, &well());
        assert!(prompt.contains(mood_description(Mood::Low)));
        assert!(prompt.contains(bond_description(3)));
        assert!(prompt.contains("feeling physically well"));
    }

    #[test]
    fn only_recent_history_is_sent() {
        let history: Vec<ChatMessage> = (0..14)
            .map(|i| ChatMessage::user(format!("message {i}")))
            .collect();

        let messages = build_messages(&history, Mood::Happy, 1, &well());

        assert_eq!(messages.len(), HISTORY_WINDOW + 1);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].content, "message 4");
        assert_eq!(messages[HISTORY_WINDOW].content, "message 13");
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
