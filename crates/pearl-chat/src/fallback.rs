//! Canned replies used when the chat service is unavailable.

use pearl_types::Mood;

/// Reply when the service answered with empty content.
pub const EMPTY_REPLY: &str = "I'm not sure how to respond to that right now...";

/// The in-character line for `mood`.
pub const fn fallback_line(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "I'm feeling great today! Tell me, what's been making you smile lately? 😊",
        Mood::Playful => {
            "You know what? I'm in such a good mood! Want to hear about something funny that happened to me?"
        }
        Mood::Neutral => "I'm here and listening. What's on your mind today?",
        Mood::Low => {
            "I'm feeling a bit quiet today, but talking with you always helps. How are you doing?"
        }
        Mood::Distressed => {
            "I'm having a tough time right now, but I'm grateful you're here to talk with me."
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn every_mood_has_its_own_line() {
        let lines: BTreeSet<&str> = Mood::ALL.iter().map(|m| fallback_line(*m)).collect();
        assert_eq!(lines.len(), Mood::ALL.len());
        assert!(!lines.contains(EMPTY_REPLY));
    }
}
