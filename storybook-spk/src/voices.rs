//! Default voice selection

use storybook_core::VoiceDescriptor;

/// Names favored when picking a default narration voice.
pub const PREFERRED_VOICE_NAMES: [&str; 7] =
    ["adam", "antoni", "josh", "sam", "matt", "daniel", "brian"];

/// Pick the default voice from a provider-ordered list: the first entry
/// whose name contains a preferred name (case-insensitive), else the
/// first entry. Returns None for an empty list.
pub fn default_voice(voices: &[VoiceDescriptor]) -> Option<&VoiceDescriptor> {
    voices
        .iter()
        .find(|v| {
            let name = v.name.to_lowercase();
            PREFERRED_VOICE_NAMES.iter().any(|p| name.contains(p))
        })
        .or_else(|| voices.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(id: &str, name: &str) -> VoiceDescriptor {
        VoiceDescriptor {
            voice_id: id.to_string(),
            name: name.to_string(),
            category: String::new(),
        }
    }

    #[test]
    fn prefers_known_names() {
        let voices = vec![voice("a", "Xander"), voice("b", "Adam")];
        assert_eq!(default_voice(&voices).unwrap().voice_id, "b");
    }

    #[test]
    fn falls_back_to_first_entry() {
        let voices = vec![voice("x", "Zara")];
        assert_eq!(default_voice(&voices).unwrap().voice_id, "x");
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let voices = vec![voice("a", "Nope"), voice("b", "JOSHUA (narration)")];
        assert_eq!(default_voice(&voices).unwrap().voice_id, "b");
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(default_voice(&[]).is_none());
    }
}
