//! Prompt text and response schemas for the two Gemini calls.

use serde_json::{Value, json};

use crate::model::{Track, format_bpm};
use crate::services::domain::{MAX_SUGGESTIONS, UNKNOWN_ARTIST};

pub fn analysis_prompt(filename: &str) -> String {
    format!(
        "You are a DJ track analysis tool in the style of Mixed In Key.\n\
         Infer the artist and title from the file name \"{filename}\".\n\
         Then estimate the most likely musical key in Camelot notation (for example 8A or 10B), \
         the tempo in BPM, and an energy level from 1 to 10.\n\
         If artist or title cannot be inferred, use the file name as the title and \
         \"{UNKNOWN_ARTIST}\" as the artist.\n\
         Answer with a single JSON object with the keys \"artist\", \"title\", \"key\", \"bpm\" and \"energy\"; \
         bpm and energy are numbers."
    )
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "artist": { "type": "STRING" },
            "title": { "type": "STRING" },
            "key": { "type": "STRING" },
            "bpm": { "type": "NUMBER" },
            "energy": { "type": "NUMBER" }
        },
        "required": ["artist", "title", "key", "bpm", "energy"]
    })
}

/// One line per track: `- "Title" by Artist (Key: 8A, BPM: 124, Energy: 7)`.
fn describe(track: &Track) -> String {
    format!(
        "- \"{}\" by {} (Key: {}, BPM: {}, Energy: {})",
        track.title,
        track.artist,
        track.key,
        format_bpm(track.bpm),
        track.energy
    )
}

pub fn recommendation_prompt(current: &Track, candidates: &[Track]) -> String {
    let library = candidates.iter().map(describe).collect::<Vec<_>>().join("\n");
    format!(
        "You are an expert DJ who mixes harmonically with the Camelot wheel.\n\
         The track playing now is:\n\
         {current}\n\n\
         From the available tracks below, pick the {MAX_SUGGESTIONS} best tracks to mix in next.\n\
         Harmonic compatibility comes first. Good key transitions are:\n\
         1. The same key (8A to 8A).\n\
         2. One step around the wheel (8A to 7A or 9A).\n\
         3. The relative key at the same number (8A to 8B).\n\
         Also weigh tempo (within about 5% is comfortable) and energy flow \
         (a change of 1 or 2 levels is ideal; bigger jumps only for deliberate impact).\n\n\
         Available tracks:\n\
         {library}\n\n\
         Answer with a JSON array of objects with the keys \"title\", \"artist\" and a short \"reason\". \
         Use titles and artists exactly as listed.",
        current = describe(current),
    )
}

pub fn recommendation_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "artist": { "type": "STRING" },
                "reason": { "type": "STRING" }
            },
            "required": ["title", "artist", "reason"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::track;

    #[test]
    fn test_analysis_prompt_names_file() {
        let prompt = analysis_prompt("Artist - Song.mp3");
        assert!(prompt.contains("\"Artist - Song.mp3\""));
        assert!(prompt.contains(UNKNOWN_ARTIST));
    }

    #[test]
    fn test_recommendation_prompt_lists_candidates_only() {
        let current = track("a", "8A", 124.0, 7);
        let candidates = [track("b", "9A", 122.5, 6), track("c", "8B", 125.0, 8)];
        let prompt = recommendation_prompt(&current, &candidates);

        assert!(prompt.contains("- \"Track b\" by Artist b (Key: 9A, BPM: 122.5, Energy: 6)"));
        assert!(prompt.contains("- \"Track c\" by Artist c (Key: 8B, BPM: 125, Energy: 8)"));
        assert_eq!(prompt.matches("\"Track a\"").count(), 1);
    }

    #[test]
    fn test_schemas_require_all_fields() {
        assert_eq!(analysis_schema()["required"].as_array().unwrap().len(), 5);
        assert_eq!(recommendation_schema()["items"]["required"].as_array().unwrap().len(), 3);
    }
}
