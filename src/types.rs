use serde::{Deserialize, Serialize};

pub type SessionId = String;

/// What the non-imposters share: a secret word or a secret question.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Word,
    Question,
}

/// Live view of the setup session, sent to clients after every mutation.
///
/// Deliberately excludes the chosen word: the word is only part of the
/// finalized snapshot, which the reveal screen fetches separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,
    pub version: u64,
    pub player_names: Vec<String>,
    pub imposters: u32,
    pub mode: Mode,
    pub category: String,
    pub started: bool,
}

/// Finalized, immutable session snapshot written to the hand-off store.
///
/// Field names are a consumer contract: the reveal screen reads exactly
/// `{playerNames, imposters, mode, category, chosenWord}`, no schema
/// negotiation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    #[serde(rename = "playerNames")]
    pub player_names: Vec<String>,
    pub imposters: u32,
    pub mode: Mode,
    pub category: String,
    #[serde(rename = "chosenWord")]
    pub chosen_word: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_to_handoff_shape() {
        let snapshot = SessionSnapshot {
            player_names: vec!["Ana".to_string(), "Bo".to_string(), "Cy".to_string()],
            imposters: 1,
            mode: Mode::Word,
            category: "Animals".to_string(),
            chosen_word: "Dog".to_string(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        let obj = json.as_object().unwrap();

        let keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["playerNames", "imposters", "mode", "category", "chosenWord"]
        );
        assert_eq!(json["mode"], "word");
        assert_eq!(json["chosenWord"], "Dog");
    }

    #[test]
    fn mode_roundtrips_lowercase() {
        assert_eq!(
            serde_json::to_string(&Mode::Question).unwrap(),
            "\"question\""
        );
        let mode: Mode = serde_json::from_str("\"word\"").unwrap();
        assert_eq!(mode, Mode::Word);
    }
}
