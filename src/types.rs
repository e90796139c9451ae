use serde::{Deserialize, Serialize};

pub type WordId = u64;

/// Immutable catalog entry. `is_target` marks whether the word matches the
/// level's vowel-sound rule, i.e. whether catching it rewards or penalizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordEntry {
    pub text: &'static str,
    pub is_target: bool,
}

/// A word currently falling through the playfield.
#[derive(Clone, Debug)]
pub struct FallingWord {
    pub id: WordId,
    pub catalog_index: usize,
    pub text: &'static str,
    pub is_target: bool,
    pub lane: usize,
    pub y: f32,
    pub consumed: bool,
    /// Remaining display time after being caught, so the player sees the
    /// color flash before the word disappears.
    pub linger_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    /// Resume countdown in progress; the payload is the seconds still shown.
    Resuming(u8),
    Over,
}

/// Transient "+N"/"-N" feedback shown where a word was caught.
#[derive(Clone, Debug)]
pub struct ScoreMarker {
    pub delta: u32,
    pub positive: bool,
    pub lane: usize,
    pub y: f32,
    pub ttl_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelId {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl LevelId {
    pub const ALL: [LevelId; 4] = [
        LevelId::Beginner,
        LevelId::Intermediate,
        LevelId::Advanced,
        LevelId::Expert,
    ];

    pub fn title(self) -> &'static str {
        match self {
            LevelId::Beginner => "Beginner",
            LevelId::Intermediate => "Intermediate",
            LevelId::Advanced => "Advanced",
            LevelId::Expert => "Expert",
        }
    }

    pub fn difficulty(self) -> &'static str {
        match self {
            LevelId::Beginner => "Easy",
            LevelId::Intermediate => "Medium",
            LevelId::Advanced => "Hard",
            LevelId::Expert => "Expert",
        }
    }

    /// The phonics rule shown on the instructions overlay.
    pub fn rule(self) -> &'static str {
        match self {
            LevelId::Beginner => "Catch words with a SHORT A vowel sound",
            LevelId::Intermediate => "Catch words with SHORT A or I vowel sounds",
            LevelId::Advanced => "Catch words with SHORT A, I or U vowel sounds",
            LevelId::Expert => "Catch words with LONG vowel sounds",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LevelId::Beginner => "beginner",
            LevelId::Intermediate => "intermediate",
            LevelId::Advanced => "advanced",
            LevelId::Expert => "expert",
        }
    }
}

/// Final outcome of a completed round, handed to the score reporter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundResult {
    pub level: LevelId,
    pub score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorId {
    White,
    Yellow,
    Green,
    Red,
    Cyan,
    Gray,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod level_id {
        use super::*;

        #[test]
        fn all_lists_every_level_in_difficulty_order() {
            assert_eq!(LevelId::ALL.len(), 4);
            assert_eq!(LevelId::ALL[0], LevelId::Beginner);
            assert_eq!(LevelId::ALL[3], LevelId::Expert);
        }

        #[test]
        fn as_str_is_lowercase_title() {
            for level in LevelId::ALL {
                assert_eq!(level.as_str(), level.title().to_lowercase());
            }
        }

        #[test]
        fn serializes_as_lowercase_string() {
            let json = serde_json::to_string(&LevelId::Advanced).unwrap();
            assert_eq!(json, "\"advanced\"");
        }

        #[test]
        fn every_level_has_a_rule() {
            for level in LevelId::ALL {
                assert!(!level.rule().is_empty());
            }
        }
    }

    mod word_entry {
        use super::*;

        #[test]
        fn catalog_entries_compare_by_value() {
            let a = WordEntry { text: "cat", is_target: true };
            let b = WordEntry { text: "cat", is_target: true };
            assert_eq!(a, b);
        }
    }
}
