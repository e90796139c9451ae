use crate::types::{LevelId, WordEntry};

// Logical playfield: lanes run top to bottom through FIELD_ROWS rows. Words
// spawn at row 0 and are discarded once they pass the bottom edge.
pub const FIELD_ROWS: f32 = 40.0;
/// Words at or below this row and in the player's lane are caught.
pub const CATCH_BAND_TOP: f32 = 33.0;
/// Row the avatar sits on when rendered.
pub const PLAYER_ROW: f32 = 36.0;

pub const TIMER_INTERVAL_MS: u64 = 1000;
pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;
pub const RESUME_COUNTDOWN_SECS: u8 = 3;

/// How long a caught word stays visible before it is removed.
pub const CONSUME_LINGER_MS: u32 = 300;
/// Lifetime of a "+N"/"-N" score marker.
pub const MARKER_TTL_MS: u32 = 600;

pub const RENDER_HZ: f32 = 30.0;

/// All the knobs that distinguish one difficulty level from another. A level
/// is a value of this struct, not its own game loop.
#[derive(Clone, Copy, Debug)]
pub struct LevelConfig {
    pub id: LevelId,
    pub catalog: &'static [WordEntry],
    pub spawn_interval_ms: u64,
    pub tick_interval_ms: u64,
    /// Rows a word falls per mover tick.
    pub fall_step: f32,
    pub catch_delta: u32,
    pub miss_delta: u32,
    pub round_duration_secs: u32,
    pub lane_count: usize,
}

pub fn level(id: LevelId) -> LevelConfig {
    match id {
        LevelId::Beginner => LevelConfig {
            id,
            catalog: BEGINNER_WORDS,
            spawn_interval_ms: 1600,
            tick_interval_ms: 100,
            fall_step: 0.45,
            catch_delta: 2,
            miss_delta: 2,
            round_duration_secs: 60,
            lane_count: 3,
        },
        LevelId::Intermediate => LevelConfig {
            id,
            catalog: INTERMEDIATE_WORDS,
            spawn_interval_ms: 1300,
            tick_interval_ms: 90,
            fall_step: 0.55,
            catch_delta: 3,
            miss_delta: 3,
            round_duration_secs: 60,
            lane_count: 3,
        },
        LevelId::Advanced => LevelConfig {
            id,
            catalog: ADVANCED_WORDS,
            spawn_interval_ms: 1000,
            tick_interval_ms: 80,
            fall_step: 0.7,
            catch_delta: 5,
            miss_delta: 5,
            round_duration_secs: 60,
            lane_count: 3,
        },
        LevelId::Expert => LevelConfig {
            id,
            catalog: EXPERT_WORDS,
            spawn_interval_ms: 800,
            tick_interval_ms: 70,
            fall_step: 0.9,
            catch_delta: 8,
            miss_delta: 8,
            round_duration_secs: 60,
            lane_count: 3,
        },
    }
}

const fn word(text: &'static str, is_target: bool) -> WordEntry {
    WordEntry { text, is_target }
}

// Beginner: short A only.
static BEGINNER_WORDS: &[WordEntry] = &[
    word("cat", true),
    word("bat", true),
    word("hat", true),
    word("map", true),
    word("tap", true),
    word("pan", true),
    word("jam", true),
    word("rag", true),
    word("kite", false),
    word("bed", false),
    word("dog", false),
    word("cub", false),
    word("pen", false),
    word("fox", false),
];

// Intermediate: short A and I.
static INTERMEDIATE_WORDS: &[WordEntry] = &[
    word("cat", true),
    word("hat", true),
    word("map", true),
    word("jam", true),
    word("sit", true),
    word("hit", true),
    word("pig", true),
    word("win", true),
    word("lid", true),
    word("cake", false),
    word("kite", false),
    word("rope", false),
    word("bed", false),
    word("dog", false),
    word("mule", false),
    word("pen", false),
    word("cube", false),
];

// Advanced: short A, I and U.
static ADVANCED_WORDS: &[WordEntry] = &[
    word("cat", true),
    word("bat", true),
    word("hat", true),
    word("rat", true),
    word("sit", true),
    word("hit", true),
    word("bit", true),
    word("fit", true),
    word("cup", true),
    word("bus", true),
    word("mug", true),
    word("rug", true),
    word("cake", false),
    word("kite", false),
    word("rope", false),
    word("cube", false),
    word("team", false),
    word("bed", false),
    word("dog", false),
    word("pen", false),
    word("hope", false),
    word("mule", false),
];

// Expert: long vowels are the targets, short-vowel words distract.
static EXPERT_WORDS: &[WordEntry] = &[
    word("cake", true),
    word("kite", true),
    word("rope", true),
    word("cube", true),
    word("team", true),
    word("hope", true),
    word("mule", true),
    word("tape", true),
    word("bike", true),
    word("note", true),
    word("cat", false),
    word("sit", false),
    word("cup", false),
    word("bed", false),
    word("dog", false),
    word("pen", false),
    word("mug", false),
    word("bus", false),
];

#[cfg(test)]
mod tests {
    use super::*;

    mod level_table {
        use super::*;

        #[test]
        fn every_level_has_targets_and_distractors() {
            for id in LevelId::ALL {
                let cfg = level(id);
                assert!(cfg.catalog.iter().any(|w| w.is_target), "{id:?}");
                assert!(cfg.catalog.iter().any(|w| !w.is_target), "{id:?}");
            }
        }

        #[test]
        fn catalogs_have_no_duplicate_words() {
            for id in LevelId::ALL {
                let cfg = level(id);
                for (i, a) in cfg.catalog.iter().enumerate() {
                    for b in &cfg.catalog[i + 1..] {
                        assert_ne!(a.text, b.text, "{id:?} repeats {}", a.text);
                    }
                }
            }
        }

        #[test]
        fn difficulty_scales_speed_and_stakes() {
            let beginner = level(LevelId::Beginner);
            let expert = level(LevelId::Expert);
            assert!(expert.spawn_interval_ms < beginner.spawn_interval_ms);
            assert!(expert.fall_step > beginner.fall_step);
            assert!(expert.catch_delta > beginner.catch_delta);
        }

        #[test]
        fn advanced_tuning_is_pinned() {
            let cfg = level(LevelId::Advanced);
            assert_eq!(cfg.spawn_interval_ms, 1000);
            assert_eq!(cfg.tick_interval_ms, 80);
            assert_eq!(cfg.catch_delta, 5);
            assert_eq!(cfg.miss_delta, 5);
            assert_eq!(cfg.round_duration_secs, 60);
            assert_eq!(cfg.lane_count, 3);
        }

        #[test]
        fn catch_band_sits_inside_the_field() {
            assert!(CATCH_BAND_TOP < FIELD_ROWS);
            assert!(PLAYER_ROW > CATCH_BAND_TOP && PLAYER_ROW < FIELD_ROWS);
        }
    }
}
