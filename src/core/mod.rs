use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::{self, LevelConfig},
    types::{FallingWord, Phase, RoundResult, ScoreMarker, WordId},
};

/// One timed play session. Owns every piece of round state and all the
/// periodic processes that mutate it: the spawner, the mover, the round
/// timer and the resume countdown. The UI loop drives it through
/// `advance(dt_ms)`; each process keeps its own millisecond accumulator and
/// fires at its configured interval, so the whole round is deterministic for
/// a given seed and sequence of commands.
pub struct Round {
    config: LevelConfig,
    score: u32,
    seconds_remaining: u32,
    player_lane: usize,
    words: Vec<FallingWord>,
    used_words: HashSet<usize>,
    markers: Vec<ScoreMarker>,
    phase: Phase,
    result_taken: bool,
    rng: StdRng,
    next_id: WordId,
    move_acc: u64,
    spawn_acc: u64,
    timer_acc: u64,
    countdown_acc: u64,
}

impl Round {
    pub fn new(config: LevelConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: LevelConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: LevelConfig, rng: StdRng) -> Self {
        Self {
            score: 0,
            seconds_remaining: config.round_duration_secs,
            player_lane: config.lane_count / 2,
            words: Vec::new(),
            used_words: HashSet::new(),
            markers: Vec::new(),
            phase: Phase::Running,
            result_taken: false,
            rng,
            next_id: 1,
            move_acc: 0,
            spawn_acc: 0,
            timer_acc: 0,
            countdown_acc: 0,
            config,
        }
    }

    /// Advance wall time. Due ticks fire in a fixed order (mover, spawner,
    /// round timer) so there is no callback-ordering ambiguity; only the
    /// resume countdown runs while the round is not in `Running`.
    pub fn advance(&mut self, dt_ms: u64) {
        // Markers are cosmetic and fade on wall time regardless of phase.
        for marker in &mut self.markers {
            marker.ttl_ms = marker.ttl_ms.saturating_sub(dt_ms as u32);
        }
        self.markers.retain(|m| m.ttl_ms > 0);

        match self.phase {
            Phase::Running => {
                self.move_acc += dt_ms;
                self.spawn_acc += dt_ms;
                self.timer_acc += dt_ms;
                while self.move_acc >= self.config.tick_interval_ms
                    && self.phase == Phase::Running
                {
                    self.move_acc -= self.config.tick_interval_ms;
                    self.move_tick();
                }
                while self.spawn_acc >= self.config.spawn_interval_ms
                    && self.phase == Phase::Running
                {
                    self.spawn_acc -= self.config.spawn_interval_ms;
                    self.spawn_tick();
                }
                while self.timer_acc >= config::TIMER_INTERVAL_MS
                    && self.phase == Phase::Running
                {
                    self.timer_acc -= config::TIMER_INTERVAL_MS;
                    self.timer_tick();
                }
            }
            Phase::Resuming(_) => {
                self.countdown_acc += dt_ms;
                while self.countdown_acc >= config::COUNTDOWN_INTERVAL_MS {
                    self.countdown_acc -= config::COUNTDOWN_INTERVAL_MS;
                    self.countdown_tick();
                    if self.phase == Phase::Running {
                        self.countdown_acc = 0;
                        break;
                    }
                }
            }
            Phase::Paused | Phase::Over => {}
        }
    }

    /// Pick an unused catalog entry and drop it into a random lane. When the
    /// whole catalog has been used, recycle the set and skip this tick so a
    /// word is never drawn and re-marked in the same pass.
    fn spawn_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let unused: Vec<usize> = (0..self.config.catalog.len())
            .filter(|idx| !self.used_words.contains(idx))
            .collect();
        if unused.is_empty() {
            self.used_words.clear();
            return;
        }
        let catalog_index = unused[self.rng.gen_range(0..unused.len())];
        self.used_words.insert(catalog_index);
        let entry = &self.config.catalog[catalog_index];
        let lane = self.rng.gen_range(0..self.config.lane_count);
        let id = self.next_id();
        self.words.push(FallingWord {
            id,
            catalog_index,
            text: entry.text,
            is_target: entry.is_target,
            lane,
            y: 0.0,
            consumed: false,
            linger_ms: 0,
        });
    }

    /// Advance every word, expire caught words whose linger elapsed, drop
    /// words past the bottom edge (a silent miss), then evaluate catches.
    fn move_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let tick_ms = self.config.tick_interval_ms as u32;
        for word in &mut self.words {
            word.y += self.config.fall_step;
            if word.consumed {
                word.linger_ms = word.linger_ms.saturating_sub(tick_ms);
            }
        }
        self.words
            .retain(|w| w.y <= config::FIELD_ROWS && (!w.consumed || w.linger_ms > 0));
        self.evaluate_catches();
    }

    /// Score every unconsumed word sitting in the player's lane inside the
    /// catch band. All simultaneous candidates are evaluated in one pass.
    /// Runs after every mover tick and every steer command.
    fn evaluate_catches(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        for idx in 0..self.words.len() {
            let word = &self.words[idx];
            if word.consumed
                || word.lane != self.player_lane
                || word.y < config::CATCH_BAND_TOP
            {
                continue;
            }
            let (is_target, lane, y) = (word.is_target, word.lane, word.y);
            let word = &mut self.words[idx];
            word.consumed = true;
            word.linger_ms = config::CONSUME_LINGER_MS;
            let delta = if is_target {
                self.score += self.config.catch_delta;
                self.config.catch_delta
            } else {
                self.score = self.score.saturating_sub(self.config.miss_delta);
                self.config.miss_delta
            };
            self.markers.push(ScoreMarker {
                delta,
                positive: is_target,
                lane,
                y,
                ttl_ms: config::MARKER_TTL_MS,
            });
        }
    }

    fn timer_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        if self.seconds_remaining > 0 {
            self.seconds_remaining -= 1;
        }
        if self.seconds_remaining == 0 {
            self.phase = Phase::Over;
        }
    }

    fn countdown_tick(&mut self) {
        if let Phase::Resuming(secs) = self.phase {
            self.phase = if secs <= 1 {
                Phase::Running
            } else {
                Phase::Resuming(secs - 1)
            };
        }
    }

    /// Freeze the round. Accumulated partial intervals are discarded, which
    /// matches cancelling the scheduled callbacks outright: after resuming,
    /// every process starts a full interval from zero.
    pub fn pause(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Paused;
        self.move_acc = 0;
        self.spawn_acc = 0;
        self.timer_acc = 0;
    }

    /// Begin the 3-2-1 countdown. Gameplay stays frozen until it finishes.
    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.phase = Phase::Resuming(config::RESUME_COUNTDOWN_SECS);
        self.countdown_acc = 0;
    }

    pub fn steer_left(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.player_lane = self.player_lane.saturating_sub(1);
        self.evaluate_catches();
    }

    pub fn steer_right(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        if self.player_lane + 1 < self.config.lane_count {
            self.player_lane += 1;
        }
        self.evaluate_catches();
    }

    /// Hand out the final result exactly once per completed round. Repeated
    /// calls, and repeated timer expiry, return `None`.
    pub fn take_result(&mut self) -> Option<RoundResult> {
        if self.phase != Phase::Over || self.result_taken {
            return None;
        }
        self.result_taken = true;
        Some(RoundResult {
            level: self.config.id,
            score: self.score,
        })
    }

    fn next_id(&mut self) -> WordId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn player_lane(&self) -> usize {
        self.player_lane
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn words(&self) -> &[FallingWord] {
        &self.words
    }

    pub fn markers(&self) -> &[ScoreMarker] {
        &self.markers
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }
}
