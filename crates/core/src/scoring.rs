use crate::ScoringRule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Round multiplier in tenths, so scaling stays exact integer math.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ONE: Multiplier = Multiplier(10);

    pub fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    pub fn tenths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }

    /// `floor(points × multiplier)` for non-negative points.
    pub fn scale(self, points: i64) -> i64 {
        points.max(0).saturating_mul(self.0 as i64) / 10
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Unscaled points for a combo with `field_cards` board cards at `streak`.
pub fn combo_points(rule: &ScoringRule, field_cards: usize, streak: u32) -> i64 {
    rule.combo_base + rule.per_card * field_cards as i64 + rule.per_streak * streak as i64
}

/// Bonuses paid when a round ends by clearing the field, already scaled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndBonus {
    pub win: i64,
    pub time: i64,
    pub stock: i64,
}

impl EndBonus {
    pub fn compute(
        rule: &ScoringRule,
        multiplier: Multiplier,
        remaining_ms: u64,
        stock_left: usize,
    ) -> Self {
        let seconds = (remaining_ms / 1000) as i64;
        Self {
            win: multiplier.scale(rule.win_bonus),
            time: multiplier.scale(rule.time_bonus_per_sec * seconds),
            stock: multiplier.scale(rule.stock_bonus_per_card * stock_left as i64),
        }
    }

    pub fn total(&self) -> i64 {
        self.win + self.time + self.stock
    }
}

/// Score, streak and one-time peak bonuses for the round in progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundScore {
    pub score: i64,
    pub streak: u32,
    pub multiplier: Multiplier,
    pub peaks_awarded: BTreeSet<usize>,
}

impl RoundScore {
    pub fn new(multiplier: Multiplier) -> Self {
        Self {
            score: 0,
            streak: 0,
            multiplier,
            peaks_awarded: BTreeSet::new(),
        }
    }

    /// Scales `base` by the round multiplier and adds it. Returns the points added.
    pub fn add_scaled(&mut self, base: i64) -> i64 {
        let points = self.multiplier.scale(base);
        self.score = self.score.saturating_add(points);
        points
    }

    /// Adds an unscaled delta with the score floored at 0. Returns the
    /// change actually applied.
    pub fn add_flat(&mut self, delta: i64) -> i64 {
        let before = self.score;
        self.score = self.score.saturating_add(delta).max(0);
        self.score - before
    }

    /// Adds points that are already scaled.
    pub fn credit(&mut self, points: i64) {
        self.score = self.score.saturating_add(points.max(0));
    }

    pub fn record_combo(&mut self, rule: &ScoringRule, field_cards: usize) -> i64 {
        let points = self.add_scaled(combo_points(rule, field_cards, self.streak));
        self.streak = self.streak.saturating_add(1);
        points
    }

    pub fn reset_streak(&mut self) {
        self.streak = 0;
    }

    /// Pays the peak bonus the first time `peak` is cleared this round.
    pub fn award_peak(&mut self, rule: &ScoringRule, peak: usize) -> Option<i64> {
        if !self.peaks_awarded.insert(peak) {
            return None;
        }
        Some(self.add_scaled(rule.peak_bonus))
    }
}
