use crate::Multiplier;
use serde::{Deserialize, Serialize};

/// Row lengths of one peak, top to bottom.
pub const DIAMOND_ROWS: [usize; 5] = [1, 2, 3, 2, 1];
pub const DEFAULT_PEAKS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutRule {
    pub peaks: usize,
    pub rows: Vec<usize>,
}

impl Default for LayoutRule {
    fn default() -> Self {
        Self {
            peaks: DEFAULT_PEAKS,
            rows: DIAMOND_ROWS.to_vec(),
        }
    }
}

impl LayoutRule {
    pub fn slots_per_peak(&self) -> usize {
        self.rows.iter().sum()
    }

    pub fn slot_count(&self) -> usize {
        self.peaks * self.slots_per_peak()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoundRule {
    pub count: u8,
    pub base_time_ms: u64,
    pub time_step_ms: u64,
    pub min_time_ms: u64,
    pub multiplier_step_tenths: u32,
}

impl Default for RoundRule {
    fn default() -> Self {
        Self {
            count: 7,
            base_time_ms: 90_000,
            time_step_ms: 5_000,
            min_time_ms: 60_000,
            multiplier_step_tenths: 3,
        }
    }
}

impl RoundRule {
    pub fn time_budget_ms(&self, round: u8) -> u64 {
        let steps = round.saturating_sub(1) as u64;
        self.base_time_ms
            .saturating_sub(self.time_step_ms.saturating_mul(steps))
            .max(self.min_time_ms)
    }

    pub fn multiplier(&self, round: u8) -> Multiplier {
        let steps = round.saturating_sub(1) as u32;
        Multiplier::from_tenths(10 + self.multiplier_step_tenths.saturating_mul(steps))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringRule {
    pub combo_base: i64,
    pub per_card: i64,
    pub per_streak: i64,
    /// Flat, never scaled by the round multiplier.
    pub over_penalty: i64,
    pub peak_bonus: i64,
    pub win_bonus: i64,
    pub time_bonus_per_sec: i64,
    pub stock_bonus_per_card: i64,
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self {
            combo_base: 10,
            per_card: 2,
            per_streak: 2,
            over_penalty: 5,
            peak_bonus: 50,
            win_bonus: 100,
            time_bonus_per_sec: 5,
            stock_bonus_per_card: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StockRule {
    pub size: usize,
    /// Chance, in percent, that a stock card comes from the complement pool.
    pub bias_percent: u8,
    pub weight_offset: u32,
    pub weight_min: u32,
    pub weight_max: u32,
}

impl Default for StockRule {
    fn default() -> Self {
        Self {
            size: 24,
            bias_percent: 70,
            weight_offset: 2,
            weight_min: 1,
            weight_max: 6,
        }
    }
}

impl StockRule {
    pub fn weight_for(&self, frequency: u32) -> u32 {
        frequency
            .saturating_add(self.weight_offset)
            .clamp(self.weight_min, self.weight_max.max(self.weight_min))
    }
}

/// Which combinations keep a round with an empty stock alive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StalemateRule {
    /// Two field cards, or the waste top plus one field card.
    #[default]
    Pairs,
    /// Any subset of selectable field cards, optionally with the waste top.
    AnyCombination,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub layout: LayoutRule,
    pub rounds: RoundRule,
    pub scoring: ScoringRule,
    pub stock: StockRule,
    pub stalemate: StalemateRule,
    pub auto_deal_next_round: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            layout: LayoutRule::default(),
            rounds: RoundRule::default(),
            scoring: ScoringRule::default(),
            stock: StockRule::default(),
            stalemate: StalemateRule::default(),
            auto_deal_next_round: true,
        }
    }
}
