use crate::{Board, Multiplier, Piles, RoundScore, SlotId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Dealing,
    Playing,
    RoundEnding,
    MatchOver,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Won,
    /// Stock and waste both empty with cards left on the field.
    Exhausted,
    /// Stock empty and no playable combination left.
    Stalemate,
    TimeExpired,
}

impl RoundOutcome {
    pub fn is_win(self) -> bool {
        self == Self::Won
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u8,
    pub outcome: RoundOutcome,
    pub score: i64,
    pub elapsed_ms: u64,
    pub stock_remaining: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchState {
    pub round: u8,
    pub total_score: i64,
    pub history: Vec<RoundSummary>,
    pub over: bool,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            round: 1,
            total_score: 0,
            history: Vec::new(),
            over: false,
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Countdown driven by host timestamps. Elapsed time is always
/// `now - started`, never a sum of tick deltas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundClock {
    started_ms: u64,
    budget_ms: u64,
    now_ms: u64,
    frozen: bool,
}

impl RoundClock {
    pub fn start(now_ms: u64, budget_ms: u64) -> Self {
        Self {
            started_ms: now_ms,
            budget_ms,
            now_ms,
            frozen: false,
        }
    }

    /// Moves the clock forward; earlier timestamps and frozen clocks are ignored.
    pub fn observe(&mut self, now_ms: u64) {
        if !self.frozen {
            self.now_ms = self.now_ms.max(now_ms);
        }
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn budget_ms(&self) -> u64 {
        self.budget_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.started_ms).min(self.budget_ms)
    }

    pub fn remaining_ms(&self) -> u64 {
        self.budget_ms - self.elapsed_ms()
    }

    pub fn expired(&self) -> bool {
        self.remaining_ms() == 0
    }
}

/// Cards picked towards the next combo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub slots: Vec<SlotId>,
    pub waste: bool,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && !self.waste
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.slots.contains(&id)
    }

    pub fn toggle_slot(&mut self, id: SlotId) -> bool {
        if let Some(pos) = self.slots.iter().position(|slot| *slot == id) {
            self.slots.remove(pos);
            false
        } else {
            self.slots.push(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.waste = false;
    }
}

/// Everything owned by one round; replaced wholesale on the next deal.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub number: u8,
    pub board: Board,
    pub piles: Piles,
    pub score: RoundScore,
    pub clock: RoundClock,
    pub selection: Selection,
    pub outcome: Option<RoundOutcome>,
    /// Set once the round starts ending; blocks further win/loss checks.
    pub ending: bool,
}

impl RoundState {
    pub fn new(
        number: u8,
        board: Board,
        piles: Piles,
        clock: RoundClock,
        multiplier: Multiplier,
    ) -> Self {
        Self {
            number,
            board,
            piles,
            score: RoundScore::new(multiplier),
            clock,
            selection: Selection::default(),
            outcome: None,
            ending: false,
        }
    }
}
