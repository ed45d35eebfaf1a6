use super::*;
use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotView {
    pub id: SlotId,
    pub peak: usize,
    pub row: usize,
    pub col: usize,
    pub value: Option<Card>,
    pub removed: bool,
    pub covered: bool,
    pub selected: bool,
}

/// Read-only picture of the round for renderers. Everything in it is plain
/// data and serializes to JSON as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub round: u8,
    pub rounds_total: u8,
    pub phase: Phase,
    pub slots: Vec<SlotView>,
    pub waste_top: Option<Card>,
    pub waste_len: usize,
    pub waste_selected: bool,
    pub stock_len: usize,
    pub round_score: i64,
    pub total_score: i64,
    pub streak: u32,
    pub multiplier_tenths: u32,
    pub remaining_ms: u64,
    pub outcome: Option<RoundOutcome>,
}

impl RunState {
    pub fn snapshot(&self) -> Option<RoundSnapshot> {
        let round = self.round.as_ref()?;
        let slots = round
            .board
            .slots()
            .iter()
            .map(|slot| SlotView {
                id: slot.id,
                peak: slot.peak,
                row: slot.row,
                col: slot.col,
                value: slot.card(),
                removed: slot.is_removed(),
                covered: slot.covered,
                selected: round.selection.contains(slot.id),
            })
            .collect();
        Some(RoundSnapshot {
            round: round.number,
            rounds_total: self.config.rounds.count,
            phase: self.phase,
            slots,
            waste_top: round.piles.waste_top(),
            waste_len: round.piles.waste.len(),
            waste_selected: round.selection.waste,
            stock_len: round.piles.stock_len(),
            round_score: round.score.score,
            total_score: self.running_total(),
            streak: round.score.streak,
            multiplier_tenths: round.score.multiplier.tenths(),
            remaining_ms: round.clock.remaining_ms(),
            outcome: round.outcome,
        })
    }
}
