//! Peak layout and the coverage graph.
//!
//! Every slot lists the slots in the next row of its peak that overlap it
//! ("children"). A slot is covered while any child still holds a card. The
//! child lists are computed once in [`Board::build`] and never change; only
//! slot contents and the derived `covered` flag move during a round.

use crate::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SlotId(pub usize);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Empty,
    Filled(Card),
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub id: SlotId,
    pub peak: usize,
    pub row: usize,
    pub col: usize,
    pub children: Vec<SlotId>,
    pub state: SlotState,
    pub covered: bool,
}

impl Slot {
    pub fn card(&self) -> Option<Card> {
        match self.state {
            SlotState::Filled(card) => Some(card),
            _ => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, SlotState::Filled(_))
    }

    pub fn is_removed(&self) -> bool {
        self.state == SlotState::Removed
    }

    pub fn is_selectable(&self) -> bool {
        self.is_live() && !self.covered
    }
}

/// Slots whose covered flag flipped during a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageChange {
    pub revealed: Vec<SlotId>,
    pub covered: Vec<SlotId>,
}

impl CoverageChange {
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty() && self.covered.is_empty()
    }
}

/// Columns in the next row that overlap column `col` of the current row.
pub fn child_columns(cur: usize, next: usize, col: usize) -> Vec<usize> {
    if next == 0 {
        Vec::new()
    } else if next == 1 {
        vec![0]
    } else if cur == 1 {
        vec![0, next - 1]
    } else if next == cur + 1 {
        vec![col, col + 1]
    } else if next == cur {
        vec![col]
    } else if next + 1 == cur {
        if col == 0 {
            vec![0]
        } else if col + 1 == cur {
            vec![next - 1]
        } else {
            vec![col - 1, col]
        }
    } else {
        // Rows further apart than one step: overlap the proportional column.
        vec![(col * next / cur).min(next - 1)]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    slots: Vec<Slot>,
    peaks: usize,
    rows: Vec<usize>,
}

impl Board {
    /// Allocates `peak_count` peaks of `rows` slots each. Ids are assigned
    /// peak-major, then row, then column, so peak `p` owns a contiguous range.
    pub fn build(peak_count: usize, rows: &[usize]) -> Self {
        let per_peak: usize = rows.iter().sum();
        let mut slots = Vec::with_capacity(peak_count * per_peak);
        for peak in 0..peak_count {
            let base = peak * per_peak;
            let mut row_start = base;
            for (row, &len) in rows.iter().enumerate() {
                let next_start = row_start + len;
                let next_len = rows.get(row + 1).copied().unwrap_or(0);
                for col in 0..len {
                    let children = child_columns(len, next_len, col)
                        .into_iter()
                        .map(|child| SlotId(next_start + child))
                        .collect();
                    slots.push(Slot {
                        id: SlotId(row_start + col),
                        peak,
                        row,
                        col,
                        children,
                        state: SlotState::Empty,
                        covered: false,
                    });
                }
                row_start = next_start;
            }
        }
        Self {
            slots,
            peaks: peak_count,
            rows: rows.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn peak_count(&self) -> usize {
        self.peaks
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.0)
    }

    /// Fills slots in id order and ignores any cards past the last slot.
    /// Callers supply at least `len()` cards; `DealPlan`s are length-checked
    /// by `RunState::queue_deal`.
    pub fn deal(&mut self, cards: impl IntoIterator<Item = Card>) -> CoverageChange {
        for (slot, card) in self.slots.iter_mut().zip(cards) {
            slot.state = SlotState::Filled(card);
        }
        for slot in &mut self.slots {
            slot.covered = true;
        }
        self.refresh_coverage()
    }

    pub fn is_covered(&self, id: SlotId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        slot.children
            .iter()
            .any(|child| self.slot(*child).is_some_and(Slot::is_live))
    }

    pub fn is_selectable(&self, id: SlotId) -> bool {
        self.slot(id).is_some_and(Slot::is_selectable)
    }

    /// Recomputes every covered flag and reports which live slots changed.
    pub fn refresh_coverage(&mut self) -> CoverageChange {
        let covered: Vec<bool> = (0..self.slots.len())
            .map(|idx| self.is_covered(SlotId(idx)))
            .collect();
        let mut change = CoverageChange::default();
        for (slot, now_covered) in self.slots.iter_mut().zip(covered) {
            if slot.covered != now_covered && slot.is_live() {
                if now_covered {
                    change.covered.push(slot.id);
                } else {
                    change.revealed.push(slot.id);
                }
            }
            slot.covered = now_covered;
        }
        change
    }

    pub fn selectable(&self) -> impl Iterator<Item = (SlotId, Card)> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.is_selectable())
            .filter_map(|slot| slot.card().map(|card| (slot.id, card)))
    }

    pub fn live_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots.iter().filter_map(Slot::card)
    }

    /// Takes the card out of a live slot. The slot keeps its identity.
    pub fn remove(&mut self, id: SlotId) -> Option<Card> {
        let slot = self.slots.get_mut(id.0)?;
        let card = slot.card()?;
        slot.state = SlotState::Removed;
        Some(card)
    }

    pub fn has_removed(&self) -> bool {
        self.slots.iter().any(Slot::is_removed)
    }

    /// First removed slot scanning rows top to bottom, then left to right
    /// across peaks.
    pub fn first_removed(&self) -> Option<SlotId> {
        self.slots
            .iter()
            .filter(|slot| slot.is_removed())
            .min_by_key(|slot| (slot.row, slot.peak, slot.col))
            .map(|slot| slot.id)
    }

    /// Writes `card` into exactly one removed slot, if any.
    pub fn refill_first_removed(&mut self, card: Card) -> Option<SlotId> {
        let id = self.first_removed()?;
        let covered = self.is_covered(id);
        let slot = &mut self.slots[id.0];
        slot.state = SlotState::Filled(card);
        slot.covered = covered;
        Some(id)
    }

    pub fn is_peak_cleared(&self, peak: usize) -> bool {
        let mut owned = self.slots.iter().filter(|slot| slot.peak == peak).peekable();
        owned.peek().is_some() && owned.all(Slot::is_removed)
    }

    pub fn all_field_cleared(&self) -> bool {
        self.slots.iter().all(Slot::is_removed)
    }

    pub fn removed_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_removed()).count()
    }
}
