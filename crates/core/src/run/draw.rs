use super::helpers::{emit_coverage, emit_selection};
use super::*;
use crate::*;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn {
        card: Card,
        refilled: Option<SlotId>,
    },
    /// Nothing left to draw; the round-end check has already run.
    StockExhausted { refilled: Option<SlotId> },
}

impl DrawOutcome {
    pub fn refilled(&self) -> Option<SlotId> {
        match self {
            Self::Drawn { refilled, .. } | Self::StockExhausted { refilled } => *refilled,
        }
    }
}

impl RunState {
    /// Player draw: breaks the streak, moves the waste top into the first
    /// emptied field slot (at most one), then turns over a stock card.
    pub fn draw_from_stock(&mut self, events: &mut EventBus) -> Result<DrawOutcome, RunError> {
        let round = self.playing_round()?;
        round.score.reset_streak();
        if !round.selection.is_empty() {
            round.selection.clear();
            emit_selection(&round.selection, events);
        }

        let refilled = refill_one(round, events);
        let outcome = match round.piles.draw_to_waste() {
            Some(card) => {
                events.push(Event::CardDrawn {
                    value: card,
                    stock_remaining: round.piles.stock_len(),
                });
                DrawOutcome::Drawn { card, refilled }
            }
            None => {
                events.push(Event::StockExhausted);
                DrawOutcome::StockExhausted { refilled }
            }
        };
        debug!("manual draw: {outcome:?}");
        self.push_score(events);
        self.check_round_end(events);
        Ok(outcome)
    }

    /// Refills an emptied waste pile straight from the stock after a combo
    /// used its top card. No refill, no streak reset.
    pub(super) fn draw_auto(&mut self, events: &mut EventBus) -> bool {
        let Some(round) = self.round.as_mut() else {
            return false;
        };
        match round.piles.draw_to_waste() {
            Some(value) => {
                debug!("auto draw {value}");
                events.push(Event::CardDrawn {
                    value,
                    stock_remaining: round.piles.stock_len(),
                });
                true
            }
            None => {
                events.push(Event::StockExhausted);
                false
            }
        }
    }
}

fn refill_one(round: &mut RoundState, events: &mut EventBus) -> Option<SlotId> {
    if !round.board.has_removed() {
        return None;
    }
    let card = round.piles.pop_waste()?;
    let Some(slot) = round.board.refill_first_removed(card) else {
        round.piles.waste.push(card);
        return None;
    };
    events.push(Event::SlotRefilled { slot, value: card });
    let change = round.board.refresh_coverage();
    if round.board.is_selectable(slot) {
        events.push(Event::CardRevealed { slot, value: card });
    }
    emit_coverage(change, &round.board, events);
    Some(slot)
}
