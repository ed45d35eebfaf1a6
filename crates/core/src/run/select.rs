use super::helpers::{emit_coverage, emit_selection};
use super::*;
use crate::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectTarget {
    Slot(SlotId),
    WasteTop,
    /// A waste card by stack position, 0 being the bottom.
    Waste(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Selection sums to less than 11 and stays open.
    Pending { sum: u32 },
    Deselected,
    Combo { cards: usize, points: i64 },
    /// Selection went past 11; `penalty` is what was actually deducted.
    Overshoot { sum: u32, penalty: i64 },
}

fn reject<T>(
    events: &mut EventBus,
    target: CardSource,
    reason: RejectReason,
) -> Result<T, RunError> {
    debug!("selection of {target:?} rejected: {}", reason.as_str());
    events.push(Event::SelectionRejected { target, reason });
    Err(RunError::Rejected(reason))
}

impl RunState {
    /// Adds a card to the selection (or removes it if already picked) and
    /// resolves the selection when it reaches or passes 11.
    pub fn select_card(
        &mut self,
        target: SelectTarget,
        events: &mut EventBus,
    ) -> Result<SelectOutcome, RunError> {
        let round = self.playing_round()?;
        match target {
            SelectTarget::Slot(id) => {
                let Some(slot) = round.board.slot(id) else {
                    debug_assert!(false, "select on unknown slot {id}");
                    return Err(RunError::UnknownSlot(id));
                };
                if round.selection.contains(id) {
                    round.selection.toggle_slot(id);
                    emit_selection(&round.selection, events);
                    return Ok(SelectOutcome::Deselected);
                }
                if !slot.is_live() {
                    return reject(events, CardSource::Slot(id), RejectReason::Removed);
                }
                if slot.covered {
                    return reject(events, CardSource::Slot(id), RejectReason::Covered);
                }
                round.selection.toggle_slot(id);
            }
            SelectTarget::WasteTop | SelectTarget::Waste(_) => {
                let len = round.piles.waste.len();
                if len == 0 {
                    return reject(events, CardSource::Waste, RejectReason::EmptyWaste);
                }
                if let SelectTarget::Waste(index) = target {
                    if index != len - 1 {
                        return reject(events, CardSource::Waste, RejectReason::NotTopOfWaste);
                    }
                }
                if round.selection.waste {
                    round.selection.waste = false;
                    emit_selection(&round.selection, events);
                    return Ok(SelectOutcome::Deselected);
                }
                round.selection.waste = true;
            }
        }
        emit_selection(&round.selection, events);
        self.resolve_selection(events)
    }

    pub fn cancel_selection(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        let round = self.playing_round()?;
        if !round.selection.is_empty() {
            round.selection.clear();
            emit_selection(&round.selection, events);
        }
        Ok(())
    }

    /// Sum of the cards currently selected.
    pub fn selection_sum(&self) -> u32 {
        self.round
            .as_ref()
            .map(|round| sum_values(selected_cards(round)))
            .unwrap_or(0)
    }

    fn resolve_selection(&mut self, events: &mut EventBus) -> Result<SelectOutcome, RunError> {
        let penalty = self.config.scoring.over_penalty;
        let round = self.playing_round()?;
        let picked = selected_cards(round);
        let sum = sum_values(picked.iter().copied());
        match evaluate(picked) {
            Evaluation::Incomplete => Ok(SelectOutcome::Pending { sum }),
            Evaluation::Over => {
                let deducted = -round.score.add_flat(-penalty);
                round.selection.clear();
                debug!("selection overshot with {sum}, -{deducted}");
                events.push(Event::PenaltyApplied {
                    sum,
                    penalty: deducted,
                });
                emit_selection(&round.selection, events);
                self.push_score(events);
                Ok(SelectOutcome::Overshoot {
                    sum,
                    penalty: deducted,
                })
            }
            Evaluation::Exact => self.apply_combo(events),
        }
    }

    fn apply_combo(&mut self, events: &mut EventBus) -> Result<SelectOutcome, RunError> {
        let scoring = self.config.scoring.clone();
        let round = self.playing_round()?;
        let slots = std::mem::take(&mut round.selection.slots);
        let used_waste = std::mem::replace(&mut round.selection.waste, false);

        for id in &slots {
            if round.board.remove(*id).is_some() {
                events.push(Event::CardRemoved {
                    source: CardSource::Slot(*id),
                });
            }
        }
        if used_waste && round.piles.pop_waste().is_some() {
            events.push(Event::CardRemoved {
                source: CardSource::Waste,
            });
        }

        let cards = slots.len() + usize::from(used_waste);
        let points = round.score.record_combo(&scoring, slots.len());
        debug!(
            "combo of {cards} cards for {points} (streak {})",
            round.score.streak
        );
        events.push(Event::ComboResolved { cards, points });

        let change = round.board.refresh_coverage();
        emit_coverage(change, &round.board, events);
        for peak in 0..round.board.peak_count() {
            if !round.board.is_peak_cleared(peak) {
                continue;
            }
            if let Some(bonus) = round.score.award_peak(&scoring, peak) {
                info!("peak {peak} cleared for {bonus}");
                events.push(Event::PeakCleared { peak, bonus });
            }
        }
        emit_selection(&round.selection, events);

        // A cleared field wins before any auto-draw can touch the stock.
        let needs_draw =
            used_waste && round.piles.waste.is_empty() && !round.board.all_field_cleared();
        self.push_score(events);
        if needs_draw {
            self.draw_auto(events);
        }
        self.check_round_end(events);
        Ok(SelectOutcome::Combo { cards, points })
    }
}

fn selected_cards(round: &RoundState) -> Vec<Card> {
    let mut picked: Vec<Card> = round
        .selection
        .slots
        .iter()
        .filter_map(|id| round.board.slot(*id).and_then(Slot::card))
        .collect();
    if round.selection.waste {
        picked.extend(round.piles.waste_top());
    }
    picked
}
