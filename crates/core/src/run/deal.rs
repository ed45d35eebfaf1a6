use super::helpers::emit_coverage;
use super::*;
use crate::*;
use log::info;
use serde::{Deserialize, Serialize};

/// Exact cards for one deal. `field` fills slots in id order; the last
/// `stock` card is the first one drawn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DealPlan {
    pub field: Vec<Card>,
    pub stock: Vec<Card>,
}

impl DealPlan {
    pub fn from_values(field: &[u8], stock: &[u8]) -> Result<Self, RunError> {
        let field = cards(field).map_err(|err| RunError::InvalidDeal(err.to_string()))?;
        let stock = cards(stock).map_err(|err| RunError::InvalidDeal(err.to_string()))?;
        Ok(Self { field, stock })
    }
}

impl RunState {
    /// Uses `plan` instead of random cards for the next deal. Plans are
    /// consumed in the order they were queued.
    pub fn queue_deal(&mut self, plan: DealPlan) -> Result<(), RunError> {
        let expected = self.config.layout.slot_count();
        if plan.field.len() != expected {
            return Err(RunError::InvalidDeal(format!(
                "expected {expected} field cards, got {}",
                plan.field.len()
            )));
        }
        self.queued_deals.push_back(plan);
        Ok(())
    }

    pub fn start_match(&mut self, now_ms: u64, events: &mut EventBus) -> Result<(), RunError> {
        if self.phase != Phase::Dealing || self.round.is_some() {
            return Err(RunError::AlreadyStarted);
        }
        self.now_ms = self.now_ms.max(now_ms);
        info!("match started");
        self.deal_round(1, events);
        Ok(())
    }

    /// Throws away the match in any phase and deals round 1 again.
    pub fn restart_match(&mut self, events: &mut EventBus) {
        info!("match restarted after {} rounds", self.state.history.len());
        self.state = MatchState::new();
        self.round = None;
        self.phase = Phase::Dealing;
        self.deal_round(1, events);
    }

    /// Deals the following round when automatic dealing is off.
    pub fn next_round(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        match self.phase {
            Phase::RoundEnding => {}
            Phase::MatchOver => return Err(RunError::MatchOver),
            other => return Err(RunError::InvalidPhase(other)),
        }
        let next = self.state.round.saturating_add(1);
        self.deal_round(next, events);
        Ok(())
    }

    pub(super) fn deal_round(&mut self, number: u8, events: &mut EventBus) {
        self.phase = Phase::Dealing;
        self.round = None;
        self.state.round = number;

        let layout = &self.config.layout;
        let mut board = Board::build(layout.peaks, &layout.rows);
        let (field, stock) = match self.queued_deals.pop_front() {
            Some(plan) => (plan.field, plan.stock),
            None => {
                let field: Vec<Card> = (0..board.len())
                    .map(|_| random_card(&mut self.rng))
                    .collect();
                let stock = biased_stock(&field, &self.config.stock, &mut self.rng);
                (field, stock)
            }
        };
        let change = board.deal(field);
        let mut piles = Piles::new(stock);
        let first_waste = piles.draw_to_waste();

        let budget = self.config.rounds.time_budget_ms(number);
        let multiplier = self.config.rounds.multiplier(number);
        events.push(Event::RoundStarted {
            round: number,
            time_budget_ms: budget,
            multiplier_tenths: multiplier.tenths(),
            stock: piles.stock_len(),
        });
        emit_coverage(change, &board, events);
        if let Some(value) = first_waste {
            events.push(Event::CardDrawn {
                value,
                stock_remaining: piles.stock_len(),
            });
        }
        info!(
            "round {number} dealt: {} slots, stock {}, {budget}ms, {multiplier}",
            board.len(),
            piles.stock_len()
        );

        let clock = RoundClock::start(self.now_ms, budget);
        self.round = Some(RoundState::new(number, board, piles, clock, multiplier));
        self.phase = Phase::Playing;
        self.push_score(events);
        self.check_round_end(events);
    }
}
