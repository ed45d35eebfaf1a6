use super::*;
use crate::*;
use log::info;

impl RunState {
    /// Host clock input. Returns the time left in the round, or `None` when
    /// no round is running.
    pub fn tick(&mut self, now_ms: u64, events: &mut EventBus) -> Option<u64> {
        self.now_ms = self.now_ms.max(now_ms);
        if self.phase != Phase::Playing {
            return None;
        }
        let round = self.round.as_mut()?;
        if round.ending {
            return None;
        }
        round.clock.observe(self.now_ms);
        let remaining = round.clock.remaining_ms();
        events.push(Event::TimeRemaining { ms: remaining });
        if remaining == 0 {
            self.end_round(RoundOutcome::TimeExpired, events);
        }
        Some(remaining)
    }

    /// One legal combo on the current board, if any.
    pub fn hint(&self) -> Option<Combo> {
        if self.phase != Phase::Playing {
            return None;
        }
        let round = self.round.as_ref()?;
        let open: Vec<(SlotId, Card)> = round.board.selectable().collect();
        let top = round.piles.waste_top();
        find_pair(&open, top).or_else(|| find_any_combination(&open, top))
    }

    pub(super) fn check_round_end(&mut self, events: &mut EventBus) -> Option<RoundOutcome> {
        if self.phase != Phase::Playing {
            return None;
        }
        let round = self.round.as_ref()?;
        if round.ending {
            return None;
        }
        let outcome = detect_outcome(round, self.config.stalemate)?;
        self.end_round(outcome, events);
        Some(outcome)
    }

    pub(super) fn end_round(&mut self, outcome: RoundOutcome, events: &mut EventBus) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.ending {
            return;
        }
        round.ending = true;
        round.outcome = Some(outcome);
        round.clock.observe(self.now_ms);
        round.clock.freeze();
        round.selection.clear();
        self.phase = Phase::RoundEnding;

        let bonus = if outcome.is_win() {
            EndBonus::compute(
                &self.config.scoring,
                round.score.multiplier,
                round.clock.remaining_ms(),
                round.piles.stock_len(),
            )
        } else {
            EndBonus::default()
        };
        round.score.credit(bonus.total());

        let summary = RoundSummary {
            round: round.number,
            outcome,
            score: round.score.score,
            elapsed_ms: round.clock.elapsed_ms(),
            stock_remaining: round.piles.stock_len(),
        };
        let number = round.number;
        let streak = round.score.streak;
        self.state.total_score = self.state.total_score.saturating_add(summary.score);
        self.state.history.push(summary.clone());
        info!(
            "round {number} ended {outcome:?}: score {}, total {}",
            summary.score, self.state.total_score
        );
        events.push(Event::RoundEnded {
            outcome,
            bonus,
            summary: summary.clone(),
        });
        events.push(Event::ScoreChanged {
            round_score: summary.score,
            total_score: self.state.total_score,
            streak,
        });

        if number >= self.config.rounds.count {
            self.phase = Phase::MatchOver;
            self.state.over = true;
            info!("match over: total {}", self.state.total_score);
            events.push(Event::MatchEnded {
                history: self.state.history.clone(),
                total_score: self.state.total_score,
            });
        } else if self.config.auto_deal_next_round {
            self.deal_round(number + 1, events);
        }
    }
}

fn detect_outcome(round: &RoundState, rule: StalemateRule) -> Option<RoundOutcome> {
    if round.board.all_field_cleared() {
        return Some(RoundOutcome::Won);
    }
    if !round.piles.stock.is_empty() {
        return None;
    }
    if round.piles.waste.is_empty() {
        return Some(RoundOutcome::Exhausted);
    }
    let open: Vec<(SlotId, Card)> = round.board.selectable().collect();
    match find_combo(rule, &open, round.piles.waste_top()) {
        Some(_) => None,
        None => Some(RoundOutcome::Stalemate),
    }
}
