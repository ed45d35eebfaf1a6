use crate::{GameConfig, MatchState, Phase, RejectReason, RngState, RoundState, SlotId};
use std::collections::VecDeque;
use thiserror::Error;

mod deal;
mod draw;
mod helpers;
mod outcome;
mod select;
mod snapshot;
mod state;

pub use deal::DealPlan;
pub use draw::DrawOutcome;
pub use select::{SelectOutcome, SelectTarget};
pub use snapshot::{RoundSnapshot, SlotView};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("match is over")]
    MatchOver,
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("unknown slot {0}")]
    UnknownSlot(SlotId),
    #[error("selection rejected: {}", .0.as_str())]
    Rejected(RejectReason),
    #[error("match already started")]
    AlreadyStarted,
    #[error("invalid deal: {0}")]
    InvalidDeal(String),
}

/// Owns the match and the round in play. Intents come in through
/// `select_card`, `draw_from_stock`, `cancel_selection` and `restart_match`;
/// time comes in through `tick`. Every call reports what changed on the
/// `EventBus` it is given.
#[derive(Debug)]
pub struct RunState {
    pub config: GameConfig,
    pub rng: RngState,
    pub state: MatchState,
    phase: Phase,
    round: Option<RoundState>,
    queued_deals: VecDeque<DealPlan>,
    now_ms: u64,
}

impl RunState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Latest host timestamp seen by the engine.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::MatchOver
    }

    /// Finished rounds plus the score of the round in play.
    pub fn running_total(&self) -> i64 {
        match &self.round {
            Some(round) if !round.ending => self.state.total_score + round.score.score,
            _ => self.state.total_score,
        }
    }
}
