use super::*;
use crate::*;
use log::debug;

impl RunState {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        debug!("new run with seed {seed}");
        Self {
            config,
            rng: RngState::from_seed(seed),
            state: MatchState::new(),
            phase: Phase::Dealing,
            round: None,
            queued_deals: VecDeque::new(),
            now_ms: 0,
        }
    }

    pub(super) fn playing_round(&mut self) -> Result<&mut RoundState, RunError> {
        match self.phase {
            Phase::Playing => {}
            Phase::MatchOver => return Err(RunError::MatchOver),
            other => return Err(RunError::InvalidPhase(other)),
        }
        self.round.as_mut().ok_or(RunError::InvalidPhase(self.phase))
    }

    pub(super) fn push_score(&self, events: &mut EventBus) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        events.push(Event::ScoreChanged {
            round_score: round.score.score,
            total_score: self.running_total(),
            streak: round.score.streak,
        });
    }
}
