use crate::{Card, EndBonus, RoundOutcome, RoundSummary, SlotId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardSource {
    Slot(SlotId),
    Waste,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Covered,
    Removed,
    NotTopOfWaste,
    EmptyWaste,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Covered => "covered",
            Self::Removed => "removed",
            Self::NotTopOfWaste => "not-top-of-waste",
            Self::EmptyWaste => "empty-waste",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    RoundStarted {
        round: u8,
        time_budget_ms: u64,
        multiplier_tenths: u32,
        stock: usize,
    },
    CardRevealed {
        slot: SlotId,
        value: Card,
    },
    CardCovered {
        slot: SlotId,
    },
    CardRemoved {
        source: CardSource,
    },
    CardDrawn {
        value: Card,
        stock_remaining: usize,
    },
    SlotRefilled {
        slot: SlotId,
        value: Card,
    },
    StockExhausted,
    SelectionChanged {
        slots: Vec<SlotId>,
        waste: bool,
    },
    SelectionRejected {
        target: CardSource,
        reason: RejectReason,
    },
    ComboResolved {
        cards: usize,
        points: i64,
    },
    PenaltyApplied {
        sum: u32,
        penalty: i64,
    },
    ScoreChanged {
        round_score: i64,
        total_score: i64,
        streak: u32,
    },
    PeakCleared {
        peak: usize,
        bonus: i64,
    },
    TimeRemaining {
        ms: u64,
    },
    RoundEnded {
        outcome: RoundOutcome,
        bonus: EndBonus,
        summary: RoundSummary,
    },
    MatchEnded {
        history: Vec<RoundSummary>,
        total_score: i64,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn pending(&self) -> &[Event] {
        &self.queue
    }
}
