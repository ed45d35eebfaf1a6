use crate::*;

pub(super) fn emit_coverage(change: CoverageChange, board: &Board, events: &mut EventBus) {
    for slot in change.covered {
        events.push(Event::CardCovered { slot });
    }
    for slot in change.revealed {
        if let Some(value) = board.slot(slot).and_then(Slot::card) {
            events.push(Event::CardRevealed { slot, value });
        }
    }
}

pub(super) fn emit_selection(selection: &Selection, events: &mut EventBus) {
    events.push(Event::SelectionChanged {
        slots: selection.slots.clone(),
        waste: selection.waste,
    });
}
