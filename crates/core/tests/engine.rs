use eleven_core::{
    Card, CardSource, DealPlan, DrawOutcome, EndBonus, Event, EventBus, GameConfig, LayoutRule,
    Phase, RejectReason, RoundOutcome, RunError, RunState, SelectOutcome, SelectTarget, SlotId,
    StalemateRule,
};

fn diamond_field(overrides: &[(usize, u8)]) -> Vec<u8> {
    let mut field = vec![10u8; 27];
    for (slot, value) in overrides {
        field[*slot] = *value;
    }
    field
}

fn single_round() -> GameConfig {
    let mut config = GameConfig::default();
    config.rounds.count = 1;
    config
}

fn start(config: GameConfig, plans: &[(Vec<u8>, Vec<u8>)]) -> (RunState, EventBus) {
    let mut run = RunState::new(config, 42);
    for (field, stock) in plans {
        let plan = DealPlan::from_values(field, stock).expect("plan");
        run.queue_deal(plan).expect("queue deal");
    }
    let mut events = EventBus::default();
    run.start_match(0, &mut events).expect("start match");
    (run, events)
}

fn drain(events: &mut EventBus) -> Vec<Event> {
    events.drain().collect()
}

fn card(value: u8) -> Card {
    Card::new(value).expect("card value")
}

fn round_score(run: &RunState) -> i64 {
    run.round().expect("round").score.score
}

#[test]
fn deal_opens_bottom_row_and_turns_one_waste_card() {
    let (run, mut events) = start(
        GameConfig::default(),
        &[(diamond_field(&[]), vec![1, 2, 3, 4, 5])],
    );
    let events = drain(&mut events);
    assert!(matches!(
        events[0],
        Event::RoundStarted {
            round: 1,
            time_budget_ms: 90_000,
            multiplier_tenths: 10,
            stock: 4,
        }
    ));
    let revealed: Vec<SlotId> = events
        .iter()
        .filter_map(|event| match event {
            Event::CardRevealed { slot, .. } => Some(*slot),
            _ => None,
        })
        .collect();
    assert_eq!(revealed, vec![SlotId(8), SlotId(17), SlotId(26)]);
    assert_eq!(run.phase(), Phase::Playing);
    let round = run.round().expect("round");
    assert_eq!(round.piles.waste_top(), Some(card(5)));
    assert_eq!(round.piles.stock_len(), 4);
}

#[test]
fn apex_stays_covered_until_both_children_are_gone() {
    let mut config = single_round();
    config.layout = LayoutRule {
        peaks: 1,
        rows: vec![1, 2],
    };
    let (mut run, mut events) = start(config, &[(vec![6, 4, 5], vec![5, 6, 7])]);
    drain(&mut events);

    let err = run
        .select_card(SelectTarget::Slot(SlotId(0)), &mut events)
        .unwrap_err();
    assert_eq!(err, RunError::Rejected(RejectReason::Covered));
    assert!(drain(&mut events).contains(&Event::SelectionRejected {
        target: CardSource::Slot(SlotId(0)),
        reason: RejectReason::Covered,
    }));

    let outcome = run
        .select_card(SelectTarget::Slot(SlotId(1)), &mut events)
        .expect("select left child");
    assert_eq!(outcome, SelectOutcome::Pending { sum: 4 });
    let outcome = run
        .select_card(SelectTarget::WasteTop, &mut events)
        .expect("select waste");
    assert_eq!(outcome, SelectOutcome::Combo { cards: 2, points: 12 });
    let round = run.round().expect("round");
    assert!(round.board.is_covered(SlotId(0)));
    assert_eq!(round.piles.waste_top(), Some(card(6)));

    run.select_card(SelectTarget::Slot(SlotId(2)), &mut events)
        .expect("select right child");
    let outcome = run
        .select_card(SelectTarget::WasteTop, &mut events)
        .expect("select waste");
    assert_eq!(outcome, SelectOutcome::Combo { cards: 2, points: 14 });
    assert!(!run.round().expect("round").board.is_covered(SlotId(0)));
    assert!(drain(&mut events).contains(&Event::CardRevealed {
        slot: SlotId(0),
        value: card(6),
    }));
    assert_eq!(run.phase(), Phase::Playing);

    run.select_card(SelectTarget::Slot(SlotId(0)), &mut events)
        .expect("select apex");
    let outcome = run
        .select_card(SelectTarget::WasteTop, &mut events)
        .expect("select waste");
    assert_eq!(outcome, SelectOutcome::Combo { cards: 2, points: 16 });

    let events = drain(&mut events);
    assert!(events.contains(&Event::PeakCleared { peak: 0, bonus: 50 }));
    assert!(events.contains(&Event::StockExhausted));
    assert_eq!(run.phase(), Phase::MatchOver);
    let summary = &run.state.history[0];
    assert_eq!(summary.outcome, RoundOutcome::Won);
    // 12 + 14 + 16 combos, 50 peak, 100 win, 90s left at 5 per second.
    assert_eq!(summary.score, 642);
    assert_eq!(run.state.total_score, 642);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::MatchEnded { total_score: 642, .. })));
}

#[test]
fn overshoot_costs_a_flat_penalty_floored_at_zero() {
    let field = diamond_field(&[(8, 9), (17, 8), (26, 7)]);
    let (mut run, mut events) = start(single_round(), &[(field, vec![5, 5, 5, 2])]);

    run.select_card(SelectTarget::Slot(SlotId(8)), &mut events)
        .expect("select");
    run.select_card(SelectTarget::WasteTop, &mut events)
        .expect("select waste");
    assert_eq!(round_score(&run), 12);

    run.select_card(SelectTarget::Slot(SlotId(17)), &mut events)
        .expect("select");
    let outcome = run
        .select_card(SelectTarget::Slot(SlotId(26)), &mut events)
        .expect("select");
    assert_eq!(outcome, SelectOutcome::Overshoot { sum: 15, penalty: 5 });
    assert_eq!(round_score(&run), 7);
    let round = run.round().expect("round");
    assert!(round.selection.is_empty());
    assert!(round.board.is_selectable(SlotId(17)));
    assert!(round.board.is_selectable(SlotId(26)));

    for expected in [5, 2] {
        run.select_card(SelectTarget::Slot(SlotId(17)), &mut events)
            .expect("select");
        let outcome = run
            .select_card(SelectTarget::Slot(SlotId(26)), &mut events)
            .expect("select");
        assert_eq!(
            outcome,
            SelectOutcome::Overshoot {
                sum: 15,
                penalty: expected
            }
        );
    }
    assert_eq!(round_score(&run), 0);
    // Overshooting leaves the streak alone.
    assert_eq!(run.round().expect("round").score.streak, 1);
}

#[test]
fn round_four_scales_combos_but_not_penalties() {
    let field = diamond_field(&[(8, 9), (17, 8), (26, 7)]);
    let plans: Vec<(Vec<u8>, Vec<u8>)> = (0..4).map(|_| (field.clone(), vec![5, 5, 5, 2])).collect();
    let (mut run, mut events) = start(GameConfig::default(), &plans);

    for now in [90_000, 175_000, 255_000] {
        run.tick(now, &mut events);
    }
    assert_eq!(run.state.round, 4);
    assert_eq!(run.state.history.len(), 3);
    assert!(run
        .state
        .history
        .iter()
        .all(|summary| summary.outcome == RoundOutcome::TimeExpired));
    assert_eq!(run.round().expect("round").clock.budget_ms(), 75_000);

    run.select_card(SelectTarget::Slot(SlotId(8)), &mut events)
        .expect("select");
    let outcome = run
        .select_card(SelectTarget::WasteTop, &mut events)
        .expect("select waste");
    assert_eq!(outcome, SelectOutcome::Combo { cards: 2, points: 22 });

    run.select_card(SelectTarget::Slot(SlotId(17)), &mut events)
        .expect("select");
    let outcome = run
        .select_card(SelectTarget::Slot(SlotId(26)), &mut events)
        .expect("select");
    assert_eq!(outcome, SelectOutcome::Overshoot { sum: 15, penalty: 5 });
    assert_eq!(round_score(&run), 17);
}

#[test]
fn manual_draw_refills_one_slot_and_breaks_the_streak() {
    let field = diamond_field(&[(8, 5), (17, 6)]);
    let (mut run, mut events) = start(single_round(), &[(field, vec![4, 9, 3])]);

    run.select_card(SelectTarget::Slot(SlotId(8)), &mut events)
        .expect("select");
    run.select_card(SelectTarget::Slot(SlotId(17)), &mut events)
        .expect("select");
    assert_eq!(run.round().expect("round").board.removed_count(), 2);
    assert_eq!(run.round().expect("round").score.streak, 1);
    drain(&mut events);

    let outcome = run.draw_from_stock(&mut events).expect("draw");
    assert_eq!(
        outcome,
        DrawOutcome::Drawn {
            card: card(9),
            refilled: Some(SlotId(8)),
        }
    );
    let round = run.round().expect("round");
    assert_eq!(round.board.removed_count(), 1);
    assert_eq!(round.board.slot(SlotId(8)).expect("slot").card(), Some(card(3)));
    assert!(round.board.is_covered(SlotId(6)));
    assert_eq!(round.score.streak, 0);
    assert_eq!(round.piles.waste_top(), Some(card(9)));
    let drained = drain(&mut events);
    assert!(drained.contains(&Event::SlotRefilled {
        slot: SlotId(8),
        value: card(3),
    }));
    assert!(drained.contains(&Event::CardCovered { slot: SlotId(6) }));

    // Last stock card: the open cards 3, 9, 10 and waste 4 make no pair.
    let outcome = run.draw_from_stock(&mut events).expect("draw");
    assert_eq!(outcome.refilled(), Some(SlotId(17)));
    assert_eq!(run.state.history[0].outcome, RoundOutcome::Stalemate);
    assert_eq!(run.phase(), Phase::MatchOver);
}

#[test]
fn drawing_the_last_card_reruns_the_stalemate_check() {
    let field = diamond_field(&[(8, 1), (17, 1), (26, 1)]);
    let (mut run, mut events) = start(single_round(), &[(field.clone(), vec![10, 3])]);
    run.draw_from_stock(&mut events).expect("draw");
    assert_eq!(run.phase(), Phase::Playing);
    assert_eq!(run.hint().expect("hint").slots.len(), 1);

    let (mut run, mut events) = start(single_round(), &[(field, vec![9, 3])]);
    run.draw_from_stock(&mut events).expect("draw");
    assert_eq!(run.phase(), Phase::MatchOver);
    assert_eq!(run.state.history[0].outcome, RoundOutcome::Stalemate);
    assert_eq!(run.state.history[0].stock_remaining, 0);
}

#[test]
fn stalemate_rule_decides_whether_triples_count() {
    let field = diamond_field(&[(8, 2), (17, 4), (26, 5)]);

    let (run, _) = start(single_round(), &[(field.clone(), vec![1])]);
    assert_eq!(run.state.history[0].outcome, RoundOutcome::Stalemate);

    let mut config = single_round();
    config.stalemate = StalemateRule::AnyCombination;
    let (mut run, mut events) = start(config, &[(field, vec![1])]);
    assert_eq!(run.phase(), Phase::Playing);
    for slot in [8, 17] {
        run.select_card(SelectTarget::Slot(SlotId(slot)), &mut events)
            .expect("select");
    }
    let outcome = run
        .select_card(SelectTarget::Slot(SlotId(26)), &mut events)
        .expect("select");
    assert_eq!(outcome, SelectOutcome::Combo { cards: 3, points: 16 });
}

#[test]
fn empty_stock_and_waste_ends_the_round() {
    let field = diamond_field(&[(8, 4)]);
    let (mut run, mut events) = start(single_round(), &[(field, vec![7])]);
    assert_eq!(run.phase(), Phase::Playing);

    run.select_card(SelectTarget::Slot(SlotId(8)), &mut events)
        .expect("select");
    run.select_card(SelectTarget::WasteTop, &mut events)
        .expect("select waste");
    assert_eq!(run.phase(), Phase::MatchOver);
    let summary = &run.state.history[0];
    assert_eq!(summary.outcome, RoundOutcome::Exhausted);
    assert_eq!(summary.score, 12);
}

#[test]
fn timer_expiry_ends_the_round_exactly_once() {
    let (mut run, mut events) = start(
        single_round(),
        &[(diamond_field(&[]), vec![1, 2, 3])],
    );
    assert_eq!(run.tick(89_999, &mut events), Some(1));
    assert_eq!(run.phase(), Phase::Playing);
    assert_eq!(run.tick(90_050, &mut events), Some(0));
    assert_eq!(run.tick(95_000, &mut events), None);

    let events = drain(&mut events);
    let ended = events
        .iter()
        .filter(|event| matches!(event, Event::RoundEnded { .. }))
        .count();
    assert_eq!(ended, 1);
    let summary = &run.state.history[0];
    assert_eq!(summary.outcome, RoundOutcome::TimeExpired);
    assert_eq!(summary.elapsed_ms, 90_000);
}

#[test]
fn intents_after_match_over_are_rejected_until_restart() {
    let (mut run, mut events) = start(
        single_round(),
        &[(diamond_field(&[]), vec![1, 2, 3])],
    );
    run.tick(90_000, &mut events);
    assert!(run.is_over());
    assert_eq!(
        run.select_card(SelectTarget::Slot(SlotId(8)), &mut events),
        Err(RunError::MatchOver)
    );
    assert_eq!(run.draw_from_stock(&mut events), Err(RunError::MatchOver));
    assert_eq!(run.cancel_selection(&mut events), Err(RunError::MatchOver));

    run.restart_match(&mut events);
    assert_eq!(run.phase(), Phase::Playing);
    assert_eq!(run.state.round, 1);
    assert_eq!(run.state.total_score, 0);
    assert!(run.state.history.is_empty());
    let round = run.round().expect("round");
    assert_eq!(round.clock.remaining_ms(), 90_000);
}

#[test]
fn round_seven_win_bonus_is_scaled_once() {
    let mut config = GameConfig::default();
    config.layout = LayoutRule {
        peaks: 1,
        rows: vec![1],
    };
    let plans: Vec<(Vec<u8>, Vec<u8>)> = (0..7).map(|_| (vec![5], vec![6])).collect();
    let (mut run, mut events) = start(config, &plans);
    for now in [90_000, 175_000, 255_000, 330_000, 400_000, 465_000] {
        run.tick(now, &mut events);
    }
    assert_eq!(run.state.round, 7);
    assert_eq!(run.round().expect("round").score.multiplier.tenths(), 28);
    drain(&mut events);

    run.select_card(SelectTarget::Slot(SlotId(0)), &mut events)
        .expect("select");
    run.select_card(SelectTarget::WasteTop, &mut events)
        .expect("select waste");

    let events = drain(&mut events);
    let bonuses: Vec<EndBonus> = events
        .iter()
        .filter_map(|event| match event {
            Event::RoundEnded { bonus, .. } => Some(*bonus),
            _ => None,
        })
        .collect();
    assert_eq!(
        bonuses,
        vec![EndBonus {
            win: 280,
            time: 840,
            stock: 0,
        }]
    );
    assert!(events.contains(&Event::PeakCleared { peak: 0, bonus: 140 }));
    // 33 combo + 140 peak + 280 win + 840 time.
    assert_eq!(run.state.history[6].score, 1293);
    assert_eq!(run.state.total_score, 1293);
    assert!(run.is_over());
}

#[test]
fn waste_selection_must_be_the_top_card() {
    let (mut run, mut events) = start(
        single_round(),
        &[(diamond_field(&[]), vec![1, 2, 3])],
    );
    run.draw_from_stock(&mut events).expect("draw");
    drain(&mut events);

    assert_eq!(
        run.select_card(SelectTarget::Waste(0), &mut events),
        Err(RunError::Rejected(RejectReason::NotTopOfWaste))
    );
    assert_eq!(
        run.select_card(SelectTarget::Waste(1), &mut events),
        Ok(SelectOutcome::Pending { sum: 2 })
    );
    assert_eq!(
        run.select_card(SelectTarget::WasteTop, &mut events),
        Ok(SelectOutcome::Deselected)
    );
    assert_eq!(
        run.select_card(SelectTarget::Waste(usize::MAX), &mut events),
        Err(RunError::Rejected(RejectReason::NotTopOfWaste))
    );
    assert!(drain(&mut events).contains(&Event::SelectionRejected {
        target: CardSource::Waste,
        reason: RejectReason::NotTopOfWaste,
    }));
}

#[test]
fn clearing_the_field_with_the_waste_top_keeps_the_stock_for_the_bonus() {
    let mut config = single_round();
    config.layout = LayoutRule {
        peaks: 1,
        rows: vec![1],
    };
    let (mut run, mut events) = start(config, &[(vec![5], vec![3, 4, 6])]);
    assert_eq!(run.round().expect("round").piles.stock_len(), 2);
    drain(&mut events);

    run.select_card(SelectTarget::Slot(SlotId(0)), &mut events)
        .expect("select");
    run.select_card(SelectTarget::WasteTop, &mut events)
        .expect("select waste");

    let events = drain(&mut events);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::CardDrawn { .. })));
    let (bonus, summary) = events
        .iter()
        .find_map(|event| match event {
            Event::RoundEnded { bonus, summary, .. } => Some((*bonus, summary.clone())),
            _ => None,
        })
        .expect("round ended");
    assert_eq!(summary.outcome, RoundOutcome::Won);
    assert_eq!(summary.stock_remaining, 2);
    assert_eq!(
        bonus,
        EndBonus {
            win: 100,
            time: 450,
            stock: 20,
        }
    );
}

#[test]
fn reselecting_a_slot_deselects_it_and_draw_clears_selection() {
    let (mut run, mut events) = start(
        single_round(),
        &[(diamond_field(&[(8, 3)]), vec![1, 2, 3])],
    );
    run.select_card(SelectTarget::Slot(SlotId(8)), &mut events)
        .expect("select");
    assert_eq!(run.selection_sum(), 3);
    assert_eq!(
        run.select_card(SelectTarget::Slot(SlotId(8)), &mut events),
        Ok(SelectOutcome::Deselected)
    );
    run.select_card(SelectTarget::Slot(SlotId(8)), &mut events)
        .expect("select");
    run.draw_from_stock(&mut events).expect("draw");
    assert!(run.round().expect("round").selection.is_empty());
    assert_eq!(run.selection_sum(), 0);
}

#[test]
fn removed_slots_cannot_be_selected() {
    let field = diamond_field(&[(8, 5), (17, 6)]);
    let (mut run, mut events) = start(single_round(), &[(field, vec![4, 9, 3])]);
    run.select_card(SelectTarget::Slot(SlotId(8)), &mut events)
        .expect("select");
    run.select_card(SelectTarget::Slot(SlotId(17)), &mut events)
        .expect("select");
    assert_eq!(
        run.select_card(SelectTarget::Slot(SlotId(8)), &mut events),
        Err(RunError::Rejected(RejectReason::Removed))
    );
}

#[test]
fn manual_advance_rests_in_round_ending() {
    let mut config = GameConfig::default();
    config.auto_deal_next_round = false;
    let (mut run, mut events) = start(config, &[(diamond_field(&[]), vec![1, 2, 3])]);
    run.tick(90_000, &mut events);
    assert_eq!(run.phase(), Phase::RoundEnding);
    assert_eq!(run.tick(120_000, &mut events), None);
    assert_eq!(
        run.draw_from_stock(&mut events),
        Err(RunError::InvalidPhase(Phase::RoundEnding))
    );

    run.next_round(&mut events).expect("next round");
    assert_eq!(run.state.round, 2);
    let round = run.round().expect("round");
    assert_eq!(round.clock.budget_ms(), 85_000);
    assert_eq!(round.clock.remaining_ms(), 85_000);
}

#[test]
fn seeded_random_deals_are_reproducible() {
    let deal = |seed: u64| {
        let mut run = RunState::new(GameConfig::default(), seed);
        let mut events = EventBus::default();
        run.start_match(0, &mut events).expect("start");
        run.snapshot().expect("snapshot")
    };
    let first = deal(99);
    assert_eq!(first, deal(99));
    assert_eq!(first.slots.len(), 27);
    assert_eq!(first.stock_len, 23);
    assert!(first.slots.iter().all(|slot| slot.value.is_some()));
}

#[test]
fn snapshot_is_plain_json() {
    let (run, _) = start(single_round(), &[(diamond_field(&[]), vec![1, 2, 3])]);
    let snapshot = run.snapshot().expect("snapshot");
    let raw = serde_json::to_string(&snapshot).expect("serialize");
    let back: eleven_core::RoundSnapshot = serde_json::from_str(&raw).expect("deserialize");
    assert_eq!(back, snapshot);
    assert_eq!(back.waste_top, Some(card(3)));
}

#[test]
fn queued_plan_must_fill_every_slot() {
    let mut run = RunState::new(GameConfig::default(), 1);
    let plan = DealPlan::from_values(&[1, 2, 3], &[4]).expect("plan");
    assert!(matches!(run.queue_deal(plan), Err(RunError::InvalidDeal(_))));
    assert!(DealPlan::from_values(&[11], &[]).is_err());
}

#[test]
fn start_match_only_once() {
    let (mut run, mut events) = start(single_round(), &[(diamond_field(&[]), vec![1, 2, 3])]);
    assert_eq!(
        run.start_match(10, &mut events),
        Err(RunError::AlreadyStarted)
    );
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "unknown slot")]
fn selecting_an_unknown_slot_is_a_caller_bug() {
    let (mut run, mut events) = start(single_round(), &[(diamond_field(&[]), vec![1, 2, 3])]);
    let _ = run.select_card(SelectTarget::Slot(SlotId(99)), &mut events);
}
