use crate::{sum_values, Card, SlotId, StalemateRule, TARGET_SUM};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    Incomplete,
    Exact,
    Over,
}

pub fn evaluate(cards: impl IntoIterator<Item = Card>) -> Evaluation {
    let sum = sum_values(cards);
    if sum == TARGET_SUM {
        Evaluation::Exact
    } else if sum > TARGET_SUM {
        Evaluation::Over
    } else {
        Evaluation::Incomplete
    }
}

/// A set of currently playable cards that sums to 11.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Combo {
    pub slots: Vec<SlotId>,
    pub waste: bool,
}

pub fn find_combo(
    rule: StalemateRule,
    field: &[(SlotId, Card)],
    waste_top: Option<Card>,
) -> Option<Combo> {
    match rule {
        StalemateRule::Pairs => find_pair(field, waste_top),
        StalemateRule::AnyCombination => find_any_combination(field, waste_top),
    }
}

pub fn find_pair(field: &[(SlotId, Card)], waste_top: Option<Card>) -> Option<Combo> {
    if let Some(top) = waste_top {
        if let Some((id, _)) = field.iter().find(|(_, card)| *card == top.complement()) {
            return Some(Combo {
                slots: vec![*id],
                waste: true,
            });
        }
    }
    for (idx, (left, left_card)) in field.iter().enumerate() {
        for (right, right_card) in &field[idx + 1..] {
            if sum_values([*left_card, *right_card]) == TARGET_SUM {
                return Some(Combo {
                    slots: vec![*left, *right],
                    waste: false,
                });
            }
        }
    }
    None
}

/// Subset-sum over the field plus the optional waste top.
pub fn find_any_combination(field: &[(SlotId, Card)], waste_top: Option<Card>) -> Option<Combo> {
    let target = TARGET_SUM as usize;
    let mut items: Vec<(Option<SlotId>, usize)> = Vec::with_capacity(field.len() + 1);
    if let Some(top) = waste_top {
        items.push((None, top.value() as usize));
    }
    items.extend(field.iter().map(|(id, card)| (Some(*id), card.value() as usize)));

    // reach[i][s]: some subset of the first i items sums to s.
    let mut reach = vec![vec![false; target + 1]; items.len() + 1];
    reach[0][0] = true;
    for (idx, (_, value)) in items.iter().enumerate() {
        for sum in 0..=target {
            reach[idx + 1][sum] = reach[idx][sum] || (sum >= *value && reach[idx][sum - value]);
        }
    }
    if !reach[items.len()][target] {
        return None;
    }

    let mut combo = Combo::default();
    let mut sum = target;
    for idx in (0..items.len()).rev() {
        if sum == 0 {
            break;
        }
        if reach[idx][sum] {
            continue;
        }
        let (id, value) = items[idx];
        match id {
            Some(id) => combo.slots.push(id),
            None => combo.waste = true,
        }
        sum -= value;
    }
    combo.slots.reverse();
    Some(combo)
}
