use crate::{Card, RngState, StockRule, MAX_VALUE, MIN_VALUE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stock and waste for one round. Both are stacks; the last element is the top.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Piles {
    pub stock: Vec<Card>,
    pub waste: Vec<Card>,
}

impl Piles {
    pub fn new(stock: Vec<Card>) -> Self {
        Self {
            stock,
            waste: Vec::new(),
        }
    }

    /// Moves the stock top onto the waste pile.
    pub fn draw_to_waste(&mut self) -> Option<Card> {
        let card = self.stock.pop()?;
        self.waste.push(card);
        Some(card)
    }

    pub fn waste_top(&self) -> Option<Card> {
        self.waste.last().copied()
    }

    pub fn pop_waste(&mut self) -> Option<Card> {
        self.waste.pop()
    }

    pub fn stock_len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.stock.is_empty() && self.waste.is_empty()
    }
}

pub fn random_card(rng: &mut RngState) -> Card {
    let value = rng.range_inclusive(MIN_VALUE, MAX_VALUE);
    Card::new(value).unwrap_or(Card::ACE)
}

/// Complements of the dealt values, each repeated by its clamped weight.
pub fn complement_pool(field: &[Card], rule: &StockRule) -> Vec<Card> {
    let mut frequency: BTreeMap<Card, u32> = BTreeMap::new();
    for card in field {
        *frequency.entry(*card).or_insert(0) += 1;
    }
    let mut pool = Vec::new();
    for (card, count) in frequency {
        let weight = rule.weight_for(count) as usize;
        pool.extend(std::iter::repeat(card.complement()).take(weight));
    }
    pool
}

/// Builds a stock leaning towards cards that pair with the field. This is a
/// bias only; it does not make the round solvable.
pub fn biased_stock(field: &[Card], rule: &StockRule, rng: &mut RngState) -> Vec<Card> {
    let pool = complement_pool(field, rule);
    (0..rule.size)
        .map(|_| {
            if rng.chance(rule.bias_percent) {
                if let Some(card) = rng.pick(&pool) {
                    return *card;
                }
            }
            random_card(rng)
        })
        .collect()
}
