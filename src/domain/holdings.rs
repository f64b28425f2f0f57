//! Holdings store: the user's lots in insertion order.

use super::catalog::normalize_symbol;
use super::lot::Lot;

/// Result of removing shares from the first lot matching a symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    /// The whole lot was removed.
    Closed(Lot),
    /// The lot stays with `remaining` shares.
    Reduced { lot: Lot, remaining: u32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Holdings {
    lots: Vec<Lot>,
}

impl Holdings {
    pub fn new() -> Self {
        Holdings { lots: Vec::new() }
    }

    /// Builds a store from decoded lots, dropping any with zero quantity.
    pub fn from_lots(lots: Vec<Lot>) -> Self {
        Holdings {
            lots: lots.into_iter().filter(|lot| lot.quantity > 0).collect(),
        }
    }

    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Appends a lot. Same-symbol lots are never merged.
    pub fn push(&mut self, lot: Lot) {
        debug_assert!(lot.quantity > 0);
        self.lots.push(lot);
    }

    /// Index of the first lot held for `symbol`, in insertion order.
    pub fn position(&self, symbol: &str) -> Option<usize> {
        let symbol = normalize_symbol(symbol);
        self.lots.iter().position(|lot| lot.symbol == symbol)
    }

    pub fn holds(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }

    /// Takes up to `quantity` shares from the first lot matching `symbol`.
    ///
    /// Only that lot is touched: a request larger than the lot closes it and
    /// the excess is not drawn from later lots of the same symbol.
    pub fn reduce_first(&mut self, symbol: &str, quantity: u32) -> Option<Reduction> {
        let index = self.position(symbol)?;
        if quantity >= self.lots[index].quantity {
            return Some(Reduction::Closed(self.lots.remove(index)));
        }
        let lot = &mut self.lots[index];
        lot.quantity -= quantity;
        Some(Reduction::Reduced {
            lot: lot.clone(),
            remaining: lot.quantity,
        })
    }
}
