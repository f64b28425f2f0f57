//! Buy and sell operations over a trading session.
//!
//! A [`Trader`] owns the catalog, the holdings store and the persistence
//! port. Every successful mutation is followed by a full save; a failed
//! save is reported on the receipt and never rolls back the in-memory
//! state, which stays authoritative for the rest of the session.

use log::{debug, warn};
use rust_decimal::Decimal;

use super::catalog::{normalize_symbol, Catalog};
use super::error::TraderError;
use super::holdings::{Holdings, Reduction};
use super::lot::Lot;
use crate::ports::holdings_port::HoldingsPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Bought,
    SoldAll,
    SoldPartial { remaining: u32 },
}

#[derive(Debug)]
pub struct TradeReceipt {
    pub kind: TradeKind,
    pub symbol: String,
    pub company_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    /// Set when the trade applied in memory but could not be persisted.
    pub save_error: Option<TraderError>,
}

pub struct Trader<S: HoldingsPort> {
    catalog: Catalog,
    holdings: Holdings,
    store: S,
}

/// Converts a requested share count into a lot quantity, rejecting zero,
/// negative and out-of-range requests.
pub fn validate_quantity(quantity: i64) -> Result<u32, TraderError> {
    u32::try_from(quantity)
        .ok()
        .filter(|&q| q > 0)
        .ok_or(TraderError::InvalidQuantity { quantity })
}

impl<S: HoldingsPort> Trader<S> {
    /// Starts a session with an empty store. Call [`Trader::load`] to read
    /// persisted holdings.
    pub fn new(catalog: Catalog, store: S) -> Self {
        Trader {
            catalog,
            holdings: Holdings::new(),
            store,
        }
    }

    /// Replaces the in-memory holdings with the persisted ones and returns
    /// how many lots were loaded. On error the session keeps its current
    /// holdings.
    pub fn load(&mut self) -> Result<usize, TraderError> {
        let lots = self.store.load()?;
        self.holdings = Holdings::from_lots(lots);
        debug!("loaded {} lots", self.holdings.len());
        Ok(self.holdings.len())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn holdings(&self) -> &Holdings {
        &self.holdings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lots for display, or `None` when nothing is held.
    pub fn view_portfolio(&self) -> Option<&[Lot]> {
        if self.holdings.is_empty() {
            None
        } else {
            Some(self.holdings.lots())
        }
    }

    /// Appends a new lot priced from the catalog.
    pub fn buy(&mut self, symbol: &str, quantity: i64) -> Result<TradeReceipt, TraderError> {
        let entry = self
            .catalog
            .lookup(symbol)
            .ok_or_else(|| TraderError::InvalidSymbol {
                symbol: normalize_symbol(symbol),
            })?;
        let quantity = validate_quantity(quantity)?;

        let lot = Lot {
            symbol: entry.symbol.clone(),
            company_name: entry.company_name.clone(),
            purchase_price: entry.unit_price,
            quantity,
        };
        let mut receipt = TradeReceipt {
            kind: TradeKind::Bought,
            symbol: lot.symbol.clone(),
            company_name: lot.company_name.clone(),
            unit_price: lot.purchase_price,
            quantity,
            save_error: None,
        };
        self.holdings.push(lot);
        debug!("bought {} {}", quantity, receipt.symbol);

        receipt.save_error = self.persist();
        Ok(receipt)
    }

    /// Sells from the first lot held for `symbol`. A quantity at or above
    /// that lot's size closes it; later lots of the same symbol are left
    /// untouched.
    pub fn sell(&mut self, symbol: &str, quantity: i64) -> Result<TradeReceipt, TraderError> {
        if self.holdings.is_empty() {
            return Err(TraderError::EmptyPortfolio);
        }
        let symbol = normalize_symbol(symbol);
        if !self.holdings.holds(&symbol) {
            return Err(TraderError::NotHeld { symbol });
        }
        let quantity = validate_quantity(quantity)?;

        let (kind, lot, sold) = match self.holdings.reduce_first(&symbol, quantity) {
            Some(Reduction::Closed(lot)) => {
                let sold = lot.quantity;
                (TradeKind::SoldAll, lot, sold)
            }
            Some(Reduction::Reduced { lot, remaining }) => {
                (TradeKind::SoldPartial { remaining }, lot, quantity)
            }
            None => return Err(TraderError::NotHeld { symbol }),
        };
        debug!("sold {} {} ({:?})", sold, symbol, kind);

        Ok(TradeReceipt {
            kind,
            symbol: lot.symbol,
            company_name: lot.company_name,
            unit_price: lot.purchase_price,
            quantity: sold,
            save_error: self.persist(),
        })
    }

    fn persist(&self) -> Option<TraderError> {
        match self.store.save(self.holdings.lots()) {
            Ok(()) => None,
            Err(e) => {
                warn!("portfolio not saved: {e}");
                Some(e)
            }
        }
    }
}
