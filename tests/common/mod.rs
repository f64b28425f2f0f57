#![allow(dead_code)]

use rust_decimal::Decimal;
use std::cell::{Cell, RefCell};
use stocktrader::domain::catalog::Catalog;
use stocktrader::domain::error::TraderError;
pub use stocktrader::domain::lot::Lot;
use stocktrader::domain::trading::Trader;
use stocktrader::ports::holdings_port::HoldingsPort;

/// In-memory holdings store that records every save.
pub struct MemoryHoldingsPort {
    pub stored: RefCell<Vec<Lot>>,
    pub saves: Cell<usize>,
    pub fail_saves: Cell<bool>,
    pub load_error: Option<String>,
}

impl MemoryHoldingsPort {
    pub fn new() -> Self {
        Self {
            stored: RefCell::new(Vec::new()),
            saves: Cell::new(0),
            fail_saves: Cell::new(false),
            load_error: None,
        }
    }

    pub fn with_lots(self, lots: Vec<Lot>) -> Self {
        *self.stored.borrow_mut() = lots;
        self
    }

    pub fn with_load_error(mut self, reason: &str) -> Self {
        self.load_error = Some(reason.to_string());
        self
    }
}

impl HoldingsPort for MemoryHoldingsPort {
    fn load(&self) -> Result<Vec<Lot>, TraderError> {
        if let Some(reason) = &self.load_error {
            return Err(TraderError::Storage {
                path: "memory".into(),
                reason: reason.clone(),
            });
        }
        Ok(self.stored.borrow().clone())
    }

    fn save(&self, lots: &[Lot]) -> Result<(), TraderError> {
        if self.fail_saves.get() {
            return Err(TraderError::Io(std::io::Error::other("disk full")));
        }
        *self.stored.borrow_mut() = lots.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

pub fn make_trader() -> Trader<MemoryHoldingsPort> {
    Trader::new(Catalog::default(), MemoryHoldingsPort::new())
}

pub fn make_lot(symbol: &str, company: &str, price: Decimal, quantity: u32) -> Lot {
    Lot {
        symbol: symbol.to_string(),
        company_name: company.to_string(),
        purchase_price: price,
        quantity,
    }
}

/// Symbol and quantity of each held lot, in order.
pub fn summary(trader: &Trader<MemoryHoldingsPort>) -> Vec<(String, u32)> {
    trader
        .holdings()
        .lots()
        .iter()
        .map(|lot| (lot.symbol.clone(), lot.quantity))
        .collect()
}
