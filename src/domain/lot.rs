//! A single purchase record.

use rust_decimal::Decimal;
use std::fmt;

/// Shares of one symbol bought at one price. Quantity is always at least 1
/// while the lot is held.
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    pub symbol: String,
    pub company_name: String,
    pub purchase_price: Decimal,
    pub quantity: u32,
}

impl fmt::Display for Lot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} | Price: ${} | Quantity: {}",
            self.symbol, self.company_name, self.purchase_price, self.quantity
        )
    }
}
