//! Fixed catalog of tradable stocks.
//!
//! The catalog is keyed by the normalized (trimmed, uppercased) symbol, and
//! every lookup normalizes its input the same way.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub symbol: String,
    pub company_name: String,
    pub unit_price: Decimal,
}

impl CatalogEntry {
    pub fn new(symbol: &str, company_name: &str, unit_price: Decimal) -> Self {
        CatalogEntry {
            symbol: normalize_symbol(symbol),
            company_name: company_name.to_string(),
            unit_price,
        }
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.symbol.clone(), entry))
            .collect();
        Catalog { entries }
    }

    pub fn lookup(&self, symbol: &str) -> Option<&CatalogEntry> {
        self.entries.get(&normalize_symbol(symbol))
    }

    /// Symbol and company name of every entry, ordered by symbol.
    pub fn list_all(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|e| (e.symbol.as_str(), e.company_name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new([
            CatalogEntry::new("AAPL", "Apple Inc.", dec!(175.30)),
            CatalogEntry::new("TSLA", "Tesla Inc.", dec!(205.50)),
            CatalogEntry::new("AMZN", "Amazon.com Inc.", dec!(145.75)),
            CatalogEntry::new("MSFT", "Microsoft Corporation", dec!(320.90)),
            CatalogEntry::new("GOOGL", "Alphabet Inc. (Google)", dec!(132.40)),
            CatalogEntry::new("NFLX", "Netflix Inc.", dec!(412.15)),
            CatalogEntry::new("META", "Meta (Facebook)", dec!(278.55)),
            CatalogEntry::new("NVDA", "NVIDIA Corporation", dec!(460.25)),
        ])
    }
}
