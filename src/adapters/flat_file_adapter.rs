//! Flat-file holdings adapter.
//!
//! One lot per line, `symbol,companyName,purchasePrice,quantity`, no header
//! and no quoting. A company name containing a comma cannot be stored: it
//! encodes to five fields and the line is skipped on the next load.

use crate::domain::catalog::normalize_symbol;
use crate::domain::error::TraderError;
use crate::domain::lot::Lot;
use crate::ports::holdings_port::HoldingsPort;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;

pub const FIELD_COUNT: usize = 4;

#[cfg(windows)]
const LINE_TERMINATOR: csv::Terminator = csv::Terminator::CRLF;
#[cfg(not(windows))]
const LINE_TERMINATOR: csv::Terminator = csv::Terminator::Any(b'\n');

pub struct FlatFileAdapter {
    path: PathBuf,
}

impl FlatFileAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, action: &str, e: io::Error) -> TraderError {
        TraderError::Storage {
            path: self.path.display().to_string(),
            reason: format!("{action}: {e}"),
        }
    }
}

impl HoldingsPort for FlatFileAdapter {
    fn load(&self) -> Result<Vec<Lot>, TraderError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} not found, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.storage_error("failed to open", e)),
        };
        decode(file).map_err(|e| self.storage_error("failed to read", e))
    }

    fn save(&self, lots: &[Lot]) -> Result<(), TraderError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|e| self.storage_error("failed to create", e))?;
        encode(lots, &mut tmp).map_err(|e| self.storage_error("failed to write", e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| self.storage_error("failed to sync", e))?;
        // The temp file is created 0600; an existing portfolio keeps its mode.
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| self.storage_error("failed to set permissions", e))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| self.storage_error("failed to replace", e.error))?;

        debug!("saved {} lots to {}", lots.len(), self.path.display());
        Ok(())
    }
}

/// Writes every lot as one line, in order.
pub fn encode<W: io::Write>(lots: &[Lot], writer: W) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(LINE_TERMINATOR)
        .from_writer(writer);

    for lot in lots {
        let price = lot.purchase_price.to_string();
        let quantity = lot.quantity.to_string();
        wtr.write_record([
            lot.symbol.as_str(),
            lot.company_name.as_str(),
            price.as_str(),
            quantity.as_str(),
        ])?;
    }
    wtr.flush()
}

/// Reads lots in file order. Malformed lines are logged and skipped; only
/// an I/O failure aborts the read.
pub fn decode<R: io::Read>(reader: R) -> io::Result<Vec<Lot>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut lots = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("skipping unreadable line: {e}");
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());

        match parse_lot(&record) {
            Ok(lot) => lots.push(lot),
            Err(reason) => warn!("skipping line {line}: {reason}"),
        }
    }
    Ok(lots)
}

fn parse_lot(record: &csv::StringRecord) -> Result<Lot, String> {
    // Trailing empty fields are ignored, so `AAPL,Apple Inc.,175.30,10,` loads.
    let fields: Vec<&str> = record.iter().collect();
    let end = fields.iter().rposition(|f| !f.is_empty()).map_or(0, |i| i + 1);
    let fields = &fields[..end];
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        ));
    }

    let price_str = fields[2];
    let purchase_price = parse_price(price_str)
        .ok_or_else(|| format!("invalid price value: {price_str:?}"))?;

    let quantity_str = fields[3];
    let quantity: u32 = quantity_str
        .parse()
        .map_err(|e| format!("invalid quantity value {quantity_str:?}: {e}"))?;
    if quantity == 0 {
        return Err("quantity must be at least 1".into());
    }

    Ok(Lot {
        symbol: normalize_symbol(fields[0]),
        company_name: fields[1].to_string(),
        purchase_price,
        quantity,
    })
}

fn parse_price(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .filter(|p| !p.is_sign_negative())
}
