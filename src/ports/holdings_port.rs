//! Holdings persistence port trait.

use crate::domain::error::TraderError;
use crate::domain::lot::Lot;

pub trait HoldingsPort {
    /// Reads every persisted lot in stored order. A store that has never
    /// been written yields an empty list.
    fn load(&self) -> Result<Vec<Lot>, TraderError>;

    /// Replaces the persisted lots with `lots`.
    fn save(&self, lots: &[Lot]) -> Result<(), TraderError>;
}
