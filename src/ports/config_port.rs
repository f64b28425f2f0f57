//! Configuration access port trait.

use std::path::PathBuf;

pub const DEFAULT_PORTFOLIO_FILE: &str = "portfolio.txt";

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Backing file from `[portfolio] file`, if set and non-blank.
    fn portfolio_file(&self) -> Option<PathBuf> {
        self.get_string("portfolio", "file")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}
