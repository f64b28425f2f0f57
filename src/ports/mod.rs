//! Port traits implemented by [`crate::adapters`].

pub mod config_port;
pub mod holdings_port;
