//! Core domain types and logic.

pub mod catalog;
pub mod lot;
pub mod holdings;
pub mod trading;
pub mod error;
