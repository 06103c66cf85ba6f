//! In-memory ledger.
//!
//! Holds users, accounts, cards, and transactions, and keeps every
//! account's balance equal to its opening balance plus the signed sum of
//! its transactions.

mod field;
mod seed;
mod store;

pub use store::LedgerStore;
