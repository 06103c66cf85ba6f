//! # Portal Common
//!
//! Shared types and utilities used by the banking portal service.
//!
//! ## Modules
//! - `types` - Ledger records (User, Account, Card, Transaction) and their drafts/patches
//! - `error` - Common error taxonomy
//! - `lenient` - Parsing of numeric, id, and date input sent as strings or numbers
//! - `constants` - Shared configuration constants

pub mod constants;
pub mod error;
pub mod lenient;
pub mod types;

pub use error::{PortalError, PortalResult};
pub use types::*;
