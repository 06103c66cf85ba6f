//! Ledger record types shared across portal components.
//!
//! Field names serialize in camelCase (`userId`, `accountNumber`, ...) so the
//! JSON API keeps the shape the admin panel scripts expect.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PortalError;
use crate::lenient;

/// Record identifier, unique within its own collection
pub type RecordId = u64;

/// Anything stored in a ledger collection
pub trait Record {
    const KIND: EntityKind;

    fn id(&self) -> RecordId;
}

/// Entity tags accepted by the field-level update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Account,
    Card,
    Transaction,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Account => "account",
            Self::Card => "card",
            Self::Transaction => "transaction",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = PortalError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "user" => Ok(Self::User),
            "account" => Ok(Self::Account),
            "card" => Ok(Self::Card),
            "transaction" => Ok(Self::Transaction),
            other => Err(PortalError::InvalidEntity(other.to_string())),
        }
    }
}

/// Direction of a transaction. Advisory only: the sign of `amount` is what
/// moves the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn from_amount(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            Self::Debit
        } else {
            Self::Credit
        }
    }
}

impl FromStr for TransactionKind {
    type Err = PortalError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            _ => Err(PortalError::Validation(format!(
                "'{raw}' is not a transaction type (credit or debit)"
            ))),
        }
    }
}

// === Records ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: RecordId,
    pub user_id: RecordId,
    /// Display string, e.g. `*8464`
    pub account_number: String,
    pub balance: Decimal,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: RecordId,
    pub user_id: RecordId,
    /// Masked display string, e.g. `**** **** **** 1234`
    pub card_number: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub limit: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    pub account_id: RecordId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    /// Signed: positive credits the account, negative debits it
    pub amount: Decimal,
    pub currency: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Account {
    const KIND: EntityKind = EntityKind::Account;
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Card {
    const KIND: EntityKind = EntityKind::Card;
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Transaction {
    const KIND: EntityKind = EntityKind::Transaction;
    fn id(&self) -> RecordId {
        self.id
    }
}

// === Drafts (create input) ===

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDraft {
    #[serde(deserialize_with = "lenient::id")]
    pub user_id: RecordId,
    #[serde(default)]
    pub account_number: String,
    /// Opening balance
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub currency: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDraft {
    #[serde(deserialize_with = "lenient::id")]
    pub user_id: RecordId,
    #[serde(default)]
    pub card_number: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Decimal,
    #[serde(default)]
    pub currency: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    #[serde(deserialize_with = "lenient::id")]
    pub account_id: RecordId,
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date: Option<DateTime<Utc>>,
}

// === Patches (partial update input) ===
//
// A field left as `None` is left untouched by the update.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub user_id: Option<RecordId>,
    pub account_number: Option<String>,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub user_id: Option<RecordId>,
    pub card_number: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub limit: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub account_id: Option<RecordId>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date: Option<DateTime<Utc>>,
}

impl User {
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

impl Account {
    pub fn apply(&mut self, patch: AccountPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(account_number) = patch.account_number {
            self.account_number = account_number;
        }
        if let Some(balance) = patch.balance {
            self.balance = balance;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

impl Card {
    pub fn apply(&mut self, patch: CardPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(card_number) = patch.card_number {
            self.card_number = card_number;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
    }
}

impl Transaction {
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(account_id) = patch.account_id {
            self.account_id = account_id;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}
