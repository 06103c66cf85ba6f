//! Demo dataset loaded at startup. There is no persistence, so every restart
//! comes back to exactly this state.

use chrono::{DateTime, NaiveDate, Utc};
use portal_common::{Account, Card, Currency, Transaction, TransactionKind, User};
use rust_decimal::Decimal;

use super::LedgerStore;

const EURO: &str = "€";

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

pub(super) fn seed_store() -> LedgerStore {
    let users = vec![User {
        id: 1,
        name: "TASIO".into(),
        email: "tasio@email.com".into(),
        phone: "+34 944 23 00 45".into(),
        status: "active".into(),
    }];

    // Opening balances; not derived from the seed transactions below.
    let accounts = vec![
        Account {
            id: 1,
            user_id: 1,
            account_number: "*8464".into(),
            balance: Decimal::new(40006, 2),
            currency: EURO.into(),
            kind: "Cuenta corriente".into(),
            status: "active".into(),
        },
        Account {
            id: 2,
            user_id: 1,
            account_number: "*1234".into(),
            balance: Decimal::new(125030, 2),
            currency: EURO.into(),
            kind: "Cuenta de ahorro".into(),
            status: "active".into(),
        },
    ];

    let cards = vec![
        Card {
            id: 1,
            user_id: 1,
            card_number: "**** **** **** 1234".into(),
            kind: "Débito".into(),
            status: "active".into(),
            limit: Decimal::new(600, 0),
            currency: EURO.into(),
        },
        Card {
            id: 2,
            user_id: 1,
            card_number: "**** **** **** 5678".into(),
            kind: "Crédito".into(),
            status: "active".into(),
            limit: Decimal::new(3000, 0),
            currency: EURO.into(),
        },
    ];

    let transactions = vec![
        Transaction {
            id: 1,
            account_id: 1,
            kind: TransactionKind::Credit,
            description: "Transferencia recibida".into(),
            amount: Decimal::new(400, 0),
            currency: EURO.into(),
            date: day(2024, 1, 15),
        },
        Transaction {
            id: 2,
            account_id: 1,
            kind: TransactionKind::Debit,
            description: "Transferencia realizada".into(),
            amount: Decimal::new(-400, 0),
            currency: EURO.into(),
            date: day(2024, 1, 14),
        },
        Transaction {
            id: 3,
            account_id: 1,
            kind: TransactionKind::Credit,
            description: "Abono por transferencia a su favor".into(),
            amount: Decimal::new(400, 0),
            currency: EURO.into(),
            date: day(2024, 1, 13),
        },
        Transaction {
            id: 4,
            account_id: 2,
            kind: TransactionKind::Credit,
            description: "Depósito mensual".into(),
            amount: Decimal::new(1000, 0),
            currency: EURO.into(),
            date: day(2024, 1, 12),
        },
    ];

    let currencies = vec![
        currency(EURO, "Euro", EURO),
        currency("USD", "US Dollar", "$"),
        currency("GBP", "British Pound", "£"),
    ];

    LedgerStore::from_parts(users, accounts, cards, transactions, currencies)
}

fn currency(code: &str, name: &str, symbol: &str) -> Currency {
    Currency {
        code: code.into(),
        name: name.into(),
        symbol: symbol.into(),
    }
}
