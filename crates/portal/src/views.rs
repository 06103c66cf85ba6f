//! Page view-models.
//!
//! Each page returns the data its template would be rendered with, plus the
//! template and layout names picked by device detection.

use chrono::{DateTime, Utc};
use portal_common::constants::RECENT_TRANSACTIONS_LIMIT;
use portal_common::{Account, Card, Currency, RecordId, Transaction, User};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::device::ViewVariant;
use crate::ledger::LedgerStore;

/// `400,06` style, two decimals with a decimal comma
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2)).replace('.', ",")
}

/// `+400.00` / `-400.00`, used next to transaction rows
pub fn format_signed(amount: Decimal) -> String {
    let amount = amount.round_dp(2);
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("{amount:.2}")
    } else {
        format!("+{:.2}", amount.abs())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub title: String,
    pub page_id: &'static str,
    pub template: String,
    pub layout: &'static str,
}

impl PageMeta {
    pub fn new(title: &str, page_id: &'static str, variant: &ViewVariant) -> Self {
        Self {
            title: format!("{title} - BBVA"),
            page_id,
            template: variant.template(page_id),
            layout: variant.layout,
        }
    }

    /// Pages that only exist in one layout (admin login, admin panel)
    pub fn standalone(title: &str, page_id: &'static str) -> Self {
        Self {
            title: format!("{title} - BBVA"),
            page_id,
            template: page_id.to_string(),
            layout: "main",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary<'a> {
    #[serde(flatten)]
    pub account: &'a Account,
    pub balance_display: String,
    pub recent_transactions: Vec<TransactionRow<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow<'a> {
    #[serde(flatten)]
    pub transaction: &'a Transaction,
    pub amount_display: String,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(transaction: &'a Transaction) -> Self {
        Self {
            transaction,
            amount_display: format_signed(transaction.amount),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView<'a> {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub user: Option<&'a User>,
    /// Primary account (the user's first)
    pub account: Option<AccountSummary<'a>>,
    pub transactions: Vec<TransactionRow<'a>>,
    pub all_accounts: Vec<AccountSummary<'a>>,
    pub all_cards: Vec<&'a Card>,
    pub total_products: usize,
    pub is_admin_mode: bool,
}

fn summarize<'a>(ledger: &'a LedgerStore, account: &'a Account) -> AccountSummary<'a> {
    AccountSummary {
        account,
        balance_display: format_amount(account.balance),
        recent_transactions: ledger
            .recent_transactions(account.id, RECENT_TRANSACTIONS_LIMIT)
            .into_iter()
            .map(TransactionRow::from)
            .collect(),
    }
}

/// Single-tenant demo: the dashboard always shows the first user
pub fn dashboard<'a>(
    ledger: &'a LedgerStore,
    variant: &ViewVariant,
    is_admin_mode: bool,
) -> DashboardView<'a> {
    let user = ledger.list_users().first();
    let accounts = user.map(|u| ledger.accounts_for_user(u.id)).unwrap_or_default();
    let cards = user.map(|u| ledger.cards_for_user(u.id)).unwrap_or_default();

    let all_accounts: Vec<AccountSummary<'a>> =
        accounts.iter().copied().map(|a| summarize(ledger, a)).collect();
    let account = accounts.first().copied().map(|a| summarize(ledger, a));
    let transactions = account
        .as_ref()
        .map(|a| {
            ledger
                .recent_transactions(a.account.id, RECENT_TRANSACTIONS_LIMIT)
                .into_iter()
                .map(TransactionRow::from)
                .collect()
        })
        .unwrap_or_default();

    DashboardView {
        meta: PageMeta::new("Inicio", "main-page", variant),
        user,
        account,
        transactions,
        total_products: all_accounts.len() + cards.len(),
        all_accounts,
        all_cards: cards,
        is_admin_mode,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsView<'a> {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub user: Option<&'a User>,
    pub accounts: Vec<AccountSummary<'a>>,
    pub cards: Vec<&'a Card>,
    pub is_admin_mode: bool,
}

pub fn accounts<'a>(
    ledger: &'a LedgerStore,
    variant: &ViewVariant,
    is_admin_mode: bool,
) -> AccountsView<'a> {
    let user = ledger.list_users().first();
    let accounts = user.map(|u| ledger.accounts_for_user(u.id)).unwrap_or_default();

    AccountsView {
        meta: PageMeta::new("Accounts and Cards", "accounts", variant),
        user,
        accounts: accounts.into_iter().map(|a| summarize(ledger, a)).collect(),
        cards: user.map(|u| ledger.cards_for_user(u.id)).unwrap_or_default(),
        is_admin_mode,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Received,
    Sent,
}

impl TransferDirection {
    fn of(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Self::Received
        } else {
            Self::Sent
        }
    }
}

/// A transaction as shown in a transfer list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRow<'a> {
    pub id: RecordId,
    pub description: &'a str,
    /// Always positive; direction carries the sign
    pub amount: Decimal,
    pub amount_display: String,
    pub currency: &'a str,
    pub date: DateTime<Utc>,
    pub from_account_id: RecordId,
    pub account_number: &'a str,
    pub transfer_type: TransferDirection,
    pub counterparty: &'static str,
    pub status: &'static str,
}

pub fn transfer_rows(ledger: &LedgerStore) -> Vec<TransferRow<'_>> {
    ledger
        .list_transactions()
        .iter()
        .map(|t| {
            let direction = TransferDirection::of(t.amount);
            TransferRow {
                id: t.id,
                description: &t.description,
                amount: t.amount.abs(),
                amount_display: format_amount(t.amount.abs()),
                currency: &t.currency,
                date: t.date,
                from_account_id: t.account_id,
                account_number: ledger
                    .get_account(t.account_id)
                    .map(|a| a.account_number.as_str())
                    .unwrap_or("N/A"),
                transfer_type: direction,
                counterparty: match direction {
                    TransferDirection::Received => "Remitente",
                    TransferDirection::Sent => "Beneficiario",
                },
                status: "completed",
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransfersView<'a> {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub user: Option<&'a User>,
    pub accounts: Vec<&'a Account>,
    pub transfers: Vec<TransferRow<'a>>,
}

pub fn transfers<'a>(ledger: &'a LedgerStore, variant: &ViewVariant) -> TransfersView<'a> {
    let user = ledger.list_users().first();
    TransfersView {
        meta: PageMeta::new("Transferencias", "transfers", variant),
        user,
        accounts: user.map(|u| ledger.accounts_for_user(u.id)).unwrap_or_default(),
        transfers: transfer_rows(ledger),
    }
}

/// Static pages that only need the user for personalization
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplePage<'a> {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub user: Option<&'a User>,
}

pub fn simple_page<'a>(
    ledger: &'a LedgerStore,
    variant: &ViewVariant,
    title: &str,
    page_id: &'static str,
) -> SimplePage<'a> {
    SimplePage {
        meta: PageMeta::new(title, page_id, variant),
        user: ledger.list_users().first(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPanelView<'a> {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub users: &'a [User],
    pub accounts: &'a [Account],
    pub cards: &'a [Card],
    pub transactions: &'a [Transaction],
    pub currencies: &'a [Currency],
    pub transfers: Vec<TransferRow<'a>>,
    pub transfers_count: usize,
}

pub fn admin_panel(ledger: &LedgerStore) -> AdminPanelView<'_> {
    let transfers = transfer_rows(ledger);
    AdminPanelView {
        meta: PageMeta::standalone("Panel de Administración", "admin-panel"),
        users: ledger.list_users(),
        accounts: ledger.list_accounts(),
        cards: ledger.list_cards(),
        transactions: ledger.list_transactions(),
        currencies: ledger.list_currencies(),
        transfers_count: transfers.len(),
        transfers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_common::TransactionDraft;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    #[test]
    fn test_amount_formatting() {
        assert_eq!(format_amount(dec("400.06")), "400,06");
        assert_eq!(format_amount(dec("1250.3")), "1250,30");
        assert_eq!(format_signed(dec("400")), "+400.00");
        assert_eq!(format_signed(dec("-400")), "-400.00");
        assert_eq!(format_signed(Decimal::ZERO), "+0.00");
    }

    #[test]
    fn test_dashboard_from_seed() {
        let ledger = LedgerStore::seeded();
        let view = dashboard(&ledger, &ViewVariant::DESKTOP, false);

        assert_eq!(view.user.unwrap().name, "TASIO");
        assert_eq!(view.total_products, 4);
        assert_eq!(view.all_accounts.len(), 2);
        assert_eq!(view.transactions.len(), 3);
        assert_eq!(view.account.as_ref().unwrap().account.id, 1);
        assert_eq!(view.meta.template, "desktop/main-page");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["pageId"], "main-page");
        assert_eq!(json["account"]["accountNumber"], "*8464");
        assert_eq!(json["account"]["balanceDisplay"], "400,06");
        assert_eq!(json["allAccounts"][1]["recentTransactions"][0]["amountDisplay"], "+1000.00");
    }

    #[test]
    fn test_dashboard_on_empty_ledger() {
        let ledger = LedgerStore::new();
        let view = dashboard(&ledger, &ViewVariant::MOBILE, false);
        assert!(view.user.is_none());
        assert!(view.account.is_none());
        assert_eq!(view.total_products, 0);
    }

    #[test]
    fn test_transfer_rows() {
        let mut ledger = LedgerStore::seeded();
        ledger.create_transaction(TransactionDraft {
            account_id: 77,
            amount: dec("-12.50"),
            ..Default::default()
        })
        .unwrap();

        let rows = transfer_rows(&ledger);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1].transfer_type, TransferDirection::Sent);
        assert_eq!(rows[1].amount, dec("400"));
        assert_eq!(rows[1].counterparty, "Beneficiario");
        assert_eq!(rows[0].account_number, "*8464");
        assert_eq!(rows[4].account_number, "N/A");
    }

    #[test]
    fn test_admin_panel_counts() {
        let ledger = LedgerStore::seeded();
        let view = admin_panel(&ledger);
        assert_eq!(view.transfers_count, 4);
        assert_eq!(view.meta.template, "admin-panel");
    }
}
