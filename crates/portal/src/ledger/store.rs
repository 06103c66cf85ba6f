//! Ledger collections and their CRUD operations.

use chrono::Utc;
use portal_common::constants::DEFAULT_STATUS;
use portal_common::{
    Account, AccountDraft, AccountPatch, Card, CardDraft, CardPatch, Currency, EntityKind,
    PortalError, PortalResult, Record, RecordId, Transaction, TransactionDraft, TransactionKind,
    TransactionPatch, User, UserDraft, UserPatch,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{field, seed};

/// The four ledger collections plus the currency catalogue.
///
/// Not synchronized: `AppState` keeps it behind a single lock and every
/// mutation below runs start to finish under that lock.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    users: Vec<User>,
    accounts: Vec<Account>,
    cards: Vec<Card>,
    transactions: Vec<Transaction>,
    currencies: Vec<Currency>,
}

/// `max(existing ids) + 1`, or 1 for an empty collection
fn next_id<T: Record>(items: &[T]) -> RecordId {
    items.iter().map(|item| item.id()).max().map_or(1, |max| max + 1)
}

fn position<T: Record>(items: &[T], id: RecordId) -> PortalResult<usize> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| PortalError::not_found(T::KIND, id))
}

fn status_or_default(status: Option<String>) -> String {
    status
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STATUS.to_string())
}

/// Read one camelCase field back out of a record as JSON
fn field_value<T: Serialize>(record: &T, field: &str) -> PortalResult<serde_json::Value> {
    let json = serde_json::to_value(record).map_err(|e| PortalError::Internal(e.to_string()))?;
    Ok(json.get(field).cloned().unwrap_or(serde_json::Value::Null))
}

impl LedgerStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store loaded with the demo dataset
    pub fn seeded() -> Self {
        seed::seed_store()
    }

    pub(super) fn from_parts(
        users: Vec<User>,
        accounts: Vec<Account>,
        cards: Vec<Card>,
        transactions: Vec<Transaction>,
        currencies: Vec<Currency>,
    ) -> Self {
        Self {
            users,
            accounts,
            cards,
            transactions,
            currencies,
        }
    }

    // === Reads ===

    pub fn list_users(&self) -> &[User] {
        &self.users
    }

    pub fn list_accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn list_cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn list_transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn list_currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn get_user(&self, id: RecordId) -> PortalResult<&User> {
        Ok(&self.users[position(&self.users, id)?])
    }

    pub fn get_account(&self, id: RecordId) -> PortalResult<&Account> {
        Ok(&self.accounts[position(&self.accounts, id)?])
    }

    pub fn get_card(&self, id: RecordId) -> PortalResult<&Card> {
        Ok(&self.cards[position(&self.cards, id)?])
    }

    pub fn get_transaction(&self, id: RecordId) -> PortalResult<&Transaction> {
        Ok(&self.transactions[position(&self.transactions, id)?])
    }

    pub fn accounts_for_user(&self, user_id: RecordId) -> Vec<&Account> {
        self.accounts.iter().filter(|a| a.user_id == user_id).collect()
    }

    pub fn cards_for_user(&self, user_id: RecordId) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.user_id == user_id).collect()
    }

    /// The account's transactions, newest first, at most `limit` of them
    pub fn recent_transactions(&self, account_id: RecordId, limit: usize) -> Vec<&Transaction> {
        let mut recent: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(limit);
        recent
    }

    /// Signed sum of the account's transaction amounts
    pub fn transaction_total(&self, account_id: RecordId) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .map(|t| t.amount)
            .sum()
    }

    // === Users ===

    pub fn create_user(&mut self, draft: UserDraft) -> User {
        let user = User {
            id: next_id(&self.users),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            status: status_or_default(draft.status),
        };
        self.users.push(user.clone());
        tracing::info!(user_id = user.id, "User created");
        user
    }

    pub fn update_user(&mut self, id: RecordId, patch: UserPatch) -> PortalResult<User> {
        let idx = position(&self.users, id)?;
        self.users[idx].apply(patch);
        tracing::debug!(user_id = id, "User updated");
        Ok(self.users[idx].clone())
    }

    /// Refused while the user still owns accounts or cards
    pub fn delete_user(&mut self, id: RecordId) -> PortalResult<RecordId> {
        let idx = position(&self.users, id)?;
        let dependents = self.accounts.iter().filter(|a| a.user_id == id).count()
            + self.cards.iter().filter(|c| c.user_id == id).count();
        if dependents > 0 {
            return Err(PortalError::InUse {
                entity: EntityKind::User,
                id,
                dependents,
            });
        }
        self.users.remove(idx);
        tracing::info!(user_id = id, "User deleted");
        Ok(id)
    }

    // === Accounts ===

    pub fn create_account(&mut self, draft: AccountDraft) -> Account {
        let account = Account {
            id: next_id(&self.accounts),
            user_id: draft.user_id,
            account_number: draft.account_number,
            balance: draft.balance,
            currency: draft.currency,
            kind: draft.kind,
            status: status_or_default(draft.status),
        };
        self.accounts.push(account.clone());
        tracing::info!(
            account_id = account.id,
            user_id = account.user_id,
            balance = %account.balance,
            "Account created"
        );
        account
    }

    /// A `balance` in the patch overwrites the balance outright; it restates
    /// the opening balance rather than recording a transaction.
    pub fn update_account(&mut self, id: RecordId, patch: AccountPatch) -> PortalResult<Account> {
        let idx = position(&self.accounts, id)?;
        self.accounts[idx].apply(patch);
        tracing::debug!(account_id = id, "Account updated");
        Ok(self.accounts[idx].clone())
    }

    /// Refused while transactions still reference the account
    pub fn delete_account(&mut self, id: RecordId) -> PortalResult<RecordId> {
        let idx = position(&self.accounts, id)?;
        let dependents = self.transactions.iter().filter(|t| t.account_id == id).count();
        if dependents > 0 {
            return Err(PortalError::InUse {
                entity: EntityKind::Account,
                id,
                dependents,
            });
        }
        self.accounts.remove(idx);
        tracing::info!(account_id = id, "Account deleted");
        Ok(id)
    }

    // === Cards ===

    pub fn create_card(&mut self, draft: CardDraft) -> Card {
        let card = Card {
            id: next_id(&self.cards),
            user_id: draft.user_id,
            card_number: draft.card_number,
            kind: draft.kind,
            status: status_or_default(draft.status),
            limit: draft.limit,
            currency: draft.currency,
        };
        self.cards.push(card.clone());
        tracing::info!(card_id = card.id, user_id = card.user_id, "Card created");
        card
    }

    pub fn update_card(&mut self, id: RecordId, patch: CardPatch) -> PortalResult<Card> {
        let idx = position(&self.cards, id)?;
        self.cards[idx].apply(patch);
        tracing::debug!(card_id = id, "Card updated");
        Ok(self.cards[idx].clone())
    }

    pub fn delete_card(&mut self, id: RecordId) -> PortalResult<RecordId> {
        let idx = position(&self.cards, id)?;
        self.cards.remove(idx);
        tracing::info!(card_id = id, "Card deleted");
        Ok(id)
    }

    // === Transactions ===

    /// Appends the transaction and credits its amount to the account. A
    /// missing account is skipped, not an error. An amount that would
    /// overflow the balance is rejected and nothing is recorded.
    pub fn create_transaction(&mut self, draft: TransactionDraft) -> PortalResult<Transaction> {
        let planned = self.plan_balances(&[(draft.account_id, draft.amount)])?;

        let transaction = Transaction {
            id: next_id(&self.transactions),
            account_id: draft.account_id,
            kind: draft
                .kind
                .unwrap_or_else(|| TransactionKind::from_amount(draft.amount)),
            description: draft.description,
            amount: draft.amount,
            currency: draft.currency,
            date: draft.date.unwrap_or_else(Utc::now),
        };
        self.transactions.push(transaction.clone());
        self.commit_balances(planned);

        tracing::info!(
            transaction_id = transaction.id,
            account_id = transaction.account_id,
            amount = %transaction.amount,
            "Transaction created"
        );
        Ok(transaction)
    }

    /// Merges the patch. If the amount or the account changes, the old
    /// contribution is backed out of the old account and the new one applied
    /// to the (possibly different) new account before the merge.
    pub fn update_transaction(
        &mut self,
        id: RecordId,
        patch: TransactionPatch,
    ) -> PortalResult<Transaction> {
        let idx = position(&self.transactions, id)?;
        let old_account = self.transactions[idx].account_id;
        let old_amount = self.transactions[idx].amount;
        let new_account = patch.account_id.unwrap_or(old_account);
        let new_amount = patch.amount.unwrap_or(old_amount);

        if new_account != old_account || new_amount != old_amount {
            let planned =
                self.plan_balances(&[(old_account, -old_amount), (new_account, new_amount)])?;
            self.commit_balances(planned);
            tracing::debug!(
                transaction_id = id,
                old_account,
                new_account,
                old_amount = %old_amount,
                new_amount = %new_amount,
                "Transaction rebalanced"
            );
        }

        self.transactions[idx].apply(patch);
        Ok(self.transactions[idx].clone())
    }

    /// Backs the amount out of the account, then removes the transaction
    pub fn delete_transaction(&mut self, id: RecordId) -> PortalResult<RecordId> {
        let idx = position(&self.transactions, id)?;
        let current = &self.transactions[idx];
        let planned = self.plan_balances(&[(current.account_id, -current.amount)])?;

        let removed = self.transactions.remove(idx);
        self.commit_balances(planned);
        tracing::info!(
            transaction_id = id,
            account_id = removed.account_id,
            "Transaction deleted"
        );
        Ok(id)
    }

    // === Inline edit ===

    /// Set one field of one record from its raw string form.
    ///
    /// Checks run in order: entity tag (`InvalidEntity`), record id
    /// (`NotFound`), field name and value (`Validation`). Returns the value
    /// as stored after coercion.
    pub fn update_field(
        &mut self,
        entity: &str,
        id: RecordId,
        field: &str,
        raw: &str,
    ) -> PortalResult<serde_json::Value> {
        let kind: EntityKind = entity.parse()?;

        let value = match kind {
            EntityKind::User => {
                position(&self.users, id)?;
                let user = self.update_user(id, field::user_patch(field, raw)?)?;
                field_value(&user, field)?
            }
            EntityKind::Account => {
                position(&self.accounts, id)?;
                let account = self.update_account(id, field::account_patch(field, raw)?)?;
                field_value(&account, field)?
            }
            EntityKind::Card => {
                position(&self.cards, id)?;
                let card = self.update_card(id, field::card_patch(field, raw)?)?;
                field_value(&card, field)?
            }
            EntityKind::Transaction => {
                position(&self.transactions, id)?;
                let patch = field::transaction_patch(field, raw)?;
                let transaction = self.update_transaction(id, patch)?;
                field_value(&transaction, field)?
            }
        };

        tracing::info!(entity = %kind, id, field, "Field updated");
        Ok(value)
    }

    /// New balances for a set of `(account, delta)` legs, computed without
    /// touching the store. Legs on the same account accumulate. Missing
    /// accounts are skipped; an overflowing balance fails the whole plan.
    fn plan_balances(&self, legs: &[(RecordId, Decimal)]) -> PortalResult<Vec<(usize, Decimal)>> {
        let mut planned: Vec<(usize, Decimal)> = Vec::with_capacity(legs.len());

        for &(account_id, delta) in legs {
            let Some(idx) = self.accounts.iter().position(|a| a.id == account_id) else {
                tracing::warn!(
                    account_id,
                    delta = %delta,
                    "Balance adjustment skipped: account not found"
                );
                continue;
            };

            let current = planned
                .iter()
                .rev()
                .find(|(planned_idx, _)| *planned_idx == idx)
                .map_or(self.accounts[idx].balance, |(_, balance)| *balance);
            let balance = current.checked_add(delta).ok_or_else(|| {
                PortalError::Validation(format!(
                    "amount {delta} would overflow the balance of account {account_id}"
                ))
            })?;
            planned.push((idx, balance));
        }

        Ok(planned)
    }

    fn commit_balances(&mut self, planned: Vec<(usize, Decimal)>) {
        for (idx, balance) in planned {
            self.accounts[idx].balance = balance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    fn tx_draft(account_id: RecordId, amount: &str) -> TransactionDraft {
        TransactionDraft {
            account_id,
            amount: dec(amount),
            description: "Test".into(),
            currency: "€".into(),
            ..Default::default()
        }
    }

    fn balance(store: &LedgerStore, account_id: RecordId) -> Decimal {
        store.get_account(account_id).unwrap().balance
    }

    #[test]
    fn test_seed_dataset() {
        let store = LedgerStore::seeded();
        assert_eq!(store.list_users().len(), 1);
        assert_eq!(store.list_accounts().len(), 2);
        assert_eq!(store.list_cards().len(), 2);
        assert_eq!(store.list_transactions().len(), 4);
        assert_eq!(store.list_currencies().len(), 3);
        assert_eq!(balance(&store, 1), dec("400.06"));
        assert_eq!(store.get_account(1).unwrap().currency, "€");
    }

    #[test]
    fn test_create_update_delete_scenario() {
        let mut store = LedgerStore::seeded();

        let tx = store.create_transaction(tx_draft(1, "-100.00")).unwrap();
        assert_eq!(balance(&store, 1), dec("300.06"));
        assert_eq!(tx.kind, TransactionKind::Debit);

        let patch = TransactionPatch {
            amount: Some(dec("-50.00")),
            ..Default::default()
        };
        store.update_transaction(tx.id, patch).unwrap();
        assert_eq!(balance(&store, 1), dec("350.06"));

        store.delete_transaction(tx.id).unwrap();
        assert_eq!(balance(&store, 1), dec("400.06"));
    }

    #[test]
    fn test_balance_tracks_running_sum() {
        let mut store = LedgerStore::new();
        let user = store.create_user(UserDraft::default());
        let account = store.create_account(AccountDraft {
            user_id: user.id,
            balance: dec("10.00"),
            ..Default::default()
        });
        let opening = account.balance;

        let a = store.create_transaction(tx_draft(account.id, "0.10")).unwrap();
        let b = store.create_transaction(tx_draft(account.id, "0.20")).unwrap();
        store.create_transaction(tx_draft(account.id, "-3.33")).unwrap();
        store
            .update_transaction(
                a.id,
                TransactionPatch {
                    amount: Some(dec("7.77")),
                    ..Default::default()
                },
            )
            .unwrap();
        store.delete_transaction(b.id).unwrap();

        assert_eq!(
            balance(&store, account.id),
            opening + store.transaction_total(account.id)
        );
        assert_eq!(balance(&store, account.id), dec("14.44"));
    }

    #[test]
    fn test_create_then_delete_leaves_no_residue() {
        let mut store = LedgerStore::seeded();
        let before = balance(&store, 2);
        let tx = store.create_transaction(tx_draft(2, "50.00")).unwrap();
        store.delete_transaction(tx.id).unwrap();
        assert_eq!(balance(&store, 2), before);
    }

    #[test]
    fn test_transaction_for_missing_account_is_still_recorded() {
        let mut store = LedgerStore::seeded();
        let accounts_before = store.list_accounts().to_vec();
        let tx = store.create_transaction(tx_draft(42, "10.00")).unwrap();
        assert_eq!(store.get_transaction(tx.id).unwrap().account_id, 42);
        assert_eq!(store.list_accounts(), accounts_before.as_slice());
    }

    #[test]
    fn test_moving_transaction_moves_its_contribution() {
        let mut store = LedgerStore::seeded();
        let tx = store.create_transaction(tx_draft(1, "-100.00")).unwrap();

        let patch = TransactionPatch {
            account_id: Some(2),
            amount: Some(dec("-20.00")),
            ..Default::default()
        };
        store.update_transaction(tx.id, patch).unwrap();

        assert_eq!(balance(&store, 1), dec("400.06"));
        assert_eq!(balance(&store, 2), dec("1230.30"));
    }

    #[test]
    fn test_overflowing_create_leaves_store_unchanged() {
        let mut store = LedgerStore::seeded();
        let draft: TransactionDraft = serde_json::from_str(
            r#"{"accountId": 1, "amount": "79228162514264337593543950335"}"#,
        )
        .unwrap();

        let err = store.create_transaction(draft).unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
        assert_eq!(store.list_transactions().len(), 4);
        assert_eq!(balance(&store, 1), dec("400.06"));
    }

    #[test]
    fn test_overflowing_move_checks_both_accounts_first() {
        let mut store = LedgerStore::seeded();
        let full = store.create_account(AccountDraft {
            user_id: 1,
            balance: Decimal::MAX,
            ..Default::default()
        });
        let before = store.get_transaction(4).unwrap().clone();

        // Backing out of account 2 is fine; crediting the full account is not
        let patch = TransactionPatch {
            account_id: Some(full.id),
            ..Default::default()
        };
        let err = store.update_transaction(4, patch).unwrap_err();

        assert!(matches!(err, PortalError::Validation(_)));
        assert_eq!(balance(&store, 2), dec("1250.30"));
        assert_eq!(balance(&store, full.id), Decimal::MAX);
        assert_eq!(store.get_transaction(4).unwrap(), &before);
    }

    #[test]
    fn test_overflowing_delete_keeps_transaction() {
        let mut store = LedgerStore::seeded();
        let tx = store.create_transaction(tx_draft(1, "-1.00")).unwrap();
        store
            .update_account(
                1,
                AccountPatch {
                    balance: Some(Decimal::MAX),
                    ..Default::default()
                },
            )
            .unwrap();

        let err = store.delete_transaction(tx.id).unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
        assert!(store.get_transaction(tx.id).is_ok());
        assert_eq!(balance(&store, 1), Decimal::MAX);
    }

    #[test]
    fn test_overflowing_inline_amount_is_rejected() {
        let mut store = LedgerStore::seeded();
        store
            .update_account(
                2,
                AccountPatch {
                    balance: Some(Decimal::MAX - dec("2000")),
                    ..Default::default()
                },
            )
            .unwrap();

        let err = store
            .update_field("transaction", 4, "amount", "79228162514264337593543950335")
            .unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
        assert_eq!(store.get_transaction(4).unwrap().amount, dec("1000.00"));
    }

    #[test]
    fn test_ids_are_max_plus_one() {
        let mut store = LedgerStore::new();
        assert_eq!(store.create_user(UserDraft::default()).id, 1);
        assert_eq!(store.create_user(UserDraft::default()).id, 2);
        assert_eq!(store.create_user(UserDraft::default()).id, 3);

        // Gaps below the max are not reused
        store.delete_user(2).unwrap();
        assert_eq!(store.create_user(UserDraft::default()).id, 4);

        // Removing the max lets its id be assigned again
        store.delete_user(4).unwrap();
        assert_eq!(store.create_user(UserDraft::default()).id, 4);

        let ids: Vec<_> = store.list_users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_status_defaults_to_active() {
        let mut store = LedgerStore::new();
        let user = store.create_user(UserDraft {
            name: "Ana".into(),
            ..Default::default()
        });
        assert_eq!(user.status, "active");

        let card = store.create_card(CardDraft {
            user_id: user.id,
            status: Some("blocked".into()),
            ..Default::default()
        });
        assert_eq!(card.status, "blocked");
    }

    #[test]
    fn test_update_is_partial() {
        let mut store = LedgerStore::seeded();
        let before = store.get_transaction(1).unwrap().clone();

        let patch = TransactionPatch {
            description: Some("X".into()),
            ..Default::default()
        };
        let after = store.update_transaction(1, patch).unwrap();

        assert_eq!(after.description, "X");
        assert_eq!(after.amount, before.amount);
        assert_eq!(after.account_id, before.account_id);
        assert_eq!(after.currency, before.currency);
        assert_eq!(after.date, before.date);
        assert_eq!(balance(&store, 1), dec("400.06"));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = LedgerStore::seeded();
        let err = store.update_user(99, UserPatch::default()).unwrap_err();
        assert_eq!(err, PortalError::not_found(EntityKind::User, 99));
        assert!(store.delete_transaction(99).is_err());
    }

    #[test]
    fn test_delete_refuses_dependents() {
        let mut store = LedgerStore::seeded();

        let err = store.delete_user(1).unwrap_err();
        assert_eq!(
            err,
            PortalError::InUse {
                entity: EntityKind::User,
                id: 1,
                dependents: 4
            }
        );
        assert!(matches!(store.delete_account(1), Err(PortalError::InUse { .. })));
        assert_eq!(store.list_users().len(), 1);
        assert_eq!(store.list_accounts().len(), 2);

        // Cards have no dependents
        assert_eq!(store.delete_card(2).unwrap(), 2);
    }

    #[test]
    fn test_update_field_on_missing_card() {
        let mut store = LedgerStore::seeded();
        let cards_before = store.list_cards().to_vec();

        let err = store.update_field("card", 999, "limit", "500").unwrap_err();
        assert_eq!(err, PortalError::not_found(EntityKind::Card, 999));
        assert_eq!(store.list_cards(), cards_before.as_slice());
    }

    #[test]
    fn test_update_field_invalid_entity() {
        let mut store = LedgerStore::seeded();
        let err = store.update_field("loan", 1, "amount", "5").unwrap_err();
        assert_eq!(err, PortalError::InvalidEntity("loan".into()));
    }

    #[test]
    fn test_update_field_rebalances_transaction_amount() {
        let mut store = LedgerStore::seeded();
        let value = store.update_field("transaction", 2, "amount", "-150.00").unwrap();

        assert_eq!(value, serde_json::json!("-150.00"));
        // -400 replaced by -150
        assert_eq!(balance(&store, 1), dec("650.06"));
    }

    #[test]
    fn test_update_field_coerces_and_rejects() {
        let mut store = LedgerStore::seeded();

        let value = store.update_field("card", 1, "limit", "750.5").unwrap();
        assert_eq!(value, serde_json::json!("750.5"));

        let value = store.update_field("user", 1, "name", "Tasio").unwrap();
        assert_eq!(value, serde_json::json!("Tasio"));

        let err = store.update_field("account", 1, "balance", "NaN?").unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
        assert_eq!(balance(&store, 1), dec("400.06"));
    }

    #[test]
    fn test_recent_transactions_newest_first() {
        let mut store = LedgerStore::seeded();
        let mut draft = tx_draft(1, "5.00");
        draft.date = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).single();
        let newest = store.create_transaction(draft).unwrap();

        let recent = store.recent_transactions(1, 3);
        let ids: Vec<_> = recent.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![newest.id, 1, 2]);

        assert_eq!(store.recent_transactions(2, 3).len(), 1);
        assert!(store.recent_transactions(7, 3).is_empty());
    }
}
