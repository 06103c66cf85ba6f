//! Single-field patches for inline editing.
//!
//! Each builder turns `(field, raw string)` into a one-field patch, coercing
//! the value by field name. The store then applies it through the regular
//! update path so balance bookkeeping stays in one place.

use portal_common::lenient::{parse_date, parse_decimal, parse_id};
use portal_common::{
    AccountPatch, CardPatch, EntityKind, PortalError, PortalResult, TransactionKind,
    TransactionPatch, UserPatch,
};

fn unknown_field(entity: EntityKind, field: &str) -> PortalError {
    PortalError::Validation(format!("{entity} has no editable field '{field}'"))
}

pub(super) fn user_patch(field: &str, raw: &str) -> PortalResult<UserPatch> {
    let mut patch = UserPatch::default();
    let text = Some(raw.to_string());
    match field {
        "name" => patch.name = text,
        "email" => patch.email = text,
        "phone" => patch.phone = text,
        "status" => patch.status = text,
        _ => return Err(unknown_field(EntityKind::User, field)),
    }
    Ok(patch)
}

pub(super) fn account_patch(field: &str, raw: &str) -> PortalResult<AccountPatch> {
    let mut patch = AccountPatch::default();
    let text = Some(raw.to_string());
    match field {
        "userId" => patch.user_id = Some(parse_id(raw)?),
        "accountNumber" => patch.account_number = text,
        "balance" => patch.balance = Some(parse_decimal(raw)?),
        "currency" => patch.currency = text,
        "type" => patch.kind = text,
        "status" => patch.status = text,
        _ => return Err(unknown_field(EntityKind::Account, field)),
    }
    Ok(patch)
}

pub(super) fn card_patch(field: &str, raw: &str) -> PortalResult<CardPatch> {
    let mut patch = CardPatch::default();
    let text = Some(raw.to_string());
    match field {
        "userId" => patch.user_id = Some(parse_id(raw)?),
        "cardNumber" => patch.card_number = text,
        "type" => patch.kind = text,
        "status" => patch.status = text,
        "limit" => patch.limit = Some(parse_decimal(raw)?),
        "currency" => patch.currency = text,
        _ => return Err(unknown_field(EntityKind::Card, field)),
    }
    Ok(patch)
}

pub(super) fn transaction_patch(field: &str, raw: &str) -> PortalResult<TransactionPatch> {
    let mut patch = TransactionPatch::default();
    match field {
        "accountId" => patch.account_id = Some(parse_id(raw)?),
        "type" => patch.kind = Some(raw.parse::<TransactionKind>()?),
        "description" => patch.description = Some(raw.to_string()),
        "amount" => patch.amount = Some(parse_decimal(raw)?),
        "currency" => patch.currency = Some(raw.to_string()),
        "date" => patch.date = Some(parse_date(raw)?),
        _ => return Err(unknown_field(EntityKind::Transaction, field)),
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_numeric_fields_are_coerced() {
        let patch = card_patch("limit", "500").unwrap();
        assert_eq!(patch.limit, Some(Decimal::new(500, 0)));
        assert!(patch.card_number.is_none());

        let patch = transaction_patch("accountId", "2").unwrap();
        assert_eq!(patch.account_id, Some(2));

        let patch = transaction_patch("type", "Debit").unwrap();
        assert_eq!(patch.kind, Some(TransactionKind::Debit));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(matches!(
            account_patch("balance", "lots"),
            Err(PortalError::Validation(_))
        ));
        assert!(matches!(
            transaction_patch("date", "yesterday"),
            Err(PortalError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_field() {
        let err = user_patch("password", "x").unwrap_err();
        assert_eq!(
            err,
            PortalError::Validation("user has no editable field 'password'".into())
        );
    }
}
