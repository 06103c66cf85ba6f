//! JSON CRUD over the ledger, plus inline single-field edits.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use portal_common::{
    Account, AccountDraft, AccountPatch, Card, CardDraft, CardPatch, Currency, RecordId,
    Transaction, TransactionDraft, TransactionPatch, User, UserDraft, UserPatch, lenient,
};

use super::error::ApiResult;
use crate::state::AppState;

type JsonBody<T> = Result<Json<T>, JsonRejection>;
type IdPath = Result<Path<RecordId>, PathRejection>;

#[derive(Debug, Serialize)]
pub struct Deleted {
    message: String,
    id: RecordId,
}

impl Deleted {
    fn new(what: &str, id: RecordId) -> Json<Self> {
        Json(Self {
            message: format!("{what} deleted successfully"),
            id,
        })
    }
}

// === Users ===

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.ledger.read().await.list_users().to_vec())
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: JsonBody<UserDraft>,
) -> ApiResult<Json<User>> {
    let Json(draft) = payload?;
    Ok(Json(state.ledger.write().await.create_user(draft)))
}

pub async fn update_user(
    State(state): State<AppState>,
    path: IdPath,
    payload: JsonBody<UserPatch>,
) -> ApiResult<Json<User>> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    Ok(Json(state.ledger.write().await.update_user(id, patch)?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    path: IdPath,
) -> ApiResult<Json<Deleted>> {
    let Path(id) = path?;
    let id = state.ledger.write().await.delete_user(id)?;
    Ok(Deleted::new("User", id))
}

// === Accounts ===

pub async fn list_accounts(State(state): State<AppState>) -> Json<Vec<Account>> {
    Json(state.ledger.read().await.list_accounts().to_vec())
}

pub async fn create_account(
    State(state): State<AppState>,
    payload: JsonBody<AccountDraft>,
) -> ApiResult<Json<Account>> {
    let Json(draft) = payload?;
    Ok(Json(state.ledger.write().await.create_account(draft)))
}

pub async fn update_account(
    State(state): State<AppState>,
    path: IdPath,
    payload: JsonBody<AccountPatch>,
) -> ApiResult<Json<Account>> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    Ok(Json(state.ledger.write().await.update_account(id, patch)?))
}

pub async fn delete_account(
    State(state): State<AppState>,
    path: IdPath,
) -> ApiResult<Json<Deleted>> {
    let Path(id) = path?;
    let id = state.ledger.write().await.delete_account(id)?;
    Ok(Deleted::new("Account", id))
}

// === Cards ===

pub async fn list_cards(State(state): State<AppState>) -> Json<Vec<Card>> {
    Json(state.ledger.read().await.list_cards().to_vec())
}

pub async fn create_card(
    State(state): State<AppState>,
    payload: JsonBody<CardDraft>,
) -> ApiResult<Json<Card>> {
    let Json(draft) = payload?;
    Ok(Json(state.ledger.write().await.create_card(draft)))
}

pub async fn update_card(
    State(state): State<AppState>,
    path: IdPath,
    payload: JsonBody<CardPatch>,
) -> ApiResult<Json<Card>> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    Ok(Json(state.ledger.write().await.update_card(id, patch)?))
}

pub async fn delete_card(
    State(state): State<AppState>,
    path: IdPath,
) -> ApiResult<Json<Deleted>> {
    let Path(id) = path?;
    let id = state.ledger.write().await.delete_card(id)?;
    Ok(Deleted::new("Card", id))
}

// === Transactions ===

pub async fn list_transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    Json(state.ledger.read().await.list_transactions().to_vec())
}

pub async fn create_transaction(
    State(state): State<AppState>,
    payload: JsonBody<TransactionDraft>,
) -> ApiResult<Json<Transaction>> {
    let Json(draft) = payload?;
    Ok(Json(state.ledger.write().await.create_transaction(draft)?))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    path: IdPath,
    payload: JsonBody<TransactionPatch>,
) -> ApiResult<Json<Transaction>> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    Ok(Json(state.ledger.write().await.update_transaction(id, patch)?))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    path: IdPath,
) -> ApiResult<Json<Deleted>> {
    let Path(id) = path?;
    let id = state.ledger.write().await.delete_transaction(id)?;
    Ok(Deleted::new("Transaction", id))
}

pub async fn list_currencies(State(state): State<AppState>) -> Json<Vec<Currency>> {
    Json(state.ledger.read().await.list_currencies().to_vec())
}

// === Inline edit ===

#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    entity: String,
    #[serde(deserialize_with = "lenient::id")]
    id: RecordId,
    field: String,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldResponse {
    success: bool,
    message: String,
    new_value: Value,
}

/// Inline editors post whatever the input held; strings pass through,
/// numbers and booleans are coerced from their JSON text.
fn raw_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub async fn update_field(
    State(state): State<AppState>,
    payload: JsonBody<UpdateFieldRequest>,
) -> ApiResult<Json<UpdateFieldResponse>> {
    let Json(request) = payload?;
    let raw = raw_value(&request.value);

    let new_value = state.ledger.write().await.update_field(
        &request.entity,
        request.id,
        &request.field,
        &raw,
    )?;

    Ok(Json(UpdateFieldResponse {
        success: true,
        message: format!("{} updated successfully", request.entity),
        new_value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_value() {
        assert_eq!(raw_value(&json!("12,5")), "12,5");
        assert_eq!(raw_value(&json!(12.5)), "12.5");
        assert_eq!(raw_value(&json!(true)), "true");
        assert_eq!(raw_value(&Value::Null), "");
    }

    #[test]
    fn test_update_field_request_accepts_string_id() {
        let request: UpdateFieldRequest = serde_json::from_value(json!({
            "entity": "account",
            "id": "2",
            "field": "balance",
            "value": 10,
        }))
        .unwrap();
        assert_eq!(request.id, 2);
        assert_eq!(raw_value(&request.value), "10");
    }
}
