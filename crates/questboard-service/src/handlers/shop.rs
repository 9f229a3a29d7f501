//! Shop handlers.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use questboard_core::{purchase, GameError, Item, ItemId};
use questboard_store::Store;

use super::{run_unit_of_work, MutationResponse};
use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// A shop item with the student's ownership flag.
#[derive(Debug, Serialize)]
pub struct ShopItem {
    /// The catalog item.
    #[serde(flatten)]
    pub item: Item,
    /// Whether the student already owns it.
    pub owned: bool,
}

/// Shop listing.
#[derive(Debug, Serialize)]
pub struct ShopResponse {
    /// The student's point balance.
    pub points: i64,
    /// Every item for sale.
    pub items: Vec<ShopItem>,
}

pub(crate) fn parse_item_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid item id: {raw}")))
}

pub(crate) fn load_item(state: &AppState, item_id: ItemId) -> Result<Item, ApiError> {
    state
        .store
        .get_item(item_id)?
        .ok_or(GameError::ItemNotFound(item_id))
        .map_err(ApiError::from)
}

/// List the shop.
pub async fn list_shop(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<ShopResponse>, ApiError> {
    let student = state
        .store
        .get_student(&auth.student_id)?
        .ok_or(ApiError::Unauthorized)?;

    let owned: HashSet<ItemId> = state
        .store
        .list_inventory(&auth.student_id)?
        .into_iter()
        .map(|e| e.item_id)
        .collect();

    let items = state
        .store
        .list_items()?
        .into_iter()
        .map(|item| ShopItem {
            owned: owned.contains(&item.id),
            item,
        })
        .collect();

    Ok(Json(ShopResponse {
        points: student.points,
        items,
    }))
}

/// Buy an item.
pub async fn purchase_item(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
    Path(item_id): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
    let item = load_item(&state, parse_item_id(&item_id)?)?;

    let ((), committed) = run_unit_of_work(&state, &auth.student_id, |uow| {
        purchase(uow, &item).map_err(ApiError::from)
    })?;

    Ok(Json(MutationResponse::new(
        format!("Purchased {}", item.name),
        &committed,
    )))
}
