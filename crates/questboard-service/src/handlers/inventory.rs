//! Inventory handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use questboard_core::{equip, Item, ItemCategory};
use questboard_store::Store;

use super::shop::{load_item, parse_item_id};
use super::{run_unit_of_work, MutationResponse};
use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// An owned item.
#[derive(Debug, Serialize)]
pub struct InventoryItem {
    /// The catalog item.
    #[serde(flatten)]
    pub item: Item,
    /// Purchase time (RFC 3339).
    pub acquired_at: String,
    /// Whether it is currently equipped.
    pub equipped: bool,
}

/// List the student's items.
pub async fn list_inventory(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    let student = state
        .store
        .get_student(&auth.student_id)?
        .ok_or(ApiError::Unauthorized)?;

    let mut items = Vec::new();
    for entry in state.store.list_inventory(&auth.student_id)? {
        let Some(item) = state.store.get_item(entry.item_id)? else {
            tracing::warn!(item_id = %entry.item_id, "Inventory entry for unknown item");
            continue;
        };
        items.push(InventoryItem {
            equipped: student.cosmetics.slot(item.category) == Some(item.image_file_name()),
            acquired_at: entry.acquired_at.to_rfc3339(),
            item,
        });
    }

    Ok(Json(items))
}

/// Equip an owned item into a cosmetic slot.
pub async fn equip_item(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
    Path((category, item_id)): Path<(String, String)>,
) -> Result<Json<MutationResponse>, ApiError> {
    let category: ItemCategory = category
        .parse()
        .map_err(|e: questboard_core::UnknownCategory| ApiError::BadRequest(e.to_string()))?;
    let item = load_item(&state, parse_item_id(&item_id)?)?;

    let ((), committed) = run_unit_of_work(&state, &auth.student_id, |uow| {
        equip(uow, category, &item).map_err(ApiError::from)
    })?;

    Ok(Json(MutationResponse::new(
        format!("Equipped {}", item.name),
        &committed,
    )))
}
