//! Shop purchases and equipping cosmetics.

use chrono::Utc;

use crate::catalog::{triggers, Item, ItemCategory};
use crate::error::{GameError, Result};
use crate::ledger::Ledger;
use crate::rewards::process_action;
use crate::student::InventoryEntry;

/// Buy `item` for the ledger's student.
///
/// Debits the price, records ownership, then fires `comprar_marco` for
/// frames and `gastar_puntos` with the price for every purchase.
///
/// # Errors
///
/// - `GameError::AlreadyOwned` if the item is already in the inventory.
/// - `GameError::InsufficientPoints` if the balance is below the price.
///
/// Neither failure stages any change.
pub fn purchase<L: Ledger + ?Sized>(ledger: &mut L, item: &Item) -> Result<()> {
    if ledger.owns_item(item.id)? {
        return Err(GameError::AlreadyOwned(item.id));
    }

    let student = ledger.student();
    if !student.has_sufficient_points(item.price) {
        return Err(GameError::InsufficientPoints {
            balance: student.points,
            required: item.price,
        });
    }

    let student = ledger.student_mut();
    student.points -= item.price;
    student.updated_at = Utc::now();
    let student_id = student.id;

    ledger.add_inventory_entry(InventoryEntry {
        student_id,
        item_id: item.id,
        acquired_at: Utc::now(),
    });

    tracing::info!(
        student_id = %student_id,
        item_id = %item.id,
        price = item.price,
        "Item purchased"
    );

    if item.category == ItemCategory::Frame {
        process_action(ledger, triggers::BUY_FRAME, 1)?;
    }
    process_action(ledger, triggers::SPEND_POINTS, item.price)?;

    Ok(())
}

/// Equip an owned item into the slot for `category`.
///
/// Only the avatar slot fires `cambiar_avatar`.
///
/// # Errors
///
/// - `GameError::NotOwned` if the item is not in the inventory.
/// - `GameError::CategoryMismatch` if the item belongs to another slot.
pub fn equip<L: Ledger + ?Sized>(ledger: &mut L, category: ItemCategory, item: &Item) -> Result<()> {
    if !ledger.owns_item(item.id)? {
        return Err(GameError::NotOwned(item.id));
    }
    if item.category != category {
        return Err(GameError::CategoryMismatch {
            item: item.id,
            requested: category,
            actual: item.category,
        });
    }

    let student = ledger.student_mut();
    *student.cosmetics.slot_mut(category) = Some(item.image_file_name().to_string());
    student.updated_at = Utc::now();

    tracing::info!(
        student_id = %student.id,
        item_id = %item.id,
        slot = %category,
        "Item equipped"
    );

    if category == ItemCategory::Avatar {
        process_action(ledger, triggers::CHANGE_AVATAR, 1)?;
    }

    Ok(())
}
