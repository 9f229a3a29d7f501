//! Catalog reference data: shop items, missions, achievements and activities.
//!
//! Catalog rows are immutable once seeded. Missions are matched against
//! action triggers emitted by gameplay, shop and settings events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::{AchievementId, ActivityId, ItemId, MissionId};

/// Action trigger labels emitted by the portal.
pub mod triggers {
    /// A memory game was played (any result).
    pub const PLAY_MEMORY: &str = "jugar_memoria";
    /// A memory game was won.
    pub const WIN_MEMORY: &str = "ganar_memoria";
    /// A tic-tac-toe game was played (any result).
    pub const PLAY_TICTACTOE: &str = "jugar_tictactoe";
    /// A tic-tac-toe game was won.
    pub const WIN_TICTACTOE: &str = "ganar_tictactoe";
    /// A frame was bought in the shop.
    pub const BUY_FRAME: &str = "comprar_marco";
    /// Points were spent in the shop; the amount is the price paid.
    pub const SPEND_POINTS: &str = "gastar_puntos";
    /// The avatar was changed (equip or upload).
    pub const CHANGE_AVATAR: &str = "cambiar_avatar";
}

/// Cosmetic category of a shop item. Each category maps to exactly one
/// equipped slot on the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Profile picture.
    Avatar,
    /// Border drawn around the avatar.
    #[serde(alias = "marco")]
    Frame,
    /// Profile background.
    #[serde(alias = "fondo")]
    Background,
}

impl ItemCategory {
    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Avatar => "avatar",
            Self::Frame => "frame",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a path segment is not a known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for ItemCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avatar" => Ok(Self::Avatar),
            "frame" | "marco" => Ok(Self::Frame),
            "background" | "fondo" => Ok(Self::Background),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// A cosmetic sold in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Catalog id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Which slot the item equips into.
    pub category: ItemCategory,
    /// Optional description.
    pub description: Option<String>,
    /// Image reference; only the file name is stored on the student when equipped.
    pub image_url: String,
    /// Price in points.
    pub price: i64,
}

impl Item {
    /// File name portion of the image reference.
    #[must_use]
    pub fn image_file_name(&self) -> &str {
        self.image_url
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.image_url)
    }
}

/// A mission: reaching `goal` on `trigger` events pays out a fixed reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Catalog id.
    pub id: MissionId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unique code, e.g. `jugar_memoria_5`.
    pub code: String,
    /// Action trigger label; several missions may share one.
    pub trigger: String,
    /// Progress needed to complete.
    pub goal: i64,
    /// Points paid on completion.
    pub reward_points: i64,
    /// Experience paid on completion.
    pub reward_xp: i64,
}

/// A badge granted once the student reaches `required_level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Catalog id.
    pub id: AchievementId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Badge image reference.
    pub image_url: Option<String>,
    /// Minimum level.
    pub required_level: u32,
}

/// Default flat reward for an activity.
pub const DEFAULT_ACTIVITY_REWARD: i64 = 10;

/// A learning activity completed once per student for a flat point reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Catalog id.
    pub id: ActivityId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Points credited on completion.
    pub reward_points: i64,
}
