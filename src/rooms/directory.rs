//! Room Directory
//!
//! Static category/room/subroom structure embedded by the server at page
//! load. Read-only: navigation validates selections against it and the
//! renderer pulls names and descriptions from it.

use serde::Deserialize;
use thiserror::Error;

/// The whole embedded document
#[derive(Debug, Clone, Deserialize)]
pub struct RoomDirectory {
    /// Top-level grouping of rooms
    pub categories: Vec<Category>,
}

/// A sidebar category
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    /// URL-safe identifier
    pub slug: String,
    /// Display name
    pub name: String,
    /// Accent color, CSS-style
    #[serde(default)]
    pub color: String,
    /// Icon class name
    #[serde(default)]
    pub icon: String,
    /// Rooms in this category
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// A chat room
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub description: Option<String>,
    /// Longer text shown in the room-info panel
    #[serde(default)]
    pub detailed_info: Option<String>,
    #[serde(default)]
    pub subrooms: Vec<Subroom>,
}

/// A subroom within a room
#[derive(Debug, Clone, Deserialize)]
pub struct Subroom {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Errors loading the directory document
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to parse room directory: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RoomDirectory {
    /// Parse the server-embedded JSON document
    pub fn from_json(raw: &str) -> Result<Self, DirectoryError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// An empty directory (nothing selectable)
    pub fn empty() -> Self {
        Self { categories: Vec::new() }
    }

    /// Look up a room by id across all categories
    pub fn find_room(&self, room_id: &str) -> Option<&Room> {
        self.categories
            .iter()
            .flat_map(|category| category.rooms.iter())
            .find(|room| room.id == room_id)
    }

    /// Look up a subroom, requiring that it belongs to the given room
    pub fn find_subroom(&self, room_id: &str, subroom_id: &str) -> Option<&Subroom> {
        self.find_room(room_id)?
            .subrooms
            .iter()
            .find(|subroom| subroom.id == subroom_id)
    }

    /// Whether the subroom belongs to the room
    pub fn contains_subroom(&self, room_id: &str, subroom_id: &str) -> bool {
        self.find_subroom(room_id, subroom_id).is_some()
    }

    /// Description text for a selection, preferring the subroom's
    pub fn describe(&self, room_id: &str, subroom_id: Option<&str>) -> Option<&str> {
        if let Some(subroom_id) = subroom_id {
            let subroom = self.find_subroom(room_id, subroom_id)?;
            if let Some(description) = subroom.description.as_deref() {
                return Some(description);
            }
        }
        self.find_room(room_id)?.description.as_deref()
    }

    /// Display name for a selection
    pub fn display_name(&self, room_id: &str, subroom_id: Option<&str>) -> Option<&str> {
        match subroom_id {
            Some(subroom_id) => self
                .find_subroom(room_id, subroom_id)
                .map(|subroom| subroom.name.as_str()),
            None => self.find_room(room_id).map(|room| room.name.as_str()),
        }
    }
}
