//! Folder model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed color palette for folders.
///
/// The remote column stores the lowercase name; values outside the palette
/// are rejected at deserialization so the UI never renders an unknown color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderColor {
    Red,
    Orange,
    Yellow,
    Green,
    #[default]
    Blue,
    Purple,
    Pink,
    Gray,
}

impl FolderColor {
    /// All palette entries, for pickers and validation messages.
    pub const ALL: [Self; 8] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Gray,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Gray => "gray",
        }
    }
}

impl std::str::FromStr for FolderColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == normalized)
            .ok_or_else(|| format!("unknown folder color '{s}'"))
    }
}

/// A folder grouping task or document rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub color: FolderColor,
    /// Folders hold either documents or tasks, never both
    #[serde(default)]
    pub is_for_document: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_palette_names() {
        assert_eq!("green".parse::<FolderColor>().unwrap(), FolderColor::Green);
        assert_eq!(" Blue ".parse::<FolderColor>().unwrap(), FolderColor::Blue);
        assert!("magenta".parse::<FolderColor>().is_err());
    }

    #[test]
    fn color_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FolderColor::Purple).unwrap(),
            "\"purple\""
        );
    }

    #[test]
    fn unknown_color_is_a_deserialization_error() {
        let raw = r#"{
            "id": 1,
            "user_id": "user-1",
            "name": "Work",
            "color": "chartreuse",
            "created_at": "2026-01-15T10:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Folder>(raw).is_err());
    }

    #[test]
    fn folder_round_trips_through_json() {
        let raw = r#"{
            "id": 3,
            "user_id": "user-1",
            "name": "Journal",
            "color": "pink",
            "is_for_document": true,
            "created_at": "2026-01-15T10:00:00Z"
        }"#;
        let folder: Folder = serde_json::from_str(raw).unwrap();
        assert_eq!(folder.color, FolderColor::Pink);
        assert!(folder.is_for_document);
    }
}
