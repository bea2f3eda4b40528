//! Room, building and feature models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Closed set of room types. DB stores the kebab-case code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RoomType {
    Classroom,
    LectureHall,
    Lab,
    ComputerLab,
    Office,
    ConferenceRoom,
    StudyRoom,
    Auditorium,
    Other,
}

impl RoomType {
    pub const ALL: [RoomType; 9] = [
        RoomType::Classroom,
        RoomType::LectureHall,
        RoomType::Lab,
        RoomType::ComputerLab,
        RoomType::Office,
        RoomType::ConferenceRoom,
        RoomType::StudyRoom,
        RoomType::Auditorium,
        RoomType::Other,
    ];

    /// Return the stored code for this room type
    pub fn as_code(&self) -> &'static str {
        match self {
            RoomType::Classroom => "classroom",
            RoomType::LectureHall => "lecture-hall",
            RoomType::Lab => "lab",
            RoomType::ComputerLab => "computer-lab",
            RoomType::Office => "office",
            RoomType::ConferenceRoom => "conference-room",
            RoomType::StudyRoom => "study-room",
            RoomType::Auditorium => "auditorium",
            RoomType::Other => "other",
        }
    }

    /// Parse a stored code. Codes outside the closed set are unrecognized.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_code() == code)
    }

    /// Human readable label, e.g. `lecture-hall` -> `Lecture Hall`
    pub fn label(&self) -> String {
        self.as_code()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Room record as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Room {
    pub id: String,
    /// Display name
    pub name: String,
    /// Room number, e.g. "101" or "B-12"
    pub number: String,
    /// Floor, negative for basements
    pub floor: i32,
    pub capacity: i32,
    /// Room type code (see [`RoomType`])
    pub room_type: String,
    pub accessible: bool,
    pub building_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Room {
    /// Typed room type, `None` when the stored code is unrecognized
    pub fn kind(&self) -> Option<RoomType> {
        RoomType::from_code(&self.room_type)
    }
}

/// Building record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Building {
    pub id: String,
    pub name: String,
    /// Short unique abbreviation used in filter labels
    pub abbreviation: String,
}

impl Building {
    /// Dropdown label, e.g. "SCI - Science Center"
    pub fn label(&self) -> String {
        format!("{} - {}", self.abbreviation, self.name)
    }
}

/// Building fields attached to an enriched room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BuildingSummary {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    /// "ABBR - Name", as shown in the building dropdown
    pub label: String,
}

impl From<&Building> for BuildingSummary {
    fn from(b: &Building) -> Self {
        Self {
            id: b.id.clone(),
            name: b.name.clone(),
            abbreviation: b.abbreviation.clone(),
            label: b.label(),
        }
    }
}

/// Feature tag (projector, whiteboard, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Feature {
    pub id: String,
    pub name: String,
    /// Free-form grouping label
    pub category: String,
}

/// Room/feature association row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RoomFeature {
    pub room_id: String,
    pub feature_id: String,
}

/// A feature joined to one of the rooms it is attached to
#[derive(Debug, Clone, FromRow)]
pub struct RoomFeatureRow {
    pub room_id: String,
    pub id: String,
    pub name: String,
    pub category: String,
}

impl RoomFeatureRow {
    pub fn into_feature(self) -> (String, Feature) {
        (
            self.room_id,
            Feature {
                id: self.id,
                name: self.name,
                category: self.category,
            },
        )
    }
}

/// Features sharing a category, for grouped display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeatureGroup {
    pub category: String,
    pub features: Vec<Feature>,
}

/// Room with its building fields and complete feature list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrichedRoom {
    pub id: String,
    pub name: String,
    pub number: String,
    pub floor: i32,
    pub capacity: i32,
    pub room_type: String,
    /// Display label, absent for unrecognized types
    pub room_type_label: Option<String>,
    pub accessible: bool,
    pub description: Option<String>,
    pub building: Option<BuildingSummary>,
    pub features: Vec<Feature>,
}

impl EnrichedRoom {
    pub fn new(room: Room, building: Option<BuildingSummary>, features: Vec<Feature>) -> Self {
        Self {
            room_type_label: room.kind().map(|t| t.label()),
            id: room.id,
            name: room.name,
            number: room.number,
            floor: room.floor,
            capacity: room.capacity,
            room_type: room.room_type,
            accessible: room.accessible,
            description: room.description,
            building,
            features,
        }
    }
}
