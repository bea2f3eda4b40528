//! Query plan built from [`SearchFilters`].
//!
//! A plan is a conjunction of predicates over rooms plus a sort order. It is
//! storage agnostic: the Postgres store renders it to SQL, the in-memory
//! store evaluates it with [`QueryPlan::matches`].

use std::collections::HashSet;

use super::filters::SearchFilters;
use super::room::{Room, RoomType};

/// One condition on a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    BuildingIs(String),
    /// Exact match on the stored type code
    RoomTypeIs(RoomType),
    CapacityAtLeast(i32),
    CapacityAtMost(i32),
    FloorIs(i32),
    AccessibleOnly,
    /// Case-insensitive substring of the room name
    NameContains(String),
    /// Case-insensitive substring of the room number
    NumberContains(String),
    /// Satisfied when at least one inner predicate is
    AnyOf(Vec<Predicate>),
    /// Room carries every listed feature (ids are distinct)
    HasAllFeatures(Vec<String>),
    /// Matches no room
    Never,
}

impl Predicate {
    /// Evaluate against a room and the ids of all its features
    pub fn matches(&self, room: &Room, feature_ids: &HashSet<&str>) -> bool {
        match self {
            Predicate::BuildingIs(id) => room.building_id == *id,
            Predicate::RoomTypeIs(kind) => room.room_type == kind.as_code(),
            Predicate::CapacityAtLeast(min) => room.capacity >= *min,
            Predicate::CapacityAtMost(max) => room.capacity <= *max,
            Predicate::FloorIs(floor) => room.floor == *floor,
            Predicate::AccessibleOnly => room.accessible,
            Predicate::NameContains(term) => contains_ignore_case(&room.name, term),
            Predicate::NumberContains(term) => contains_ignore_case(&room.number, term),
            Predicate::AnyOf(inner) => inner.iter().any(|p| p.matches(room, feature_ids)),
            Predicate::HasAllFeatures(ids) => ids.iter().all(|id| feature_ids.contains(id.as_str())),
            Predicate::Never => false,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Sort keys, applied in order, all ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    BuildingName,
    RoomNumber,
}

/// Conjunction of predicates plus ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub predicates: Vec<Predicate>,
    pub order: Vec<SortKey>,
}

impl Default for QueryPlan {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            order: vec![SortKey::BuildingName, SortKey::RoomNumber],
        }
    }
}

impl QueryPlan {
    /// Build the plan. Each present filter contributes exactly one predicate;
    /// absent filters contribute none.
    pub fn from_filters(filters: &SearchFilters) -> Self {
        let mut predicates = Vec::new();

        if let Some(ref building_id) = filters.building_id {
            predicates.push(Predicate::BuildingIs(building_id.clone()));
        }

        if let Some(ref room_type) = filters.room_type {
            // a code outside the closed set can never match a stored room
            predicates.push(match RoomType::from_code(room_type) {
                Some(kind) => Predicate::RoomTypeIs(kind),
                None => Predicate::Never,
            });
        }

        if let Some(min) = filters.min_capacity {
            predicates.push(Predicate::CapacityAtLeast(min));
        }

        if let Some(max) = filters.max_capacity {
            predicates.push(Predicate::CapacityAtMost(max));
        }

        if let Some(floor) = filters.floor {
            predicates.push(Predicate::FloorIs(floor));
        }

        if filters.accessible == Some(true) {
            predicates.push(Predicate::AccessibleOnly);
        }

        if let Some(ref term) = filters.search_query {
            predicates.push(Predicate::AnyOf(vec![
                Predicate::NameContains(term.clone()),
                Predicate::NumberContains(term.clone()),
            ]));
        }

        if let Some(ref ids) = filters.feature_ids {
            let mut seen = HashSet::new();
            let distinct: Vec<String> = ids
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .cloned()
                .collect();
            if !distinct.is_empty() {
                predicates.push(Predicate::HasAllFeatures(distinct));
            }
        }

        Self {
            predicates,
            ..Self::default()
        }
    }

    /// Whether the room satisfies every predicate
    pub fn matches(&self, room: &Room, feature_ids: &HashSet<&str>) -> bool {
        self.predicates.iter().all(|p| p.matches(room, feature_ids))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.predicates.is_empty()
    }
}
