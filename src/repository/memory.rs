//! In-memory room store, loaded from a [`Catalog`] snapshot

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::RoomStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        query::{QueryPlan, SortKey},
        room::{Building, Feature, Room, RoomFeature, RoomFeatureRow},
    },
};

/// Complete reference data snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub room_features: Vec<RoomFeature>,
}

impl Catalog {
    /// Load a catalog from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Storage(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Storage(format!("Failed to parse catalog {}: {}", path.display(), e))
        })
    }
}

struct Indexed {
    catalog: Catalog,
    buildings: HashMap<String, usize>,
    features: HashMap<String, usize>,
    /// room id -> feature ids
    room_features: HashMap<String, HashSet<String>>,
}

/// Immutable store; clones share the same snapshot
#[derive(Clone)]
pub struct InMemoryRoomStore {
    inner: Arc<Indexed>,
}

impl InMemoryRoomStore {
    /// Index the catalog. Rows the relational schema would refuse are
    /// dropped with a warning: rooms in an unknown building or with a type
    /// code outside [`RoomType`](crate::models::room::RoomType), and links
    /// to an unknown room or feature.
    pub fn new(mut catalog: Catalog) -> Self {
        let buildings: HashMap<String, usize> = catalog
            .buildings
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();
        let features: HashMap<String, usize> = catalog
            .features
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();

        catalog.rooms.retain(|room| {
            if !buildings.contains_key(&room.building_id) {
                tracing::warn!(
                    "Dropping room {}: unknown building {}",
                    room.id,
                    room.building_id
                );
                return false;
            }
            if room.kind().is_none() {
                tracing::warn!(
                    "Dropping room {}: unknown room type {}",
                    room.id,
                    room.room_type
                );
                return false;
            }
            true
        });

        let room_ids: HashSet<&str> = catalog.rooms.iter().map(|r| r.id.as_str()).collect();
        let mut room_features: HashMap<String, HashSet<String>> = HashMap::new();
        for link in &catalog.room_features {
            if !room_ids.contains(link.room_id.as_str()) || !features.contains_key(&link.feature_id)
            {
                tracing::warn!(
                    "Dropping feature link {} -> {}: unknown room or feature",
                    link.room_id,
                    link.feature_id
                );
                continue;
            }
            room_features
                .entry(link.room_id.clone())
                .or_default()
                .insert(link.feature_id.clone());
        }

        Self {
            inner: Arc::new(Indexed {
                catalog,
                buildings,
                features,
                room_features,
            }),
        }
    }

    fn building(&self, id: &str) -> Option<&Building> {
        self.inner
            .buildings
            .get(id)
            .map(|&i| &self.inner.catalog.buildings[i])
    }

    fn feature_ids_of(&self, room_id: &str) -> HashSet<&str> {
        self.inner
            .room_features
            .get(room_id)
            .map(|ids| ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn compare(&self, order: &[SortKey], a: &Room, b: &Room) -> Ordering {
        let building_name = |room: &Room| self.building(&room.building_id).map(|b| b.name.as_str());

        order
            .iter()
            .map(|key| match key {
                SortKey::BuildingName => building_name(a).cmp(&building_name(b)),
                SortKey::RoomNumber => a.number.cmp(&b.number),
            })
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

fn sort_features(features: &mut [Feature]) {
    features.sort_by(|a, b| {
        (&a.category, &a.name, &a.id).cmp(&(&b.category, &b.name, &b.id))
    });
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn find_rooms(&self, plan: &QueryPlan) -> AppResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self
            .inner
            .catalog
            .rooms
            .iter()
            .filter(|room| plan.matches(room, &self.feature_ids_of(&room.id)))
            .cloned()
            .collect();

        rooms.sort_by(|a, b| self.compare(&plan.order, a, b));
        Ok(rooms)
    }

    async fn buildings_by_ids(&self, ids: &[String]) -> AppResult<Vec<Building>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| self.building(id).cloned())
            .collect())
    }

    async fn features_for_rooms(&self, room_ids: &[String]) -> AppResult<Vec<RoomFeatureRow>> {
        let mut rows = Vec::new();
        for room_id in room_ids {
            let Some(ids) = self.inner.room_features.get(room_id) else {
                continue;
            };
            let mut features: Vec<Feature> = ids
                .iter()
                .filter_map(|id| self.inner.features.get(id))
                .map(|&i| self.inner.catalog.features[i].clone())
                .collect();
            sort_features(&mut features);
            rows.extend(features.into_iter().map(|f| RoomFeatureRow {
                room_id: room_id.clone(),
                id: f.id,
                name: f.name,
                category: f.category,
            }));
        }
        Ok(rows)
    }

    async fn list_buildings(&self) -> AppResult<Vec<Building>> {
        let mut buildings = self.inner.catalog.buildings.clone();
        buildings.sort_by(|a, b| (&a.name, &a.abbreviation).cmp(&(&b.name, &b.abbreviation)));
        Ok(buildings)
    }

    async fn list_features(&self) -> AppResult<Vec<Feature>> {
        let mut features = self.inner.catalog.features.clone();
        sort_features(&mut features);
        Ok(features)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
