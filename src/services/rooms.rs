//! Room directory service: search, result assembly and reference data

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        filters::SearchFilters,
        query::QueryPlan,
        room::{Building, BuildingSummary, EnrichedRoom, Feature, FeatureGroup},
    },
    repository::RoomStore,
};

/// Everything a directory page needs, produced from one filter snapshot
#[derive(Debug, Serialize, ToSchema)]
pub struct DirectoryPage {
    /// Normalized filters, echoed back for UI state restoration
    pub filters: SearchFilters,
    /// Query string reproducing `filters`
    pub query_string: String,
    pub buildings: Vec<Building>,
    pub features: Vec<Feature>,
    pub feature_groups: Vec<FeatureGroup>,
    pub rooms: Vec<EnrichedRoom>,
}

/// Group features by category, keeping the incoming order within and
/// across groups
pub fn group_by_category(features: &[Feature]) -> Vec<FeatureGroup> {
    let mut groups: IndexMap<&str, Vec<Feature>> = IndexMap::new();
    for feature in features {
        groups
            .entry(feature.category.as_str())
            .or_default()
            .push(feature.clone());
    }
    groups
        .into_iter()
        .map(|(category, features)| FeatureGroup {
            category: category.to_string(),
            features,
        })
        .collect()
}

#[derive(Clone)]
pub struct RoomDirectoryService {
    store: Arc<dyn RoomStore>,
}

impl RoomDirectoryService {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// Search rooms and attach building fields and full feature lists.
    /// Rows come back in plan order and are not filtered again here.
    pub async fn search_rooms(&self, filters: &SearchFilters) -> AppResult<Vec<EnrichedRoom>> {
        let plan = QueryPlan::from_filters(filters);
        tracing::debug!("Room search plan: {:?}", plan.predicates);

        let rooms = self.store.find_rooms(&plan).await?;
        if rooms.is_empty() {
            return Ok(Vec::new());
        }

        let room_ids: Vec<String> = rooms.iter().map(|r| r.id.clone()).collect();
        let mut building_ids: Vec<String> = rooms.iter().map(|r| r.building_id.clone()).collect();
        building_ids.sort();
        building_ids.dedup();

        let (buildings, feature_rows) = tokio::try_join!(
            self.store.buildings_by_ids(&building_ids),
            self.store.features_for_rooms(&room_ids),
        )?;

        let buildings: HashMap<String, BuildingSummary> = buildings
            .iter()
            .map(|b| (b.id.clone(), BuildingSummary::from(b)))
            .collect();

        let mut features: HashMap<String, Vec<Feature>> = HashMap::new();
        for row in feature_rows {
            let (room_id, feature) = row.into_feature();
            features.entry(room_id).or_default().push(feature);
        }

        let enriched = rooms
            .into_iter()
            .map(|room| {
                let building = buildings.get(&room.building_id).cloned();
                if building.is_none() {
                    tracing::warn!(
                        "Room {} references missing building {}",
                        room.id,
                        room.building_id
                    );
                }
                let room_features = features.remove(&room.id).unwrap_or_default();
                EnrichedRoom::new(room, building, room_features)
            })
            .collect::<Vec<_>>();

        tracing::debug!("Room search returned {} rooms", enriched.len());
        Ok(enriched)
    }

    /// All buildings, ordered by name
    pub async fn list_buildings(&self) -> AppResult<Vec<Building>> {
        self.store.list_buildings().await
    }

    /// All features, ordered by category then name
    pub async fn list_features(&self) -> AppResult<Vec<Feature>> {
        self.store.list_features().await
    }

    /// All features grouped by category
    pub async fn feature_groups(&self) -> AppResult<Vec<FeatureGroup>> {
        let features = self.list_features().await?;
        Ok(group_by_category(&features))
    }

    /// Run the room search and both reference reads concurrently. Any
    /// failure fails the whole page.
    pub async fn load_directory(&self, filters: SearchFilters) -> AppResult<DirectoryPage> {
        let (rooms, buildings, features) = tokio::try_join!(
            self.search_rooms(&filters),
            self.list_buildings(),
            self.list_features(),
        )?;

        Ok(DirectoryPage {
            query_string: filters.to_query_string(),
            filters,
            feature_groups: group_by_category(&features),
            buildings,
            features,
            rooms,
        })
    }

    /// Storage connectivity check
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
