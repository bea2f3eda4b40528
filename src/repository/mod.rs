//! Repository layer: read access to rooms and reference data

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        query::QueryPlan,
        room::{Building, Feature, Room, RoomFeatureRow},
    },
};

pub use memory::{Catalog, InMemoryRoomStore};
pub use postgres::PgRoomStore;

/// Read-only room storage. All calls are side-effect free and may run
/// concurrently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Rooms matching the plan, in the plan's order
    async fn find_rooms(&self, plan: &QueryPlan) -> AppResult<Vec<Room>>;

    /// Buildings with the given ids; unknown ids are skipped
    async fn buildings_by_ids(&self, ids: &[String]) -> AppResult<Vec<Building>>;

    /// Every feature attached to any of the given rooms, ordered by
    /// category then name
    async fn features_for_rooms(&self, room_ids: &[String]) -> AppResult<Vec<RoomFeatureRow>>;

    /// All buildings ordered by name then abbreviation
    async fn list_buildings(&self) -> AppResult<Vec<Building>>;

    /// All features ordered by category then name
    async fn list_features(&self) -> AppResult<Vec<Feature>>;

    /// Connectivity check
    async fn ping(&self) -> AppResult<()>;
}
