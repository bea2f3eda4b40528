//! Data models for the room directory

pub mod filters;
pub mod query;
pub mod room;

// Re-export commonly used types
pub use filters::{ParamValue, RawParams, SearchFilters};
pub use query::{Predicate, QueryPlan, SortKey};
pub use room::{Building, BuildingSummary, EnrichedRoom, Feature, FeatureGroup, Room, RoomType};
