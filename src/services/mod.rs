//! Business logic services

pub mod rooms;

use std::sync::Arc;

use crate::repository::RoomStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub rooms: rooms::RoomDirectoryService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self {
            rooms: rooms::RoomDirectoryService::new(store),
        }
    }
}
