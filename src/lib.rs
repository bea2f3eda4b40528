//! Room Directory
//!
//! A REST JSON server for browsing and filtering a directory of campus
//! rooms by building, type, capacity, floor, accessibility, free text and
//! feature tags.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
