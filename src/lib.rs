// Technology-learning content API - tag-driven polymorphic content retrieval

// HTTP routes and handlers
pub mod api;

// Shared application state
pub mod app_state;

// Environment configuration
pub mod config;

// Core types and primitives
pub mod core;

// Infrastructure - content store, viewer context and middleware
pub mod infrastructure;

// Content entities
pub mod models;

// Resolver, projections and editor
pub mod services;

// Common utilities
pub mod error;
pub mod data_seeder;

// Re-exports for convenience
pub use api::create_content_router;
pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, AppResult};
