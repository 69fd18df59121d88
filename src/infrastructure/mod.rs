// Infrastructure - persistence, request context and middleware
pub mod content_store;         // Query interface over content and tags
pub mod middleware;            // Viewer context middleware and extractor
pub mod sqlite_store;          // SQLite implementation of the content store
pub mod viewer;                // Viewer context

pub use content_store::{ContentStore, FieldFilter, FilterValue, ListQuery, OrderTerm, Page, SearchSpec};
pub use middleware::{viewer_context_middleware, Staff, Vc};
pub use sqlite_store::SqliteContentStore;
pub use viewer::{Viewer, ViewerContext};
