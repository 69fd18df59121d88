// Core types and primitives

pub mod kinds;
pub mod slug;

// Re-export commonly used types
pub use kinds::{ContentKind, TagSelector};
pub use slug::{derive_slug, is_valid_slug, slugify};
