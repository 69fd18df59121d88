// Services - resolution, projection and write-side editing over the content store

pub mod editor;
pub mod projection;
pub mod resolver;

pub use editor::{ContentEditor, WriteMode};
pub use projection::{ContentRecord, MediaContext, ProjectionLevel};
pub use resolver::{ContentResolver, TechnologyChildren};
