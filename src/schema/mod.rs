pub mod resolve;
pub mod store;
pub mod types;

pub use resolve::{resolve_columns, SchemaResolution};
pub use store::FormatStore;
pub use types::{SourceFormat, BACKLINKS, DA, NORMALIZED};
