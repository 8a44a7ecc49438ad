pub mod analysis;
pub mod errors;
pub mod process;
pub mod schema;

pub use analysis::{analyze_backlinks, AnalysisReport};
pub use errors::BacklinkError;
