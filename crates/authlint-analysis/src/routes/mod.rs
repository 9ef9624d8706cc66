//! Route classification: handler discovery, route metadata, and categories.

pub mod classifier;
pub mod metadata;
pub mod types;

pub use classifier::{DiscoveredHandler, RouteClassifier};
pub use metadata::{MetadataPatterns, MetadataSource, RouteMetadata};
pub use types::{HttpMethod, RouteCategory, RouteHandler};
