//! Resource model: what can be queried, how it is addressed, and how
//! paginated responses are stitched back together

pub mod endpoint;
pub mod envelope;
pub mod merge;
pub mod paginator;
pub mod path_extractor;
mod query;
mod registry;

pub use endpoint::Endpoint;
pub use envelope::Envelope;
pub use merge::merge;
pub use paginator::{Collection, Completeness, Paginator};
pub use path_extractor::{locate, PathSpec};
pub use query::{validate, ResourceQuery};
pub use registry::*;
