//! Validated identifier contracts
//!
//! Everything that may appear as literal text inside a generated predicate
//! must pass through one of these newtypes first:
//! - [`IndexName`]: index names and storage keys
//! - [`ContentPath`]: hierarchical document paths
//!
//! Validation is a hard failure, never a silent sanitization.

mod content_path;
mod index_name;

pub use content_path::{ContentPath, ContentPathError, MAX_PATH_LENGTH};
pub use index_name::{IndexName, IndexNameError, MAX_INDEX_NAME_LENGTH};
