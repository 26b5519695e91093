//! Query compiler and result materialization for Cairn
//!
//! The compiler turns a [`cairn_core::QuerySpec`] into a [`cairn_core::Plan`]:
//! predicate text over the storage dialect, bound parameters, ordering,
//! and pagination. It is a pure function over the injected registry and
//! ranking backend — no I/O, no locking.
//!
//! Result materialization wraps executed rows into lazily hydrated
//! handles: the full index documents load in one batch on first access,
//! from the same read snapshot that produced the rows.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod compile;
mod config;
mod path;
mod results;
mod sort;
mod term;

pub use compile::QueryCompiler;
pub use config::QueryConfig;
pub use path::PathMode;
pub use results::{ResultHandle, ResultSet};
