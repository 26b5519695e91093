//! Catalog integration tests
//!
//! Cross-crate scenarios driving the registry, compiler, pending buffer,
//! and result materialization together against the in-memory reference
//! store in `mock_store`.
//!
//! # Test Organization
//!
//! - `end_to_end`: register → stage → flush → compile → execute flows
//! - `query_properties`: semantic pins for every index kind, path mode
//!   truth table, pagination, parameter binding
//! - `buffer_lifecycle`: savepoint/rollback/flush/commit/abort against a
//!   store with real savepoint semantics

mod buffer_lifecycle;
mod end_to_end;
mod fixtures;
mod query_properties;
