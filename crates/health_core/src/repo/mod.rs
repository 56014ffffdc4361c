//! Repository layer over record stores.
//!
//! # Responsibility
//! - Provide entity CRUD and list queries on top of a `RecordStore`.
//! - Keep filter/pagination/sort rules in one place for every entity.
//!
//! # Invariants
//! - Writes are whole-record upserts keyed by `id`.
//! - Repository APIs return semantic errors (`NotFound`, `Save`) in addition
//!   to storage and data errors.

pub mod query;
pub mod repository;
