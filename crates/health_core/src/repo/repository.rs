//! Generic entity repository over a record store.
//!
//! # Responsibility
//! - Provide create/get/update/soft-delete/restore for any `Entity`.
//! - Run list queries (filter → paginate → sort) over the full collection.
//!
//! # Invariants
//! - Every save re-reads the collection, replaces the row with a matching
//!   `id` (or appends) and writes the whole collection back.
//! - A failure anywhere in the save path is reported as `RepoError::Save`.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::model::{Entity, ModelError};
use crate::repo::query::{apply_filters, apply_pagination, apply_sort, Filters, SortSpec};
use crate::store::{Record, RecordStore, StoreError};
use log::{debug, error, info};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// No record with the requested id.
    NotFound(String),
    /// The save path (read-modify-write) failed.
    Save(StoreError),
    /// The collection could not be read.
    Storage(StoreError),
    /// A record could not be turned into an entity.
    Model(ModelError),
    /// `get_by_field` was asked for a field the records do not have.
    UnknownField(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Record not found: {id}"),
            Self::Save(err) => write!(f, "Failed to save object: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Model(err) => write!(f, "{err}"),
            Self::UnknownField(field) => write!(f, "Field '{field}' not found in records."),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Save(err) | Self::Storage(err) => Some(err),
            Self::Model(err) => Some(err),
            Self::NotFound(_) | Self::UnknownField(_) => None,
        }
    }
}

impl From<ModelError> for RepoError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Repository for one entity type, composed over a record store.
pub struct Repository<E: Entity, S: RecordStore> {
    store: S,
    allowed_filters: Vec<String>,
    allowed_sort: Vec<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: RecordStore> Repository<E, S> {
    /// Creates a repository using the entity's default allow-lists.
    pub fn new(store: S) -> Self {
        Self::with_allow_lists(store, E::FILTER_FIELDS, E::SORT_FIELDS)
    }

    /// Creates a repository with explicit filter and sort allow-lists.
    pub fn with_allow_lists(store: S, filters: &[&str], sort: &[&str]) -> Self {
        Self {
            store,
            allowed_filters: filters.iter().map(|field| field.to_string()).collect(),
            allowed_sort: sort.iter().map(|field| field.to_string()).collect(),
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn allowed_filters(&self) -> &[String] {
        &self.allowed_filters
    }

    pub fn allowed_sort(&self) -> &[String] {
        &self.allowed_sort
    }

    /// Builds a new entity from validated input and persists it.
    ///
    /// Missing `id`/`date_created` are generated during construction.
    pub fn create(&self, data: &Record) -> RepoResult<E> {
        let entity = E::from_record(data)?;
        self.save(&entity)?;
        info!(
            "event=record_create module=repo status=ok collection={} id={}",
            E::COLLECTION,
            entity.id()
        );
        Ok(entity)
    }

    /// Finds one entity by id, deleted or not.
    pub fn get_by_id(&self, id: &str) -> RepoResult<E> {
        let records = self.store.read_all()?;
        let record = records
            .iter()
            .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        Ok(E::from_record(record)?)
    }

    /// Lists entities: filter, then paginate, then sort the page.
    pub fn get_all(&self, filters: &Filters, sort: &SortSpec) -> RepoResult<Vec<E>> {
        let records = self.store.read_all()?;
        let total = records.len();
        let mut results = apply_filters(records, filters, &self.allowed_filters);

        if let (Some(page), Some(page_size)) = (filters.page, filters.page_size) {
            results = apply_pagination(results, page, page_size);
        }

        if let (Some(order_by), Some(order_mode)) = (&sort.order_by, &sort.order_mode) {
            if self.allowed_sort.iter().any(|field| field == order_by) {
                results = apply_sort(results, order_by, order_mode);
            }
        }

        debug!(
            "event=record_list module=repo status=ok collection={} scanned={} returned={}",
            E::COLLECTION,
            total,
            results.len()
        );
        results
            .iter()
            .map(|record| E::from_record(record).map_err(RepoError::from))
            .collect()
    }

    /// Exact-match lookup on any field, deleted records included.
    ///
    /// The field must exist on the first stored record.
    pub fn get_by_field(&self, field: &str, value: &Value) -> RepoResult<Vec<E>> {
        let records = self.store.read_all()?;
        if let Some(first) = records.first() {
            if !first.contains_key(field) {
                return Err(RepoError::UnknownField(field.to_string()));
            }
        }

        records
            .iter()
            .filter(|record| record.get(field) == Some(value))
            .map(|record| E::from_record(record).map_err(RepoError::from))
            .collect()
    }

    /// Applies patch fields that exist on the entity and have a setter,
    /// refreshes `date_updated` and persists.
    ///
    /// Unknown and read-only patch fields are skipped.
    pub fn update(&self, mut existing: E, patch: &Record) -> RepoResult<E> {
        let current = existing.to_record();
        for (field, value) in patch {
            if !current.contains_key(field) {
                debug!(
                    "event=record_update module=repo status=skip collection={} field={} reason=unknown",
                    E::COLLECTION,
                    field
                );
                continue;
            }
            if !existing.apply_field(field, value)? {
                debug!(
                    "event=record_update module=repo status=skip collection={} field={} reason=read_only",
                    E::COLLECTION,
                    field
                );
            }
        }

        existing.meta_mut().touch();
        self.save(&existing)?;
        info!(
            "event=record_update module=repo status=ok collection={} id={}",
            E::COLLECTION,
            existing.id()
        );
        Ok(existing)
    }

    /// Soft-deletes: sets `date_deleted` to now and persists. The row stays.
    pub fn delete(&self, mut entity: E) -> RepoResult<E> {
        entity.soft_delete();
        self.save(&entity)?;
        info!(
            "event=record_delete module=repo status=ok collection={} id={}",
            E::COLLECTION,
            entity.id()
        );
        Ok(entity)
    }

    /// Clears `date_deleted` and persists.
    pub fn restore(&self, mut entity: E) -> RepoResult<E> {
        entity.restore();
        self.save(&entity)?;
        info!(
            "event=record_restore module=repo status=ok collection={} id={}",
            E::COLLECTION,
            entity.id()
        );
        Ok(entity)
    }

    pub fn exists(&self, id: &str) -> RepoResult<bool> {
        match self.get_by_id(id) {
            Ok(_) => Ok(true),
            Err(RepoError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Whether a record with `id` exists and is soft-deleted.
    pub fn exists_but_deleted(&self, id: &str) -> RepoResult<bool> {
        match self.get_by_id(id) {
            Ok(entity) => Ok(entity.is_deleted()),
            Err(RepoError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn save(&self, entity: &E) -> RepoResult<()> {
        let record = entity.to_record();
        self.upsert(record).map_err(|err| {
            error!(
                "event=record_save module=repo status=error collection={} id={} error={}",
                E::COLLECTION,
                entity.id(),
                err
            );
            RepoError::Save(err)
        })
    }

    fn upsert(&self, record: Record) -> Result<(), StoreError> {
        let mut records = self.store.read_all()?;
        let position = records
            .iter()
            .position(|existing| existing.get("id") == record.get("id"));
        match position {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
        self.store.write_all(&records)
    }
}
