//! # sweep-store
//!
//! The storage collaborator boundary for the Sweep engine.
//!
//! The durable store is modeled as an external partitioned key-value
//! service: every record is addressed by a partition key (`userId`) and an
//! optional sort key (`photoId`). The [`store::PartitionStore`] trait
//! captures the primitives the engine relies on — single-item get/put/
//! delete, per-partition query with continuation tokens, batch writes that
//! can report unprocessed items, and atomic additive counter updates.
//!
//! Two backends implement the trait:
//!
//! - [`memory::MemoryStore`] — in-process, with failure injection and
//!   small-page support for tests
//! - [`sqlite::SqliteStore`] — `rusqlite` + `r2d2` pool, WAL mode
//!
//! Typed [`records`] and [`repos`] sit above the trait; they are the only
//! place wire shapes are serialized and the comma-joined `folder` string
//! crosses into [`sweep_core::labels::LabelSet`].

#![deny(unsafe_code)]

pub mod errors;
pub mod memory;
pub mod records;
pub mod repos;
pub mod sqlite;
pub mod store;

pub use errors::StoreError;
pub use store::{BatchWriteOutcome, CounterDelta, Page, PartitionStore, RecordKey, WriteRequest};
