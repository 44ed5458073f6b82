//! # sweep-engine
//!
//! The Classification & Lifecycle Engine: all decision logic between the
//! request surface and the storage collaborator.
//!
//! - [`classify`] — the rule evaluator mapping a photo's tag bundle,
//!   filename, and cluster hints to an ordered folder label set
//! - [`geo`] — the reverse-geocoding collaborator and the travel tagger
//! - [`folders`] — per-user folder aggregation with priority ordering and
//!   the reclaimable-storage estimate
//! - [`highlight`] — curated highlight feed: stale screenshots first, then
//!   interest folders, with swipe-history exclusion
//! - [`trash`] — the trash ledger: move-to-trash, batch restore and purge
//!   with chunking and bounded retry, and report accumulation
//!
//! ## Crate Position
//!
//! Sits between `sweep-rpc` (the method surface) and `sweep-store` (the
//! storage boundary). Holds no long-lived state beyond configuration and
//! client handles.

#![deny(unsafe_code)]

pub mod classify;
pub mod errors;
pub mod folders;
pub mod geo;
pub mod highlight;
pub mod trash;

pub use classify::{ClassifyRequest, Classification, Classifier};
pub use errors::EngineError;
pub use geo::{NcpGeocoder, NoopGeocoder, ReverseGeocoder};
pub use highlight::HighlightCurator;
pub use trash::TrashLedger;
