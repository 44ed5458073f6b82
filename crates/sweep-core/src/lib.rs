//! # sweep-core
//!
//! Foundation types for the Sweep photo-cleanup engine.
//!
//! This crate provides the shared vocabulary that all other Sweep crates
//! depend on:
//!
//! - **Folder labels**: [`labels::FolderLabel`] and the ordered
//!   [`labels::LabelSet`] that backs the comma-joined `folder` field
//! - **Tag scores**: [`tags::TagScores`] with explicitly optional numeric
//!   fields instead of an open map
//! - **Highlight actions**: [`action::HighlightActionKind`]
//! - **Retry**: [`retry::RetryConfig`] with linear backoff calculation
//! - **Savings**: [`savings::Savings`] environmental-impact arithmetic
//! - **Logging**: [`logging::init_tracing`] subscriber setup
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other sweep crates.

#![deny(unsafe_code)]

pub mod action;
pub mod labels;
pub mod logging;
pub mod retry;
pub mod savings;
pub mod tags;
