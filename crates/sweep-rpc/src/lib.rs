//! # sweep-rpc
//!
//! Shape-level request surface: a method registry mapping dotted method
//! names to handlers that validate JSON params and call into
//! `sweep-engine`. Transport is out of scope; any server loop that can
//! deliver `(method, params)` pairs can sit on top.
//!
//! Method surface:
//! - Classify: photo, save, results
//! - Folders: summary, photos; screenshots.subfolders
//! - Highlight: folders, photos, action, history
//! - Trash: add, list, restore, purge
//! - Report: get
//! - Preferences: save, get; prompts.init
//!
//! ## Crate Position
//!
//! Top of the stack; depends on `sweep-engine` and `sweep-store`.

#![deny(unsafe_code)]

pub mod context;
pub mod errors;
pub mod handlers;
pub mod registry;

pub use context::RpcContext;
pub use errors::RpcError;
pub use registry::{MethodHandler, MethodRegistry};
