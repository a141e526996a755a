//! `voxa` memory infrastructure
//!
//! This crate provides the storage primitive shared by the `voxa` runtime:
//!
//! - **Generational arena**: slot storage with stable, stale-detecting
//!   [`Index`] handles. Graph items, relations, shared contents and linked
//!   list nodes all live in an [`Arena`].
//!

pub mod arena;

pub use arena::{Arena, ArenaFull, ArenaStats, Index};
