//! Token interpretation and record editing.
//!
//! # Responsibility
//! - Classify free-form tokens into record fields by shape.
//! - Apply token streams to records without mutating the originals.
//!
//! # Invariants
//! - Classification order is fixed; the first matching shape decides.
//! - Editing is copy-on-write; callers keep the pre-edit record.
//!
//! # See also
//! - `crate::session` for where tokens come from.

pub mod classify;
pub mod editor;
