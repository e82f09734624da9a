//! Domain model for the company index.
//!
//! # Responsibility
//! - Define the canonical record shapes persisted in the datafile.
//! - Keep one JSON-stable layout shared by editing, display and storage.
//!
//! # Invariants
//! - Every record lives under a fixed-width, zero-padded decimal id.
//! - Deleting a record removes its id; ids are only compacted at save time.
//!
//! # See also
//! - `crate::ident` for id allocation and selector resolution.

pub mod company;
