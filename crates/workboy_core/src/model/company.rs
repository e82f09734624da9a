//! Company domain model.
//!
//! # Responsibility
//! - Define the company record and its owned sub-collections.
//! - Provide constructors that establish the canonical field layout.
//!
//! # Invariants
//! - `name` is the only mandatory field; everything else may stay blank.
//! - Sub-collections map two-digit ids to their records; the company index
//!   maps four-digit ids to companies.
//! - JSON field order follows struct declaration order and must stay stable,
//!   since the datafile is read back by exact field name.
//!
//! # See also
//! - `crate::ident` for how ids are allocated inside these maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dates;

/// Ordered id-to-record map used for every record collection.
///
/// `BTreeMap` keeps keys sorted, so iteration order is id order and the
/// serialized JSON object is deterministic.
pub type IdMap<V> = BTreeMap<String, V>;

/// Top-level collection: four-digit company id to company record.
pub type CompanyIndex = IdMap<Company>;

/// One tracked job application target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Display name, also usable as a selector in place of the id.
    pub name: String,
    pub url: String,
    /// Bare digit string; formatting happens only at display time.
    pub phone: String,
    pub address: String,
    /// Two-digit contact id to contact record.
    pub contacts: IdMap<Contact>,
    /// Two-digit note id to free-form note text.
    pub info: IdMap<String>,
    /// Two-digit entry id to dated log entry, kept sorted by date.
    pub log: IdMap<LogEntry>,
    /// Marks an application as dead without deleting its history.
    pub defunct: bool,
}

impl Company {
    /// Creates a blank company record carrying only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A person attached to a company record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    /// Bare digit string, same convention as `Company::phone`.
    pub phone: String,
    /// At most one contact per company is meant to carry this, but that is
    /// a user convention; nothing enforces it.
    pub primary: bool,
}

/// One dated activity note in a company's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Canonical display form, e.g. `Mar 05, 2026`.
    pub date: String,
    pub message: String,
}

impl LogEntry {
    /// Creates an empty entry dated today.
    ///
    /// New log entries default to the current day; an explicit date token
    /// in the edit input overrides it.
    pub fn today() -> Self {
        Self {
            date: dates::to_display(dates::today()),
            message: String::new(),
        }
    }
}
