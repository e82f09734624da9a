//! Record id allocation and selector resolution.
//!
//! # Responsibility
//! - Hand out fixed-width, zero-padded decimal ids inside an id map.
//! - Resolve user selectors (id digits or record name) to map keys.
//! - Compact id spaces back to a dense `00..N-1` numbering.
//!
//! # Invariants
//! - An allocated id is never one already present in the map.
//! - Compaction preserves iteration order and is idempotent.
//! - Allocation fails only when the map already occupies the whole id space.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::company::{Company, Contact, LogEntry};

/// Id width for the top-level company index.
pub const COMPANY_ID_WIDTH: usize = 4;
/// Id width for every per-company sub-collection.
pub const SUB_ID_WIDTH: usize = 2;

/// Returned when a collection has no free id left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSpaceFull {
    pub width: usize,
}

impl Display for IdSpaceFull {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "id space of width {} is full", self.width)
    }
}

impl Error for IdSpaceFull {}

/// Renders a numeric id at the given width, e.g. `7` at width 4 is `0007`.
///
/// Values that overflow the width keep all their digits; such ids can never
/// be allocated and only appear when resolving out-of-range selectors.
pub fn format_id(value: usize, width: usize) -> String {
    format!("{value:0width$}")
}

/// Picks a free id for the next record in `map`.
///
/// The scan starts at `len - 1` and walks upward, wrapping at the width's
/// capacity. A map that grew append-only therefore gets `len` itself on the
/// second probe; maps with deletion gaps reuse the first free id past the
/// start point. Ids held by live records are never returned.
pub fn allocate_id<V>(map: &BTreeMap<String, V>, width: usize) -> Result<String, IdSpaceFull> {
    let capacity = 10usize.pow(width as u32);
    if map.len() >= capacity {
        return Err(IdSpaceFull { width });
    }
    let start = map.len().saturating_sub(1);
    for offset in 0..capacity {
        let candidate = format_id((start + offset) % capacity, width);
        if !map.contains_key(&candidate) {
            return Ok(candidate);
        }
    }
    // Unreachable while len < capacity, kept for totality.
    Err(IdSpaceFull { width })
}

/// Rebuilds an id map from values in order, numbering them `00..N-1`.
pub fn from_ordered<V>(values: Vec<V>, width: usize) -> BTreeMap<String, V> {
    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| (format_id(position, width), value))
        .collect()
}

/// Renumbers a map densely from zero, keeping record order.
pub fn compact_ids<V>(map: BTreeMap<String, V>, width: usize) -> BTreeMap<String, V> {
    let values: Vec<V> = map.into_values().collect();
    from_ordered(values, width)
}

/// Record types addressable by display name as well as by id.
pub trait Named {
    /// Name to match selectors against, if the record has one.
    fn record_name(&self) -> Option<&str> {
        None
    }
}

impl Named for Company {
    fn record_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Named for Contact {
    fn record_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Named for LogEntry {}

impl Named for String {}

/// Resolves a user selector to a map key.
///
/// All-digit input is taken as an id and padded to `width`; the key is
/// returned whether or not the map holds it, so callers decide how to report
/// a miss. Any other input is matched case-insensitively against record
/// names and resolves only when a record carries that name.
pub fn resolve_selector<V: Named>(
    input: &str,
    map: &BTreeMap<String, V>,
    width: usize,
) -> Option<String> {
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        let value: usize = input.parse().ok()?;
        return Some(format_id(value, width));
    }
    let needle = input.to_lowercase();
    map.iter()
        .find(|(_, record)| {
            record
                .record_name()
                .is_some_and(|name| name.to_lowercase() == needle)
        })
        .map(|(id, _)| id.clone())
}
