//! Record editing from token streams.
//!
//! # Responsibility
//! - Apply a token stream to a copy of a record, field by field.
//! - Track delete mode and flag toggles across the stream.
//! - Collect failure notes for tokens that could not be applied.
//!
//! # Invariants
//! - The input record is never mutated; edits land on a returned copy.
//! - A failed token never stops the stream; later tokens still apply.
//! - `del` and `add` flip erase mode for every token that follows.

use crate::interpret::classify::{classify, Classification, FieldKind, FieldProfile};
use crate::model::company::{Company, Contact, LogEntry};

/// Record types whose fields can be driven by classified tokens.
///
/// The toggle hooks default to "not owned": a record that lacks the flag
/// reports `false` and the token falls through to shape classification.
pub trait Editable: Clone {
    /// Writes one classified value into its field.
    fn put_field(&mut self, kind: FieldKind, value: String);

    /// Blanks the named field, case-insensitively.
    ///
    /// Collections blank to empty, flags to `false`, text to `""`. Returns
    /// `false` when the record owns no field by that name.
    fn erase_field(&mut self, field: &str) -> bool;

    /// Flips the primary flag, or forces it off. `false` if not owned.
    fn toggle_primary(&mut self, _force_off: bool) -> bool {
        false
    }

    /// Flips the defunct flag, or forces it off. `false` if not owned.
    fn toggle_defunct(&mut self, _force_off: bool) -> bool {
        false
    }
}

impl Editable for Company {
    fn put_field(&mut self, kind: FieldKind, value: String) {
        match kind {
            FieldKind::Url => self.url = value,
            FieldKind::Phone => self.phone = value,
            FieldKind::Address => self.address = value,
            // Remaining kinds are gated off by the company profile.
            _ => {}
        }
    }

    fn erase_field(&mut self, field: &str) -> bool {
        match field.to_lowercase().as_str() {
            "name" => self.name.clear(),
            "url" => self.url.clear(),
            "phone" => self.phone.clear(),
            "address" => self.address.clear(),
            "contacts" => self.contacts.clear(),
            "info" => self.info.clear(),
            "log" => self.log.clear(),
            "defunct" => self.defunct = false,
            _ => return false,
        }
        true
    }

    fn toggle_defunct(&mut self, force_off: bool) -> bool {
        self.defunct = if force_off { false } else { !self.defunct };
        true
    }
}

impl Editable for Contact {
    fn put_field(&mut self, kind: FieldKind, value: String) {
        match kind {
            FieldKind::Name => self.name = value,
            FieldKind::Email => self.email = value,
            FieldKind::Phone => self.phone = value,
            _ => {}
        }
    }

    fn erase_field(&mut self, field: &str) -> bool {
        match field.to_lowercase().as_str() {
            "name" => self.name.clear(),
            "email" => self.email.clear(),
            "phone" => self.phone.clear(),
            "primary" => self.primary = false,
            _ => return false,
        }
        true
    }

    fn toggle_primary(&mut self, force_off: bool) -> bool {
        self.primary = if force_off { false } else { !self.primary };
        true
    }
}

impl Editable for LogEntry {
    fn put_field(&mut self, kind: FieldKind, value: String) {
        match kind {
            FieldKind::Date => self.date = value,
            FieldKind::Message => self.message = value,
            _ => {}
        }
    }

    fn erase_field(&mut self, field: &str) -> bool {
        match field.to_lowercase().as_str() {
            "date" => self.date.clear(),
            "message" => self.message.clear(),
            _ => return false,
        }
        true
    }
}

/// Edited copy of a record plus the failure notes gathered on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome<R> {
    pub record: R,
    /// Human-readable reports for tokens that did not apply, in token order.
    pub notes: Vec<String>,
}

/// Applies a token stream to a copy of `record` under `profile`.
///
/// Keyword tokens are consumed first: `-p` and `defunct` toggle their flags
/// on records that own them (forced off in delete mode), and `del`/`add`
/// switch erase mode. Everything else is classified by shape and either
/// written to a field or, in delete mode, treated as a field name to blank.
/// Unknown field names in delete mode are ignored without note.
pub fn apply<R: Editable>(record: &R, tokens: &[String], profile: FieldProfile) -> EditOutcome<R> {
    let mut edited = record.clone();
    let mut notes = Vec::new();
    let mut delete_mode = false;

    for token in tokens {
        let lowered = token.to_lowercase();
        if lowered == "-p" && edited.toggle_primary(delete_mode) {
            continue;
        }
        if lowered == "defunct" && edited.toggle_defunct(delete_mode) {
            continue;
        }
        if token == "del" || token == "add" {
            delete_mode = token == "del";
            continue;
        }

        if delete_mode {
            edited.erase_field(token);
            continue;
        }

        match classify(token, profile) {
            Classification::Field(kind, value) => edited.put_field(kind, value),
            Classification::Disallowed(kind) => notes.push(format!(
                "Argument of type '{}' not valid for this record type.",
                kind.label()
            )),
            Classification::UnparseableDate => {
                notes.push("Recognized date string, but could not extract a calendar date.".to_string());
            }
            Classification::Unrecognized => {
                notes.push(format!("Could not interpret input '{token}'."));
            }
        }
    }

    EditOutcome {
        record: edited,
        notes,
    }
}
