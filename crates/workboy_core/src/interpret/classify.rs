//! Token shape classification.
//!
//! # Responsibility
//! - Decide which record field a free-form token describes.
//! - Canonicalize matched values (dates, phone digits) on the way through.
//!
//! # Invariants
//! - Shape checks run in one fixed order: date, email, phone number,
//!   address, url, name, message. The first matching shape decides.
//! - A token matching a shape the profile disallows is reported as such and
//!   never retried against later shapes. The name shape is the exception:
//!   without the name capability it falls through to the message fallback.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dates;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w ,\.\-]+$").expect("valid name regex"));
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^w{3}\.[\w\-\.]+(\.\w{2,5}(/[\w\-\./]*)?)$").expect("valid url regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?\d{3}\)?[ \-]?\d{3}[ \-]?\d{4}$").expect("valid phone regex"));
// The address shape is unanchored at the front on purpose; a street or
// building fragment may precede the matched "City, ST" tail.
static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\w\-\.]+, )?\w+, [A-Z]{2}( [\d\-]{5,})?$").expect("valid address regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_\-\.]+@[a-zA-Z0-9_\-\.]+\.[a-zA-Z]{2,5}$").expect("valid email regex")
});
static DATE_LONG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]{3} [0123]?\d(, (\d{2}|\d{4}))?$").expect("valid date regex"));
static DATE_SHORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[01]?\d-[0123]?\d(-(\d{2}|\d{4}))?$").expect("valid short date regex")
});

/// Record field a token can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Email,
    Phone,
    Address,
    Url,
    Name,
    Message,
}

impl FieldKind {
    /// Human-readable label used in rejection reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Email => "email",
            Self::Phone => "phone number",
            Self::Address => "address",
            Self::Url => "web url",
            Self::Name => "name",
            Self::Message => "message",
        }
    }
}

/// Capability flags stating which field kinds a record type accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldProfile {
    pub name: bool,
    pub url: bool,
    pub phone: bool,
    pub address: bool,
    pub email: bool,
    pub date: bool,
    pub message: bool,
}

impl FieldProfile {
    /// Company records take a url, phone number and street address.
    pub const COMPANY: FieldProfile = FieldProfile {
        name: false,
        url: true,
        phone: true,
        address: true,
        email: false,
        date: false,
        message: false,
    };

    /// Contact records take a name, phone number and email.
    pub const CONTACT: FieldProfile = FieldProfile {
        name: true,
        url: false,
        phone: true,
        address: false,
        email: true,
        date: false,
        message: false,
    };

    /// Log entries take a date and a free-form message.
    pub const LOG_ENTRY: FieldProfile = FieldProfile {
        name: false,
        url: false,
        phone: false,
        address: false,
        email: false,
        date: true,
        message: true,
    };
}

/// Outcome of classifying one token against a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Token matched an allowed shape; the value is already canonical.
    Field(FieldKind, String),
    /// Token matched a shape the profile does not accept.
    Disallowed(FieldKind),
    /// Token looked like a date but named no real calendar day.
    UnparseableDate,
    /// No shape matched and the profile has no message fallback.
    Unrecognized,
}

/// True when `text` satisfies the name grammar used for company and
/// contact names.
pub fn is_valid_name(text: &str) -> bool {
    NAME_RE.is_match(text)
}

/// Classifies one token against the capability profile of a record type.
///
/// Dates come back in canonical display form; phone numbers come back as
/// bare digits. Other kinds keep the token text as given.
pub fn classify(token: &str, profile: FieldProfile) -> Classification {
    if DATE_LONG_RE.is_match(token) || DATE_SHORT_RE.is_match(token) {
        if !profile.date {
            return Classification::Disallowed(FieldKind::Date);
        }
        return match dates::parse_flexible(token) {
            Some(day) => Classification::Field(FieldKind::Date, dates::to_display(day)),
            None => Classification::UnparseableDate,
        };
    }

    if EMAIL_RE.is_match(token) {
        if !profile.email {
            return Classification::Disallowed(FieldKind::Email);
        }
        return Classification::Field(FieldKind::Email, token.to_string());
    }

    if PHONE_RE.is_match(token) {
        if !profile.phone {
            return Classification::Disallowed(FieldKind::Phone);
        }
        let digits: String = token.chars().filter(char::is_ascii_digit).collect();
        return Classification::Field(FieldKind::Phone, digits);
    }

    if ADDRESS_RE.is_match(token) {
        if !profile.address {
            return Classification::Disallowed(FieldKind::Address);
        }
        return Classification::Field(FieldKind::Address, token.to_string());
    }

    if URL_RE.is_match(token) {
        if !profile.url {
            return Classification::Disallowed(FieldKind::Url);
        }
        return Classification::Field(FieldKind::Url, token.to_string());
    }

    if profile.name && NAME_RE.is_match(token) {
        return Classification::Field(FieldKind::Name, token.to_string());
    }

    if profile.message {
        return Classification::Field(FieldKind::Message, token.to_string());
    }

    Classification::Unrecognized
}
