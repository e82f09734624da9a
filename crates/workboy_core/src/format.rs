//! Record rendering for terminal display.
//!
//! # Responsibility
//! - Render companies, contacts, notes and log entries as aligned text.
//! - Derive the at-a-glance application status shown next to a company.
//!
//! # Invariants
//! - Long messages wrap at [`DISPLAY_WIDTH`] columns; continuation lines are
//!   indented to the start of the message column.
//! - Rendering never fails; odd stored values fall back to pass-through.

use std::fmt::{Display, Formatter};

use crate::dates;
use crate::model::company::{Company, Contact, LogEntry};

/// Total character width the renderer targets.
pub const DISPLAY_WIDTH: usize = 98;

/// Where a company sits in the application pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    /// Application process is closed; kept for history only.
    Defunct,
    /// No logged interaction yet.
    Researching,
    /// Days since the newest log entry. Negative for future-dated entries.
    Days(i64),
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defunct => write!(f, "[Defunct]"),
            Self::Researching => write!(f, "Researching"),
            Self::Days(days) => write!(f, "{days} days"),
        }
    }
}

/// Derives the status label for a company.
///
/// The newest log entry drives the day count; its id is the highest one, so
/// it is the last value in id order. An unreadable stored date counts as
/// no interaction.
pub fn application_status(company: &Company) -> ApplicationStatus {
    if company.defunct {
        return ApplicationStatus::Defunct;
    }
    let Some(latest) = company.log.values().last() else {
        return ApplicationStatus::Researching;
    };
    match dates::from_display(&latest.date) {
        Some(day) => ApplicationStatus::Days((dates::today() - day).num_days()),
        None => ApplicationStatus::Researching,
    }
}

/// Wraps a message to the display width, indenting continuation lines.
///
/// Whitespace runs collapse to single spaces. Words longer than a whole
/// line are hard-split.
pub fn line_wrap(message: &str, indent: usize) -> String {
    let width = DISPLAY_WIDTH.saturating_sub(indent).max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in message.split_whitespace() {
        let mut word = word;
        loop {
            let word_len = word.chars().count();
            if current_len == 0 {
                if word_len <= width {
                    current.push_str(word);
                    current_len = word_len;
                    break;
                }
                let split_at = word
                    .char_indices()
                    .nth(width)
                    .map(|(index, _)| index)
                    .unwrap_or(word.len());
                let (head, tail) = word.split_at(split_at);
                lines.push(head.to_string());
                word = tail;
                continue;
            }
            if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
                break;
            }
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }
    if current_len > 0 {
        lines.push(current);
    }

    let spacer = format!("\n{}", " ".repeat(indent));
    lines.join(&spacer)
}

/// Renders a digit string as a phone number.
///
/// Ten digits render as `(AAA) BBB-CCCC`; eleven keep the leading digit as
/// `(D-AAA) BBB-CCCC`. Anything else passes through untouched.
pub fn format_phone(digits: &str) -> String {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.to_string();
    }
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..]),
        11 => format!(
            "({}-{}) {}-{}",
            &digits[0..1],
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        ),
        _ => digits.to_string(),
    }
}

/// One contact line: `00> name                 (primary) | email | phone`.
pub fn format_contact(id: &str, contact: &Contact) -> String {
    let primary = if contact.primary { "(primary)" } else { "" };
    let mut line = format!(
        "{id:0>2}> {name:<20}{primary:>10}",
        name = contact.name,
        primary = primary
    );
    if !contact.email.is_empty() {
        line.push_str(&format!(" | {}", contact.email));
    }
    if !contact.phone.is_empty() {
        line.push_str(&format!(" | {}", format_phone(&contact.phone)));
    }
    line
}

/// One info line: `00> message`, wrapped under the message column.
pub fn format_info(id: &str, message: &str) -> String {
    let lead = format!("{id:0>2}> ");
    let indent = lead.chars().count();
    format!("{lead}{}", line_wrap(message, indent))
}

/// One log line: `00>         date : message`, wrapped under the message.
pub fn format_log(id: &str, entry: &LogEntry) -> String {
    let lead = format!("{id:0>2}> {date:>12} : ", date = entry.date);
    let indent = lead.chars().count();
    format!("{lead}{}", line_wrap(&entry.message, indent))
}

/// Full company record with contact, info and log sections.
pub fn format_company(id: &str, company: &Company) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(
        "{id} {} — {}",
        company.name,
        application_status(company)
    ));

    let mut reach: Vec<String> = Vec::new();
    if !company.url.is_empty() {
        reach.push(company.url.clone());
    }
    if !company.phone.is_empty() {
        reach.push(format_phone(&company.phone));
    }
    if !reach.is_empty() {
        lines.push(reach.join(" | "));
    }

    if !company.address.is_empty() {
        lines.push(company.address.clone());
    }

    if !company.contacts.is_empty() {
        lines.push("\nContacts:".to_string());
        for (contact_id, contact) in &company.contacts {
            lines.push(format_contact(contact_id, contact));
        }
    }

    if !company.info.is_empty() {
        lines.push("\nInfo:".to_string());
        for (info_id, message) in &company.info {
            lines.push(format_info(info_id, message));
        }
    }

    if !company.log.is_empty() {
        lines.push("\nLog:".to_string());
        for (entry_id, entry) in &company.log {
            lines.push(format_log(entry_id, entry));
        }
    }

    lines.join("\n")
}

/// One-line company blurb used by index digests.
pub fn format_company_short(id: &str, company: &Company) -> String {
    format!(
        "{id} {name:<40} | {status}",
        name = company.name,
        status = application_status(company)
    )
}
