//! Command dispatch and the edit-polling loop.
//!
//! # Responsibility
//! - Drive the two-mode command loop over a company index.
//! - Route index-mode and record-mode commands to their handlers.
//! - Accumulate display output and the final save decision.
//!
//! # Invariants
//! - Handlers never print. Every visible line lands in the transcript and
//!   reaches the user through [`TokenSource::show`] before the loop blocks.
//! - Input polling happens only while a record is active and polling is on.
//! - Record-mode command handlers consume the whole remaining token queue.
//! - Record edits are copy-on-write; the index is updated in one step.
//!
//! # See also
//! - `crate::interpret` for how edit tokens become field writes.

use std::collections::VecDeque;

use chrono::NaiveDate;

use crate::dates;
use crate::format::{
    application_status, format_company, format_company_short, format_contact, format_info,
    format_log, ApplicationStatus,
};
use crate::ident::{
    allocate_id, format_id, from_ordered, resolve_selector, Named, COMPANY_ID_WIDTH, SUB_ID_WIDTH,
};
use crate::interpret::classify::{is_valid_name, FieldProfile};
use crate::interpret::editor::apply;
use crate::model::company::{Company, CompanyIndex, Contact, IdMap, LogEntry};

pub mod input;

use self::input::TokenSource;

const HELP_TEXT: &str = r"workboy                     : Display recent activity.
workboy all                 : Displays the entire company index.
workboy recent              : Displays all log activities from the last 30 days.
workboy [name]              : Displays a company record by name or ID. Starts the edit-poller.
workboy add [name]          : Add a new company to the index. Starts the edit-poller.
workboy del [name]          : Deletes a company by name or ID from the index.
workboy once ...            : Prefix that ends continuous polling, treating this request as final.

Any command which starts edit-polling will pass the remaining arguments to the polling system.

Edit-Poller:
done/quit                   : Immediately ends polling and signals the program to save the index.
cancel                      : Immediately ends polling and closes the program without saving.
info [message]              : Adds a new string (must be in quotes) to the company detail.
contact [name/id] [details] : Adds a new or selects and edits an existing company representative.
log [date?] [message]       : Adds a new string (must be in quotes) to the interaction history.
                              Each of the special keywords 'info,' 'contact' and 'log' may be
                              followed by 'del' and an index number to select and remove an entry
                              from the list.
info move [idx] [insert idx]: Moves an existing message to a new place in the message order.
                              As a side effect, reassigns all message IDs by order as well.
rename [name]               : Changes the record's name.
                              To change the company's street address, url, phone number, etc.:
                              submit it into polling, the interpreter will figure out what it is
                              and update the record as such.

Archiving and data-restoration commands.

workboy always saves a copy of the previous data record before writing the current one, in
case of catastrophic data failure. workboy attempts to be smart about this, but it is still
possible to overwrite your data and your auto-backup data, so be careful.

workboy's archival functions are its best data failsafes: they cannot be overwritten as a
matter of workboy's typical operations. It is recommended to archive periodically and before
any changes to workboy's code.

workboy restore-backup          : Restores the last auto-backup to the current record.
workboy archive                 : Save a copy of the record as is under today's date.
workboy restore-archive [date]  : Restores an archive file to the current data record
                                  if the given date is valid.
workboy display-archives        : Prints all known archive files.
workboy delete-archive [date]   : Deletes an archive file if the given date is valid.";

/// What a finished session hands back to the caller.
#[derive(Debug)]
pub struct SessionOutcome {
    /// Possibly edited company index.
    pub index: CompanyIndex,
    /// Whether the caller should persist `index`.
    pub should_save: bool,
    /// Every display line the session produced, in order.
    pub transcript: Vec<String>,
}

/// Index-mode commands, parsed from the first queue token.
#[derive(Debug, Clone, PartialEq, Eq)]
enum IndexCommand {
    Digest,
    All,
    Recent,
    Add,
    Delete,
    Once,
    Help,
    Select(String),
}

impl IndexCommand {
    fn parse(token: Option<String>) -> Self {
        let Some(word) = token else {
            return Self::Digest;
        };
        match word.as_str() {
            "all" => Self::All,
            "recent" => Self::Recent,
            "add" => Self::Add,
            "del" => Self::Delete,
            "once" => Self::Once,
            "help" => Self::Help,
            _ => Self::Select(word),
        }
    }
}

/// Record-mode commands. Unrecognized tokens become field edits.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RecordCommand {
    /// No token available; keep polling.
    Idle,
    Info,
    Contact,
    Log,
    Rename,
    Show,
    Done,
    Cancel,
    Edit(String),
}

impl RecordCommand {
    fn parse(token: Option<String>) -> Self {
        let Some(word) = token else {
            return Self::Idle;
        };
        match word.as_str() {
            "info" => Self::Info,
            "contact" => Self::Contact,
            "log" => Self::Log,
            "rename" => Self::Rename,
            "show" => Self::Show,
            "done" | "quit" => Self::Done,
            "cancel" => Self::Cancel,
            _ => Self::Edit(word),
        }
    }
}

/// Mutable loop state: index, token queue, active record and output.
#[derive(Debug)]
struct Session {
    index: CompanyIndex,
    queue: VecDeque<String>,
    /// Id of the selected company. Some means record mode.
    active: Option<String>,
    polling: bool,
    should_save: bool,
    output: Vec<String>,
    /// How much of `output` has already been handed to the source.
    shown: usize,
}

/// Runs the command loop until the queue runs dry and polling stops.
///
/// `args` is the initial token queue, usually the command line. The source
/// supplies further lines while a record is active and polling is enabled,
/// and receives display output before each blocking read.
pub fn run_session(
    index: CompanyIndex,
    args: Vec<String>,
    source: &mut dyn TokenSource,
) -> SessionOutcome {
    let mut session = Session::new(index, args);
    loop {
        if session.polling_requested() {
            session.flush(source);
            match source.next_tokens() {
                Ok(Some(words)) => session.queue.extend(words),
                Ok(None) => session.end_processing(),
                Err(error) => {
                    log::debug!("event=input_rejected reason=\"{error}\"");
                    session.say("Input was malformed. Try again.");
                }
            }
        }

        let token = session.shift();
        if session.active.is_some() {
            session.handle_record(token);
        } else {
            session.handle_index(token, source);
        }

        if session.queue.is_empty() && !session.polling_requested() {
            break;
        }
    }
    session.flush(source);
    log::info!(
        "event=session_end should_save={} companies={}",
        session.should_save,
        session.index.len()
    );
    SessionOutcome {
        index: session.index,
        should_save: session.should_save,
        transcript: session.output,
    }
}

impl Session {
    fn new(index: CompanyIndex, args: Vec<String>) -> Self {
        Self {
            index,
            queue: VecDeque::from(args),
            active: None,
            polling: true,
            should_save: true,
            output: Vec::new(),
            shown: 0,
        }
    }

    fn shift(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    fn say(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    fn flush(&mut self, source: &mut dyn TokenSource) {
        if self.shown < self.output.len() {
            source.show(&self.output[self.shown..]);
            self.shown = self.output.len();
        }
    }

    fn polling_requested(&self) -> bool {
        self.queue.is_empty() && self.active.is_some() && self.polling
    }

    /// Stops polling and drops queued tokens; the session will save.
    fn end_processing(&mut self) {
        self.polling = false;
        self.queue.clear();
    }

    /// Stops polling, drops queued tokens and withdraws the save.
    fn cancel_changes(&mut self) {
        self.should_save = false;
        self.end_processing();
    }

    /// Clone of the active record, for copy-on-write edits.
    fn active_snapshot(&self) -> Option<(String, Company)> {
        let id = self.active.clone()?;
        let company = self.index.get(&id)?.clone();
        Some((id, company))
    }

    /// Renders the active record into the transcript, framed by blank lines.
    fn show_active_record(&mut self) {
        let Some((id, company)) = self.active_snapshot() else {
            return;
        };
        self.say(String::new());
        self.say(format_company(&id, &company));
        self.say(String::new());
    }

    /// Flushes pending output, then asks the user to confirm.
    fn confirm(&mut self, source: &mut dyn TokenSource) -> bool {
        self.flush(source);
        match source.next_raw("Are you sure?: ") {
            Some(answer) => {
                let answer = answer.to_lowercase();
                answer == "y" || answer == "yes"
            }
            None => false,
        }
    }

    fn report_notes(&mut self, notes: &[String]) {
        for note in notes {
            log::debug!("event=token_rejected detail=\"{note}\"");
            self.say(note.clone());
        }
    }

    // ---- index mode ----------------------------------------------------

    fn handle_index(&mut self, token: Option<String>, source: &mut dyn TokenSource) {
        match IndexCommand::parse(token) {
            IndexCommand::Digest => self.show_digest(),
            IndexCommand::All => self.show_all(),
            IndexCommand::Recent => self.show_recent(),
            IndexCommand::Help => self.show_help(),
            IndexCommand::Once => self.polling = false,
            IndexCommand::Add => self.add_company(),
            IndexCommand::Delete => self.delete_company(source),
            IndexCommand::Select(word) => self.select_company(&word),
        }
    }

    /// Pending applications first, then companies still being researched.
    fn show_digest(&mut self) {
        let applying: Vec<String> = self
            .index
            .iter()
            .filter(|(_, company)| {
                matches!(application_status(company), ApplicationStatus::Days(days) if days >= 0)
            })
            .map(|(id, company)| format_company_short(id, company))
            .collect();
        let researching: Vec<String> = self
            .index
            .iter()
            .filter(|(_, company)| application_status(company) == ApplicationStatus::Researching)
            .map(|(id, company)| format_company_short(id, company))
            .collect();
        let has_both = !applying.is_empty() && !researching.is_empty();
        let has_any = !applying.is_empty() || !researching.is_empty();

        self.say(String::new());
        self.say("Use 'workboy help' for more information.");
        self.say(String::new());
        for line in applying {
            self.say(line);
        }
        if has_both {
            self.say(String::new());
        }
        for line in researching {
            self.say(line);
        }
        if !has_any {
            self.say("No active applications in index.");
        }
        self.say(String::new());

        self.cancel_changes();
    }

    fn show_all(&mut self) {
        let lines: Vec<String> = self
            .index
            .iter()
            .map(|(id, company)| format_company_short(id, company))
            .collect();

        self.say(String::new());
        if lines.is_empty() {
            self.say("Company index is empty. Nothing to show.");
        } else {
            for line in lines {
                self.say(line);
            }
        }
        self.say(String::new());

        self.cancel_changes();
    }

    /// Log entries from the last 30 days across all companies, date order.
    fn show_recent(&mut self) {
        let today = dates::today();
        let mut activities: Vec<(NaiveDate, String)> = Vec::new();
        for company in self.index.values() {
            for entry in company.log.values() {
                let Some(day) = dates::from_display(&entry.date) else {
                    continue;
                };
                if (today - day).num_days() > 30 {
                    continue;
                }
                let ellipsis = if entry.message.chars().count() > 70 {
                    "..."
                } else {
                    ""
                };
                activities.push((
                    day,
                    format!(
                        "{name:<20} > {date} : {message:<70}{ellipsis}",
                        name = company.name,
                        date = entry.date,
                        message = entry.message,
                    ),
                ));
            }
        }
        // Stable sort keeps index order within one day.
        activities.sort_by_key(|(day, _)| *day);

        if !activities.is_empty() {
            self.say(String::new());
            for (_, line) in activities {
                self.say(line);
            }
            self.say(String::new());
        }

        self.cancel_changes();
    }

    fn show_help(&mut self) {
        self.say(String::new());
        self.say(HELP_TEXT);
        self.say(String::new());
        self.cancel_changes();
    }

    /// Creates a company named by the next token and selects it.
    ///
    /// Remaining queue tokens flow into record mode as the first edits.
    fn add_company(&mut self) {
        let name = self.shift().unwrap_or_default();

        if !is_valid_name(&name) {
            self.say(format!(
                "'{name}' does not fit the company-name field schema. Request was voided."
            ));
            self.end_processing();
            return;
        }
        let needle = name.to_lowercase();
        if self
            .index
            .values()
            .any(|company| company.name.to_lowercase() == needle)
        {
            self.say(format!(
                "'{name}' already exists in the record. Request was voided."
            ));
            self.end_processing();
            return;
        }

        let id = match allocate_id(&self.index, COMPANY_ID_WIDTH) {
            Ok(id) => id,
            Err(_) => {
                self.say("Could not add new company: record ID space is full.");
                self.end_processing();
                return;
            }
        };
        log::debug!("event=company_added id={id}");
        self.index.insert(id.clone(), Company::new(name));
        self.active = Some(id);
        self.show_active_record();
    }

    /// Deletes a company by selector, after explicit confirmation.
    fn delete_company(&mut self, source: &mut dyn TokenSource) {
        let key = self.shift().unwrap_or_default();
        let resolved = resolve_selector(&key, &self.index, COMPANY_ID_WIDTH)
            .filter(|id| self.index.contains_key(id));

        match resolved {
            None => {
                self.say(String::new());
                self.say(format!("Selection '{key}' could not be found."));
                self.say(String::new());
            }
            Some(id) => {
                self.active = Some(id.clone());
                self.show_active_record();
                if self.confirm(source) {
                    self.index.remove(&id);
                    self.say("Deleted.");
                    log::debug!("event=company_deleted id={id}");
                }
                self.active = None;
            }
        }
        self.end_processing();
    }

    /// Switches to record mode for the company the selector names.
    fn select_company(&mut self, key: &str) {
        let resolved = resolve_selector(key, &self.index, COMPANY_ID_WIDTH)
            .filter(|id| self.index.contains_key(id));

        match resolved {
            Some(id) => {
                self.active = Some(id);
                self.show_active_record();
            }
            None => {
                self.say(String::new());
                self.say(format!("Selection '{key}' could not be found."));
                self.say(String::new());
                self.cancel_changes();
            }
        }
    }

    // ---- record mode ---------------------------------------------------

    fn handle_record(&mut self, token: Option<String>) {
        match RecordCommand::parse(token) {
            RecordCommand::Idle => {}
            RecordCommand::Info => self.edit_info(),
            RecordCommand::Contact => self.edit_contact(),
            RecordCommand::Log => self.edit_log(),
            RecordCommand::Rename => self.rename_company(),
            RecordCommand::Show => {
                self.show_active_record();
                self.queue.clear();
            }
            RecordCommand::Done => self.end_processing(),
            RecordCommand::Cancel => self.cancel_changes(),
            RecordCommand::Edit(first) => self.edit_company_fields(first),
        }
    }

    /// Routes edit tokens at the company's own fields.
    fn edit_company_fields(&mut self, first: String) {
        let mut tokens: Vec<String> = vec![first];
        tokens.extend(self.queue.drain(..));

        let Some((id, company)) = self.active_snapshot() else {
            return;
        };
        let outcome = apply(&company, &tokens, FieldProfile::COMPANY);
        let mutated = outcome.record != company;
        self.report_notes(&outcome.notes);
        self.index.insert(id, outcome.record);
        if mutated {
            self.show_active_record();
        }
    }

    /// `info [message]`, `info del [selector]`, `info move [id] [position]`.
    fn edit_info(&mut self) {
        let sub = self.shift();
        let Some((id, mut company)) = self.active_snapshot() else {
            self.queue.clear();
            return;
        };
        let mut mutated = false;

        match sub.as_deref() {
            Some("del") => {
                let selector = self.shift().unwrap_or_default();
                match omit_entry(&company.info, &selector, |entry_id, message| {
                    format_info(entry_id, message)
                }) {
                    Ok((next, rendered)) => {
                        company.info = next;
                        mutated = true;
                        self.say(rendered);
                        self.say("Deleted.");
                    }
                    Err(message) => self.say(message),
                }
            }
            Some("move") => {
                mutated = self.move_info(&mut company.info);
            }
            Some(message) => match allocate_id(&company.info, SUB_ID_WIDTH) {
                Ok(entry_id) => {
                    company.info.insert(entry_id, message.to_string());
                    mutated = true;
                }
                Err(_) => self.say("Could not add new message: info detail ID space is full."),
            },
            None => {}
        }

        if mutated {
            self.index.insert(id, company);
            self.show_active_record();
        }
        self.queue.clear();
    }

    /// Relocates one info note and renumbers the whole list by order.
    fn move_info(&mut self, info: &mut IdMap<String>) -> bool {
        let first = self.shift().unwrap_or_default();
        let second = self.shift().unwrap_or_default();
        let (Ok(entry), Ok(target)) = (first.parse::<usize>(), second.parse::<usize>()) else {
            self.say(format!(
                "'info move [idx] [idx]' accepts two numbers: received {first}, {second}. Request voided."
            ));
            return false;
        };

        let entry_id = format_id(entry, SUB_ID_WIDTH);
        if !info.contains_key(&entry_id) {
            self.say(format!(
                "Message ID {entry_id} could not be found in the list."
            ));
            return false;
        }
        let Some(position) = info.keys().position(|key| *key == entry_id) else {
            return false;
        };

        let mut values: Vec<String> = std::mem::take(info).into_values().collect();
        let message = values.remove(position);
        let target = target.min(values.len());
        values.insert(target, message);
        *info = from_ordered(values, SUB_ID_WIDTH);
        true
    }

    /// `contact [selector] [details]` and `contact del [selector]`.
    ///
    /// A selector that names no existing contact seeds a new one; the
    /// selector token itself is fed back to the editor as the first detail,
    /// which usually makes it the contact's name.
    fn edit_contact(&mut self) {
        let key = self.shift();
        let Some((id, mut company)) = self.active_snapshot() else {
            self.queue.clear();
            return;
        };
        let mut mutated = false;

        match key {
            Some(ref word) if word == "del" => {
                let selector = self.shift().unwrap_or_default();
                match omit_entry(&company.contacts, &selector, |contact_id, contact| {
                    format_contact(contact_id, contact)
                }) {
                    Ok((next, rendered)) => {
                        company.contacts = next;
                        mutated = true;
                        self.say(rendered);
                        self.say("Deleted.");
                    }
                    Err(message) => self.say(message),
                }
            }
            Some(word) => {
                let existing = resolve_selector(&word, &company.contacts, SUB_ID_WIDTH)
                    .filter(|contact_id| company.contacts.contains_key(contact_id));
                let (contact_id, base, tokens) = match existing {
                    Some(contact_id) => {
                        let base = company
                            .contacts
                            .get(&contact_id)
                            .cloned()
                            .unwrap_or_default();
                        let tokens: Vec<String> = self.queue.drain(..).collect();
                        (contact_id, base, tokens)
                    }
                    None => match allocate_id(&company.contacts, SUB_ID_WIDTH) {
                        Ok(contact_id) => {
                            let mut tokens = vec![word];
                            tokens.extend(self.queue.drain(..));
                            (contact_id, Contact::default(), tokens)
                        }
                        Err(_) => {
                            self.say("Could not add new contact: contact ID space is full.");
                            self.queue.clear();
                            return;
                        }
                    },
                };

                let outcome = apply(&base, &tokens, FieldProfile::CONTACT);
                mutated =
                    outcome.record != base || !company.contacts.contains_key(&contact_id);
                self.report_notes(&outcome.notes);
                company.contacts.insert(contact_id, outcome.record);
            }
            None => {}
        }

        if mutated {
            self.index.insert(id, company);
            self.show_active_record();
        }
        self.queue.clear();
    }

    /// `log [date?] [message]` and `log del [selector]`.
    ///
    /// Additions re-sort the whole log by date and renumber it; deletions
    /// keep the remaining ids untouched.
    fn edit_log(&mut self) {
        let sub = self.shift();
        let Some((id, mut company)) = self.active_snapshot() else {
            self.queue.clear();
            return;
        };
        let mut mutated = false;

        if sub.as_deref() == Some("del") {
            let selector = self.shift().unwrap_or_default();
            match omit_entry(&company.log, &selector, |entry_id, entry| {
                format_log(entry_id, entry)
            }) {
                Ok((next, rendered)) => {
                    company.log = next;
                    mutated = true;
                    self.say(rendered);
                    self.say("Deleted.");
                }
                Err(message) => self.say(message),
            }
        } else {
            let mut tokens: Vec<String> = Vec::new();
            if let Some(first) = sub {
                tokens.push(first);
            }
            tokens.extend(self.queue.drain(..));

            match allocate_id(&company.log, SUB_ID_WIDTH) {
                Ok(entry_id) => {
                    let outcome = apply(&LogEntry::today(), &tokens, FieldProfile::LOG_ENTRY);
                    self.report_notes(&outcome.notes);
                    company.log.insert(entry_id, outcome.record);
                    company.log = sort_log(std::mem::take(&mut company.log));
                    mutated = true;
                }
                Err(_) => self.say("Could not add new log: message ID space is full."),
            }
        }

        if mutated {
            self.index.insert(id, company);
            self.show_active_record();
        }
        self.queue.clear();
    }

    /// `rename [name]`, validated against the name grammar and uniqueness.
    fn rename_company(&mut self) {
        let new_name = self.shift().unwrap_or_default();
        let Some((id, mut company)) = self.active_snapshot() else {
            self.queue.clear();
            return;
        };

        if !is_valid_name(&new_name) {
            self.say(String::new());
            self.say(format!(
                "'{new_name}' does not fit the company name schema. Name was not changed."
            ));
            self.say(String::new());
        } else {
            let needle = new_name.to_lowercase();
            let duplicate = self
                .index
                .iter()
                .any(|(other_id, other)| *other_id != id && other.name.to_lowercase() == needle);
            if duplicate {
                self.say(String::new());
                self.say(format!(
                    "'{new_name}' already exists in the record. Name was not changed."
                ));
                self.say(String::new());
            } else {
                self.say(String::new());
                self.say(format!("{} → {}", company.name, new_name));
                self.say(String::new());
                company.name = new_name;
                self.index.insert(id, company);
                self.show_active_record();
            }
        }
        self.queue.clear();
    }
}

/// Removes one entry from an id map by selector.
///
/// Returns the shrunk map and a rendering of the removed entry, or a
/// not-found report including the selector as given.
fn omit_entry<V: Named + Clone>(
    map: &IdMap<V>,
    selector: &str,
    render: impl Fn(&str, &V) -> String,
) -> Result<(IdMap<V>, String), String> {
    if let Some(id) = resolve_selector(selector, map, SUB_ID_WIDTH) {
        let mut next = map.clone();
        if let Some(removed) = next.remove(&id) {
            return Ok((next, render(&id, &removed)));
        }
    }
    Err(format!(
        "'{selector}' could not be found or is not a valid selection."
    ))
}

/// Rebuilds a log map sorted by entry date, ids reassigned in order.
///
/// The sort is stable, so entries sharing a date keep their id order.
/// Entries whose stored date no longer parses sort first.
fn sort_log(log: IdMap<LogEntry>) -> IdMap<LogEntry> {
    let mut entries: Vec<LogEntry> = log.into_values().collect();
    entries.sort_by_key(|entry| dates::from_display(&entry.date).unwrap_or(NaiveDate::MIN));
    from_ordered(entries, SUB_ID_WIDTH)
}
