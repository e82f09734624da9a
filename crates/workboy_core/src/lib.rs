//! Core domain logic for workboy, a job-application tracker.
//! This crate is the single source of truth for record semantics.

pub mod dates;
pub mod format;
pub mod ident;
pub mod interpret;
pub mod logging;
pub mod model;
pub mod session;

pub use format::{
    application_status, format_company, format_company_short, format_contact, format_info,
    format_log, format_phone, line_wrap, ApplicationStatus,
};
pub use ident::{
    allocate_id, compact_ids, format_id, from_ordered, resolve_selector, IdSpaceFull, Named,
    COMPANY_ID_WIDTH, SUB_ID_WIDTH,
};
pub use interpret::classify::{classify, is_valid_name, Classification, FieldKind, FieldProfile};
pub use interpret::editor::{apply, EditOutcome, Editable};
pub use logging::{default_log_level, init_logging};
pub use model::company::{Company, CompanyIndex, Contact, IdMap, LogEntry};
pub use session::input::{InputError, ScriptedSource, StdinSource, TokenSource};
pub use session::{run_session, SessionOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
