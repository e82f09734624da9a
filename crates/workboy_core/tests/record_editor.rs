use workboy_core::dates;
use workboy_core::{apply, Company, Contact, FieldProfile, LogEntry};

fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}

#[test]
fn company_fields_fill_from_classified_tokens() {
    let company = Company::new("Initech");
    let outcome = apply(
        &company,
        &tokens(&["www.initech.com", "555-123-4567", "Austin, TX"]),
        FieldProfile::COMPANY,
    );

    assert_eq!(outcome.record.url, "www.initech.com");
    assert_eq!(outcome.record.phone, "5551234567");
    assert_eq!(outcome.record.address, "Austin, TX");
    assert!(outcome.notes.is_empty());
    // The input record is untouched.
    assert_eq!(company.url, "");
    assert_eq!(company.phone, "");
}

#[test]
fn later_tokens_overwrite_earlier_ones_of_the_same_kind() {
    let company = Company::new("Initech");
    let outcome = apply(
        &company,
        &tokens(&["www.old.com", "www.new.com"]),
        FieldProfile::COMPANY,
    );
    assert_eq!(outcome.record.url, "www.new.com");
}

#[test]
fn delete_mode_blanks_named_fields() {
    let mut company = Company::new("Initech");
    company.url = "www.initech.com".to_string();
    company.phone = "5551234567".to_string();
    company
        .info
        .insert("00".to_string(), "remote friendly".to_string());

    let outcome = apply(
        &company,
        &tokens(&["del", "url", "Info"]),
        FieldProfile::COMPANY,
    );

    assert_eq!(outcome.record.url, "");
    assert!(outcome.record.info.is_empty());
    // Untargeted fields survive.
    assert_eq!(outcome.record.phone, "5551234567");
    assert!(outcome.notes.is_empty());
}

#[test]
fn add_keyword_returns_to_edit_mode_mid_stream() {
    let mut company = Company::new("Initech");
    company.url = "www.old.com".to_string();

    let outcome = apply(
        &company,
        &tokens(&["del", "url", "add", "www.new.com"]),
        FieldProfile::COMPANY,
    );
    assert_eq!(outcome.record.url, "www.new.com");
}

#[test]
fn unknown_field_names_in_delete_mode_are_silent() {
    let company = Company::new("Initech");
    let outcome = apply(&company, &tokens(&["del", "salary"]), FieldProfile::COMPANY);
    assert_eq!(outcome.record, company);
    assert!(outcome.notes.is_empty());
}

#[test]
fn primary_toggle_flips_and_delete_mode_forces_off() {
    let contact = Contact::default();

    let toggled = apply(&contact, &tokens(&["-p"]), FieldProfile::CONTACT).record;
    assert!(toggled.primary);

    let toggled_twice = apply(&toggled, &tokens(&["-P"]), FieldProfile::CONTACT).record;
    assert!(!toggled_twice.primary);

    let forced_off = apply(&toggled, &tokens(&["del", "-p"]), FieldProfile::CONTACT).record;
    assert!(!forced_off.primary);
}

#[test]
fn defunct_toggle_marks_and_unmarks_companies() {
    let company = Company::new("Initech");

    let closed = apply(&company, &tokens(&["defunct"]), FieldProfile::COMPANY).record;
    assert!(closed.defunct);

    let reopened = apply(&closed, &tokens(&["Defunct"]), FieldProfile::COMPANY).record;
    assert!(!reopened.defunct);
}

#[test]
fn toggles_fall_through_on_records_without_the_flag() {
    // A log entry owns no primary flag, so `-p` lands in the message field.
    let entry = LogEntry::today();
    let outcome = apply(&entry, &tokens(&["-p"]), FieldProfile::LOG_ENTRY);
    assert_eq!(outcome.record.message, "-p");
}

#[test]
fn rejected_tokens_become_notes_without_stopping_the_stream() {
    let company = Company::new("Initech");
    let outcome = apply(
        &company,
        &tokens(&["dev@initech.com", "www.initech.com"]),
        FieldProfile::COMPANY,
    );

    assert_eq!(
        outcome.notes,
        ["Argument of type 'email' not valid for this record type."]
    );
    assert_eq!(outcome.record.url, "www.initech.com");
}

#[test]
fn log_entries_take_dates_and_messages() {
    let entry = LogEntry::today();
    let outcome = apply(
        &entry,
        &tokens(&["Jan 10, 2026", "Sent the application"]),
        FieldProfile::LOG_ENTRY,
    );
    assert_eq!(outcome.record.date, "Jan 10, 2026");
    assert_eq!(outcome.record.message, "Sent the application");
}

#[test]
fn impossible_dates_keep_the_previous_date_and_note_it() {
    let entry = LogEntry::today();
    let today = dates::to_display(dates::today());

    let outcome = apply(&entry, &tokens(&["Feb 31, 2026"]), FieldProfile::LOG_ENTRY);
    assert_eq!(outcome.record.date, today);
    assert_eq!(
        outcome.notes,
        ["Recognized date string, but could not extract a calendar date."]
    );
}

#[test]
fn contacts_take_name_email_and_phone_in_any_order() {
    let contact = Contact::default();
    let outcome = apply(
        &contact,
        &tokens(&["samir@initech.com", "Samir Nagheenanajar", "555 123 4567"]),
        FieldProfile::CONTACT,
    );

    assert_eq!(outcome.record.name, "Samir Nagheenanajar");
    assert_eq!(outcome.record.email, "samir@initech.com");
    assert_eq!(outcome.record.phone, "5551234567");
    assert!(outcome.notes.is_empty());
}
