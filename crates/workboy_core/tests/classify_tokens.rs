use workboy_core::dates;
use workboy_core::{classify, Classification, FieldKind, FieldProfile};

#[test]
fn date_shapes_win_over_every_other_interpretation() {
    // `Mar 5, 2026` also fits the name grammar, but dates are probed first.
    assert_eq!(
        classify("Mar 5, 2026", FieldProfile::LOG_ENTRY),
        Classification::Field(FieldKind::Date, "Mar 05, 2026".to_string())
    );
    assert_eq!(
        classify("3-5-26", FieldProfile::LOG_ENTRY),
        Classification::Field(FieldKind::Date, "Mar 05, 2026".to_string())
    );
}

#[test]
fn yearless_dates_complete_to_the_current_year() {
    let year = dates::current_year();
    assert_eq!(
        classify("Mar 5", FieldProfile::LOG_ENTRY),
        Classification::Field(FieldKind::Date, format!("Mar 05, {year}"))
    );
}

#[test]
fn impossible_calendar_days_are_flagged_not_dropped() {
    assert_eq!(
        classify("Feb 31, 2026", FieldProfile::LOG_ENTRY),
        Classification::UnparseableDate
    );
    assert_eq!(
        classify("13-45", FieldProfile::LOG_ENTRY),
        Classification::UnparseableDate
    );
}

#[test]
fn emails_resolve_before_phones_and_urls() {
    assert_eq!(
        classify("dev@initech.com", FieldProfile::CONTACT),
        Classification::Field(FieldKind::Email, "dev@initech.com".to_string())
    );
}

#[test]
fn phones_canonicalize_to_bare_digits() {
    assert_eq!(
        classify("555-123-4567", FieldProfile::COMPANY),
        Classification::Field(FieldKind::Phone, "5551234567".to_string())
    );
    assert_eq!(
        classify("(555) 123 4567", FieldProfile::COMPANY),
        Classification::Field(FieldKind::Phone, "5551234567".to_string())
    );
}

#[test]
fn addresses_match_on_their_city_state_tail() {
    // The address shape anchors on `City, ST`, anywhere in the token.
    assert_eq!(
        classify("123 Main St., Springfield, IL 62704", FieldProfile::COMPANY),
        Classification::Field(
            FieldKind::Address,
            "123 Main St., Springfield, IL 62704".to_string()
        )
    );
    assert_eq!(
        classify("Austin, TX", FieldProfile::COMPANY),
        Classification::Field(FieldKind::Address, "Austin, TX".to_string())
    );
}

#[test]
fn urls_require_the_www_prefix() {
    assert_eq!(
        classify("www.initech.com", FieldProfile::COMPANY),
        Classification::Field(FieldKind::Url, "www.initech.com".to_string())
    );
    // Without the prefix the token is name-shaped, which companies reject.
    assert_eq!(
        classify("initech.com", FieldProfile::COMPANY),
        Classification::Unrecognized
    );
}

#[test]
fn names_apply_only_where_the_profile_allows_them() {
    assert_eq!(
        classify("Peter Gibbons", FieldProfile::CONTACT),
        Classification::Field(FieldKind::Name, "Peter Gibbons".to_string())
    );
    assert_eq!(
        classify("Peter Gibbons", FieldProfile::COMPANY),
        Classification::Unrecognized
    );
}

#[test]
fn name_shaped_tokens_fall_through_to_messages() {
    assert_eq!(
        classify("Interview went well", FieldProfile::LOG_ENTRY),
        Classification::Field(FieldKind::Message, "Interview went well".to_string())
    );
}

#[test]
fn messages_accept_text_no_other_shape_takes() {
    assert_eq!(
        classify("Sent the follow-up email!", FieldProfile::LOG_ENTRY),
        Classification::Field(
            FieldKind::Message,
            "Sent the follow-up email!".to_string()
        )
    );
}

#[test]
fn disallowed_shapes_report_the_shape_not_the_token() {
    assert_eq!(
        classify("dev@initech.com", FieldProfile::COMPANY),
        Classification::Disallowed(FieldKind::Email)
    );
    assert_eq!(
        classify("Mar 5, 2026", FieldProfile::CONTACT),
        Classification::Disallowed(FieldKind::Date)
    );
    // Message permission does not rescue a recognized but forbidden shape.
    assert_eq!(
        classify("5551234567", FieldProfile::LOG_ENTRY),
        Classification::Disallowed(FieldKind::Phone)
    );
}

#[test]
fn unrecognized_tokens_fit_no_shape_at_all() {
    assert_eq!(
        classify("!!!", FieldProfile::COMPANY),
        Classification::Unrecognized
    );
}
