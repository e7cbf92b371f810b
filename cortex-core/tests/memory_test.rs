use cortex_core::memory::{NewMemory, MAX_CONTENT_BYTES};
use cortex_core::{Category, Importance, MemoryType};

#[test]
fn truncation_boundary_exact_10kib_not_truncated() {
    let mut m = NewMemory::new("t", "a".repeat(MAX_CONTENT_BYTES));
    let t = m.truncate_content();
    assert!(!t.was_truncated);
    assert_eq!(t.truncated_length, MAX_CONTENT_BYTES);
}

#[test]
fn truncation_boundary_one_over_is_truncated() {
    let mut m = NewMemory::new("t", "a".repeat(MAX_CONTENT_BYTES + 1));
    let t = m.truncate_content();
    assert!(t.was_truncated);
    assert_eq!(t.original_length, MAX_CONTENT_BYTES + 1);
    assert!(t.truncated_length <= MAX_CONTENT_BYTES);
}

#[test]
fn empty_title_rejected() {
    let m = NewMemory::new("   ", "content");
    assert!(m.validate().is_err());
}

#[test]
fn importance_maps_to_fixed_salience() {
    assert_eq!(Importance::Low.salience(), 0.3);
    assert_eq!(Importance::Normal.salience(), 0.5);
    assert_eq!(Importance::High.salience(), 0.8);
    assert_eq!(Importance::Critical.salience(), 1.0);
}

#[test]
fn category_deletion_thresholds_match_spec_table() {
    assert_eq!(Category::Architecture.deletion_threshold(), 0.15);
    assert_eq!(Category::Error.deletion_threshold(), 0.15);
    assert_eq!(Category::Pattern.deletion_threshold(), 0.18);
    assert_eq!(Category::Preference.deletion_threshold(), 0.20);
    assert_eq!(Category::Context.deletion_threshold(), 0.22);
    assert_eq!(Category::Note.deletion_threshold(), 0.25);
    assert_eq!(Category::Todo.deletion_threshold(), 0.25);
}

#[test]
fn round_trip_enum_strings() {
    for s in ["short_term", "long_term", "episodic"] {
        assert_eq!(MemoryType::parse(s).unwrap().as_str(), s);
    }
    assert!(MemoryType::parse("bogus").is_err());
}
