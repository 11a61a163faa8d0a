//! Integration tests for shared types

use eavclean_types::*;
use proptest::prelude::*;

#[test]
fn test_megabytes_freed_formatting() {
    let report = MediaReport {
        bytes_freed: 3 * 1024 * 1024 + 512 * 1024,
        ..MediaReport::default()
    };
    assert_eq!(report.megabytes_freed(), "3.50");
    assert_eq!(MediaReport::default().megabytes_freed(), "0.00");
}

#[test]
fn test_combined_report_records_each_domain() {
    let mut combined = ReconciliationReport::new(true);
    combined.record_orphaned_paths(&OrphanedPathReport {
        dry_run: true,
        paths: vec!["x/y/z".into()],
    });
    combined.record_scope_duplicates(&ScopeDuplicateReport {
        dry_run: true,
        removed_rows: 2,
        messages: vec!["dup".into()],
    });
    combined.record_failure(ReconcileDomain::Media, "image root missing");

    assert_eq!(combined.orphaned_paths, vec!["x/y/z".to_string()]);
    assert_eq!(combined.scope_duplicates_removed, 2);
    assert!(!combined.is_success());
    assert_eq!(combined.failures[0].domain, ReconcileDomain::Media);
}

#[test]
fn test_media_ref_serializes_as_plain_string() {
    let json = serde_json::to_string(&MediaFileRef::new("/a/b/c.jpg")).unwrap();
    assert_eq!(json, "\"/a/b/c.jpg\"");
}

proptest! {
    #[test]
    fn canonical_key_ignores_ascii_case(s in "[a-zA-Z0-9/._-]{1,40}") {
        let upper = MediaFileRef::new(s.to_ascii_uppercase());
        let lower = MediaFileRef::new(s.to_ascii_lowercase());
        prop_assert_eq!(upper.canonical_key(), lower.canonical_key());
    }
}
