// tests/ledger.rs
use boxwatch::ledger::{AlertLedger, LedgerError};

#[test]
fn missing_file_is_an_empty_ledger() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = AlertLedger::new(tmp.path(), "owlcrate");
    assert!(!ledger.exists("https://example.com/a").unwrap());
    assert!(ledger.entries().unwrap().is_empty());
}

#[test]
fn recording_twice_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = AlertLedger::new(tmp.path(), "owlcrate");

    assert!(ledger.record_if_absent("https://example.com/a").unwrap());
    assert!(!ledger.record_if_absent("https://example.com/a").unwrap());
    assert_eq!(ledger.entries().unwrap(), vec!["https://example.com/a"]);
}

#[test]
fn capacity_is_bounded_with_fifo_eviction() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = AlertLedger::new(tmp.path(), "owlcrate");

    for url in ["u1", "u2", "u3"] {
        assert!(ledger.record_if_absent(url).unwrap());
    }
    assert_eq!(ledger.entries().unwrap(), vec!["u1", "u2", "u3"]);

    // The 4th distinct URL evicts exactly the oldest.
    assert!(ledger.record_if_absent("u4").unwrap());
    assert_eq!(ledger.entries().unwrap(), vec!["u2", "u3", "u4"]);

    // The evicted URL may be recorded again (accepted tradeoff).
    assert!(ledger.record_if_absent("u1").unwrap());
    assert_eq!(ledger.entries().unwrap(), vec!["u3", "u4", "u1"]);
}

#[test]
fn reopening_reproduces_the_same_ordered_list() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let ledger = AlertLedger::new(tmp.path(), "fairyloot");
        ledger.record_if_absent("u1").unwrap();
        ledger.record_if_absent("u2").unwrap();
    }
    let reopened = AlertLedger::new(tmp.path(), "fairyloot");
    assert_eq!(reopened.entries().unwrap(), vec!["u1", "u2"]);
    assert!(reopened.exists("u2").unwrap());
}

#[test]
fn sources_have_disjoint_ledgers() {
    let tmp = tempfile::tempdir().unwrap();
    let owl = AlertLedger::new(tmp.path(), "owlcrate");
    let fairy = AlertLedger::new(tmp.path(), "fairyloot");

    owl.record_if_absent("u1").unwrap();
    assert!(!fairy.exists("u1").unwrap());
    assert!(fairy.record_if_absent("u1").unwrap());
}

#[test]
fn corrupt_file_surfaces_persistence_error() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = AlertLedger::new(tmp.path(), "owlcrate");
    std::fs::write(ledger.path(), "not json at all").unwrap();

    assert!(matches!(
        ledger.exists("u1"),
        Err(LedgerError::Corrupt { .. })
    ));
    assert!(matches!(
        ledger.record_if_absent("u1"),
        Err(LedgerError::Corrupt { .. })
    ));
}

#[test]
fn writes_leave_no_temp_file_behind() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = AlertLedger::new(tmp.path(), "owlcrate");
    ledger.record_if_absent("u1").unwrap();

    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["owlcrate.json"]);
}
