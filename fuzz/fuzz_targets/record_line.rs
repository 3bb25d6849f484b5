//! Fuzz target for Record::parse_line with arbitrary bytes.
//!
//! Run with: cargo +nightly fuzz run record_line
//!
//! Properties checked for every accepted line:
//! - The path never escapes (no absolute path, no `..` segment)
//! - Directories carry no payload and no hash
//! - Re-encoding the record and parsing it again gives the same record

#![no_main]

use libfuzzer_sys::fuzz_target;
use snapture::Record;

fuzz_target!(|data: &[u8]| {
    let Ok(record) = Record::parse_line(data, 0, 0) else {
        return;
    };

    let path = record.path.as_str();
    assert!(!path.starts_with('/'), "absolute path accepted: {:?}", path);
    assert!(
        !path.split('/').any(|segment| segment == ".."),
        "traversal accepted: {:?}",
        path
    );

    if record.is_dir() {
        assert_eq!(record.payload_len(), 0);
        assert!(record.hash.is_none());
    }

    let line = record.to_line();
    let reparsed = Record::parse_line(line.trim_end_matches('\n').as_bytes(), 0, 0)
        .expect("encoded record must parse");
    assert_eq!(reparsed, record);
});
