//! Fuzz target for ArchivePath::new with arbitrary string input.
//!
//! Run with: cargo +nightly fuzz run archive_path
//!
//! Key properties being tested:
//! - Path traversal rejection (`..` segments)
//! - Absolute path rejection
//! - NUL bytes and record framing characters never get through

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(path_str) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(path) = snapture::ArchivePath::new(path_str) {
        let accepted = path.as_str();

        assert!(
            !accepted.split('/').any(|segment| segment == ".." || segment == "."),
            "dot segment accepted: {:?}",
            accepted
        );
        assert!(
            !accepted.starts_with('/'),
            "Absolute path accepted: {:?}",
            accepted
        );
        assert!(
            !accepted.contains(['\0', '|', '\n', '\r']),
            "reserved character accepted: {:?}",
            accepted
        );
    }
});
