//! Fuzz target for reading whole archives from arbitrary bytes.
//!
//! Exercises line splitting, record parsing and payload skipping with
//! malformed or adversarial input, looking for panics or hangs.
//!
//! Run with: cargo +nightly fuzz run archive_read

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::{Cursor, sink};

fuzz_target!(|data: &[u8]| {
    // Listing seeks past payloads
    let mut reader = snapture::ArchiveReader::new(Cursor::new(data));
    for entry in reader.entries() {
        match entry {
            Ok(entry) => {
                let _ = entry.to_string();
            }
            Err(_) => break,
        }
    }

    // Copying reads through them, the way a restore does
    let mut reader = snapture::ArchiveReader::new(Cursor::new(data));
    while let Ok(Some(record)) = reader.next_record() {
        let copied = reader.copy_payload(&mut sink());
        if let Ok(n) = copied {
            assert_eq!(n, record.payload_len());
        } else {
            break;
        }
    }
});
