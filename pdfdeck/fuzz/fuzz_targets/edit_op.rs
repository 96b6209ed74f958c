#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfdeck::config::{EditOp, PageRange};

fuzz_target!(|data: &[u8]| {
    let s = std::str::from_utf8(data).unwrap_or("");

    // Anything that parses must print back to an equivalent operation
    if let Ok(op) = s.parse::<EditOp>() {
        let reparsed: EditOp = op.to_string().parse().unwrap();
        assert_eq!(op, reparsed);
    }

    if let Ok(range) = PageRange::parse(s) {
        for page in range.to_pages(64) {
            assert!(range.contains(page));
        }
    }
});
