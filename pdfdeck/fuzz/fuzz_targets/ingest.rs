#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfdeck::config::CompressionLevel;
use pdfdeck::engine::{LopdfComposer, LopdfRasterizer};
use pdfdeck::ledger::SourceFile;
use pdfdeck::session::Session;

fuzz_target!(|data: &[u8]| {
    let mut session = Session::new(
        LopdfRasterizer::new(),
        LopdfComposer::new(CompressionLevel::None),
    );

    // Arbitrary bytes must be rejected with an error, never a panic
    if session
        .ingest(vec![SourceFile::new("fuzz.pdf", data.to_vec())])
        .is_err()
    {
        assert_eq!(session.counts().total, 0);
    }
});
