#![no_main]

use hdwallet_core::path::{self, DerivationPath};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(segments) = path::parse(s) {
            let canonical = DerivationPath::from(segments.clone()).to_string();
            assert_eq!(path::parse(&canonical).ok(), Some(segments));
        }
    }
});
