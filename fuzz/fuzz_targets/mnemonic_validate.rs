#![no_main]

use hdwallet_core::mnemonic;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // A phrase that validates must also decode to entropy
        if mnemonic::validate(s) {
            assert!(mnemonic::to_entropy(s).is_ok());
        }
    }
});
