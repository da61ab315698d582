#![no_main]

use hdwallet_core::address::{is_valid_address, to_checksum_address};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(address) = to_checksum_address(s) {
            assert!(is_valid_address(address.as_str()));
        }
    }
});
