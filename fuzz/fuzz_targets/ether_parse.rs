#![no_main]

use hdwallet_core::units::{ether_to_wei, wei_to_ether};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(wei) = ether_to_wei(s) {
            assert_eq!(ether_to_wei(&wei_to_ether(wei)).ok(), Some(wei));
        }
    }
});
