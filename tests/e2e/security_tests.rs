//! Security-specific tests.
//!
//! These tests verify:
//! 1. Malformed inputs are rejected without panicking
//! 2. Failures are atomic (no partial key material)
//! 3. Secrets stay out of Debug output and log lines
//! 4. Checksums catch single-word and single-character corruption
//! 5. Random-input fuzzing of the parsers

use hdwallet_core::address::{is_valid_address, to_checksum_address};
use hdwallet_core::mnemonic::{self, MnemonicError};
use hdwallet_core::path::{self, PathError};
use hdwallet_core::units::ether_to_wei;
use hdwallet_core::{
    derive_multiple_addresses, generate_wallet, restore_wallet, FixedEntropy, Strength,
    WalletError, ETHEREUM_ACCOUNT_PATH, ETHEREUM_PATH,
};
use rand::Rng;

const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

// ============================================================================
// 1. Malformed Input Panic Tests (should NOT panic)
// ============================================================================

#[test]
fn test_validate_mnemonic_garbage_does_not_panic() {
    let inputs = [
        "",
        "a",
        "hello world",
        "abandon abandon abandon", // Too few words
        &"abandon ".repeat(100),   // Too many words
        "🎉 🎊 🎈 🎃 🎄 🎅 🎆 🎇 🎁 🎂 🎀 🎍", // Unicode
        "\0\0\0\0\0\0\0\0\0\0\0\0", // Null bytes
        &"a".repeat(10000),          // Very long
        &"a ".repeat(12),            // Right count, unknown words
    ];

    for input in &inputs {
        assert!(!mnemonic::validate(input), "{:?} must not validate", input);
        assert!(restore_wallet(input, "", ETHEREUM_PATH).is_err());
    }
}

#[test]
fn test_parse_path_garbage_does_not_panic() {
    let inputs = [
        "",
        "m",
        "m/",
        "m//",
        "m/'",
        "m/h",
        "m/99999999999999999999",
        "m/0/",
        "m/0x10",
        "m/١",   // Arabic-Indic digit one
        "m/0'/0'h",
        &"m/0".repeat(1000),
        &format!("m{}", "/0'".repeat(1000)),
        "\0",
    ];

    for input in &inputs {
        let _ = path::parse(input);
    }
}

#[test]
fn test_checksum_address_garbage_does_not_panic() {
    let inputs = [
        "",
        "0x",
        "0X",
        "0x0",
        &"0".repeat(40),
        &"z".repeat(40),
        "0xé5aeb6053f3e94c9b9a09f33669435e7ef1bea",
        &"f".repeat(42),
        "0x0XABCDEF0123456789ABCDEF0123456789ABCDEF01",
    ];

    for input in &inputs {
        let _ = to_checksum_address(input);
        let _ = is_valid_address(input);
    }
}

#[test]
fn test_ether_amount_garbage_does_not_panic() {
    for input in ["", ".", "..", "1..", "-0", "NaN", "inf", "1e-18", "٣.٥", &"9".repeat(500)] {
        assert!(ether_to_wei(input).is_err(), "{:?} must be rejected", input);
    }
}

// ============================================================================
// 2. Atomic Failure
// ============================================================================

#[test]
fn test_invalid_mnemonic_error_kind() {
    let err = restore_wallet("zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo", "", ETHEREUM_PATH)
        .unwrap_err();
    assert!(matches!(
        err,
        WalletError::Mnemonic(MnemonicError::InvalidMnemonic(_))
    ));
}

#[test]
fn test_invalid_path_error_kinds() {
    assert!(matches!(
        path::parse("m/abc/60'/0'/0/0"),
        Err(PathError::InvalidIndex(_))
    ));
    assert!(matches!(
        path::parse("44'/60'/0'/0/0"),
        Err(PathError::InvalidPathFormat(_))
    ));
    assert!(matches!(
        derive_multiple_addresses(ABANDON_ABOUT, 5, "", "44'/60'/0'"),
        Err(WalletError::Path(PathError::InvalidPathFormat(_)))
    ));
}

#[test]
fn test_entropy_failure_returns_no_wallet() {
    let mut short = FixedEntropy::new(vec![0u8; 31]);
    let result = generate_wallet(&mut short, Strength::Bits256, "", ETHEREUM_PATH);
    assert!(matches!(
        result,
        Err(WalletError::Mnemonic(MnemonicError::Entropy(_)))
    ));
}

#[test]
fn test_batch_index_out_of_range_fails_whole_batch() {
    // Account index must stay below 2^31
    let ok = derive_multiple_addresses(ABANDON_ABOUT, 2, "", "m/44'/60'/2147483647'").unwrap();
    assert_eq!(ok.len(), 2);
    assert!(derive_multiple_addresses(ABANDON_ABOUT, 2, "", "m/44'/60'/2147483648'").is_err());

    // A count past the last normal index fails before any allocation
    assert!(matches!(
        derive_multiple_addresses(ABANDON_ABOUT, u32::MAX, "", ETHEREUM_ACCOUNT_PATH),
        Err(WalletError::Path(PathError::InvalidIndex(_)))
    ));
}

// ============================================================================
// 3. Secret Hygiene
// ============================================================================

#[test]
fn test_debug_output_hides_secrets() {
    let wallet = restore_wallet(ABANDON_ABOUT, "", ETHEREUM_PATH).unwrap();
    let rendered = format!("{:?} {:?} {:?}", wallet, wallet.seed, wallet.master_key);

    assert!(!rendered.contains("abandon"));
    assert!(!rendered.contains(&wallet.seed.to_hex()));
    assert!(!rendered.contains(&hex::encode(wallet.master_key.private_key())));
    assert!(!rendered.contains(&hex::encode(wallet.master_key.chain_code())));
    assert!(!rendered.contains(&hex::encode(*wallet.private_key)));

    // Public data is still visible
    assert!(rendered.contains(wallet.address.as_str()));

    let entropy = mnemonic::to_entropy(ABANDON_ABOUT).unwrap();
    assert!(!format!("{:?}", entropy).contains("00000000"));
}

#[test]
fn test_zeroize_works_on_private_key_copy() {
    use zeroize::Zeroize;

    let wallet = restore_wallet(ABANDON_ABOUT, "", ETHEREUM_PATH).unwrap();
    let mut copy = *wallet.private_key;
    assert!(copy.iter().any(|&b| b != 0));
    copy.zeroize();
    assert!(copy.iter().all(|&b| b == 0));
}

// ============================================================================
// 4. Checksum Corruption
// ============================================================================

#[test]
fn test_single_word_substitution_mostly_caught() {
    // A 12-word mnemonic has a 4-bit checksum, so ~1/16 of substitutions
    // still validate. Count them instead of expecting zero.
    let words: Vec<&str> = ABANDON_ABOUT.split(' ').collect();
    let list = bip39::Language::English.word_list();
    let mut accepted = 0;
    let mut tried = 0;

    for replacement in list.iter().step_by(7) {
        let mut corrupted = words.clone();
        corrupted[5] = *replacement;
        if corrupted == words {
            continue;
        }
        tried += 1;
        if mnemonic::validate(&corrupted.join(" ")) {
            accepted += 1;
        }
    }

    assert!(tried > 250);
    assert!(accepted < tried / 4, "{} of {} substitutions accepted", accepted, tried);
}

#[test]
fn test_address_case_flip_detected() {
    let wallet = restore_wallet(ABANDON_ABOUT, "", ETHEREUM_PATH).unwrap();
    let address = wallet.address.as_str();

    for (i, c) in address.char_indices().skip(2) {
        if !c.is_ascii_alphabetic() {
            continue;
        }
        let flipped: String = address
            .char_indices()
            .map(|(j, ch)| {
                if j == i {
                    if ch.is_ascii_uppercase() {
                        ch.to_ascii_lowercase()
                    } else {
                        ch.to_ascii_uppercase()
                    }
                } else {
                    ch
                }
            })
            .collect();
        assert!(!is_valid_address(&flipped), "case flip at {} not detected", i);
    }
}

// ============================================================================
// 5. Fuzz Tests (random inputs)
// ============================================================================

#[test]
fn test_mnemonic_fuzz_random_word_sequences() {
    let mut rng = rand::thread_rng();
    let list = bip39::Language::English.word_list();

    for _ in 0..500 {
        let count = [12, 15, 18, 21, 24][rng.gen_range(0..5)];
        let phrase: Vec<&str> = (0..count).map(|_| list[rng.gen_range(0..2048)]).collect();
        let phrase = phrase.join(" ");

        // Our verdict must agree with the bip39 crate
        let ours = mnemonic::validate(&phrase);
        let reference = bip39::Mnemonic::parse(phrase.as_str()).is_ok();
        assert_eq!(ours, reference, "disagreement on {:?}", phrase);
    }
}

#[test]
fn test_path_fuzz_random_strings() {
    let mut rng = rand::thread_rng();
    let alphabet = b"m/0123456789'hH x-";

    for _ in 0..1000 {
        let len = rng.gen_range(0..30);
        let input: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect();

        // Reparse of a successful parse is stable
        if let Ok(segments) = path::parse(&input) {
            let canonical = hdwallet_core::DerivationPath::from(segments.clone()).to_string();
            assert_eq!(path::parse(&canonical).unwrap(), segments);
        }
    }
}

#[test]
fn test_batch_derivation_uses_requested_account() {
    let account0 = derive_multiple_addresses(ABANDON_ABOUT, 2, "", ETHEREUM_ACCOUNT_PATH).unwrap();
    let account1 = derive_multiple_addresses(ABANDON_ABOUT, 2, "", "m/44'/60'/1'").unwrap();
    assert_ne!(account0[0].address, account1[0].address);
    assert!(account1[1].path.starts_with("m/44'/60'/1'/0/"));
}
