//! Stream cipher tests for smartplug core

use smartplug_core::cipher::{
    decrypt_in_place, decrypt_with_key, encrypt_in_place, encrypt_with_key,
};
use smartplug_core::{decrypt, encrypt, INITIAL_KEY};

#[test]
fn test_roundtrip_empty() {
    assert!(encrypt(&[]).is_empty());
    assert!(decrypt(&[]).is_empty());
    assert_eq!(decrypt(&encrypt(&[])), Vec::<u8>::new());
}

#[test]
fn test_roundtrip_json_payload() {
    let plain = br#"{"system":{"set_relay_state":{"state":1}}}"#;
    let cipher = encrypt(plain);

    assert_eq!(cipher.len(), plain.len());
    assert_ne!(cipher.as_slice(), plain.as_slice());
    assert_eq!(decrypt(&cipher), plain.to_vec());
}

#[test]
fn test_roundtrip_all_byte_values() {
    let plain: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).collect();
    assert_eq!(decrypt(&encrypt(&plain)), plain);
}

#[test]
fn test_roundtrip_repeated_bytes() {
    // Zero bytes leave the running key unchanged, 0xAB bytes zero it
    for fill in [0x00u8, 0xAB, 0xFF] {
        let plain = vec![fill; 1024];
        assert_eq!(decrypt(&encrypt(&plain)), plain, "fill byte 0x{:02x}", fill);
    }
}

#[test]
fn test_determinism_across_calls() {
    let plain = br#"{"system":{"get_sysinfo":{}}}"#;
    let first = encrypt(plain);
    let second = encrypt(plain);
    assert_eq!(first, second);

    // An unrelated call in between must not influence the next one
    let _ = encrypt(b"something else entirely");
    assert_eq!(encrypt(plain), first);
}

#[test]
fn test_key_chains_on_ciphertext() {
    let plain = b"ab";
    let cipher = encrypt(plain);

    assert_eq!(cipher[0], b'a' ^ INITIAL_KEY);
    assert_eq!(cipher[1], b'b' ^ cipher[0]);
}

#[test]
fn test_decrypt_chains_on_ciphertext_not_plaintext() {
    let cipher = [0x10u8, 0x20, 0x30];
    let plain = decrypt(&cipher);

    assert_eq!(plain[0], 0x10 ^ INITIAL_KEY);
    assert_eq!(plain[1], 0x20 ^ 0x10);
    assert_eq!(plain[2], 0x30 ^ 0x20);
}

#[test]
fn test_explicit_seed() {
    let plain = b"seeded";
    for seed in [0x00u8, 0x01, 0x7F, 0xAB, 0xFF] {
        let cipher = encrypt_with_key(seed, plain);
        assert_eq!(decrypt_with_key(seed, &cipher), plain.to_vec());
    }
    assert_eq!(encrypt_with_key(INITIAL_KEY, plain), encrypt(plain));
}

#[test]
fn test_in_place_roundtrip() {
    let plain = br#"{"emeter":{"get_realtime":{}}}"#.to_vec();
    let mut buf = plain.clone();

    encrypt_in_place(INITIAL_KEY, &mut buf);
    assert_ne!(buf, plain);

    decrypt_in_place(INITIAL_KEY, &mut buf);
    assert_eq!(buf, plain);
}
