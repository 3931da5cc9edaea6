//! Autokey XOR stream cipher
//!
//! Every byte is XORed with a running key. The key starts at the seed and is
//! replaced by the ciphertext byte just produced (encrypt) or consumed
//! (decrypt), so both directions advance the key over the same sequence.
//!
//! Key state never outlives a single call: each message starts from the seed.

use crate::INITIAL_KEY;

/// Encrypt `plaintext` with the protocol seed
pub fn encrypt(plaintext: &[u8]) -> Vec<u8> {
    encrypt_with_key(INITIAL_KEY, plaintext)
}

/// Decrypt `ciphertext` with the protocol seed
pub fn decrypt(ciphertext: &[u8]) -> Vec<u8> {
    decrypt_with_key(INITIAL_KEY, ciphertext)
}

/// Encrypt with an explicit seed
pub fn encrypt_with_key(seed: u8, plaintext: &[u8]) -> Vec<u8> {
    let mut buf = plaintext.to_vec();
    encrypt_in_place(seed, &mut buf);
    buf
}

/// Decrypt with an explicit seed
pub fn decrypt_with_key(seed: u8, ciphertext: &[u8]) -> Vec<u8> {
    let mut buf = ciphertext.to_vec();
    decrypt_in_place(seed, &mut buf);
    buf
}

/// Encrypt a buffer in place
#[inline]
pub fn encrypt_in_place(seed: u8, buf: &mut [u8]) {
    let mut key = seed;
    for byte in buf.iter_mut() {
        *byte ^= key;
        key = *byte;
    }
}

/// Decrypt a buffer in place
#[inline]
pub fn decrypt_in_place(seed: u8, buf: &mut [u8]) {
    let mut key = seed;
    for byte in buf.iter_mut() {
        let next = *byte;
        *byte ^= key;
        key = next;
    }
}
