//! Unit tests for key generators

use crate::generators::{
    KeyGenerator, KeyParams, RandomStringGenerator, DEFAULT_KEY_CHARS, DEFAULT_KEY_LENGTH,
};

#[test]
fn test_default_generator_uses_default_length_and_alphabet() {
    let key = RandomStringGenerator.generate(&KeyParams::default());

    assert_eq!(key.len(), DEFAULT_KEY_LENGTH);
    assert!(key.chars().all(|c| DEFAULT_KEY_CHARS.contains(c)));
}

#[test]
fn test_generator_honors_explicit_length_and_alphabet() {
    let params = KeyParams::with_alphabet(100, "abc");
    let key = RandomStringGenerator.generate(&params);

    assert_eq!(key.len(), 100);
    assert!(key.chars().all(|c| "abc".contains(c)));
}

#[test]
fn test_single_char_alphabet_is_deterministic() {
    let params = KeyParams::with_alphabet(8, "x");
    let key = RandomStringGenerator.generate(&params);

    assert_eq!(key, "xxxxxxxx");
}

#[test]
fn test_generated_keys_differ() {
    // 36^20 keys; two equal draws would point at a broken generator
    let a = RandomStringGenerator.generate(&KeyParams::default());
    let b = RandomStringGenerator.generate(&KeyParams::default());

    assert_ne!(a, b);
}
