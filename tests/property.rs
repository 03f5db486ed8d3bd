#![allow(clippy::unwrap_used)] // unwrap() is idiomatic in property tests

use pqfe::*;
use proptest::prelude::*;

fn kem_variant() -> impl Strategy<Value = KemVariant> {
    prop::sample::select(KemVariant::ALL.to_vec())
}

fn signature_variant() -> impl Strategy<Value = SignatureVariant> {
    prop::sample::select(SignatureVariant::ALL.to_vec())
}

fn cipher() -> impl Strategy<Value = CipherKind> {
    prop::sample::select(CipherKind::ALL.to_vec())
}

// ============================================================================
// Property: Round-trip encryption/decryption
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn prop_encrypt_decrypt_roundtrip(
        message in prop::collection::vec(any::<u8>(), 0..10000),
        variant in kem_variant(),
        cipher in cipher(),
    ) {
        let kp = generate_kem_keypair(variant);
        let env = encrypt(&message, &kp.public_key, variant, cipher)?;

        prop_assert_eq!(env.kem_ciphertext.len(), variant.ciphertext_len());
        prop_assert_eq!(env.aead_blob.len(), message.len() + NONCE_LEN + TAG_LEN);

        let decrypted = decrypt(&env, kp.private_key.as_bytes(), variant, cipher)?;
        prop_assert_eq!(decrypted, message);
    }
}

// ============================================================================
// Property: Both ciphers behave identically under the same key
// ============================================================================

proptest! {
    #[test]
    fn prop_ciphers_substitutable(
        message in prop::collection::vec(any::<u8>(), 0..4096),
        key in prop::collection::vec(any::<u8>(), 32..64),
    ) {
        for cipher in CipherKind::ALL {
            let blob = cipher.encrypt(&message, &key)?;
            prop_assert_eq!(blob.len(), message.len() + NONCE_LEN + TAG_LEN);
            prop_assert_eq!(cipher.decrypt(&blob, &key)?, message.clone());
        }
    }
}

// ============================================================================
// Property: Any bit flip in the AEAD blob is detected
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn prop_tamper_detected(
        message in prop::collection::vec(any::<u8>(), 0..1000),
        cipher in cipher(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let kp = generate_kem_keypair(KemVariant::Kyber512);
        let mut env = encrypt(&message, &kp.public_key, KemVariant::Kyber512, cipher)?;

        let idx = position.index(env.aead_blob.len());
        env.aead_blob[idx] ^= 1 << bit;

        let result = decrypt(&env, kp.private_key.as_bytes(), KemVariant::Kyber512, cipher);
        let rejected = matches!(result, Err(PqfeError::Decryption { .. }));
        prop_assert!(rejected, "bit flip at {} went undetected", idx);
    }
}

// ============================================================================
// Property: Wrong recipient key cannot decrypt
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn prop_wrong_key_cannot_decrypt(
        message in prop::collection::vec(any::<u8>(), 1..1000),
        variant in kem_variant(),
        cipher in cipher(),
    ) {
        let kp = generate_kem_keypair(variant);
        let wrong = generate_kem_keypair(variant);
        let env = encrypt(&message, &kp.public_key, variant, cipher)?;

        let result = decrypt(&env, wrong.private_key.as_bytes(), variant, cipher);
        prop_assert!(result.is_err());
    }
}

// ============================================================================
// Property: An envelope never opens under another variant
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn prop_cross_variant_rejected(
        message in prop::collection::vec(any::<u8>(), 0..256),
        v1 in kem_variant(),
        v2 in kem_variant(),
    ) {
        prop_assume!(v1 != v2);
        let kp1 = generate_kem_keypair(v1);
        let kp2 = generate_kem_keypair(v2);
        let env = encrypt(&message, &kp1.public_key, v1, CipherKind::Aes256Gcm)?;

        prop_assert!(decrypt(&env, kp2.private_key.as_bytes(), v2, CipherKind::Aes256Gcm).is_err());
    }
}

// ============================================================================
// Property: Sign/verify correctness
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn prop_sign_verify(
        data in prop::collection::vec(any::<u8>(), 0..2000),
        variant in signature_variant(),
        flip in any::<prop::sample::Index>(),
    ) {
        let kp = generate_signature_keypair(variant);
        let other = generate_signature_keypair(variant);
        let mut sig = sign(&data, kp.private_key.as_bytes(), variant)?;

        prop_assert!(verify(&data, &sig, &kp.public_key, variant)?.is_valid());
        prop_assert!(!verify(&data, &sig, &other.public_key, variant)?.is_valid());

        let idx = flip.index(sig.len());
        sig[idx] ^= 0x80;
        prop_assert_eq!(verify(&data, &sig, &kp.public_key, variant)?, Verification::Invalid);
    }
}

// ============================================================================
// Property: Sign-then-encrypt returns the payload whatever the verdict
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn prop_decrypt_and_verify_always_returns_payload(
        message in prop::collection::vec(any::<u8>(), 0..1000),
        cipher in cipher(),
        use_right_key in any::<bool>(),
    ) {
        let suite = Suite::new(KemVariant::Kyber512, SignatureVariant::Dilithium2, cipher);
        let enc = generate_kem_keypair(suite.kem);
        let sig = generate_signature_keypair(suite.signature);
        let other = generate_signature_keypair(suite.signature);

        let signed = encrypt_and_sign(&message, &enc.public_key, sig.private_key.as_bytes(), &suite)?;
        let verifier = if use_right_key { &sig.public_key } else { &other.public_key };
        let opened = decrypt_and_verify(&signed, enc.private_key.as_bytes(), verifier, &suite)?;

        prop_assert_eq!(opened.verified(), use_right_key);
        prop_assert_eq!(opened.payload, message);
    }
}

// ============================================================================
// Property: Re-encryption preserves the payload for every recipient
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn prop_share_all_recipients_decrypt(
        message in prop::collection::vec(any::<u8>(), 0..1000),
        num_recipients in 1usize..6,
    ) {
        let pqfe = Pqfe::default();
        let root = pqfe.generate_keypair(KeyPurpose::Encryption);
        let recipients: Vec<KeyPair> = (0..num_recipients)
            .map(|_| pqfe.generate_keypair(KeyPurpose::Encryption))
            .collect();
        let keys: Vec<&[u8]> = recipients.iter().map(|r| r.public_key.as_slice()).collect();

        let stored = pqfe.encrypt_data(&message, &root.public_key)?;
        let shared = pqfe.share(&stored, root.private_key.as_bytes(), &keys)?;
        prop_assert_eq!(shared.len(), num_recipients);

        for (env, r) in shared.iter().zip(&recipients) {
            prop_assert_eq!(&pqfe.decrypt_data(env, r.private_key.as_bytes())?, &message);
        }
    }
}

// ============================================================================
// Property: Short symmetric keys are always rejected
// ============================================================================

proptest! {
    #[test]
    fn prop_short_key_rejected(
        key in prop::collection::vec(any::<u8>(), 0..32),
        cipher in cipher(),
    ) {
        let err = cipher.encrypt(b"data", &key).unwrap_err();
        prop_assert!(err.is_configuration());
    }
}
