use pqfe::*;

#[test]
fn test_file_scenario_lowest_level_aes() {
    let kp = generate_kem_keypair(KemVariant::Kyber512);
    let plaintext = b"This is a test file.";

    let env = encrypt(plaintext, &kp.public_key, KemVariant::Kyber512, CipherKind::Aes256Gcm).unwrap();
    assert_ne!(env.aead_blob, plaintext);
    assert_eq!(env.aead_blob.len(), plaintext.len() + 12 + 16);
    assert_eq!(env.kem_ciphertext.len(), KemVariant::Kyber512.ciphertext_len());

    let pt = decrypt(&env, kp.private_key.as_bytes(), KemVariant::Kyber512, CipherKind::Aes256Gcm).unwrap();
    assert_eq!(pt, plaintext);
}

#[test]
fn three_recipients_reencrypt() {
    let pqfe = Pqfe::default();
    let root = pqfe.generate_keypair(KeyPurpose::Encryption);
    let recipients: Vec<KeyPair> = (0..3).map(|_| pqfe.generate_keypair(KeyPurpose::Encryption)).collect();

    let msg = b"post-quantum hello to A, B, and C!";
    let stored = pqfe.encrypt_data(msg, &root.public_key).unwrap();

    // One at a time through reencrypt.
    for r in &recipients {
        let env = pqfe.reencrypt(&stored, root.private_key.as_bytes(), &r.public_key).unwrap();
        assert_ne!(env.kem_ciphertext, stored.kem_ciphertext);
        assert_eq!(pqfe.decrypt_data(&env, r.private_key.as_bytes()).unwrap(), msg);
    }

    // All at once through share.
    let keys: Vec<&[u8]> = recipients.iter().map(|r| r.public_key.as_slice()).collect();
    let shared = pqfe.share(&stored, root.private_key.as_bytes(), &keys).unwrap();
    assert_eq!(shared.len(), 3);
    for (env, r) in shared.iter().zip(&recipients) {
        assert_eq!(pqfe.decrypt_data(env, r.private_key.as_bytes()).unwrap(), msg);
    }
}

#[test]
fn sign_then_encrypt_roundtrip() {
    let pqfe = Pqfe::default();
    let enc = pqfe.generate_keypair(KeyPurpose::Encryption);
    let sig = pqfe.generate_keypair(KeyPurpose::Signature);
    let other = pqfe.generate_keypair(KeyPurpose::Signature);

    let msg = b"signed and sealed";
    let signed = pqfe
        .encrypt_and_sign(msg, &enc.public_key, sig.private_key.as_bytes())
        .unwrap();

    let ok = pqfe
        .decrypt_and_verify(&signed, enc.private_key.as_bytes(), &sig.public_key)
        .unwrap();
    assert!(ok.verified());
    assert_eq!(ok.payload, msg);

    // Wrong verifier: payload still returned, unchanged.
    let bad = pqfe
        .decrypt_and_verify(&signed, enc.private_key.as_bytes(), &other.public_key)
        .unwrap();
    assert!(!bad.verified());
    assert_eq!(bad.verification, Verification::Invalid);
    assert_eq!(bad.payload, msg);
}

#[test]
fn signature_covers_plaintext() {
    let pqfe = Pqfe::default();
    let enc = pqfe.generate_keypair(KeyPurpose::Encryption);
    let sig = pqfe.generate_keypair(KeyPurpose::Signature);

    let msg = b"content, not ciphertext";
    let signed = pqfe
        .encrypt_and_sign(msg, &enc.public_key, sig.private_key.as_bytes())
        .unwrap();

    assert!(pqfe.verify_data(msg, &signed.signature, &sig.public_key).unwrap().is_valid());
    assert!(!pqfe
        .verify_data(&signed.envelope.aead_blob, &signed.signature, &sig.public_key)
        .unwrap()
        .is_valid());
}

#[test]
fn file_roundtrip_with_stored_keys() {
    let dir = tempfile::tempdir().unwrap();
    let pqfe = Pqfe::new(PqfeConfig::default().with_key_directory(dir.path().join("keys")));

    assert!(pqfe.load_keys(KeyPurpose::Encryption).unwrap().is_none());
    pqfe.generate_keys(KeyPurpose::Encryption).unwrap();
    let (pk, sk) = pqfe.load_keys(KeyPurpose::Encryption).unwrap().unwrap();

    let input = dir.path().join("notes.txt");
    std::fs::write(&input, b"This is a test file.").unwrap();

    let sealed = pqfe.encrypt_file(&input, &pk, &pqfe.file_options()).unwrap();
    let sealed_path = sealed.output.path().unwrap().to_path_buf();
    assert_eq!(sealed_path, dir.path().join("notes.txt.enc"));

    let out = dir.path().join("out");
    let restored = pqfe
        .decrypt_file(&sealed_path, sk.as_bytes(), None, &pqfe.file_options().output_dir(&out))
        .unwrap();
    assert_eq!(restored.path().unwrap(), out.join("notes.txt"));
    assert_eq!(std::fs::read(out.join("notes.txt")).unwrap(), b"This is a test file.");
}
