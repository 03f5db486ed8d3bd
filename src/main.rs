//! pqfe demo main.rs
//! Walks through the storage-to-requestor flow:
//! - ML-KEM (Kyber) envelopes sealed with AES-256-GCM
//! - Dilithium-3 signatures over the plaintext
//! - Re-encryption of a stored envelope for three requestors
//! - Self-contained encrypted files on disk
//!
//! Set `RUST_LOG=pqfe=debug` for per-operation logs.

use pqfe::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let workdir = tempfile::tempdir()?;
    let config = PqfeConfig::default().with_key_directory(workdir.path().join("keys"));
    let pqfe = Pqfe::new(config);
    println!("Suite: {}\n", pqfe.suite());

    // Storage (root) keys live in the key directory.
    let root = pqfe.generate_keys(KeyPurpose::Encryption)?;
    let author = pqfe.generate_keys(KeyPurpose::Signature)?;
    println!("Root key: {} bytes public", root.public_key.len());
    println!("Author key: {} bytes public\n", author.public_key.len());

    // Author signs, then encrypts for storage.
    let message = b"Ledger close for Q3: balanced.";
    let signed = pqfe.encrypt_and_sign(message, &root.public_key, author.private_key.as_bytes())?;
    println!("Stored envelope: {} bytes CBOR", signed.to_cbor()?.len());

    // Storage re-encrypts for three requestors.
    let requestors: Vec<KeyPair> = (0..3)
        .map(|_| pqfe.generate_keypair(KeyPurpose::Encryption))
        .collect();
    let recipient_keys: Vec<&[u8]> = requestors.iter().map(|kp| kp.public_key.as_slice()).collect();
    let (stored_pk, stored_sk) = pqfe
        .load_keys(KeyPurpose::Encryption)?
        .ok_or("root keys missing from key directory")?;
    assert_eq!(stored_pk, root.public_key);

    let shared = pqfe.share(&signed.envelope, stored_sk.as_bytes(), &recipient_keys)?;
    let verifier = pqfe.create_verifier(author.public_key.clone())?;
    for (i, (envelope, requestor)) in shared.iter().zip(&requestors).enumerate() {
        let pt = pqfe.decrypt_data(envelope, requestor.private_key.as_bytes())?;
        let verified = verifier.verify_data(&pt, &signed.signature)?;
        println!(
            "Requestor {i} decrypted: {} (signature valid: {})",
            String::from_utf8_lossy(&pt),
            verified.is_valid()
        );
        assert_eq!(pt, message);
    }

    // A requestor cannot open another requestor's envelope.
    match pqfe.decrypt_data(&shared[0], requestors[1].private_key.as_bytes()) {
        Ok(_) => return Err("wrong requestor opened the envelope".into()),
        Err(e) => println!("\nWrong requestor rejected as expected: {e} (stage {:?})", e.stage()),
    }

    // Files: encrypt next to the input, decrypt into a separate directory.
    let input = workdir.path().join("report.txt");
    std::fs::write(&input, b"This is a test file.")?;
    let encryptor = pqfe.create_encryptor(root.public_key.clone())?;
    let sealed = encryptor.encrypt_file(&input, &pqfe.file_options())?;
    let sealed_path = sealed.output.path().ok_or("encrypted file was not written")?;
    println!("\nEncrypted file: {}", sealed_path.display());

    let out_dir = workdir.path().join("restored");
    let restored = pqfe.decrypt_file(
        sealed_path,
        root.private_key.as_bytes(),
        None,
        &pqfe.file_options().output_dir(&out_dir),
    )?;
    let restored_path = restored.path().ok_or("decrypted file was not written")?;
    assert_eq!(std::fs::read(restored_path)?, b"This is a test file.");
    println!("Decrypted file: {}", restored_path.display());

    println!("\nAll steps completed.");
    Ok(())
}
