#![no_std]

extern crate alloc;

use falcon_det::{generate_key, CompressedSignature, PrivateKey, PublicKey};

#[test]
fn test_nostd_basic_sign_and_verify() {
    // 1. Generate keys
    let (public_key, private_key) = generate_key(&[42u8; 32]).unwrap();

    // 2. Sign a message
    let message = b"Hello, Falcon no-std!";
    let signature = private_key.sign_compressed(message).unwrap();

    // 3. Verify the signature
    assert!(
        public_key.verify(&signature, message).is_ok(),
        "Signature should be valid in no-std environment"
    );

    // Verify that a different message fails verification
    assert!(
        public_key.verify(&signature, b"Wrong message").is_err(),
        "Signature should be invalid for different message in no-std"
    );
}

#[test]
fn test_nostd_serialization() {
    let (public_key, private_key) = generate_key(&[99u8; 32]).unwrap();

    let message = b"Test no-std serialization";
    let signature = private_key.sign_compressed(message).unwrap();

    // Deserialize from raw bytes
    let sk_restored = PrivateKey::from_bytes(private_key.as_bytes()).unwrap();
    let pk_restored = PublicKey::from_bytes(public_key.as_bytes()).unwrap();
    let sig_restored = CompressedSignature::from_bytes(signature.as_bytes()).unwrap();

    assert!(
        pk_restored.verify(&sig_restored, message).is_ok(),
        "Signature should be valid after no-std serialization roundtrip"
    );

    // The restored key signs identically
    assert_eq!(sk_restored.sign_compressed(message).unwrap(), signature);

    let ct = sig_restored.convert_to_ct().unwrap();
    assert!(pk_restored.verify_ct(&ct, message).is_ok());
}
