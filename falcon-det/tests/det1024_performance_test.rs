use falcon_det::generate_key;
use std::time::{Duration, Instant};

#[test]
fn test_full_cycle_performance() {
    let iterations = 5u32;

    println!("\n=== det1024 Full Cycle Performance ===");
    println!("(KeyGen + Sign + Convert + Verify + VerifyCT)");

    let mut keygen_total = Duration::ZERO;
    let mut sign_total = Duration::ZERO;
    let mut convert_total = Duration::ZERO;
    let mut verify_total = Duration::ZERO;
    let mut verify_ct_total = Duration::ZERO;

    for i in 0..iterations {
        let seed = [(i as u8).wrapping_mul(23); 32];
        let message = b"Full cycle performance test";

        let start = Instant::now();
        let (public_key, private_key) = generate_key(&seed).unwrap();
        keygen_total += start.elapsed();

        let start = Instant::now();
        let signature = private_key.sign_compressed(message).unwrap();
        sign_total += start.elapsed();

        let start = Instant::now();
        let ct = signature.convert_to_ct().unwrap();
        convert_total += start.elapsed();

        let start = Instant::now();
        assert!(public_key.verify(&signature, message).is_ok());
        verify_total += start.elapsed();

        let start = Instant::now();
        assert!(public_key.verify_ct(&ct, message).is_ok());
        verify_ct_total += start.elapsed();

        println!(
            "  Iteration {}: signature {} bytes",
            i + 1,
            signature.len()
        );
    }

    println!("\n  Averages over {} iterations:", iterations);
    println!("    KeyGen:   {:?}", keygen_total / iterations);
    println!("    Sign:     {:?}", sign_total / iterations);
    println!("    Convert:  {:?}", convert_total / iterations);
    println!("    Verify:   {:?}", verify_total / iterations);
    println!("    VerifyCT: {:?}", verify_ct_total / iterations);
}
