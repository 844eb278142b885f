//! det1024 Key Generation Tool
//!
//! Derives a det1024 key pair from a seed and writes it as two binary files.
//! The same seed always produces the same pair, so a seed can stand in for a
//! node identity.
//!
//! Usage:
//!   falcon-det-keygen --seed-hex 00112233...
//!   falcon-det-keygen --seed-file node.seed --out-dir keys/
//!   falcon-det-keygen            # fresh random seed, printed for reuse

use anyhow::{Context, Result};
use clap::Parser;
use falcon_det::generate_key;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Length of a freshly drawn seed.
const RANDOM_SEED_LEN: usize = 48;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed as a hex string
    #[arg(long, conflicts_with = "seed_file")]
    seed_hex: Option<String>,

    /// File whose raw bytes are the seed
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Directory for public_key.bin and secret_key.bin
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Also print both keys as Rust byte arrays
    #[arg(long)]
    print_arrays: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let seed = read_seed(&args)?;

    info!(seed_len = seed.len(), "generating det1024 key pair");
    let (public_key, private_key) = generate_key(&seed).context("key generation failed")?;

    let pk_bytes = public_key.as_bytes();
    let sk_bytes = private_key.as_bytes();
    println!("Public key size: {} bytes", pk_bytes.len());
    println!("Secret key size: {} bytes", sk_bytes.len());

    if args.print_arrays {
        print_array("SK_BYTES", sk_bytes);
        print_array("PK_BYTES", pk_bytes);
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create {}", args.out_dir.display()))?;

    let sk_path = args.out_dir.join("secret_key.bin");
    fs::write(&sk_path, sk_bytes)
        .with_context(|| format!("cannot write {}", sk_path.display()))?;
    println!("✓ Saved {} ({} bytes)", sk_path.display(), sk_bytes.len());

    let pk_path = args.out_dir.join("public_key.bin");
    fs::write(&pk_path, pk_bytes)
        .with_context(|| format!("cannot write {}", pk_path.display()))?;
    println!("✓ Saved {} ({} bytes)", pk_path.display(), pk_bytes.len());

    println!();
    println!("Security Notes:");
    println!("- Keep secret_key.bin and the seed secret! Either one recreates the private key.");
    println!("- Regenerating from the same seed yields byte-identical keys.");

    Ok(())
}

fn read_seed(args: &Args) -> Result<Vec<u8>> {
    if let Some(seed_hex) = &args.seed_hex {
        return hex::decode(seed_hex.trim()).context("seed is not valid hex");
    }
    if let Some(path) = &args.seed_file {
        return fs::read(path).with_context(|| format!("cannot read seed {}", path.display()));
    }

    let mut rng = ChaCha20Rng::from_entropy();
    let mut seed = vec![0u8; RANDOM_SEED_LEN];
    rng.fill_bytes(&mut seed);
    println!("Seed (hex, keep secret): {}", hex::encode(&seed));
    Ok(seed)
}

fn print_array(name: &str, bytes: &[u8]) {
    print!("const {}: [u8; {}] = [", name, bytes.len());
    for (i, b) in bytes.iter().enumerate() {
        if i % 16 == 0 {
            println!();
            print!("    ");
        }
        print!("0x{:02X}", b);
        if i < bytes.len() - 1 {
            print!(", ");
        }
    }
    println!("\n];\n");
}
