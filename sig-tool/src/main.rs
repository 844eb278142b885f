//! Command-line signing, conversion and verification for det1024 keys
//! produced by `falcon-det-keygen`.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use falcon_det::{
    CompressedSignature, CtSignature, PrivateKey, PublicKey, Signature, CT_SIGNATURE_SIZE,
    CURRENT_SALT_VERSION,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Sign, convert, verify and inspect det1024 signatures
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign a message, writing a compressed signature
    Sign {
        /// Path to secret key binary file
        #[arg(short, long)]
        sk_file: PathBuf,

        #[command(flatten)]
        message: MessageArgs,

        /// Output signature file
        #[arg(short, long, default_value = "signature.bin")]
        output: PathBuf,

        /// Also write the CT form next to the output, with a .ct extension
        #[arg(long)]
        ct: bool,
    },

    /// Convert a compressed signature to CT form
    Convert {
        /// Compressed signature file
        #[arg(short = 'i', long)]
        sig_file: PathBuf,

        /// Output CT signature file
        #[arg(short, long, default_value = "signature.ct")]
        output: PathBuf,
    },

    /// Verify a signature; exits with an error if it does not verify
    Verify {
        /// Path to public key binary file
        #[arg(short, long)]
        pk_file: PathBuf,

        /// Signature file
        #[arg(short = 'i', long)]
        sig_file: PathBuf,

        #[command(flatten)]
        message: MessageArgs,

        /// Signature file holds the CT form
        #[arg(long)]
        ct: bool,
    },

    /// Print the length and salt version of a signature file
    Inspect {
        /// Signature file
        #[arg(short = 'i', long)]
        sig_file: PathBuf,

        /// Signature file holds the CT form
        #[arg(long)]
        ct: bool,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct MessageArgs {
    /// Message to sign or verify, as text
    #[arg(short, long)]
    message: Option<String>,

    /// File holding the message bytes
    #[arg(long)]
    message_file: Option<PathBuf>,
}

impl MessageArgs {
    fn read(&self) -> Result<Vec<u8>> {
        match (&self.message, &self.message_file) {
            (Some(text), _) => Ok(text.as_bytes().to_vec()),
            (None, Some(path)) => {
                fs::read(path).with_context(|| format!("cannot read message {}", path.display()))
            }
            (None, None) => Err(anyhow!("no message given")),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Sign {
            sk_file,
            message,
            output,
            ct,
        } => sign(&sk_file, &message.read()?, &output, ct),
        Command::Convert { sig_file, output } => convert(&sig_file, &output),
        Command::Verify {
            pk_file,
            sig_file,
            message,
            ct,
        } => verify(&pk_file, &sig_file, &message.read()?, ct),
        Command::Inspect { sig_file, ct } => inspect(&sig_file, ct),
    }
}

fn sign(sk_file: &Path, message: &[u8], output: &Path, ct: bool) -> Result<()> {
    let sk_bytes = read_file(sk_file)?;
    let private_key = PrivateKey::from_bytes(&sk_bytes).ok_or_else(|| {
        anyhow!(
            "secret key file has wrong size: {} bytes (expected {})",
            sk_bytes.len(),
            falcon_det::PRIVATE_KEY_SIZE
        )
    })?;

    let signature = private_key
        .sign_compressed(message)
        .context("signing failed")?;
    write_file(output, signature.as_bytes())?;
    info!(len = signature.len(), "wrote compressed signature");
    println!("✓ Saved {} ({} bytes)", output.display(), signature.len());

    if ct {
        let ct_signature = signature.convert_to_ct().context("conversion failed")?;
        let ct_output = output.with_extension("ct");
        write_file(&ct_output, ct_signature.as_bytes())?;
        println!("✓ Saved {} ({} bytes)", ct_output.display(), CT_SIGNATURE_SIZE);
    }
    Ok(())
}

fn convert(sig_file: &Path, output: &Path) -> Result<()> {
    let signature = read_compressed(sig_file)?;
    let ct_signature = signature.convert_to_ct().context("conversion failed")?;
    write_file(output, ct_signature.as_bytes())?;
    println!("✓ Saved {} ({} bytes)", output.display(), CT_SIGNATURE_SIZE);
    Ok(())
}

fn verify(pk_file: &Path, sig_file: &Path, message: &[u8], ct: bool) -> Result<()> {
    let pk_bytes = read_file(pk_file)?;
    let public_key = PublicKey::from_bytes(&pk_bytes).ok_or_else(|| {
        anyhow!(
            "public key file has wrong size: {} bytes (expected {})",
            pk_bytes.len(),
            falcon_det::PUBLIC_KEY_SIZE
        )
    })?;

    let signature = read_signature(sig_file, ct)?;
    match public_key.verify_signature(&signature, message) {
        Ok(()) => {
            println!("✅ Signature is valid");
            Ok(())
        }
        Err(err) => {
            warn!(code = err.code(), "signature rejected");
            Err(err).context("signature is not valid")
        }
    }
}

fn inspect(sig_file: &Path, ct: bool) -> Result<()> {
    let signature = read_signature(sig_file, ct)?;
    let (kind, len) = match &signature {
        Signature::Compressed(sig) => ("compressed", sig.len()),
        Signature::Ct(_) => ("CT", CT_SIGNATURE_SIZE),
    };
    let salt_version = signature.salt_version();

    println!("Encoding:     {}", kind);
    println!("Length:       {} bytes", len);
    println!("Salt version: {}", salt_version);
    if salt_version != CURRENT_SALT_VERSION {
        println!(
            "⚠️  Salt version differs from the current one ({})",
            CURRENT_SALT_VERSION
        );
    }
    println!("Hex:          {}", hex::encode(signature.as_bytes()));
    Ok(())
}

fn read_signature(path: &Path, ct: bool) -> Result<Signature> {
    if ct {
        let bytes = read_file(path)?;
        let signature = CtSignature::from_bytes(&bytes).ok_or_else(|| {
            anyhow!(
                "CT signature file has wrong size: {} bytes (expected {})",
                bytes.len(),
                CT_SIGNATURE_SIZE
            )
        })?;
        Ok(signature.into())
    } else {
        Ok(read_compressed(path)?.into())
    }
}

fn read_compressed(path: &Path) -> Result<CompressedSignature> {
    let bytes = read_file(path)?;
    CompressedSignature::from_bytes(&bytes).ok_or_else(|| {
        anyhow!(
            "signature file is too long: {} bytes (at most {})",
            bytes.len(),
            falcon_det::SIGNATURE_MAX_SIZE
        )
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("cannot read {}", path.display()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("cannot write {}", path.display()))
}
