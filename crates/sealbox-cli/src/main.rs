//! sealbox CLI
//!
//! Authenticated encryption from the command line: XSalsa20-Poly1305 secret
//! boxes and XChaCha20-Poly1305 AEAD, with encoded `nonce || ciphertext`
//! output.

mod config;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sealbox_crypto::{Aead, EncryptedMessage, Encoder, Encoding, HexEncoder, SecretBox};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use config::{Config, Construct};

// One key file serves both constructs.
const _: () = assert!(SecretBox::KEY_SIZE == Aead::KEY_SIZE);

/// sealbox - misuse-resistant authenticated encryption
#[derive(Parser)]
#[command(name = "sealbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path [default: <config dir>/sealbox/config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new 32-byte secret key
    Keygen {
        /// Output file for the key (created with owner-only permissions)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Key encoding
        #[arg(short, long)]
        encoding: Option<Encoding>,
    },

    /// Encrypt data, writing the encoded nonce || ciphertext
    Encrypt(CipherArgs),

    /// Decrypt encoded nonce || ciphertext (or bare ciphertext with --nonce)
    Decrypt(CipherArgs),

    /// Show construct parameters and the resolved configuration
    Info,
}

#[derive(Args)]
struct CipherArgs {
    /// Key file
    #[arg(short, long)]
    key_file: Option<PathBuf>,

    /// Key file encoding
    #[arg(long)]
    key_encoding: Option<Encoding>,

    /// Construct to use
    #[arg(long, value_enum)]
    construct: Option<Construct>,

    /// Ciphertext encoding
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// Additional authenticated data (aead only)
    #[arg(long)]
    aad: Option<String>,

    /// Explicit nonce, hex encoded. Never reuse a nonce with the same key.
    #[arg(long)]
    nonce: Option<String>,

    /// Input file [default: stdin]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file [default: stdout]
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// A loaded key bound to one construct
enum Sealer {
    SecretBox(SecretBox),
    Aead(Aead),
}

impl Sealer {
    fn new(construct: Construct, key: &[u8]) -> anyhow::Result<Self> {
        Ok(match construct {
            Construct::SecretBox => Sealer::SecretBox(SecretBox::new(key)?),
            Construct::Aead => Sealer::Aead(Aead::new(key)?),
        })
    }

    fn seal(
        &self,
        plaintext: &[u8],
        aad: Option<&[u8]>,
        nonce: Option<&[u8]>,
        encoding: Encoding,
    ) -> anyhow::Result<EncryptedMessage> {
        Ok(match self {
            Sealer::SecretBox(secret_box) => {
                reject_aad(aad)?;
                secret_box.encrypt_with(plaintext, nonce, &encoding)?
            }
            Sealer::Aead(aead) => {
                aead.encrypt_with(plaintext, aad.unwrap_or_default(), nonce, &encoding)?
            }
        })
    }

    fn open(
        &self,
        ciphertext: &[u8],
        aad: Option<&[u8]>,
        nonce: Option<&[u8]>,
        encoding: Encoding,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(match self {
            Sealer::SecretBox(secret_box) => {
                reject_aad(aad)?;
                secret_box.decrypt_with(ciphertext, nonce, &encoding)?
            }
            Sealer::Aead(aead) => {
                aead.decrypt_with(ciphertext, aad.unwrap_or_default(), nonce, &encoding)?
            }
        })
    }
}

fn reject_aad(aad: Option<&[u8]>) -> anyhow::Result<()> {
    if aad.is_some() {
        anyhow::bail!("--aad requires --construct aead (secretbox has no associated data)");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_or_default()?,
    };

    // Validate configuration
    config.validate()?;

    // Initialize logging; stdout carries data, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "debug"
        } else {
            config.logging.level.as_str()
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Keygen { output, encoding } => generate_key(output, encoding, &config),
        Commands::Encrypt(args) => encrypt(&args, &config),
        Commands::Decrypt(args) => decrypt(&args, &config),
        Commands::Info => show_info(&config),
    }
}

/// Generate a new secret key
fn generate_key(
    output: Option<PathBuf>,
    encoding: Option<Encoding>,
    config: &Config,
) -> anyhow::Result<()> {
    let encoding = encoding.unwrap_or(config.defaults.key_encoding);
    let encoded = Aead::generate()?.encode_key(&encoding);

    match output {
        Some(path) => {
            write_secret_file(&path, &encoded, encoding.is_textual())?;
            tracing::info!(path = %path.display(), encoding = %encoding, "key written");
            eprintln!("Key saved to: {}", path.display());
            eprintln!("Keep this file secure! It contains your secret key.");
        }
        None => write_output(None, &encoded, encoding.is_textual())?,
    }

    Ok(())
}

/// Encrypt stdin or a file
fn encrypt(args: &CipherArgs, config: &Config) -> anyhow::Result<()> {
    let construct = args.construct.unwrap_or(config.defaults.construct);
    let encoding = args.encoding.unwrap_or(config.defaults.encoding);
    let sealer = load_sealer(args, config, construct)?;
    let nonce = parse_nonce(args.nonce.as_deref())?;

    if nonce.is_some() {
        tracing::warn!("explicit nonce supplied; it must never be reused with this key");
    }

    let plaintext = Zeroizing::new(read_input(args.input.as_deref())?);
    tracing::info!(
        construct = %construct,
        encoding = %encoding,
        bytes = plaintext.len(),
        "encrypting"
    );

    let message = sealer.seal(
        &plaintext,
        args.aad.as_deref().map(str::as_bytes),
        nonce.as_deref(),
        encoding,
    )?;

    write_output(args.output.as_deref(), message.combined(), encoding.is_textual())
}

/// Decrypt stdin or a file
fn decrypt(args: &CipherArgs, config: &Config) -> anyhow::Result<()> {
    let construct = args.construct.unwrap_or(config.defaults.construct);
    let encoding = args.encoding.unwrap_or(config.defaults.encoding);
    let sealer = load_sealer(args, config, construct)?;
    let nonce = parse_nonce(args.nonce.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let ciphertext = trim_encoded(&input, encoding);
    tracing::info!(
        construct = %construct,
        encoding = %encoding,
        bytes = ciphertext.len(),
        "decrypting"
    );

    let plaintext = Zeroizing::new(sealer.open(
        ciphertext,
        args.aad.as_deref().map(str::as_bytes),
        nonce.as_deref(),
        encoding,
    )?);

    write_output(args.output.as_deref(), &plaintext, false)
}

/// Show construct parameters
fn show_info(config: &Config) -> anyhow::Result<()> {
    println!("sealbox {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("secretbox (XSalsa20-Poly1305):");
    println!("  Key size: {} bytes", SecretBox::KEY_SIZE);
    println!("  Nonce size: {} bytes", SecretBox::NONCE_SIZE);
    println!("  Tag size: {} bytes", SecretBox::MACBYTES);
    println!("  Max message: {} bytes", SecretBox::MESSAGEBYTES_MAX);
    println!();

    println!("aead (XChaCha20-Poly1305):");
    println!("  Key size: {} bytes", Aead::KEY_SIZE);
    println!("  Nonce size: {} bytes", Aead::NONCE_SIZE);
    println!("  Tag size: {} bytes", Aead::MACBYTES);
    println!("  Max message: {} bytes", Aead::MESSAGEBYTES_MAX);
    println!();

    println!("Configuration:");
    println!("  Construct: {}", config.defaults.construct);
    println!("  Encoding: {}", config.defaults.encoding);
    println!("  Key encoding: {}", config.defaults.key_encoding);
    match (config.key_file(), &config.defaults.key) {
        (Some(path), _) => println!("  Key file: {}", path.display()),
        (None, Some(_)) => println!("  Key: inline"),
        (None, None) => println!("  Key: not configured"),
    }
    println!("  Log level: {}", config.logging.level);

    Ok(())
}

/// Resolve the key: --key-file, then the configured key file, then an inline key
fn load_sealer(args: &CipherArgs, config: &Config, construct: Construct) -> anyhow::Result<Sealer> {
    let key_encoding = args.key_encoding.unwrap_or(config.defaults.key_encoding);

    if let Some(path) = args.key_file.clone().or_else(|| config.key_file()) {
        let contents = Zeroizing::new(
            fs::read(&path).with_context(|| format!("failed to read key file {}", path.display()))?,
        );
        let key = Zeroizing::new(key_encoding.decode(trim_encoded(&contents, key_encoding))?);
        tracing::debug!(path = %path.display(), construct = %construct, "loaded key file");
        return Sealer::new(construct, &key);
    }

    if let Some(material) = &config.defaults.key {
        tracing::debug!(construct = %construct, "using inline key from config");
        return Ok(match construct {
            Construct::SecretBox => {
                Sealer::SecretBox(SecretBox::from_key_material(material, &key_encoding)?)
            }
            Construct::Aead => Sealer::Aead(Aead::from_key_material(material, &key_encoding)?),
        });
    }

    anyhow::bail!("no key configured: pass --key-file or set defaults.key_file")
}

fn parse_nonce(nonce: Option<&str>) -> anyhow::Result<Option<Vec<u8>>> {
    nonce
        .map(|hex| HexEncoder.decode(hex.trim().as_bytes()))
        .transpose()
        .context("--nonce must be hex encoded")
}

/// Textual encodings tolerate surrounding whitespace (e.g. a trailing newline)
fn trim_encoded(data: &[u8], encoding: Encoding) -> &[u8] {
    if encoding.is_textual() {
        data.trim_ascii()
    } else {
        data
    }
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8], newline: bool) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            file.write_all(data)?;
            if newline {
                file.write_all(b"\n")?;
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            if newline {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Write a key file that only the owner can read, refusing to overwrite
fn write_secret_file(path: &Path, contents: &[u8], newline: bool) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("failed to create key file {}", path.display()))?;
    file.write_all(contents)?;
    if newline {
        file.write_all(b"\n")?;
    }
    Ok(())
}
