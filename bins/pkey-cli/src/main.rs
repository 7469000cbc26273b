//! pkey-cli: command-line front end for the P-chain key manager.
//!
//! Creates key files, shows the address and encoded form of an existing
//! key, and converts encoded key files to the raw-hex format.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pkey_core::constants::{LOCAL_ID, Network};
use pkey_wallet::{KeyConfig, KeyManager};
use tracing::info;

/// P-chain single-key manager.
#[derive(Parser)]
#[command(name = "pkey-cli")]
#[command(version, about = "Create and inspect P-chain private key files.")]
struct Cli {
    /// Log level filter, used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key and save it as hex.
    Create(CreateArgs),
    /// Print the P-chain address and encoded key of a key file.
    Show(ShowArgs),
    /// Print the raw hex of a key file.
    Convert(ConvertArgs),
}

#[derive(Args)]
struct KeyFileArgs {
    /// Path to the key file (default: ~/.pkey/key.pk).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Network ID used for address derivation.
    #[arg(short, long, default_value_t = LOCAL_ID)]
    network_id: u32,
}

#[derive(Args)]
struct CreateArgs {
    #[command(flatten)]
    key: KeyFileArgs,

    /// Replace an existing key file.
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct ShowArgs {
    #[command(flatten)]
    key: KeyFileArgs,

    /// Print as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ConvertArgs {
    #[command(flatten)]
    key: KeyFileArgs,

    /// Write the hex key to this path instead of printing it.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// Resolved key file location and network.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CliConfig {
    key_file: PathBuf,
    network_id: u32,
}

impl CliConfig {
    fn resolve(args: KeyFileArgs) -> Result<Self> {
        let key_file = match args.file {
            Some(path) => path,
            None => default_key_path()?,
        };
        Ok(Self {
            key_file,
            network_id: args.network_id,
        })
    }

    fn load(&self) -> Result<KeyManager> {
        KeyManager::load_from_file(self.network_id, &self.key_file)
            .with_context(|| format!("Failed to load key file: {}", self.key_file.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Create(args) => create(args),
        Commands::Show(args) => show(args),
        Commands::Convert(args) => convert(args),
    }
}

fn init_logging(level_str: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    // Logs go to stderr, command output to stdout
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Generate a fresh key and write it to the key file.
fn create(args: CreateArgs) -> Result<()> {
    let config = CliConfig::resolve(args.key)?;
    if config.key_file.exists() && !args.force {
        bail!(
            "Key file already exists: {} (use --force to replace it)",
            config.key_file.display()
        );
    }

    let manager =
        KeyManager::new(KeyConfig::new(config.network_id)).context("Failed to generate key")?;
    manager
        .save_to_file(&config.key_file)
        .with_context(|| format!("Failed to save key file: {}", config.key_file.display()))?;
    info!(network = ?Network::from_id(config.network_id), "created key");

    println!("Address: {}", manager.p_address());
    println!("Key saved to: {}", config.key_file.display());
    Ok(())
}

/// Print the address and encoded key.
fn show(args: ShowArgs) -> Result<()> {
    let config = CliConfig::resolve(args.key)?;
    let manager = config.load()?;

    if args.json {
        let out = serde_json::json!({
            "network_id": manager.network_id(),
            "address": manager.p_address(),
            "short_address": manager.short_address().to_string(),
            "public_key": manager.public_key().to_string(),
            "private_key": manager.encoded_key(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Network:     {}", manager.network_id());
        println!("Address:     {}", manager.p_address());
        println!("Public key:  {}", manager.public_key());
        println!("Private key: {}", manager.encoded_key());
    }
    Ok(())
}

/// Print or save the key as raw hex.
fn convert(args: ConvertArgs) -> Result<()> {
    let config = CliConfig::resolve(args.key)?;
    let manager = config.load()?;

    match args.out {
        Some(out) => {
            manager
                .save_to_file(&out)
                .with_context(|| format!("Failed to save key file: {}", out.display()))?;
            println!("Hex key saved to: {}", out.display());
        }
        None => println!("{}", hex::encode(manager.raw_key())),
    }
    Ok(())
}

/// Resolve the default key file path (`~/.pkey/key.pk`).
fn default_key_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".pkey").join("key.pk"))
}
