use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
mod auth;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use sup::ConfigFile;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

#[derive(Debug, Parser)]
#[command(name = "sup")]
#[command(version, about = "Lock and unlock the uptime checker's config file.")]
struct Cli {
    /// File where config values are read from
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "SUP_CONFIG",
        default_value = "./config.json"
    )]
    config: PathBuf,

    /// Key to lock/unlock the config file
    #[arg(long, global = true, env = "CONFIG_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Append log messages to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    logfile: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts the config file in place
    Encrypt,

    /// Decrypts the config file in place
    Decrypt,

    /// Prints the decrypted config without modifying the file
    Show,

    /// Verifies the key and validates the config
    Check,
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match &cli.logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            registry
                .with(fmt::layer().with_target(false).with_writer(io::stderr))
                .init();
        }
    }

    Ok(())
}

/// Key for reading `file`, or `None` when it is stored in plaintext.
fn key_if_encrypted(
    file: &ConfigFile,
    given: Option<Zeroizing<String>>,
) -> Result<Option<Zeroizing<String>>> {
    if file.is_encrypted()? {
        Ok(Some(auth::read_key(given)?))
    } else {
        Ok(None)
    }
}

fn main() -> Result<()> {
    // A .env file may carry CONFIG_KEY; load it before clap reads the environment.
    let _ = dotenvy::dotenv();

    let args = Cli::parse();
    init_logging(&args)?;

    let file = ConfigFile::at(&args.config);
    let given = args.key.map(Zeroizing::new);

    match args.command {
        Commands::Encrypt => {
            let key = auth::read_new_key_with_confirmation(given)?;
            file.encrypt(key.as_bytes())?;
            println!("config encrypted: {}", args.config.display());
        }
        Commands::Decrypt => {
            let key = auth::read_key(given)?;
            file.decrypt(key.as_bytes())?;
            println!("config decrypted: {}", args.config.display());
        }
        Commands::Show => {
            let key = key_if_encrypted(&file, given)?;
            let plaintext = file.read(key.as_ref().map(|k| k.as_bytes()))?;

            let mut stdout = io::stdout().lock();
            stdout.write_all(&plaintext)?;
            if !plaintext.ends_with(b"\n") {
                writeln!(stdout)?;
            }
        }
        Commands::Check => {
            let key = key_if_encrypted(&file, given)?;
            let config = file.load(key.as_ref().map(|k| k.as_bytes()))?;

            println!(
                "config OK: {} ({})",
                args.config.display(),
                if key.is_some() { "encrypted" } else { "plaintext" }
            );
            println!("url: {}", config.url);
            println!("phones: {}", config.phones.len());
            println!(
                "hipchat: {}",
                if config.hipchat_enabled() { "on" } else { "off" }
            );
        }
    }

    Ok(())
}
