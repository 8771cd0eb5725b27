// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # VeriSkill Wallet CLI
//!
//! Entry point for the `veriskill` binary. Parses CLI arguments, initializes
//! logging, opens the wallet in the data directory, and runs one command.
//!
//! - `init`             - create the wallet database
//! - `store-identity`   - seal and store a DID key pair
//! - `unlock`           - check a passphrase against a stored identity
//! - `export-shares`    - print recovery shares or write a recovery kit
//! - `recover`          - rebuild an identity from shares and re-seal it
//! - `add-credential`   - store a verifiable credential
//! - `list-credentials` - print stored credentials
//! - `status`           - print public wallet info
//! - `wipe`             - delete everything
//! - `version`          - print build version information

mod cli;
mod logging;

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use zeroize::Zeroizing;

use veriskill_wallet::crypto::KdfParams;
use veriskill_wallet::config::ARGON2_DEFAULT_PARALLELISM;
use veriskill_wallet::recovery::RecoveryKit;
use veriskill_wallet::{DigitalIdentity, VerifiableCredential, WalletConfig, WalletFacade};

use cli::{Commands, GlobalArgs, VeriskillCli};

fn main() -> Result<()> {
    let VeriskillCli { global, command } = VeriskillCli::parse();

    if let Commands::Version = command {
        print_version();
        return Ok(());
    }

    logging::init_logging(logging::DEFAULT_FILTER, global.log_format);
    let mut wallet = open_wallet(&global)?;

    let outcome = run(&mut wallet, &global, command);

    // Close even when the command failed, so the store is flushed and the
    // identity dropped before exit.
    let closed = wallet.close().context("failed to close wallet");
    outcome.and(closed)
}

fn run(wallet: &mut WalletFacade, global: &GlobalArgs, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            println!("Wallet initialized.");
            println!("  Data directory : {}", global.data_dir.display());
        }
        Commands::StoreIdentity(args) => store_identity(wallet, global, args)?,
        Commands::Unlock(args) => {
            let passphrase = require_passphrase(global)?;
            wallet
                .unlock(&args.did, passphrase)
                .with_context(|| format!("failed to unlock {}", args.did))?;
            println!("Passphrase accepted for {}", args.did);
        }
        Commands::ExportShares(args) => export_shares(wallet, global, args)?,
        Commands::Recover(args) => recover(wallet, global, args)?,
        Commands::AddCredential(args) => add_credential(wallet, &args.file)?,
        Commands::ListCredentials(args) => list_credentials(wallet, args.json)?,
        Commands::Status => println!("{}", wallet.summary()?.to_json()?),
        Commands::Wipe(args) => {
            if !args.yes {
                bail!("refusing to wipe without --yes");
            }
            wallet.wipe()?;
            println!("Wallet wiped.");
        }
        Commands::Version => print_version(),
    }
    Ok(())
}

/// Build the wallet config from global args and open the store.
fn open_wallet(global: &GlobalArgs) -> Result<WalletFacade> {
    let kdf = KdfParams::new(
        global.kdf_memory_kib,
        global.kdf_iterations,
        ARGON2_DEFAULT_PARALLELISM,
    );
    let config = WalletConfig::on_disk(&global.data_dir).with_kdf(kdf);

    std::fs::create_dir_all(&global.data_dir).with_context(|| {
        format!(
            "failed to create data directory: {}",
            global.data_dir.display()
        )
    })?;

    let mut wallet = WalletFacade::new(config);
    wallet.initialize().with_context(|| {
        format!(
            "failed to open wallet in {}",
            global.data_dir.display()
        )
    })?;
    Ok(wallet)
}

fn require_passphrase(global: &GlobalArgs) -> Result<&str> {
    match global.passphrase.as_deref() {
        Some(p) if !p.is_empty() => Ok(p),
        _ => bail!("a passphrase is required: pass --passphrase or set VERISKILL_PASSPHRASE"),
    }
}

fn decode_hex(label: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim()).with_context(|| format!("{label} is not valid hex"))
}

fn store_identity(
    wallet: &mut WalletFacade,
    global: &GlobalArgs,
    args: cli::StoreIdentityArgs,
) -> Result<()> {
    let passphrase = require_passphrase(global)?;
    let public_key = decode_hex("public key", &args.public_key)?;
    let private_key = Zeroizing::new(decode_hex("private key", &args.private_key)?);

    let identity = DigitalIdentity::new(&args.did, public_key, private_key.to_vec())?;
    wallet.store_identity(&identity, passphrase)?;

    println!("Identity stored.");
    println!("  DID        : {}", identity.did);
    println!("  Public key : {}", identity.public_key_hex());
    Ok(())
}

fn export_shares(
    wallet: &mut WalletFacade,
    global: &GlobalArgs,
    args: cli::ExportSharesArgs,
) -> Result<()> {
    let passphrase = require_passphrase(global)?;
    wallet
        .unlock(&args.did, passphrase)
        .with_context(|| format!("failed to unlock {}", args.did))?;

    let (threshold, total) = wallet.config().recovery_policy(args.threshold, args.total);

    match args.kit {
        Some(path) => {
            let kit = wallet.export_recovery_kit(threshold, total)?;
            write_private_file(&path, kit.to_json()?.as_bytes())
                .with_context(|| format!("failed to write recovery kit to {}", path.display()))?;
            println!(
                "Recovery kit ({threshold} of {total}) written to {}",
                path.display()
            );
        }
        None => {
            for share in wallet.export_recovery_shares(threshold, total)? {
                println!("{share}");
            }
        }
    }
    Ok(())
}

fn recover(wallet: &mut WalletFacade, global: &GlobalArgs, args: cli::RecoverArgs) -> Result<()> {
    let passphrase = require_passphrase(global)?;
    let public_key = decode_hex("public key", &args.public_key)?;

    let (did, shares) = match &args.kit {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read recovery kit {}", path.display()))?;
            let kit = RecoveryKit::from_json(&json)?;
            kit.decode_shares()
                .with_context(|| format!("recovery kit {} is inconsistent", path.display()))?;
            (args.did.clone().unwrap_or(kit.did), kit.shares)
        }
        None => match &args.did {
            Some(did) => (did.clone(), args.shares.clone()),
            None => bail!("--did is required when shares are given directly"),
        },
    };

    wallet
        .recover_identity(&shares, &did, public_key)
        .with_context(|| format!("failed to recover {did}"))?;
    wallet.reseal(passphrase)?;

    println!("Identity {did} recovered and sealed under the new passphrase.");
    Ok(())
}

fn add_credential(wallet: &mut WalletFacade, file: &Path) -> Result<()> {
    let json = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read credential from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?
    };

    let credential: VerifiableCredential =
        serde_json::from_str(&json).context("credential is not valid JSON")?;
    wallet.store_credential(&credential)?;
    println!("Credential {} stored.", credential.id);
    Ok(())
}

fn list_credentials(wallet: &WalletFacade, json: bool) -> Result<()> {
    let credentials = wallet.get_credentials()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&credentials)?);
        return Ok(());
    }
    for vc in &credentials {
        println!(
            "{}  {}  {}  {}",
            vc.id,
            vc.types.join(","),
            vc.issuer_id().unwrap_or("-"),
            vc.issuance_date
        );
    }
    if credentials.is_empty() {
        println!("No credentials stored.");
    }
    Ok(())
}

/// Write `contents` to a freshly created file that only the owner can read.
///
/// Recovery kits hold enough shares to rebuild a key. An existing file is
/// removed first so its permissions and open handles don't carry over; the
/// new file is created with mode 0600 on Unix and never exists with looser
/// permissions.
fn write_private_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Prints version information to stdout.
fn print_version() {
    println!("veriskill {}", env!("CARGO_PKG_VERSION"));
    println!(
        "cipher    {}",
        veriskill_wallet::config::SYMMETRIC_ALGORITHM
    );
    println!(
        "shares    codec v{}",
        veriskill_wallet::config::SHARE_CODEC_VERSION
    );
}
