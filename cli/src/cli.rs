//! # CLI Interface
//!
//! Defines the command-line argument structure for `veriskill` using
//! `clap` derive. Every subcommand opens the wallet, does one thing, and
//! closes it again; nothing stays unlocked between invocations.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use veriskill_wallet::config::{ARGON2_DEFAULT_ITERATIONS, ARGON2_DEFAULT_MEMORY_KIB};

use crate::logging::LogFormat;

/// VeriSkill credential wallet.
///
/// Stores a DID key pair sealed under a passphrase, keeps verifiable
/// credentials, and backs the key up as Shamir recovery shares.
#[derive(Parser, Debug)]
#[command(
    name = "veriskill",
    about = "VeriSkill credential wallet",
    version,
    propagate_version = true
)]
pub struct VeriskillCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Wallet data directory. The database lives in `<data-dir>/wallet-db`.
    #[arg(long, short = 'd', env = "VERISKILL_DATA_DIR", default_value = ".veriskill", global = true)]
    pub data_dir: PathBuf,

    /// Log output format (logs go to stderr).
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Wallet passphrase. Prefer the environment variable over the flag so
    /// it stays out of shell history.
    #[arg(long, env = "VERISKILL_PASSPHRASE", hide_env_values = true, global = true)]
    pub passphrase: Option<String>,

    /// Argon2id memory cost in KiB for newly sealed identities.
    #[arg(long, env = "VERISKILL_KDF_MEMORY_KIB", default_value_t = ARGON2_DEFAULT_MEMORY_KIB, global = true)]
    pub kdf_memory_kib: u32,

    /// Argon2id iteration count for newly sealed identities.
    #[arg(long, env = "VERISKILL_KDF_ITERATIONS", default_value_t = ARGON2_DEFAULT_ITERATIONS, global = true)]
    pub kdf_iterations: u32,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the wallet database in the data directory.
    Init,
    /// Seal a DID key pair under the passphrase and store it.
    StoreIdentity(StoreIdentityArgs),
    /// Check that the passphrase opens a stored identity.
    Unlock(DidArgs),
    /// Split a stored identity's private key into recovery shares.
    ExportShares(ExportSharesArgs),
    /// Rebuild an identity from recovery shares and store it under the passphrase.
    Recover(RecoverArgs),
    /// Store a verifiable credential from a JSON file (`-` for stdin).
    AddCredential(AddCredentialArgs),
    /// Print stored credentials.
    ListCredentials(ListCredentialsArgs),
    /// Print public wallet information as JSON.
    Status,
    /// Delete every identity and credential in the wallet.
    Wipe(WipeArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for `store-identity`.
#[derive(Args, Debug)]
pub struct StoreIdentityArgs {
    /// The identity's DID, e.g. `did:key:z6Mk...`.
    #[arg(long)]
    pub did: String,

    /// Hex-encoded public key.
    #[arg(long)]
    pub public_key: String,

    /// Hex-encoded private key.
    #[arg(long, env = "VERISKILL_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

/// Arguments for commands that only name an identity.
#[derive(Args, Debug)]
pub struct DidArgs {
    /// The identity's DID.
    #[arg(long)]
    pub did: String,
}

/// Arguments for `export-shares`.
#[derive(Args, Debug)]
pub struct ExportSharesArgs {
    /// The identity's DID.
    #[arg(long)]
    pub did: String,

    /// Shares required to recover. Defaults to the wallet's configured
    /// policy (2 of 3).
    #[arg(long, short = 't')]
    pub threshold: Option<u8>,

    /// Shares to issue. Defaults to the wallet's configured policy.
    #[arg(long, short = 'n')]
    pub total: Option<u8>,

    /// Write a recovery kit JSON file here instead of printing shares.
    #[arg(long)]
    pub kit: Option<PathBuf>,
}

/// Arguments for `recover`.
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// DID of the identity being recovered. Read from the kit if omitted.
    #[arg(long)]
    pub did: Option<String>,

    /// Hex-encoded public key of the identity.
    #[arg(long)]
    pub public_key: String,

    /// An encoded share. Repeat once per share.
    #[arg(long = "share", conflicts_with = "kit")]
    pub shares: Vec<String>,

    /// A recovery kit JSON file.
    #[arg(long)]
    pub kit: Option<PathBuf>,
}

/// Arguments for `add-credential`.
#[derive(Args, Debug)]
pub struct AddCredentialArgs {
    /// Credential JSON file, or `-` for stdin.
    pub file: PathBuf,
}

/// Arguments for `list-credentials`.
#[derive(Args, Debug)]
pub struct ListCredentialsArgs {
    /// Print full credential JSON instead of one summary line each.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `wipe`.
#[derive(Args, Debug)]
pub struct WipeArgs {
    /// Confirm deletion.
    #[arg(long)]
    pub yes: bool,
}
