//! Splitting a secret into shares.

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use super::error::ShamirError;
use super::share::{RecoveryShare, ShamirConfig};
use crate::crypto::gf256;

/// Split a secret into `total` shares, any `threshold` of which recover it.
///
/// Coefficients come from the OS CSPRNG. See [`split_secret_with_rng`].
///
/// # Errors
///
/// [`ShamirError::ThresholdTooLow`], [`ShamirError::ThresholdExceedsTotal`],
/// or [`ShamirError::EmptySecret`].
pub fn split_secret(
    secret: &[u8],
    threshold: u8,
    total: u8,
) -> Result<Vec<RecoveryShare>, ShamirError> {
    let config = ShamirConfig::new(threshold, total)?;
    split_secret_with_rng(secret, &config, &mut rand::rngs::OsRng)
}

/// Split a secret using the supplied CSPRNG.
///
/// For each byte of the secret, draws a random polynomial of degree
/// `threshold - 1` whose constant term is that byte, then evaluates it at
/// x = 1, 2, ..., total. x = 0 is never handed out, which is exactly why
/// `threshold - 1` shares say nothing about the secret.
pub fn split_secret_with_rng<R: RngCore + CryptoRng>(
    secret: &[u8],
    config: &ShamirConfig,
    rng: &mut R,
) -> Result<Vec<RecoveryShare>, ShamirError> {
    if secret.is_empty() {
        return Err(ShamirError::EmptySecret);
    }

    let threshold = config.threshold() as usize;
    let total = config.total();

    let mut shares: Vec<RecoveryShare> = (1..=total)
        .map(|index| {
            RecoveryShare::new(
                index,
                config.threshold(),
                total,
                Vec::with_capacity(secret.len()),
            )
        })
        .collect();

    // [secret_byte, c_1, ..., c_{t-1}], reused per byte and wiped on drop.
    let mut coefficients = Zeroizing::new(vec![0u8; threshold]);

    for &secret_byte in secret {
        coefficients[0] = secret_byte;
        rng.fill_bytes(&mut coefficients[1..]);

        for share in shares.iter_mut() {
            let y = gf256::eval_polynomial(&coefficients, share.index);
            share.data.push(y);
        }
    }

    tracing::debug!(
        threshold = config.threshold(),
        total,
        secret_len = secret.len(),
        "secret split into shares"
    );

    Ok(shares)
}
