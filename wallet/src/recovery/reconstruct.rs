//! Reconstructing a secret from shares.

use zeroize::Zeroizing;

use super::error::ShamirError;
use super::share::RecoveryShare;
use crate::config::MIN_THRESHOLD;
use crate::crypto::gf256;

/// Recover a secret from at least `threshold` shares of one split.
///
/// Uses Lagrange interpolation over GF(256) to evaluate each byte's
/// polynomial at x = 0. The first `threshold` shares (in the order given)
/// are used; any beyond that are checked for consistency and otherwise
/// ignored. Every valid subset of size `threshold` gives the same answer.
///
/// # Errors
///
/// - [`ShamirError::NoShares`] / [`ShamirError::InsufficientShares`] when
///   fewer than `threshold` shares are supplied. Sub-threshold interpolation
///   would silently produce a wrong key, so it is refused outright.
/// - [`ShamirError::ParameterMismatch`], [`ShamirError::LengthMismatch`],
///   [`ShamirError::InvalidShareIndex`], [`ShamirError::DuplicateShareIndex`],
///   [`ShamirError::InvalidShareParameters`], [`ShamirError::EmptyShare`]
///   when the shares can't have come from one split.
pub fn recover_secret(shares: &[RecoveryShare]) -> Result<Zeroizing<Vec<u8>>, ShamirError> {
    let first = shares.first().ok_or(ShamirError::NoShares)?;
    validate_shares(first, shares)?;

    let threshold = first.threshold as usize;
    if shares.len() < threshold {
        return Err(ShamirError::InsufficientShares {
            required: first.threshold,
            provided: shares.len(),
        });
    }

    let selected = &shares[..threshold];
    let xs: Vec<u8> = selected.iter().map(|s| s.index).collect();
    // Indices are public, so the basis can be computed once up front.
    let basis = gf256::lagrange_basis_at_zero(&xs)?;

    let secret_len = first.data.len();
    let mut secret = Zeroizing::new(Vec::with_capacity(secret_len));
    let mut ys = Zeroizing::new(vec![0u8; threshold]);

    for byte_idx in 0..secret_len {
        for (y, share) in ys.iter_mut().zip(selected) {
            *y = share.data[byte_idx];
        }
        secret.push(gf256::combine(&basis, &ys));
    }

    tracing::debug!(
        threshold = first.threshold,
        supplied = shares.len(),
        secret_len,
        "secret reconstructed from shares"
    );

    Ok(secret)
}

fn validate_shares(first: &RecoveryShare, shares: &[RecoveryShare]) -> Result<(), ShamirError> {
    if first.threshold < MIN_THRESHOLD || first.total < first.threshold {
        return Err(ShamirError::InvalidShareParameters {
            threshold: first.threshold,
            total: first.total,
        });
    }
    if first.data.is_empty() {
        return Err(ShamirError::EmptyShare);
    }

    let mut seen = [false; 256];
    for share in shares {
        if share.threshold != first.threshold || share.total != first.total {
            return Err(ShamirError::ParameterMismatch { index: share.index });
        }
        if share.data.len() != first.data.len() {
            return Err(ShamirError::LengthMismatch {
                expected: first.data.len(),
                got: share.data.len(),
            });
        }
        if share.index == 0 || share.index > share.total {
            return Err(ShamirError::InvalidShareIndex {
                index: share.index,
                total: share.total,
            });
        }
        if seen[share.index as usize] {
            return Err(ShamirError::DuplicateShareIndex(share.index));
        }
        seen[share.index as usize] = true;
    }
    Ok(())
}
