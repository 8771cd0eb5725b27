//! # GF(256) Arithmetic
//!
//! The finite field underneath the secret-sharing scheme. Elements are bytes;
//! the field is GF(2^8) reduced by the irreducible polynomial
//! `x^8 + x^4 + x^3 + x + 1` (0x11B), the same one AES uses.
//!
//! ## Why no lookup tables
//!
//! Log/exp tables make multiplication two loads and an add, but the load
//! addresses are the secret bytes themselves. On a shared machine that is a
//! cache-timing side channel pointed straight at the key. Every operation
//! here runs a fixed instruction sequence regardless of operand values:
//! multiplication is carry-less "peasant" multiplication with the branches
//! replaced by masks, and inversion is a fixed exponentiation to `a^254`.
//!
//! The single exception is the zero check in [`inverse`], which is only ever
//! applied to share indices. Those are public.

use thiserror::Error;

/// Low byte of the reduction polynomial (the x^8 term falls off the byte).
const REDUCTION: u8 = 0x1B;

/// Field arithmetic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Zero has no multiplicative inverse. Usually means two shares carry
    /// the same index, or a share claims index 0.
    #[error("zero has no multiplicative inverse in GF(256)")]
    ZeroInverse,

    /// Interpolation needs one y-value per x-coordinate.
    #[error("interpolation point count mismatch: {xs} x-coordinates, {ys} y-values")]
    PointCountMismatch {
        /// Number of x-coordinates supplied.
        xs: usize,
        /// Number of y-values supplied.
        ys: usize,
    },
}

/// Add two field elements. Addition is XOR.
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Subtract two field elements. Identical to addition in characteristic 2.
#[inline]
pub fn sub(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiply two field elements.
///
/// Eight rounds, no data-dependent branches: the conditional add and the
/// conditional reduction are both done with all-ones/all-zeros masks.
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    let mut a = a;
    let mut b = b;
    let mut product = 0u8;
    for _ in 0..8 {
        product ^= (b & 1).wrapping_neg() & a;
        let carry = (a >> 7).wrapping_neg();
        a = (a << 1) ^ (carry & REDUCTION);
        b >>= 1;
    }
    product
}

/// Raise `a` to the 254th power, which is `a^-1` for any non-zero `a`
/// (the multiplicative group has order 255). Maps zero to zero.
#[inline]
fn pow254(a: u8) -> u8 {
    // 254 = 0b1111_1110: square seven times, multiplying in every square.
    let mut result = 1u8;
    let mut power = a;
    for _ in 0..7 {
        power = mul(power, power);
        result = mul(result, power);
    }
    result
}

/// Multiplicative inverse of a non-zero element.
pub fn inverse(a: u8) -> Result<u8, FieldError> {
    if a == 0 {
        return Err(FieldError::ZeroInverse);
    }
    Ok(pow254(a))
}

/// Divide `a` by a non-zero `b`.
pub fn div(a: u8, b: u8) -> Result<u8, FieldError> {
    Ok(mul(a, inverse(b)?))
}

/// Evaluate a polynomial at `x` using Horner's method.
///
/// `coefficients[0]` is the constant term, `coefficients[1]` the x^1
/// coefficient, and so on.
pub fn eval_polynomial(coefficients: &[u8], x: u8) -> u8 {
    let mut result = 0u8;
    for &coeff in coefficients.iter().rev() {
        result = add(mul(result, x), coeff);
    }
    result
}

/// Lagrange basis values `L_i(0)` for the given x-coordinates.
///
/// `L_i(0) = prod_{j != i} x_j / (x_j - x_i)`. The coordinates must be
/// pairwise distinct; a repeated coordinate surfaces as
/// [`FieldError::ZeroInverse`].
pub fn lagrange_basis_at_zero(xs: &[u8]) -> Result<Vec<u8>, FieldError> {
    let mut basis = Vec::with_capacity(xs.len());
    for (i, &xi) in xs.iter().enumerate() {
        let mut numerator = 1u8;
        let mut denominator = 1u8;
        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            numerator = mul(numerator, xj);
            denominator = mul(denominator, sub(xj, xi));
        }
        basis.push(div(numerator, denominator)?);
    }
    Ok(basis)
}

/// Interpolate the polynomial through `(xs[i], ys[i])` and evaluate it at 0.
pub fn interpolate_at_zero(xs: &[u8], ys: &[u8]) -> Result<u8, FieldError> {
    if xs.len() != ys.len() {
        return Err(FieldError::PointCountMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    let basis = lagrange_basis_at_zero(xs)?;
    Ok(combine(&basis, ys))
}

/// Sum of `basis[i] * ys[i]`. Split out so reconstruction can compute the
/// basis once and reuse it for every byte position.
#[inline]
pub fn combine(basis: &[u8], ys: &[u8]) -> u8 {
    basis
        .iter()
        .zip(ys)
        .fold(0u8, |acc, (&l, &y)| add(acc, mul(y, l)))
}
