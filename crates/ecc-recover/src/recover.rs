//! Public-key derivation and SEC1 §4.1.6 signature recovery.
//!
//! Three pure operations:
//!
//! - [`derive_public_key`] — private scalar → public point (`k · G`)
//! - [`recover_from_signature`] — (signature, digest, recid) → candidate
//!   public point
//! - [`find_recovery_id`] — which recid in 0..=3 reproduces a known key
//!
//! The recovery id packs two bits: bit 0 is the parity of the nonce
//! point's y-coordinate, bit 1 says the x-coordinate was reduced past the
//! group order and `n` must be added back to `r`. For recids 2 and 3 the
//! candidate x-coordinate `r + n` usually falls outside the field, which
//! is an expected per-candidate failure, not an input error.

use crate::curve::{mod_inv, Curve, Point};
use crate::der::Signature;
use crate::error::{EccError, Result};
use num_bigint::BigUint;
use num_traits::Zero;

// ============================================================================
// RECOVERY ID
// ============================================================================

/// Recovery tag in `{0, 1, 2, 3}` disambiguating the four candidate points
/// a signature can correspond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// All four candidates, in ascending order.
    pub const ALL: [RecoveryId; 4] = [RecoveryId(0), RecoveryId(1), RecoveryId(2), RecoveryId(3)];

    /// Construct from a byte; values above 3 fail `InvalidRecoveryId`.
    pub fn new(value: u8) -> Result<Self> {
        if value > 3 {
            return Err(EccError::InvalidRecoveryId(value));
        }
        Ok(RecoveryId(value))
    }

    /// The raw tag value.
    pub fn to_u8(self) -> u8 {
        self.0
    }

    /// Bit 0: the recovered nonce point has an odd y-coordinate.
    pub fn is_y_odd(self) -> bool {
        self.0 & 1 == 1
    }

    /// Bit 1: the nonce x-coordinate overflowed the field and the group
    /// order must be added back to `r`.
    pub fn adds_order(self) -> bool {
        self.0 & 2 != 0
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Derive the public key `k · G` from a big-endian private scalar.
///
/// Fails `InvalidScalarRange` unless `1 ≤ k < n`. The multiplication runs
/// on the fixed-sequence ladder since `k` is secret material.
pub fn derive_public_key(private_key: &[u8], curve: Curve) -> Result<Point> {
    let k = BigUint::from_bytes_be(private_key);
    let n = &curve.params().n;
    if k.is_zero() || k >= *n {
        return Err(EccError::InvalidScalarRange);
    }
    Ok(Point::generator(curve).scalar_mul(&k))
}

/// Recover the candidate public key for `(signature, digest, recid)` per
/// SEC1 §4.1.6.
///
/// Candidate x = `r + (recid >> 1) · n`; fails `RecoveryIdOutOfRange` when
/// that exceeds the field prime, `PointNotOnCurve` when the x-coordinate
/// has no matching point, and `InvalidRecoveryId` when the resulting
/// `Q = r⁻¹ · (s·R − e·G)` is the point at infinity or off the curve.
pub fn recover_from_signature(
    signature_der: &[u8],
    digest: &[u8; 32],
    recid: RecoveryId,
    curve: Curve,
) -> Result<Point> {
    let sig = Signature::from_der(signature_der, curve)?;
    recover_point(&sig, digest, recid)
}

/// Typed core of [`recover_from_signature`].
pub fn recover_point(sig: &Signature, digest: &[u8; 32], recid: RecoveryId) -> Result<Point> {
    let curve = sig.curve();
    let params = curve.params();

    // 1. Candidate nonce x-coordinate.
    let x = if recid.adds_order() {
        sig.r() + &params.n
    } else {
        sig.r().clone()
    };
    if x >= params.p {
        return Err(EccError::RecoveryIdOutOfRange(recid.to_u8()));
    }

    // 2. Nonce point with the tagged parity.
    let r_point = Point::decompress(&x, recid.is_y_odd(), curve)?;

    // 3. Message digest as a scalar.
    let e = BigUint::from_bytes_be(digest) % &params.n;

    // 4. Q = r⁻¹ · (s·R − e·G).
    let r_inv = mod_inv(sig.r(), &params.n);
    let s_r = r_point.scalar_mul(sig.s());
    let e_g = Point::generator(curve).scalar_mul(&e);
    let q = s_r.add(&e_g.negate())?.scalar_mul(&r_inv);

    // 5. A degenerate candidate cannot serve as a public key.
    if q.is_infinity() || !q.is_on_curve() {
        return Err(EccError::InvalidRecoveryId(recid.to_u8()));
    }
    Ok(q)
}

/// Find which recovery id reproduces `target` for this signature/digest.
///
/// Tries recids 0..=3 in ascending order and returns the first whose
/// recovered point equals `target` exactly. Candidates that fail with
/// `RecoveryIdOutOfRange`, `PointNotOnCurve`, or `InvalidRecoveryId` are
/// skipped; any other failure propagates. Fails `RecoveryIdNotFound` when
/// no candidate matches.
pub fn find_recovery_id(
    signature_der: &[u8],
    digest: &[u8; 32],
    target: &Point,
    curve: Curve,
) -> Result<RecoveryId> {
    let sig = Signature::from_der(signature_der, curve)?;
    for recid in RecoveryId::ALL {
        match recover_point(&sig, digest, recid) {
            Ok(candidate) if candidate == *target => return Ok(recid),
            Ok(_) => continue,
            Err(
                EccError::RecoveryIdOutOfRange(_)
                | EccError::PointNotOnCurve
                | EccError::InvalidRecoveryId(_),
            ) => continue,
            Err(other) => return Err(other),
        }
    }
    Err(EccError::RecoveryIdNotFound)
}

// ============================================================================
// TESTS
// ============================================================================
