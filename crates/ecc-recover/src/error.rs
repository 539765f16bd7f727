//! Error types shared across the crate.
//!
//! Every failure is deterministic: identical inputs always produce the
//! identical error kind, so callers can surface the kind directly (re-enter
//! key text on `ChecksumMismatch`, re-derive the signature on
//! `MalformedSignature`, and so on) without any retry policy.

use crate::curve::Curve;
use thiserror::Error;

/// Errors from curve arithmetic, signature parsing, key recovery, and the
/// textual key codecs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EccError {
    /// A hex fixture or diagnostic string failed to parse.
    #[error("malformed hex: {0}")]
    MalformedHex(String),

    /// A private scalar was zero or not below the curve order.
    #[error("scalar out of range [1, n) for the curve order")]
    InvalidScalarRange,

    /// The DER signature bytes violate the minimal SEQUENCE-of-two-INTEGERs
    /// encoding, or carry an out-of-range r/s value.
    #[error("malformed DER signature: {0}")]
    MalformedSignature(&'static str),

    /// An x-coordinate has no square root on the curve, or explicit
    /// coordinates fail the curve equation.
    #[error("point is not on the curve")]
    PointNotOnCurve,

    /// The candidate x-coordinate `r + (recid >> 1) * n` does not fit the
    /// field prime. Expected for most signatures when the recovery id is
    /// 2 or 3.
    #[error("recovery id {0} pushes the candidate x-coordinate past the field prime")]
    RecoveryIdOutOfRange(u8),

    /// The recovery id is outside 0..=3, or the recovered candidate is the
    /// point at infinity / off the curve.
    #[error("recovery id {0} does not yield a usable public key")]
    InvalidRecoveryId(u8),

    /// None of the four recovery ids reproduces the target public key.
    #[error("no recovery id in 0..=3 matches the target public key")]
    RecoveryIdNotFound,

    /// The trailing checksum of an encoded key does not match its payload.
    #[error("checksum mismatch in encoded key text")]
    ChecksumMismatch,

    /// A curve-tagged key names a curve this crate does not support.
    #[error("unsupported curve tag: {0}")]
    UnsupportedCurveTag(String),

    /// Two operands belong to different curves.
    #[error("curve mismatch: {0} vs {1}")]
    CurveMismatch(Curve, Curve),

    /// Structurally invalid key text or key bytes (bad base-58, wrong
    /// length, wrong prefix or role).
    #[error("malformed key: {0}")]
    MalformedKey(&'static str),
}

impl From<hex::FromHexError> for EccError {
    fn from(e: hex::FromHexError) -> Self {
        EccError::MalformedHex(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EccError>;
