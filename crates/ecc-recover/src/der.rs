//! DER codec for the ECDSA `(r, s)` signature pair.
//!
//! Only the minimal encoding is accepted:
//!
//! ```text
//! 0x30 <len> 0x02 <rlen> <r bytes> 0x02 <slen> <s bytes>
//! ```
//!
//! INTEGER contents must be positive and minimal: a leading `0x00` is only
//! allowed (and then required) when the next byte has its high bit set.
//! A zero `r` or `s`, trailing bytes after the SEQUENCE, or long-form
//! lengths (never needed for 256-bit values) are all rejected.

use crate::curve::Curve;
use crate::error::{EccError, Result};
use num_bigint::BigUint;
use num_traits::Zero;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

/// An ECDSA signature `(r, s)`, tagged with the curve that produced it.
///
/// Both components are validated to lie in `[1, n)` at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    curve: Curve,
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Construct from raw integers, range-checking against the curve order.
    pub fn new(curve: Curve, r: BigUint, s: BigUint) -> Result<Self> {
        let n = &curve.params().n;
        if r.is_zero() || r >= *n {
            return Err(EccError::MalformedSignature("r out of range [1, n)"));
        }
        if s.is_zero() || s >= *n {
            return Err(EccError::MalformedSignature("s out of range [1, n)"));
        }
        Ok(Signature { curve, r, s })
    }

    /// Parse a DER-encoded signature.
    pub fn from_der(bytes: &[u8], curve: Curve) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(EccError::MalformedSignature("truncated"));
        }
        if bytes[0] != TAG_SEQUENCE {
            return Err(EccError::MalformedSignature("outer tag is not SEQUENCE"));
        }
        let seq_len = short_form_len(bytes[1])?;
        let body = &bytes[2..];
        if body.len() != seq_len {
            return Err(EccError::MalformedSignature("SEQUENCE length mismatch"));
        }

        let (r, rest) = parse_integer(body)?;
        let (s, rest) = parse_integer(rest)?;
        if !rest.is_empty() {
            return Err(EccError::MalformedSignature("trailing bytes after s"));
        }
        Signature::new(curve, r, s)
    }

    /// Parse a hex-encoded DER signature. Convenience for fixtures and
    /// diagnostics.
    pub fn from_der_hex(hex_der: &str, curve: Curve) -> Result<Self> {
        let bytes = hex::decode(hex_der)?;
        Signature::from_der(&bytes, curve)
    }

    /// Emit the minimal DER encoding.
    pub fn to_der(&self) -> Vec<u8> {
        let r = encode_integer(&self.r);
        let s = encode_integer(&self.s);
        let mut out = Vec::with_capacity(2 + r.len() + s.len());
        out.push(TAG_SEQUENCE);
        out.push((r.len() + s.len()) as u8);
        out.extend_from_slice(&r);
        out.extend_from_slice(&s);
        out
    }

    /// The r component.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// The s component.
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// The curve this signature was produced on.
    pub fn curve(&self) -> Curve {
        self.curve
    }
}

/// Short-form length octet. Values ≥ 0x80 signal long form, which a valid
/// two-INTEGER signature of 256-bit values never needs.
fn short_form_len(octet: u8) -> Result<usize> {
    if octet >= 0x80 {
        return Err(EccError::MalformedSignature("long-form length"));
    }
    Ok(octet as usize)
}

/// Parse one INTEGER from the front of `buf`, returning the value and the
/// remaining bytes.
fn parse_integer(buf: &[u8]) -> Result<(BigUint, &[u8])> {
    if buf.len() < 2 {
        return Err(EccError::MalformedSignature("truncated INTEGER"));
    }
    if buf[0] != TAG_INTEGER {
        return Err(EccError::MalformedSignature("expected INTEGER tag"));
    }
    let len = short_form_len(buf[1])?;
    if len == 0 {
        return Err(EccError::MalformedSignature("empty INTEGER"));
    }
    let rest = &buf[2..];
    if rest.len() < len {
        return Err(EccError::MalformedSignature("truncated INTEGER body"));
    }
    let content = &rest[..len];

    if content[0] & 0x80 != 0 {
        return Err(EccError::MalformedSignature("negative INTEGER"));
    }
    if content[0] == 0x00 && (len == 1 || content[1] & 0x80 == 0) {
        return Err(EccError::MalformedSignature("non-minimal zero padding"));
    }

    Ok((BigUint::from_bytes_be(content), &rest[len..]))
}

/// Minimal positive INTEGER encoding: prepend `0x00` only when the leading
/// byte would read as a sign bit.
fn encode_integer(v: &BigUint) -> Vec<u8> {
    let body = v.to_bytes_be();
    let mut out = Vec::with_capacity(2 + body.len() + 1);
    out.push(TAG_INTEGER);
    if body[0] & 0x80 != 0 {
        out.push((body.len() + 1) as u8);
        out.push(0x00);
    } else {
        out.push(body.len() as u8);
    }
    out.extend_from_slice(&body);
    out
}

// ============================================================================
// TESTS
// ============================================================================
