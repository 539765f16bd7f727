//! Curve parameters and affine point arithmetic for secp256k1 / secp256r1.
//!
//! Two fixed parameter sets, selected explicitly at every entry point:
//!
//! | Tag | Curve     | Used by                    |
//! |-----|-----------|----------------------------|
//! | K1  | secp256k1 | Bitcoin-lineage key formats |
//! | R1  | secp256r1 | NIST P-256 key formats      |
//!
//! A [`Point`] carries its curve tag, so mixing operands from different
//! curves is a checked `CurveMismatch` error rather than silent garbage.
//! All arithmetic is affine over `num-bigint`, reduced modulo the owning
//! curve's prime; no operation ever mixes moduli.
//!
//! Scalar multiplication uses a Montgomery ladder with a fixed 256-bit
//! window: every iteration performs exactly one addition and one doubling,
//! so the operation sequence does not depend on the scalar's bit pattern.

use crate::error::{EccError, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;
use std::sync::LazyLock;

/// Fixed ladder width. Both supported curves have 256-bit orders.
const SCALAR_BITS: u64 = 256;

// ============================================================================
// CURVE SELECTION
// ============================================================================

/// Supported curve parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// secp256k1 (Koblitz), tag `K1`.
    Secp256k1,
    /// secp256r1 / NIST P-256, tag `R1`.
    Secp256r1,
}

impl Curve {
    /// The compiled-in parameter set for this curve.
    pub fn params(&self) -> &'static CurveParams {
        match self {
            Curve::Secp256k1 => &SECP256K1,
            Curve::Secp256r1 => &SECP256R1,
        }
    }

    /// Two-character tag used in curve-tagged key text.
    pub fn tag(&self) -> &'static str {
        match self {
            Curve::Secp256k1 => "K1",
            Curve::Secp256r1 => "R1",
        }
    }

    /// Parse a curve tag from key text.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "K1" => Ok(Curve::Secp256k1),
            "R1" => Ok(Curve::Secp256r1),
            other => Err(EccError::UnsupportedCurveTag(other.to_string())),
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Secp256k1 => write!(f, "secp256k1"),
            Curve::Secp256r1 => write!(f, "secp256r1"),
        }
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Domain parameters for a short-Weierstrass curve `y² = x³ + ax + b (mod p)`.
///
/// Initialized once per process and never mutated.
pub struct CurveParams {
    /// Field prime.
    pub p: BigUint,
    /// Curve coefficient a.
    pub a: BigUint,
    /// Curve coefficient b.
    pub b: BigUint,
    /// Base point x-coordinate.
    pub gx: BigUint,
    /// Base point y-coordinate.
    pub gy: BigUint,
    /// Group order of the base point.
    pub n: BigUint,
    /// Byte width of a field element / scalar.
    pub field_len: usize,
}

fn const_hex(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).expect("curve constant")
}

static SECP256K1: LazyLock<CurveParams> = LazyLock::new(|| CurveParams {
    p: const_hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f"),
    a: BigUint::zero(),
    b: BigUint::from(7u32),
    gx: const_hex("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
    gy: const_hex("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
    n: const_hex("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"),
    field_len: 32,
});

static SECP256R1: LazyLock<CurveParams> = LazyLock::new(|| CurveParams {
    p: const_hex("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"),
    a: const_hex("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc"),
    b: const_hex("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
    gx: const_hex("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
    gy: const_hex("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
    n: const_hex("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
    field_len: 32,
});

// ============================================================================
// FIELD HELPERS
// ============================================================================

fn mod_add(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a + b) % p
}

/// `a - b mod p` for operands already reduced below `p`.
fn mod_sub(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    ((a + p) - b) % p
}

fn mod_mul(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a * b) % p
}

/// Modular inverse by Fermat: `a^(m-2) mod m`. Requires prime `m` and
/// nonzero `a`, which every call site guarantees.
pub(crate) fn mod_inv(a: &BigUint, m: &BigUint) -> BigUint {
    a.modpow(&(m - 2u32), m)
}

/// Square root mod `p` for `p ≡ 3 (mod 4)`: `a^((p+1)/4)`, which both
/// supported primes satisfy. Returns `None` when `a` is a non-residue.
fn mod_sqrt(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    let e = (p + 1u32) >> 2;
    let y = a.modpow(&e, p);
    if mod_mul(&y, &y, p) == *a {
        Some(y)
    } else {
        None
    }
}

/// Big-endian bytes left-padded to `len`.
pub(crate) fn be_bytes_fixed(v: &BigUint, len: usize) -> Vec<u8> {
    let raw = v.to_bytes_be();
    let mut out = vec![0u8; len];
    out[len - raw.len()..].copy_from_slice(&raw);
    out
}

// ============================================================================
// POINT
// ============================================================================

/// An affine curve point, or the point at infinity.
///
/// Equality is exact coordinate equality on the same curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    curve: Curve,
    coords: Option<(BigUint, BigUint)>,
}

impl Point {
    /// The identity element of the curve group.
    pub fn infinity(curve: Curve) -> Self {
        Point { curve, coords: None }
    }

    /// Construct from explicit coordinates, validating the curve equation.
    pub fn new(curve: Curve, x: BigUint, y: BigUint) -> Result<Self> {
        let point = Point { curve, coords: Some((x, y)) };
        if point.is_on_curve() {
            Ok(point)
        } else {
            Err(EccError::PointNotOnCurve)
        }
    }

    /// The curve's base point G.
    pub fn generator(curve: Curve) -> Self {
        let params = curve.params();
        Point {
            curve,
            coords: Some((params.gx.clone(), params.gy.clone())),
        }
    }

    /// The curve this point belongs to.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Whether this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.coords.is_none()
    }

    /// x-coordinate, `None` for the point at infinity.
    pub fn x(&self) -> Option<&BigUint> {
        self.coords.as_ref().map(|(x, _)| x)
    }

    /// y-coordinate, `None` for the point at infinity.
    pub fn y(&self) -> Option<&BigUint> {
        self.coords.as_ref().map(|(_, y)| y)
    }

    /// Check `y² = x³ + ax + b (mod p)`. The identity element is a group
    /// member and reports `true`.
    pub fn is_on_curve(&self) -> bool {
        let params = self.curve.params();
        let (x, y) = match &self.coords {
            None => return true,
            Some(c) => c,
        };
        if *x >= params.p || *y >= params.p {
            return false;
        }
        let lhs = mod_mul(y, y, &params.p);
        let x_cubed = mod_mul(&mod_mul(x, x, &params.p), x, &params.p);
        let rhs = mod_add(
            &mod_add(&x_cubed, &mod_mul(&params.a, x, &params.p), &params.p),
            &params.b,
            &params.p,
        );
        lhs == rhs
    }

    /// The additive inverse `(x, -y)`.
    pub fn negate(&self) -> Point {
        let params = self.curve.params();
        match &self.coords {
            None => self.clone(),
            Some((x, y)) => {
                let neg_y = if y.is_zero() { y.clone() } else { &params.p - y };
                Point {
                    curve: self.curve,
                    coords: Some((x.clone(), neg_y)),
                }
            }
        }
    }

    /// Point addition. Fails `CurveMismatch` when the operands carry
    /// different curve tags.
    pub fn add(&self, other: &Point) -> Result<Point> {
        if self.curve != other.curve {
            return Err(EccError::CurveMismatch(self.curve, other.curve));
        }
        Ok(self.add_same_curve(other))
    }

    fn add_same_curve(&self, other: &Point) -> Point {
        let params = self.curve.params();
        let (x1, y1) = match &self.coords {
            None => return other.clone(),
            Some(c) => c,
        };
        let (x2, y2) = match &other.coords {
            None => return self.clone(),
            Some(c) => c,
        };
        if x1 == x2 {
            // Either P + (-P) = infinity (covers the y = 0 two-torsion
            // case) or a doubling.
            if mod_add(y1, y2, &params.p).is_zero() {
                return Point::infinity(self.curve);
            }
            return self.double();
        }
        let lambda = mod_mul(
            &mod_sub(y2, y1, &params.p),
            &mod_inv(&mod_sub(x2, x1, &params.p), &params.p),
            &params.p,
        );
        self.chord_result(&lambda, x1, y1, x2)
    }

    /// Point doubling. Doubling a point with `y = 0` yields infinity.
    pub fn double(&self) -> Point {
        let params = self.curve.params();
        let (x, y) = match &self.coords {
            None => return self.clone(),
            Some(c) => c,
        };
        if y.is_zero() {
            return Point::infinity(self.curve);
        }
        let three_x_sq = mod_mul(&BigUint::from(3u32), &mod_mul(x, x, &params.p), &params.p);
        let lambda = mod_mul(
            &mod_add(&three_x_sq, &params.a, &params.p),
            &mod_inv(&mod_add(y, y, &params.p), &params.p),
            &params.p,
        );
        self.chord_result(&lambda, x, y, x)
    }

    /// `x3 = λ² - x1 - x2`, `y3 = λ(x1 - x3) - y1`.
    fn chord_result(&self, lambda: &BigUint, x1: &BigUint, y1: &BigUint, x2: &BigUint) -> Point {
        let params = self.curve.params();
        let x3 = mod_sub(
            &mod_sub(&mod_mul(lambda, lambda, &params.p), x1, &params.p),
            x2,
            &params.p,
        );
        let y3 = mod_sub(&mod_mul(lambda, &mod_sub(x1, &x3, &params.p), &params.p), y1, &params.p);
        Point {
            curve: self.curve,
            coords: Some((x3, y3)),
        }
    }

    /// Montgomery-ladder scalar multiplication `k · P`.
    ///
    /// Walks a fixed 256 bits and performs one addition plus one doubling
    /// per bit whatever its value, keeping the operation sequence
    /// independent of `k`. Two residual leaks remain: the big-integer limb
    /// arithmetic is value-dependent in time, and while the accumulator is
    /// still the identity each addition takes the trivial short-circuit
    /// path, which exposes the scalar's leading-zero count.
    pub fn scalar_mul(&self, k: &BigUint) -> Point {
        let mut r0 = Point::infinity(self.curve);
        let mut r1 = self.clone();
        for i in (0..SCALAR_BITS).rev() {
            if k.bit(i) {
                r0 = r0.add_same_curve(&r1);
                r1 = r1.double();
            } else {
                r1 = r0.add_same_curve(&r1);
                r0 = r0.double();
            }
        }
        r0
    }

    /// Solve the curve equation for `y` given `x` and the desired parity.
    ///
    /// Fails `PointNotOnCurve` when `x` does not fit the field, when
    /// `x³ + ax + b` has no square root, or when only the even root `y = 0`
    /// exists and the odd one was requested.
    pub fn decompress(x: &BigUint, y_odd: bool, curve: Curve) -> Result<Point> {
        let params = curve.params();
        if *x >= params.p {
            return Err(EccError::PointNotOnCurve);
        }
        let x_cubed = mod_mul(&mod_mul(x, x, &params.p), x, &params.p);
        let rhs = mod_add(
            &mod_add(&x_cubed, &mod_mul(&params.a, x, &params.p), &params.p),
            &params.b,
            &params.p,
        );
        let y = mod_sqrt(&rhs, &params.p).ok_or(EccError::PointNotOnCurve)?;
        let y = if y.is_zero() {
            if y_odd {
                return Err(EccError::PointNotOnCurve);
            }
            y
        } else if y.bit(0) == y_odd {
            y
        } else {
            &params.p - &y
        };
        Ok(Point {
            curve,
            coords: Some((x.clone(), y)),
        })
    }

    // ------------------------------------------------------------------
    // SEC1 byte forms
    // ------------------------------------------------------------------

    /// Uncompressed SEC1 form `0x04 ‖ x ‖ y`.
    pub fn to_uncompressed(&self) -> Result<[u8; 65]> {
        let params = self.curve.params();
        let (x, y) = self
            .coords
            .as_ref()
            .ok_or(EccError::MalformedKey("point at infinity has no byte form"))?;
        let mut out = [0u8; 65];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&be_bytes_fixed(x, params.field_len));
        out[33..65].copy_from_slice(&be_bytes_fixed(y, params.field_len));
        Ok(out)
    }

    /// Compressed SEC1 form: parity byte (`0x02` even y, `0x03` odd y)
    /// followed by the big-endian x-coordinate.
    pub fn to_compressed(&self) -> Result<[u8; 33]> {
        let params = self.curve.params();
        let (x, y) = self
            .coords
            .as_ref()
            .ok_or(EccError::MalformedKey("point at infinity has no byte form"))?;
        let mut out = [0u8; 33];
        out[0] = if y.bit(0) { 0x03 } else { 0x02 };
        out[1..].copy_from_slice(&be_bytes_fixed(x, params.field_len));
        Ok(out)
    }

    /// Parse either SEC1 byte form (33-byte compressed or 65-byte
    /// uncompressed), validating curve membership.
    pub fn from_sec1(bytes: &[u8], curve: Curve) -> Result<Point> {
        match bytes.first() {
            Some(0x04) => {
                if bytes.len() != 65 {
                    return Err(EccError::MalformedKey("uncompressed point must be 65 bytes"));
                }
                let x = BigUint::from_bytes_be(&bytes[1..33]);
                let y = BigUint::from_bytes_be(&bytes[33..65]);
                Point::new(curve, x, y)
            }
            Some(parity @ (0x02 | 0x03)) => {
                if bytes.len() != 33 {
                    return Err(EccError::MalformedKey("compressed point must be 33 bytes"));
                }
                let x = BigUint::from_bytes_be(&bytes[1..]);
                Point::decompress(&x, *parity == 0x03, curve)
            }
            _ => Err(EccError::MalformedKey("unknown SEC1 point prefix")),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
