//! Textual key codecs: legacy checksum formats and curve-tagged formats.
//!
//! Three wire formats, all base-58 with an embedded 4-byte checksum:
//!
//! | Format         | Shape                                   | Checksum                  |
//! |----------------|-----------------------------------------|---------------------------|
//! | Legacy private | `b58(0x80 ‖ scalar [‖ 0x01] ‖ ck)`      | sha256(sha256(payload))   |
//! | Legacy public  | `"RSN" ‖ b58(comp33 ‖ ck)`              | ripemd160(payload)        |
//! | Curve-tagged   | `<ROLE>_<TAG>_b58(payload ‖ ck)`        | ripemd160(payload ‖ TAG)  |
//!
//! ROLE is `PVT` or `PUB`, TAG is `K1` or `R1`. Folding the tag into the
//! tagged checksum means a payload cannot be silently reinterpreted under
//! a different curve. The legacy formats predate the tags and assume K1.
//!
//! `PVT_K1` is the historical exception among the tagged formats: its
//! payload is the legacy WIF body (`0x80 ‖ scalar [‖ 0x01]`) and it keeps
//! the double-SHA256 checksum, so old private keys could be wrapped in the
//! new prefix without re-encoding. The other three role/tag pairs use the
//! tag-bound ripemd checksum over the bare key bytes.
//!
//! One legacy quirk matters: upstream encoders stored the scalar as a
//! variable-length big integer, so a valid legacy private payload may carry
//! fewer than 32 significant scalar bytes. The decoder left-zero-pads back
//! to the fixed width.

use crate::curve::{Curve, Point};
use crate::error::{EccError, Result};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Prefix of legacy public key text.
pub const LEGACY_PUBLIC_PREFIX: &str = "RSN";

const LEGACY_PRIVATE_VERSION: u8 = 0x80;
const COMPRESSION_FLAG: u8 = 0x01;
const CHECKSUM_LEN: usize = 4;
const SCALAR_LEN: usize = 32;
const COMPRESSED_LEN: usize = 33;

/// Whether an encoded key holds private or public material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Private,
    Public,
}

impl KeyRole {
    /// Role prefix in curve-tagged text.
    pub fn prefix(self) -> &'static str {
        match self {
            KeyRole::Private => "PVT",
            KeyRole::Public => "PUB",
        }
    }
}

// ============================================================================
// CHECKSUMS
// ============================================================================

fn double_sha256_checksum(payload: &[u8]) -> [u8; 4] {
    let digest = Sha256::digest(Sha256::digest(payload));
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

fn ripemd160_checksum(payload: &[u8], suffix: &[u8]) -> [u8; 4] {
    let mut hasher = Ripemd160::new();
    hasher.update(payload);
    hasher.update(suffix);
    let digest = hasher.finalize();
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

// ============================================================================
// LEGACY PRIVATE
// ============================================================================

/// Decode legacy private-key text into a fixed-width 32-byte scalar.
///
/// Payloads shorter than the scalar width are left-zero-padded; a trailing
/// compression flag is accepted and dropped.
pub fn decode_legacy_private_key(text: &str) -> Result<[u8; SCALAR_LEN]> {
    let mut data = bs58::decode(text)
        .into_vec()
        .map_err(|_| EccError::MalformedKey("invalid base-58"))?;
    let result = legacy_private_from_payload(&data);
    data.zeroize();
    result
}

fn legacy_private_from_payload(data: &[u8]) -> Result<[u8; SCALAR_LEN]> {
    if data.len() < CHECKSUM_LEN + 2 {
        return Err(EccError::MalformedKey("legacy private key too short"));
    }
    let (payload, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
    if double_sha256_checksum(payload) != *checksum {
        return Err(EccError::ChecksumMismatch);
    }
    private_scalar_from_wif_body(payload)
}

/// Parse a WIF body (version byte, scalar, optional compression flag) into
/// a fixed-width scalar. Shared by the legacy format and the `PVT_K1`
/// wrapper, which carries the same body behind its prefix.
fn private_scalar_from_wif_body(payload: &[u8]) -> Result<[u8; SCALAR_LEN]> {
    if payload.len() < 2 {
        return Err(EccError::MalformedKey("private key body too short"));
    }
    if payload[0] != LEGACY_PRIVATE_VERSION {
        return Err(EccError::MalformedKey("wrong legacy version byte"));
    }
    let mut body = &payload[1..];
    if body.len() == SCALAR_LEN + 1 {
        if body[SCALAR_LEN] != COMPRESSION_FLAG {
            return Err(EccError::MalformedKey("unexpected trailing byte"));
        }
        body = &body[..SCALAR_LEN];
    }
    if body.len() > SCALAR_LEN {
        return Err(EccError::MalformedKey("scalar too wide"));
    }
    let mut out = [0u8; SCALAR_LEN];
    out[SCALAR_LEN - body.len()..].copy_from_slice(body);
    Ok(out)
}

/// Encode a 32-byte scalar as legacy private-key text.
pub fn encode_legacy_private_key(scalar: &[u8; SCALAR_LEN]) -> String {
    let mut payload = Vec::with_capacity(1 + SCALAR_LEN + CHECKSUM_LEN);
    payload.push(LEGACY_PRIVATE_VERSION);
    payload.extend_from_slice(scalar);
    let checksum = double_sha256_checksum(&payload);
    payload.extend_from_slice(&checksum);
    let text = bs58::encode(&payload).into_string();
    payload.zeroize();
    text
}

// ============================================================================
// LEGACY PUBLIC
// ============================================================================

/// Encode a compressed public key as legacy text (`RSN` prefix, no curve
/// tag; the legacy format assumes K1).
pub fn encode_legacy_public_key(compressed: &[u8; COMPRESSED_LEN]) -> String {
    let mut data = compressed.to_vec();
    data.extend_from_slice(&ripemd160_checksum(compressed, b""));
    format!("{LEGACY_PUBLIC_PREFIX}{}", bs58::encode(&data).into_string())
}

/// Decode legacy public-key text back to the compressed 33 bytes.
pub fn decode_legacy_public_key(text: &str) -> Result<[u8; COMPRESSED_LEN]> {
    let body = text
        .strip_prefix(LEGACY_PUBLIC_PREFIX)
        .ok_or(EccError::MalformedKey("missing legacy public prefix"))?;
    let data = bs58::decode(body)
        .into_vec()
        .map_err(|_| EccError::MalformedKey("invalid base-58"))?;
    if data.len() != COMPRESSED_LEN + CHECKSUM_LEN {
        return Err(EccError::MalformedKey("legacy public key length"));
    }
    let (payload, checksum) = data.split_at(COMPRESSED_LEN);
    if ripemd160_checksum(payload, b"") != *checksum {
        return Err(EccError::ChecksumMismatch);
    }
    let mut out = [0u8; COMPRESSED_LEN];
    out.copy_from_slice(payload);
    Ok(out)
}

// ============================================================================
// CURVE-TAGGED
// ============================================================================

/// Checksum for one role/tag pair. `PVT_K1` keeps the legacy double-SHA256
/// over its WIF-body payload; everything else binds the tag into a ripemd
/// checksum.
fn tagged_checksum(role: KeyRole, curve: Curve, payload: &[u8]) -> [u8; 4] {
    if role == KeyRole::Private && curve == Curve::Secp256k1 {
        double_sha256_checksum(payload)
    } else {
        ripemd160_checksum(payload, curve.tag().as_bytes())
    }
}

/// Encode raw key bytes as curve-tagged text `<ROLE>_<TAG>_<payload>`.
///
/// For `PVT_K1` the payload must be the full WIF body
/// (`0x80 ‖ scalar [‖ 0x01]`); for every other role/tag pair it is the bare
/// key bytes.
pub fn encode_key(role: KeyRole, curve: Curve, payload: &[u8]) -> String {
    let mut data = payload.to_vec();
    data.extend_from_slice(&tagged_checksum(role, curve, payload));
    let text = format!(
        "{}_{}_{}",
        role.prefix(),
        curve.tag(),
        bs58::encode(&data).into_string()
    );
    data.zeroize();
    text
}

/// Decode curve-tagged text, checking the role prefix and the format's
/// checksum. Returns the curve named by the tag and the raw payload bytes
/// (for `PVT_K1` that is the WIF body, version byte included).
pub fn decode_key(text: &str, role: KeyRole) -> Result<(Curve, Vec<u8>)> {
    let mut parts = text.splitn(3, '_');
    let role_part = parts.next().unwrap_or_default();
    let tag_part = parts
        .next()
        .ok_or(EccError::MalformedKey("missing curve tag"))?;
    let payload_part = parts
        .next()
        .ok_or(EccError::MalformedKey("missing key payload"))?;

    if role_part != role.prefix() {
        return Err(EccError::MalformedKey("role prefix mismatch"));
    }
    let curve = Curve::from_tag(tag_part)?;

    let mut data = bs58::decode(payload_part)
        .into_vec()
        .map_err(|_| EccError::MalformedKey("invalid base-58"))?;
    if data.len() <= CHECKSUM_LEN {
        data.zeroize();
        return Err(EccError::MalformedKey("tagged key payload too short"));
    }
    let split = data.len() - CHECKSUM_LEN;
    if tagged_checksum(role, curve, &data[..split]) != data[split..] {
        data.zeroize();
        return Err(EccError::ChecksumMismatch);
    }
    let payload = data[..split].to_vec();
    data.zeroize();
    Ok((curve, payload))
}

/// Decode private-key text in either format, normalizing to a fixed-width
/// scalar. Legacy text implies K1; tagged text names its own curve, with
/// `PVT_K1` payloads carrying a WIF body and `PVT_R1` a bare scalar.
pub fn decode_private_key(text: &str) -> Result<(Curve, [u8; SCALAR_LEN])> {
    if text.starts_with("PVT_") {
        let (curve, mut payload) = decode_key(text, KeyRole::Private)?;
        let result = match curve {
            Curve::Secp256k1 => private_scalar_from_wif_body(&payload),
            Curve::Secp256r1 => {
                if payload.is_empty() || payload.len() > SCALAR_LEN {
                    Err(EccError::MalformedKey("tagged private scalar length"))
                } else {
                    let mut out = [0u8; SCALAR_LEN];
                    out[SCALAR_LEN - payload.len()..].copy_from_slice(&payload);
                    Ok(out)
                }
            }
        };
        payload.zeroize();
        Ok((curve, result?))
    } else {
        Ok((Curve::Secp256k1, decode_legacy_private_key(text)?))
    }
}

// ============================================================================
// COMPRESSED-POINT CONVERSIONS
// ============================================================================

/// Compress an uncompressed SEC1 public key (`0x04 ‖ x ‖ y`) to the
/// 33-byte parity form. Pure byte surgery; no curve needed.
pub fn to_compressed_public_key(uncompressed: &[u8]) -> Result<[u8; COMPRESSED_LEN]> {
    if uncompressed.len() != 65 || uncompressed[0] != 0x04 {
        return Err(EccError::MalformedKey("expected 65-byte uncompressed point"));
    }
    let mut out = [0u8; COMPRESSED_LEN];
    out[0] = if uncompressed[64] & 1 == 1 { 0x03 } else { 0x02 };
    out[1..].copy_from_slice(&uncompressed[1..33]);
    Ok(out)
}

/// Expand a compressed public key back to the uncompressed form by solving
/// the curve equation for y.
pub fn decompress_public_key(compressed: &[u8], curve: Curve) -> Result<[u8; 65]> {
    if compressed.len() != COMPRESSED_LEN {
        return Err(EccError::MalformedKey("expected 33-byte compressed point"));
    }
    Point::from_sec1(compressed, curve)?.to_uncompressed()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn tagged_roundtrip_all_roles_and_curves() {
        let payload = hex!("0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20");
        for curve in [Curve::Secp256k1, Curve::Secp256r1] {
            for role in [KeyRole::Private, KeyRole::Public] {
                let text = encode_key(role, curve, &payload);
                assert!(text.starts_with(&format!("{}_{}_", role.prefix(), curve.tag())));
                let (decoded_curve, decoded) = decode_key(&text, role).unwrap();
                assert_eq!(decoded_curve, curve);
                assert_eq!(decoded, payload);
            }
        }
    }

    #[test]
    fn pvt_k1_payload_is_a_wif_body() {
        let scalar = hex!("c057a9462bc219abd32c6ca5c656cc8226555684d1ee8d53124da40330f656c1");
        let mut body = vec![LEGACY_PRIVATE_VERSION];
        body.extend_from_slice(&scalar);

        let text = encode_key(KeyRole::Private, Curve::Secp256k1, &body);
        let raw = bs58::decode(text.strip_prefix("PVT_K1_").unwrap())
            .into_vec()
            .unwrap();
        let split = raw.len() - CHECKSUM_LEN;
        assert_eq!(raw[split..], double_sha256_checksum(&raw[..split]));

        assert_eq!(
            decode_private_key(&text).unwrap(),
            (Curve::Secp256k1, scalar)
        );
    }

    #[test]
    fn pvt_k1_rejects_tag_bound_checksum() {
        // A PVT_K1 body sealed with the ripemd scheme of the other formats
        // must not decode.
        let mut body = vec![LEGACY_PRIVATE_VERSION];
        body.extend_from_slice(&[0x11u8; 32]);
        let mut data = body.clone();
        data.extend_from_slice(&ripemd160_checksum(&body, b"K1"));
        let text = format!("PVT_K1_{}", bs58::encode(&data).into_string());
        assert_eq!(
            decode_key(&text, KeyRole::Private),
            Err(EccError::ChecksumMismatch)
        );
    }

    #[test]
    fn pvt_k1_rejects_wrong_version_byte() {
        let mut body = vec![0x7f];
        body.extend_from_slice(&[0x11u8; 32]);
        let text = encode_key(KeyRole::Private, Curve::Secp256k1, &body);
        assert!(matches!(
            decode_private_key(&text),
            Err(EccError::MalformedKey(_))
        ));
    }

    #[test]
    fn tag_is_bound_into_checksum() {
        let payload = [0x42u8; 33];
        let text = encode_key(KeyRole::Public, Curve::Secp256k1, &payload);
        let retagged = text.replace("PUB_K1_", "PUB_R1_");
        assert_eq!(
            decode_key(&retagged, KeyRole::Public),
            Err(EccError::ChecksumMismatch)
        );
    }

    #[test]
    fn tagged_decode_rejects_unknown_tag_and_role() {
        assert_eq!(
            decode_key("PUB_S1_abc", KeyRole::Public),
            Err(EccError::UnsupportedCurveTag("S1".to_string()))
        );
        assert!(matches!(
            decode_key("PUB_K1_abc", KeyRole::Private),
            Err(EccError::MalformedKey(_))
        ));
        assert!(matches!(
            decode_key("no-underscores", KeyRole::Public),
            Err(EccError::MalformedKey(_))
        ));
    }

    #[test]
    fn tagged_checksum_flip_is_detected() {
        let text = encode_key(KeyRole::Public, Curve::Secp256k1, &[7u8; 33]);
        // Swap the final base-58 character for a different alphabet member.
        let mut chars: Vec<char> = text.chars().collect();
        let last = *chars.last().unwrap();
        *chars.last_mut().unwrap() = if last == '2' { '3' } else { '2' };
        let flipped: String = chars.into_iter().collect();
        assert_eq!(
            decode_key(&flipped, KeyRole::Public),
            Err(EccError::ChecksumMismatch)
        );
    }

    #[test]
    fn legacy_private_roundtrip() {
        let scalar = hex!("c057a9462bc219abd32c6ca5c656cc8226555684d1ee8d53124da40330f656c1");
        let text = encode_legacy_private_key(&scalar);
        assert_eq!(decode_legacy_private_key(&text).unwrap(), scalar);
    }

    #[test]
    fn legacy_private_pads_short_scalar() {
        // Hand-build a payload whose scalar is only 31 bytes wide.
        let short_scalar = [0xabu8; 31];
        let mut payload = vec![LEGACY_PRIVATE_VERSION];
        payload.extend_from_slice(&short_scalar);
        let checksum = double_sha256_checksum(&payload);
        payload.extend_from_slice(&checksum);
        let text = bs58::encode(&payload).into_string();

        let decoded = decode_legacy_private_key(&text).unwrap();
        assert_eq!(decoded[0], 0x00);
        assert_eq!(&decoded[1..], &short_scalar);
    }

    #[test]
    fn legacy_private_accepts_compression_flag() {
        let scalar = [0x11u8; 32];
        let mut payload = vec![LEGACY_PRIVATE_VERSION];
        payload.extend_from_slice(&scalar);
        payload.push(COMPRESSION_FLAG);
        let checksum = double_sha256_checksum(&payload);
        payload.extend_from_slice(&checksum);
        let text = bs58::encode(&payload).into_string();

        assert_eq!(decode_legacy_private_key(&text).unwrap(), scalar);
    }

    #[test]
    fn legacy_private_rejects_bad_trailing_byte() {
        let mut payload = vec![LEGACY_PRIVATE_VERSION];
        payload.extend_from_slice(&[0x11u8; 32]);
        payload.push(0x02);
        let checksum = double_sha256_checksum(&payload);
        payload.extend_from_slice(&checksum);
        let text = bs58::encode(&payload).into_string();

        assert!(matches!(
            decode_legacy_private_key(&text),
            Err(EccError::MalformedKey(_))
        ));
    }

    #[test]
    fn legacy_private_rejects_corrupted_checksum() {
        let text = encode_legacy_private_key(&[0x22u8; 32]);
        let mut data = bs58::decode(&text).into_vec().unwrap();
        let last = data.len() - 1;
        data[last] ^= 0x01;
        let corrupted = bs58::encode(&data).into_string();
        assert_eq!(
            decode_legacy_private_key(&corrupted),
            Err(EccError::ChecksumMismatch)
        );
    }

    #[test]
    fn legacy_public_roundtrip_and_prefix() {
        let compressed = {
            let mut c = [0x55u8; COMPRESSED_LEN];
            c[0] = 0x02;
            c
        };
        let text = encode_legacy_public_key(&compressed);
        assert!(text.starts_with(LEGACY_PUBLIC_PREFIX));
        assert_eq!(decode_legacy_public_key(&text).unwrap(), compressed);

        assert!(matches!(
            decode_legacy_public_key(text.trim_start_matches(LEGACY_PUBLIC_PREFIX)),
            Err(EccError::MalformedKey(_))
        ));
    }

    #[test]
    fn compression_requires_uncompressed_input() {
        assert!(to_compressed_public_key(&[0u8; 33]).is_err());
        let mut bad_prefix = [0u8; 65];
        bad_prefix[0] = 0x02;
        assert!(to_compressed_public_key(&bad_prefix).is_err());
    }

    #[test]
    fn compress_decompress_idempotent_both_parities() {
        let base = Point::generator(Curve::Secp256k1)
            .scalar_mul(&num_bigint::BigUint::from(0xdeadbeefu32));
        // A point and its negation carry opposite y parities.
        for point in [base.clone(), base.negate()] {
            let uncompressed = point.to_uncompressed().unwrap();
            let compressed = to_compressed_public_key(&uncompressed).unwrap();
            let expanded = decompress_public_key(&compressed, Curve::Secp256k1).unwrap();
            assert_eq!(expanded, uncompressed);
            assert_eq!(to_compressed_public_key(&expanded).unwrap(), compressed);
        }
    }

    #[test]
    fn decode_private_key_dispatches_all_formats() {
        let scalar = hex!("c057a9462bc219abd32c6ca5c656cc8226555684d1ee8d53124da40330f656c1");

        let legacy = encode_legacy_private_key(&scalar);
        assert_eq!(
            decode_private_key(&legacy).unwrap(),
            (Curve::Secp256k1, scalar)
        );

        let mut wif_body = vec![LEGACY_PRIVATE_VERSION];
        wif_body.extend_from_slice(&scalar);
        let tagged_k1 = encode_key(KeyRole::Private, Curve::Secp256k1, &wif_body);
        assert_eq!(
            decode_private_key(&tagged_k1).unwrap(),
            (Curve::Secp256k1, scalar)
        );

        let tagged_r1 = encode_key(KeyRole::Private, Curve::Secp256r1, &scalar);
        assert_eq!(
            decode_private_key(&tagged_r1).unwrap(),
            (Curve::Secp256r1, scalar)
        );
    }
}
