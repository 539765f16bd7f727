//! # ecc-recover
//!
//! ECDSA *recoverable-key* subsystem: derive a public key from a private
//! scalar, reconstruct a candidate public key from a signature plus digest
//! plus a small recovery tag, and work out which tag (0-3) matches a known
//! key — together with the textual key encodings that make those keys
//! usable.
//!
//! | Piece          | Module      | What it does                              |
//! |----------------|-------------|-------------------------------------------|
//! | CurveMath      | [`curve`]   | field/point arithmetic, K1 and R1 params  |
//! | SignatureCodec | [`der`]     | DER `(r, s)` decode/encode                |
//! | KeyRecovery    | [`recover`] | `k·G` derivation, SEC1 §4.1.6 recovery    |
//! | KeyEncoding    | [`encode`]  | legacy + curve-tagged base-58 key text    |
//!
//! Everything is a pure function over immutable compiled-in curve tables:
//! no I/O, no shared mutable state, safe to call from any thread.
//!
//! # Example
//!
//! ```
//! use ecc_recover::{derive_public_key, Curve};
//!
//! let private_key =
//!     hex::decode("c057a9462bc219abd32c6ca5c656cc8226555684d1ee8d53124da40330f656c1").unwrap();
//! let public = derive_public_key(&private_key, Curve::Secp256k1).unwrap();
//! assert_eq!(
//!     hex::encode(public.to_uncompressed().unwrap()),
//!     "04257784a3d0aceef73ea365ce01febaec1b671b971b9c9feb3f4901e7b773bd43\
//!      66c7451a736e2921b3dfeefc2855e984d287d58a0dfb995045f339a0e8a2fd7a"
//! );
//! ```

pub mod curve;
pub mod der;
pub mod encode;
pub mod error;
pub mod recover;

pub use curve::{Curve, CurveParams, Point};
pub use der::Signature;
pub use encode::{
    decode_key, decode_legacy_private_key, decode_legacy_public_key, decode_private_key,
    decompress_public_key, encode_key, encode_legacy_private_key, encode_legacy_public_key,
    to_compressed_public_key, KeyRole, LEGACY_PUBLIC_PREFIX,
};
pub use error::{EccError, Result};
pub use recover::{derive_public_key, find_recovery_id, recover_from_signature, RecoveryId};
