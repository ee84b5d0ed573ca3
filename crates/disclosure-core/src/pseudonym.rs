/// Deterministic pseudonyms for anonymized views.
///
/// The surname token is `ANON-` followed by the first 8 lowercase hex
/// characters of SHA-256 over the record id's UTF-8 bytes. It is stable across
/// evaluations, so two anonymized views of the same record can be correlated
/// by a reader, but it is not a secret: anyone holding the id can recompute
/// it. Use a keyed construction if the id itself is sensitive.
use sha2::{Digest, Sha256};

use crate::newtypes::RecordId;

/// Replacement for `identity.firstName`.
pub const FIRST_NAME_PSEUDONYM: &str = "Student";

/// Prefix of the surname token.
pub const SURNAME_PREFIX: &str = "ANON-";

/// Number of digest bytes kept in the surname token (8 hex characters).
const SURNAME_DIGEST_BYTES: usize = 4;

/// Returns the surname token for `id`.
pub fn surname_token(id: &RecordId) -> String {
    let digest = Sha256::digest(id.as_bytes());
    let short = digest.get(..SURNAME_DIGEST_BYTES).unwrap_or(&digest[..]);
    format!("{SURNAME_PREFIX}{}", hex_encode(short))
}

/// Encodes `bytes` as lowercase hex.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_CHARS[(b >> 4) as usize] as char);
        out.push(HEX_CHARS[(b & 0x0f) as usize] as char);
    }
    out
}
