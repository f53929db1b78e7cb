//! String table cell hashing.
//!
//! String tables store a hash next to every cell so the runtime can look up
//! rows without comparing text. The hash is a base-31 polynomial over the
//! lower-cased bytes, computed left to right with 32-bit signed wraparound.

/// Hash a byte string the way string table cells are hashed.
///
/// Bytes are lower-cased with ASCII rules and then sign-extended, matching a
/// `tolower` over signed `char`. Hashing stops at the first null byte.
#[inline]
pub fn string_table_hash_bytes(data: &[u8]) -> i32 {
    data.iter()
        .take_while(|&&b| b != 0)
        .fold(0i32, |hash, &b| {
            let c = b.to_ascii_lowercase() as i8 as i32;
            c.wrapping_add(hash.wrapping_mul(31))
        })
}

/// Hash a string the way string table cells are hashed.
#[inline]
pub fn string_table_hash(s: &str) -> i32 {
    string_table_hash_bytes(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hash() {
        assert_eq!(string_table_hash(""), 0);
    }

    #[test]
    fn test_known_hash() {
        // h = 'h'; h = h*31 + 'e'; ... over "hello"
        // 104 -> 3325 -> 103183 -> 3198781 -> 99162322
        assert_eq!(string_table_hash("Hello"), 99_162_322);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(string_table_hash("MP_Rust"), string_table_hash("mp_rust"));
    }

    #[test]
    fn test_wraparound() {
        // Long enough to overflow i32 several times; must not panic.
        let hash = string_table_hash("weapon_mp/iw5_acr_mp_reflex_silencer");
        assert_eq!(hash, string_table_hash("WEAPON_MP/IW5_ACR_MP_REFLEX_SILENCER"));
    }

    #[test]
    fn test_high_bytes_sign_extend() {
        assert_eq!(string_table_hash_bytes(&[0xE9]), -23);
    }

    #[test]
    fn test_stops_at_null() {
        assert_eq!(string_table_hash_bytes(b"ab\0cd"), string_table_hash("ab"));
    }
}
