/// Constant-time comparison
///
/// Digest and fingerprint comparisons go through [`constant_time_eq`] so
/// that the time taken does not depend on where two inputs first differ.

use subtle::ConstantTimeEq;

/// Compares two byte slices in constant time
///
/// Slices of different length compare unequal. Length is not secret for any
/// caller in this crate (digest and fingerprint lengths are public).
///
/// # Example
///
/// ```
/// use credkit_core::auth::compare::constant_time_eq;
///
/// assert!(constant_time_eq(b"hello", b"hello"));
/// assert!(!constant_time_eq(b"hello", b"world"));
/// ```
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        // Equal
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(constant_time_eq(b"", b""));

        // Different content
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hellp"));

        // Different lengths
        assert!(!constant_time_eq(b"hello", b"hello2"));
        assert!(!constant_time_eq(b"", b"not empty"));
    }

    #[test]
    fn test_mismatch_position_does_not_matter() {
        let base = [0x5a_u8; 64];
        let mut early = base;
        early[0] ^= 1;
        let mut late = base;
        late[63] ^= 1;

        assert!(!constant_time_eq(&base, &early));
        assert!(!constant_time_eq(&base, &late));
    }
}
