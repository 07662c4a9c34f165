//! Keyed-hash truncation shared by the counter- and time-based families.

use ring::hmac::{sign, Key, HMAC_SHA1_FOR_LEGACY_USE_ONLY as HMAC_SHA1};

// "Dynamic truncation" (https://tools.ietf.org/html/rfc4226#section-5.3)
fn truncate(hs: &[u8]) -> u32 {
    // Get the offset location from the last 4 bits of the digest
    let offset = (hs[hs.len() - 1] & 0xf) as usize;
    let bytes = [
        // Strip the leading bit to remove signed/unsigned ambiguity
        hs[offset] & 0x7f,
        hs[offset + 1],
        hs[offset + 2],
        hs[offset + 3],
    ];
    u32::from_be_bytes(bytes)
}

/// Computes the code for the given secret and factor, rendered as a
/// zero-padded decimal string of exactly `digits` characters.
///
/// The RFC 4226 Appendix D vectors assume fixed-width strings (`"287082"`,
/// never `"87082"`), so the reduced value is always padded back out to the
/// requested width. Secret and digit validation happens at generator
/// construction, not here.
pub(crate) fn hotp_code(secret: &[u8], factor: u64, digits: u32) -> String {
    let key = Key::new(HMAC_SHA1, secret);
    let hs = sign(&key, &factor.to_be_bytes());
    let p = u64::from(truncate(hs.as_ref()));
    // Reduce modulo 10^digits. The truncated value fits in 31 bits, so any
    // width past ten digits leaves the value untouched and only pads.
    let code = match 10u64.checked_pow(digits) {
        Some(modulus) => p % modulus,
        None => p,
    };
    format!("{:0width$}", code, width = digits as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_example_section_5_4() {
        let hs = [
            0x1f, 0x86, 0x98, 0x69, 0x0e, 0x02, 0xca, 0x16, 0x61, 0x85, 0x50, 0xef, 0x7f, 0x19,
            0xda, 0x8e, 0x94, 0x5b, 0x55, 0x5a,
        ];
        assert_eq!(truncate(&hs), 0x50ef7f19);
        assert_eq!(truncate(&hs) % 1_000_000, 872_921);
    }

    #[test]
    fn raw_truncation_rfc_vectors() {
        let secret = b"12345678901234567890";
        let expected: [u32; 10] = [
            0x4c93cf18, 0x41397eea, 0x082fef30, 0x66ef7655, 0x61c5938a, 0x33c083d4, 0x7256c032,
            0x04e5b397, 0x2823443f, 0x2679dc69,
        ];
        for (i, raw) in expected.iter().enumerate() {
            let key = Key::new(HMAC_SHA1, secret);
            let hs = sign(&key, &(i as u64).to_be_bytes());
            assert_eq!(truncate(hs.as_ref()), *raw);
        }
    }

    #[test]
    fn codes_are_zero_padded() {
        // Degenerate digest: every offset reads four zero bytes.
        assert_eq!(truncate(&[0; 20]), 0);
        // RFC 6238 timestep 37037036 reduces to a value with a leading zero;
        // the rendered code must keep its full eight-character width.
        assert_eq!(hotp_code(b"12345678901234567890", 37_037_036, 8), "07081804");
    }
}
