//! Decoding of the base64 VLQ segments used by the `mappings` field.

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE: u64 = 1 << VLQ_BASE_SHIFT;
const VLQ_BASE_MASK: u64 = VLQ_BASE - 1;
const VLQ_CONTINUATION_BIT: u64 = VLQ_BASE;

/// An Error that can happen when decoding a VLQ segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VlqError {
    /// The continuation groups of a single value do not fit into 64 bits.
    #[error("vlq value in segment `{0}` overflows 64 bits")]
    Overflow(String),
}

/// Maps a base64 character to its 6-bit value, `None` for characters outside the alphabet.
fn base64_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(value as u64)
}

/// Decodes one segment into the signed integers it encodes.
///
/// Characters outside of the base64 alphabet are skipped. A trailing value
/// whose last character still has the continuation bit set is dropped.
pub fn decode_segment(segment: &str) -> Result<Vec<i64>, VlqError> {
    let mut result = Vec::new();
    let mut shift = 0;
    let mut value: u64 = 0;

    for integer in segment.bytes().filter_map(base64_value) {
        let payload = integer & VLQ_BASE_MASK;
        if shift >= u64::BITS || (shift > 0 && payload >> (u64::BITS - shift) != 0) {
            return Err(VlqError::Overflow(segment.to_owned()));
        }
        value |= payload << shift;

        if integer & VLQ_CONTINUATION_BIT != 0 {
            shift += VLQ_BASE_SHIFT;
            continue;
        }

        let negate = value & 1 == 1;
        let magnitude = (value >> 1) as i64;
        result.push(if negate { -magnitude } else { magnitude });
        value = 0;
        shift = 0;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(num: i64) -> String {
        const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
        let mut value = if num < 0 {
            (num.unsigned_abs() << 1) | 1
        } else {
            (num as u64) << 1
        };
        let mut out = String::new();
        loop {
            let mut digit = value & VLQ_BASE_MASK;
            value >>= VLQ_BASE_SHIFT;
            if value > 0 {
                digit |= VLQ_CONTINUATION_BIT;
            }
            out.push(CHARS[digit as usize] as char);
            if value == 0 {
                return out;
            }
        }
    }

    #[test]
    fn decodes_single_values() {
        assert_eq!(decode_segment("A").unwrap(), vec![0]);
        assert_eq!(decode_segment("C").unwrap(), vec![1]);
        assert_eq!(decode_segment("D").unwrap(), vec![-1]);
        assert_eq!(decode_segment("gB").unwrap(), vec![16]);
    }

    #[test]
    fn decodes_full_segment() {
        assert_eq!(decode_segment("AAAA").unwrap(), vec![0, 0, 0, 0]);
        assert_eq!(decode_segment("UAACV").unwrap(), vec![10, 0, 0, 1, -10]);
    }

    #[test]
    fn encoded_values_survive_decoding() {
        for num in [0, 1, -1, 15, -15, 16, -16, 31, -31, 32, -32, 1000, -1000, 123_456_789] {
            let encoded = encode(num);
            assert_eq!(decode_segment(&encoded).unwrap(), vec![num], "{encoded}");
        }
    }

    #[test]
    fn skips_unknown_characters() {
        assert_eq!(decode_segment("A!C D").unwrap(), vec![0, 1, -1]);
        assert_eq!(decode_segment("").unwrap(), Vec::<i64>::new());
        assert_eq!(decode_segment("***").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn drops_unterminated_value() {
        assert_eq!(decode_segment("Cg").unwrap(), vec![1]);
    }

    #[test]
    fn rejects_overflow() {
        let segment = "g".repeat(14) + "B";
        assert!(matches!(
            decode_segment(&segment),
            Err(VlqError::Overflow(_))
        ));
    }
}
