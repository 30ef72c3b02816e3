// Validation module for the Identity Registry Service
//
// Pure format and checksum validators for the two supported identifier
// types. These functions have no side effects and no dependencies on the
// rest of the service.

/// Verhoeff multiplication table (dihedral group D5).
const D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

/// Verhoeff permutation table, applied by digit position modulo 8.
const P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// Verhoeff checksum over a digit string, least-significant digit first.
///
/// Returns true when the accumulated group element is the identity, i.e.
/// the number carries a correct check digit.
fn verhoeff_valid(digits: &str) -> bool {
    let mut c = 0u8;
    for (i, ch) in digits.bytes().rev().enumerate() {
        let digit = (ch - b'0') as usize;
        c = D[c as usize][P[i % 8][digit] as usize];
    }
    c == 0
}

/// Validate an Aadhaar number.
///
/// Whitespace anywhere in the input is ignored. The number must be exactly
/// 12 digits, start with 2-9, not consist of a single repeated digit, and
/// carry a valid Verhoeff check digit.
pub fn is_valid_aadhaar(raw: &str) -> bool {
    let s: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if s.len() != 12 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let first = s.as_bytes()[0];
    if !(b'2'..=b'9').contains(&first) {
        return false;
    }

    // Sequences like 222222222222 are syntactically well-formed but are not
    // issued as Aadhaar numbers.
    if s.bytes().all(|b| b == first) {
        return false;
    }

    verhoeff_valid(&s)
}

/// Validate a PAN after normalization.
///
/// The input is uppercased and trimmed, then checked against the fixed
/// pattern: 5 letters, 4 digits, 1 letter (e.g. ABCDE1234F).
pub fn is_valid_pan(raw: &str) -> bool {
    let s = raw.trim().to_uppercase();
    let bytes = s.as_bytes();

    bytes.len() == 10
        && bytes[..5].iter().all(|b| b.is_ascii_uppercase())
        && bytes[5..9].iter().all(|b| b.is_ascii_digit())
        && bytes[9].is_ascii_uppercase()
}

/// Normalize a PAN the same way the validator does before matching.
pub fn normalize_pan(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Checksum-valid fixtures; see the tests below for corrupted variants.
    const VALID_AADHAAR: &str = "234567890124";
    const VALID_AADHAAR_2: &str = "345678901238";

    #[test]
    fn accepts_checksum_valid_aadhaar() {
        assert!(is_valid_aadhaar(VALID_AADHAAR));
        assert!(is_valid_aadhaar(VALID_AADHAAR_2));
    }

    #[test]
    fn accepts_aadhaar_with_whitespace() {
        assert!(is_valid_aadhaar("2345 6789 0124"));
        assert!(is_valid_aadhaar(" 234567890124 "));
    }

    #[test]
    fn rejects_wrong_check_digit() {
        assert!(!is_valid_aadhaar("234567890123"));
        assert!(!is_valid_aadhaar("234567890125"));
    }

    #[test]
    fn rejects_any_single_digit_alteration() {
        // Verhoeff detects all single-digit errors, so bumping any one
        // digit of a valid number must invalidate it.
        for pos in 0..VALID_AADHAAR.len() {
            let mut bytes = VALID_AADHAAR.as_bytes().to_vec();
            bytes[pos] = b'0' + (bytes[pos] - b'0' + 1) % 10;
            let altered = String::from_utf8(bytes).unwrap();
            assert!(!is_valid_aadhaar(&altered), "accepted {}", altered);
        }
    }

    #[test]
    fn rejects_bad_leading_digit() {
        assert!(!is_valid_aadhaar("134567890124"));
        assert!(!is_valid_aadhaar("034567890124"));
    }

    #[test]
    fn rejects_repeated_digit_sequences() {
        for d in b'2'..=b'9' {
            let s = String::from_utf8(vec![d; 12]).unwrap();
            assert!(!is_valid_aadhaar(&s), "accepted {}", s);
        }
    }

    #[test]
    fn rejects_wrong_length_or_non_digits() {
        assert!(!is_valid_aadhaar("23456789012"));
        assert!(!is_valid_aadhaar("2345678901245"));
        assert!(!is_valid_aadhaar("23456789012a"));
        assert!(!is_valid_aadhaar(""));
    }

    #[test]
    fn accepts_well_formed_pan() {
        assert!(is_valid_pan("ABCDE1234F"));
        assert!(is_valid_pan("abcde1234f"));
        assert!(is_valid_pan("  AbCdE1234f  "));
    }

    #[test]
    fn rejects_malformed_pan() {
        assert!(!is_valid_pan("ABCD61234F")); // digit in the letter block
        assert!(!is_valid_pan("ABCDE123F4")); // letter/digit order swapped
        assert!(!is_valid_pan("ABCDE12345")); // trailing letter missing
        assert!(!is_valid_pan("ABCDE1234FF")); // too long
        assert!(!is_valid_pan("ABCD1234F")); // too short
        assert!(!is_valid_pan("ABCDE1234*"));
        assert!(!is_valid_pan(""));
    }

    #[test]
    fn normalizes_pan() {
        assert_eq!(normalize_pan(" abcde1234f "), "ABCDE1234F");
    }
}
