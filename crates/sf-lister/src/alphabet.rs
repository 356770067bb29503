//! The fixed partition alphabet.
//!
//! Prefix extensions are formed by appending exactly one of these symbols.
//! The set and its order are load-bearing: probes walk it in order, and
//! reproducing a traversal requires the identical table.

/// Symbols used to extend a prefix during partitioning, in probe order.
pub const PARTITION_ALPHABET: [char; 81] = [
    ' ', '!', '&', '\'', '(', ')', '+', ',', '-', '.', '/', //
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', //
    ':', ';', '=', '?', '@', //
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', //
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', //
    '_', //
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', //
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', //
    '*', '$',
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_size() {
        assert_eq!(PARTITION_ALPHABET.len(), 81);
    }

    #[test]
    fn test_alphabet_has_no_duplicates() {
        let unique: HashSet<char> = PARTITION_ALPHABET.iter().copied().collect();
        assert_eq!(unique.len(), PARTITION_ALPHABET.len());
    }

    #[test]
    fn test_alphabet_order_is_pinned() {
        assert_eq!(PARTITION_ALPHABET[0], ' ');
        assert_eq!(PARTITION_ALPHABET[10], '/');
        assert_eq!(PARTITION_ALPHABET[11], '0');
        assert_eq!(PARTITION_ALPHABET[20], '9');
        assert_eq!(PARTITION_ALPHABET[26], 'A');
        assert_eq!(PARTITION_ALPHABET[52], '_');
        assert_eq!(PARTITION_ALPHABET[53], 'a');
        assert_eq!(PARTITION_ALPHABET[79], '*');
        assert_eq!(PARTITION_ALPHABET[80], '$');
    }

    #[test]
    fn test_digit_and_letter_runs_are_contiguous() {
        for (i, d) in ('0'..='9').enumerate() {
            assert_eq!(PARTITION_ALPHABET[11 + i], d);
        }
        for (i, c) in ('A'..='Z').enumerate() {
            assert_eq!(PARTITION_ALPHABET[26 + i], c);
        }
        for (i, c) in ('a'..='z').enumerate() {
            assert_eq!(PARTITION_ALPHABET[53 + i], c);
        }
    }

    #[test]
    fn test_alphabet_is_ascii() {
        assert!(PARTITION_ALPHABET.iter().all(|c| c.is_ascii()));
    }
}
