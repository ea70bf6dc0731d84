//! ASCII '0'/'1' rendering of bit vectors, for display and for typed-in data.

use super::Codeword;
use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Parses a string of '0' and '1' characters. Whitespace is ignored.
pub fn parse_bits(text: &str) -> Result<Codeword> {
    let mut bits = Codeword::with_capacity(text.len());
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '0' => bits.push(false),
            '1' => bits.push(true),
            other => {
                return Err(Error::InvalidBitString(format!(
                    "unexpected character {other:?} in {text:?}"
                )))
            }
        }
    }
    Ok(bits)
}

/// Renders bits as a string of '0' and '1'.
pub fn to_bit_string(bits: &BitSlice<u8, Msb0>) -> String {
    bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

/// Like [`to_bit_string`], but cut at `max` bits with a trailing "..." when longer.
pub fn summarize(bits: &BitSlice<u8, Msb0>, max: usize) -> String {
    if bits.len() <= max {
        return to_bit_string(bits);
    }
    let mut text = to_bit_string(&bits[..max]);
    text.push_str("...");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render() {
        let bits = parse_bits("1010 1100").unwrap();
        assert_eq!(bits.len(), 8);
        assert!(bits[0]);
        assert!(!bits[1]);
        assert_eq!(to_bit_string(&bits), "10101100");
    }

    #[test]
    fn test_parse_rejects_other_characters() {
        assert!(matches!(
            parse_bits("10201"),
            Err(Error::InvalidBitString(_))
        ));
    }

    #[test]
    fn test_empty() {
        assert!(parse_bits("").unwrap().is_empty());
        assert_eq!(to_bit_string(BitSlice::<u8, Msb0>::empty()), "");
    }

    #[test]
    fn test_summarize() {
        let bits = parse_bits("0111010011000").unwrap();
        assert_eq!(summarize(&bits, 20), "0111010011000");
        assert_eq!(summarize(&bits, 4), "0111...");
    }
}
