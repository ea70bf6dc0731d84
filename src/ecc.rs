//! Hamming SEC-DED error correction.
//!
//! This module provides:
//! - Parity layout arithmetic (how many Hamming parity bits a word needs and where they sit)
//! - A SEC-DED encoder for 8, 16 and 32-bit data words
//! - Syndrome analysis and single-error correction with double-error detection
//! - Bit-string helpers for displaying and parsing codewords
//!
//! # Codeword layout
//!
//! Positions are 1-indexed. Every power of two (1, 2, 4, 8, ...) inside the SEC part
//! holds a Hamming parity bit, every other position holds a data bit in input order,
//! and a single overall parity bit is appended at the end.
//!
//! # Examples
//!
//! ```rust
//! use secded::ecc::{bits, hamming, Classification};
//!
//! let data = bits::parse_bits("1111000010100101").unwrap();
//! let mut codeword = hamming::encode(&data).unwrap();
//! assert_eq!(codeword.len(), 22);
//!
//! hamming::flip_bit(&mut codeword, 3).unwrap();
//! hamming::flip_bit(&mut codeword, 10).unwrap();
//! let correction = hamming::correct(&codeword);
//! assert_eq!(correction.classification, Classification::DoubleErrorDetected);
//! ```

use bitvec::prelude::*;

pub use crate::error::Result;

/// A vector of bits, most significant first. Used for both data words and codewords.
pub type Codeword = BitVec<u8, Msb0>;

pub mod bits;
pub mod hamming;
pub mod layout;

pub use hamming::{
    analyze, correct, encode, extract_data, flip_bit, inject_random_errors, Classification,
    Correction, SyndromeReport,
};
pub use layout::{parity_count, parity_positions, DataWidth};
