//! Hamming SEC-DED codec and a small simulated codeword memory.
//!
//! Data words of 8, 16 or 32 bits are encoded into Hamming codewords with an
//! extra overall parity bit. The decoder computes the syndrome, classifies the
//! error and corrects single-bit errors. [`memory::CellStore`] holds encoded
//! words by address so bits can be flipped and analyzed.
//!
//! ```rust
//! use secded::ecc::{bits, hamming, Classification};
//!
//! let data = bits::parse_bits("10101100").unwrap();
//! let codeword = hamming::encode(&data).unwrap();
//! assert_eq!(bits::to_bit_string(&codeword), "0111010011000");
//!
//! let mut received = codeword.clone();
//! hamming::flip_bit(&mut received, 5).unwrap();
//! let correction = hamming::correct(&received);
//! assert_eq!(correction.classification, Classification::SingleErrorCorrected);
//! assert_eq!(correction.position, 5);
//! assert_eq!(correction.codeword, codeword);
//! ```

pub mod ecc;
pub mod error;
pub mod memory;

pub use ecc::{Classification, Codeword, Correction, DataWidth, SyndromeReport};
pub use error::{Error, Result};
pub use memory::{CellStore, CodewordCell, SharedCellStore, Slot};
