//! Error types shared by the codec and the codeword store.

use thiserror::Error;

/// Errors returned by the codec and the codeword store.
///
/// Decode outcomes such as a detected double-bit error are not errors; they are
/// reported through [`crate::ecc::Classification`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The data vector is not 8, 16 or 32 bits long.
    #[error("data length must be 8, 16, or 32 bits (got {0})")]
    InvalidLength(usize),

    /// The address is outside `[0, size)`.
    #[error("invalid memory address {address} (store holds {size} cells)")]
    InvalidAddress { address: usize, size: usize },

    /// The 1-indexed bit position is outside `[1, len]`.
    #[error("invalid bit position {position}, must be between 1 and {len}")]
    InvalidPosition { position: usize, len: usize },

    /// The slot at this address is empty, so there is no codeword to flip, restore or analyze.
    #[error("no codeword stored at memory address {0}")]
    NoOriginal(usize),

    /// Text given as a bit string contained something other than '0' or '1'.
    #[error("invalid bit string: {0}")]
    InvalidBitString(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
