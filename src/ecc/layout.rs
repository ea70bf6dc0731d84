//! Parity layout arithmetic for Hamming codes.
//!
//! A Hamming code over `m` data bits needs the smallest `p` such that
//! `2^p >= m + p + 1`, which leaves enough distinct non-zero syndromes to name
//! every position in the SEC part. The parity bits sit at positions `1, 2, 4, ...`.

use crate::error::{Error, Result};

/// Supported data word widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataWidth {
    W8,
    W16,
    W32,
}

impl DataWidth {
    /// All supported widths, narrowest first.
    pub const ALL: [DataWidth; 3] = [DataWidth::W8, DataWidth::W16, DataWidth::W32];

    /// Maps a data vector length to its width.
    ///
    /// Fails with [`Error::InvalidLength`] for anything other than 8, 16 or 32.
    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            8 => Ok(DataWidth::W8),
            16 => Ok(DataWidth::W16),
            32 => Ok(DataWidth::W32),
            other => Err(Error::InvalidLength(other)),
        }
    }

    /// Number of data bits `m`.
    pub fn data_len(self) -> usize {
        match self {
            DataWidth::W8 => 8,
            DataWidth::W16 => 16,
            DataWidth::W32 => 32,
        }
    }

    /// Number of Hamming parity bits `p_sec`.
    pub fn parity_bits(self) -> usize {
        parity_count(self.data_len())
    }

    /// Length of the SEC part, `m + p_sec`.
    pub fn sec_len(self) -> usize {
        self.data_len() + self.parity_bits()
    }

    /// Length of the full SEC-DED codeword, including the overall parity bit.
    pub fn codeword_len(self) -> usize {
        self.sec_len() + 1
    }

    /// Width whose SEC-DED codeword has exactly `len` bits, if any.
    pub fn from_codeword_len(len: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.codeword_len() == len)
    }
}

/// Returns the smallest `p` with `2^p >= data_len + p + 1`.
pub fn parity_count(data_len: usize) -> usize {
    let mut p = 0;
    while (1usize << p) < data_len + p + 1 {
        p += 1;
    }
    p
}

/// Returns the 1-indexed parity positions `2^0 .. 2^(parity_bits-1)`.
///
/// Stops at the first power of two past `sec_len` rather than padding.
pub fn parity_positions(parity_bits: usize, sec_len: usize) -> Vec<usize> {
    let mut positions = Vec::with_capacity(parity_bits);
    for k in 0..parity_bits {
        let pos = 1usize << k;
        if pos > sec_len {
            break;
        }
        positions.push(pos);
    }
    positions
}

/// True when a 1-indexed position holds a Hamming parity bit.
pub(crate) fn is_parity_position(position: usize) -> bool {
    position.is_power_of_two()
}
