//! Hamming SEC-DED encoding and decoding.
//!
//! Hamming codes place parity bits at the power-of-two positions of a codeword so that
//! the set of failing parity checks, read as a binary number (the syndrome), is the
//! 1-indexed position of a single flipped bit. Appending one overall parity bit extends
//! the code to SEC-DED: single errors are corrected and double errors are detected.
//!
//! This implementation provides:
//! - Encoding of 8, 16 and 32-bit data words
//! - Syndrome and overall-parity analysis of a received codeword
//! - Classification and correction of the received codeword
//! - Helpers for flipping bits to simulate corruption
//!
//! # Applications
//!
//! - Computer memory (ECC RAM)
//! - Cache and register file protection
//! - Storage controllers

use super::layout::{is_parity_position, parity_count, parity_positions, DataWidth};
use super::Codeword;
use crate::error::{Error, Result};
use bitvec::prelude::*;
use log::{debug, trace, warn};
use rand::Rng;
use std::fmt;

/// Upper bound on parity positions inferred from a received codeword.
///
/// Only matters for over-length input; supported codewords need at most six.
pub const MAX_INFERRED_PARITY_BITS: usize = 11;

/// Outcome of checking a received codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Syndrome and overall parity both check out.
    NoError,
    /// One bit was wrong and has been flipped back.
    SingleErrorCorrected,
    /// Two bits are wrong; the codeword is returned unchanged.
    DoubleErrorDetected,
    /// The syndrome does not name a correctable bit.
    Uncorrectable,
}

impl Classification {
    /// True when the corrected codeword can be trusted to carry the original data.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            Classification::NoError | Classification::SingleErrorCorrected
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Classification::NoError => "no error",
            Classification::SingleErrorCorrected => "single error corrected",
            Classification::DoubleErrorDetected => "double error detected",
            Classification::Uncorrectable => "uncorrectable error",
        };
        f.write_str(text)
    }
}

/// Result of [`analyze`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyndromeReport {
    /// Sum of the parity positions whose check failed.
    pub syndrome: usize,
    /// True when the whole codeword holds an odd number of 1 bits.
    pub overall_parity_odd: bool,
    /// Number of parity positions inferred from the codeword length.
    pub parity_bits: usize,
    /// The inferred 1-indexed parity positions.
    pub parity_positions: Vec<usize>,
}

impl SyndromeReport {
    /// True when every check passes.
    pub fn is_clean(&self) -> bool {
        self.syndrome == 0 && !self.overall_parity_odd
    }
}

/// Result of [`correct`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// The corrected codeword, or the received one when nothing was corrected.
    pub codeword: Codeword,
    pub classification: Classification,
    /// `0` for no error, the corrected 1-indexed position for a single error,
    /// `-1` for a double error or empty input, and the raw syndrome otherwise.
    pub position: i64,
}

impl Correction {
    fn unchanged(
        codeword: &BitSlice<u8, Msb0>,
        classification: Classification,
        position: i64,
    ) -> Self {
        Correction {
            codeword: codeword.to_bitvec(),
            classification,
            position,
        }
    }

    /// Data bits carried by the corrected codeword.
    ///
    /// `None` when the codeword could not be recovered or has an unsupported length.
    pub fn data(&self) -> Option<Codeword> {
        if !self.classification.is_recoverable() {
            return None;
        }
        extract_data(&self.codeword)
    }
}

/// Encodes an 8, 16 or 32-bit data vector into a SEC-DED codeword.
///
/// # Arguments
///
/// * `data` - Data bits in order, first bit lands at the lowest data position
///
/// # Returns
///
/// The `m + p + 1` bit codeword, or [`Error::InvalidLength`] for other lengths
pub fn encode(data: &BitSlice<u8, Msb0>) -> Result<Codeword> {
    let width = DataWidth::from_len(data.len())?;
    let parity_bits = parity_count(width.data_len());
    let sec_len = width.data_len() + parity_bits;
    let positions = parity_positions(parity_bits, sec_len);

    let mut codeword = bitvec![u8, Msb0; 0; sec_len];

    // Copy data bits to the non-parity positions
    let mut data_bits = data.iter().map(|bit| *bit);
    for pos in 1..=sec_len {
        if positions.contains(&pos) {
            continue;
        }
        if let Some(bit) = data_bits.next() {
            codeword.set(pos - 1, bit);
        }
    }

    // Each parity bit makes the count of 1s over the positions it covers even
    for &parity_pos in &positions {
        let ones = codeword
            .iter_ones()
            .map(|i| i + 1)
            .filter(|&pos| pos != parity_pos && pos & parity_pos != 0)
            .count();
        let parity = ones % 2 != 0;
        trace!("parity bit {parity_pos} covers {ones} set data bits -> {}", parity as u8);
        codeword.set(parity_pos - 1, parity);
    }

    let overall_parity = codeword.count_ones() % 2 != 0;
    codeword.push(overall_parity);

    debug!(
        "encoded {} data bits into {} bit codeword ({} parity bits)",
        width.data_len(),
        codeword.len(),
        parity_bits
    );
    Ok(codeword)
}

/// Computes the syndrome and overall parity of a received codeword.
///
/// The parity layout is inferred from the codeword length alone: every power of two
/// up to the length of the SEC part (all bits but the last) is a parity position.
pub fn analyze(codeword: &BitSlice<u8, Msb0>) -> SyndromeReport {
    if codeword.is_empty() {
        return SyndromeReport::default();
    }

    let sec = &codeword[..codeword.len() - 1];
    let parity_positions: Vec<usize> = (0..MAX_INFERRED_PARITY_BITS)
        .map(|k| 1usize << k)
        .take_while(|&pos| pos <= sec.len())
        .collect();

    let mut syndrome = 0;
    for &parity_pos in &parity_positions {
        // The check includes the parity bit itself
        let ones = sec
            .iter_ones()
            .map(|i| i + 1)
            .filter(|&pos| pos & parity_pos != 0)
            .count();
        if ones % 2 != 0 {
            trace!("parity check {parity_pos} failed");
            syndrome += parity_pos;
        }
    }

    let overall_parity_odd = codeword.count_ones() % 2 != 0;

    SyndromeReport {
        syndrome,
        overall_parity_odd,
        parity_bits: parity_positions.len(),
        parity_positions,
    }
}

/// Classifies a received codeword and corrects a single-bit error if there is one.
///
/// A single error inside the SEC part is only accepted after the flipped codeword
/// passes [`analyze`] again; otherwise the received codeword is returned unchanged
/// as [`Classification::Uncorrectable`].
pub fn correct(codeword: &BitSlice<u8, Msb0>) -> Correction {
    let len = codeword.len();
    if len == 0 {
        warn!("cannot correct an empty codeword");
        return Correction::unchanged(codeword, Classification::Uncorrectable, -1);
    }

    let report = analyze(codeword);
    let syndrome = report.syndrome;

    let correction = match (syndrome, report.overall_parity_odd) {
        (0, false) => Correction::unchanged(codeword, Classification::NoError, 0),
        (0, true) => {
            // Only the overall parity bit is wrong
            let mut corrected = codeword.to_bitvec();
            let last = !corrected[len - 1];
            corrected.set(len - 1, last);
            Correction {
                codeword: corrected,
                classification: Classification::SingleErrorCorrected,
                position: len as i64,
            }
        }
        (s, true) if s < len => {
            let mut corrected = codeword.to_bitvec();
            let bit = !corrected[s - 1];
            corrected.set(s - 1, bit);

            if analyze(&corrected).is_clean() {
                Correction {
                    codeword: corrected,
                    classification: Classification::SingleErrorCorrected,
                    position: s as i64,
                }
            } else {
                warn!("flipping bit {s} did not clear the checks, treating as uncorrectable");
                Correction::unchanged(codeword, Classification::Uncorrectable, s as i64)
            }
        }
        (s, true) => {
            warn!("syndrome {s} points past the {len} bit codeword");
            Correction::unchanged(codeword, Classification::Uncorrectable, s as i64)
        }
        (s, false) => {
            warn!("double bit error detected (syndrome {s}, overall parity even)");
            Correction::unchanged(codeword, Classification::DoubleErrorDetected, -1)
        }
    };

    debug!(
        "checked {len} bit codeword: {} at {}",
        correction.classification, correction.position
    );
    correction
}

/// Recovers the data bits from a SEC-DED codeword, dropping every parity bit.
///
/// Returns `None` unless the length matches an 8, 16 or 32-bit data word. No checking
/// is done; run [`correct`] first.
pub fn extract_data(codeword: &BitSlice<u8, Msb0>) -> Option<Codeword> {
    let width = DataWidth::from_codeword_len(codeword.len())?;
    let mut data = Codeword::with_capacity(width.data_len());
    for (i, bit) in codeword[..width.sec_len()].iter().enumerate() {
        if !is_parity_position(i + 1) {
            data.push(*bit);
        }
    }
    Some(data)
}

/// Flips the bit at a 1-indexed position.
pub fn flip_bit(codeword: &mut BitSlice<u8, Msb0>, position: usize) -> Result<()> {
    let len = codeword.len();
    if position == 0 || position > len {
        return Err(Error::InvalidPosition { position, len });
    }
    let bit = !codeword[position - 1];
    codeword.set(position - 1, bit);
    Ok(())
}

/// Flips `count` distinct randomly chosen bits and returns their 1-indexed positions, sorted.
pub fn inject_random_errors<R: Rng + ?Sized>(
    codeword: &mut BitSlice<u8, Msb0>,
    count: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    let len = codeword.len();
    if count > len {
        return Err(Error::InvalidPosition {
            position: count,
            len,
        });
    }

    let mut positions: Vec<usize> = rand::seq::index::sample(rng, len, count)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    positions.sort_unstable();

    for &pos in &positions {
        flip_bit(codeword, pos)?;
    }
    debug!("injected errors at {positions:?}");
    Ok(positions)
}
