//! # Codeword Memory
//!
//! A fixed-size array of codeword slots addressed by index, used to exercise the codec:
//! words are encoded and written to an address, bits of the stored codeword are flipped
//! to simulate corruption, and the stored codeword is analyzed or restored.
//!
//! Each slot keeps the original codeword next to the current one, so injected errors can
//! always be undone. Analysis never writes a correction back.
//!
//! Two containers are provided:
//! - [`CellStore`]: plain single-owner store, mutated through `&mut self`.
//! - [`SharedCellStore`]: one `Mutex` per slot, shareable across threads. Operations on
//!   different addresses never contend.
//!
//! ## Example
//! ```rust
//! use secded::ecc::{bits, Classification};
//! use secded::memory::CellStore;
//!
//! let mut store = CellStore::with_capacity(16);
//! let data = bits::parse_bits("10101100").unwrap();
//! store.encode_and_write(0, &data).unwrap();
//!
//! store.flip_bit(0, 5).unwrap();
//! let correction = store.analyze(0).unwrap();
//! assert_eq!(correction.classification, Classification::SingleErrorCorrected);
//!
//! store.restore(0).unwrap();
//! assert!(!store.read(0).unwrap().has_error());
//! ```

use crate::ecc::{hamming, Codeword, Correction};
use crate::error::{Error, Result};
use bitvec::prelude::*;
use log::{debug, warn};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Number of slots in a store built with [`CellStore::new`].
pub const DEFAULT_CAPACITY: usize = 64;

/// Bit positions flipped in a stored codeword since it was written or restored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorAnnotation {
    positions: Vec<usize>,
}

impl ErrorAnnotation {
    /// 1-indexed positions in the order they were flipped.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

impl fmt::Display for ErrorAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let positions: Vec<String> = self.positions.iter().map(|p| p.to_string()).collect();
        write!(f, "error introduced at bit {}", positions.join(", "))
    }
}

/// A stored word: the data, the codeword as written, and the codeword as it is now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodewordCell {
    data: Codeword,
    original: Codeword,
    current: Codeword,
    annotation: Option<ErrorAnnotation>,
}

impl CodewordCell {
    fn new(data: &BitSlice<u8, Msb0>, codeword: &BitSlice<u8, Msb0>) -> Self {
        CodewordCell {
            data: data.to_bitvec(),
            original: codeword.to_bitvec(),
            current: codeword.to_bitvec(),
            annotation: None,
        }
    }

    /// The data vector that was written.
    pub fn data(&self) -> &BitSlice<u8, Msb0> {
        &self.data
    }

    /// The codeword as written.
    pub fn original(&self) -> &BitSlice<u8, Msb0> {
        &self.original
    }

    /// The codeword including any injected errors.
    pub fn current(&self) -> &BitSlice<u8, Msb0> {
        &self.current
    }

    pub fn annotation(&self) -> Option<&ErrorAnnotation> {
        self.annotation.as_ref()
    }

    /// True once a bit has been flipped and not yet restored.
    pub fn has_error(&self) -> bool {
        self.annotation.is_some()
    }

    fn flip_bit(&mut self, position: usize) -> Result<()> {
        hamming::flip_bit(&mut self.current, position)?;
        self.annotation
            .get_or_insert_with(ErrorAnnotation::default)
            .positions
            .push(position);
        Ok(())
    }

    fn restore(&mut self) {
        self.current = self.original.clone();
        self.annotation = None;
    }
}

/// One addressable slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(CodewordCell),
}

impl Slot {
    pub fn cell(&self) -> Option<&CodewordCell> {
        match self {
            Slot::Empty => None,
            Slot::Occupied(cell) => Some(cell),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    fn occupied_mut(&mut self, address: usize) -> Result<&mut CodewordCell> {
        match self {
            Slot::Empty => Err(Error::NoOriginal(address)),
            Slot::Occupied(cell) => Ok(cell),
        }
    }

    fn write(
        &mut self,
        address: usize,
        data: &BitSlice<u8, Msb0>,
        codeword: &BitSlice<u8, Msb0>,
    ) {
        *self = Slot::Occupied(CodewordCell::new(data, codeword));
        debug!("wrote {} bit codeword to address {address}", codeword.len());
    }

    fn flip_bit(&mut self, address: usize, position: usize) -> Result<()> {
        self.occupied_mut(address)?.flip_bit(position)?;
        debug!("flipped bit {position} at address {address}");
        Ok(())
    }

    fn restore(&mut self, address: usize) -> Result<()> {
        self.occupied_mut(address)?.restore();
        debug!("restored codeword at address {address}");
        Ok(())
    }

    fn analyze(&self, address: usize) -> Result<Correction> {
        let cell = self.cell().ok_or(Error::NoOriginal(address))?;
        Ok(hamming::correct(cell.current()))
    }
}

fn check_address(address: usize, size: usize) -> Result<()> {
    if address >= size {
        warn!("rejected access to address {address} (size {size})");
        return Err(Error::InvalidAddress { address, size });
    }
    Ok(())
}

/// Fixed-size array of codeword slots.
#[derive(Debug, Clone)]
pub struct CellStore {
    slots: Vec<Slot>,
}

impl Default for CellStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CellStore {
    /// Creates a store with [`DEFAULT_CAPACITY`] empty slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a store with `size` empty slots.
    pub fn with_capacity(size: usize) -> Self {
        CellStore {
            slots: vec![Slot::Empty; size],
        }
    }

    /// Number of addressable slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    fn slot_mut(&mut self, address: usize) -> Result<&mut Slot> {
        check_address(address, self.slots.len())?;
        Ok(&mut self.slots[address])
    }

    /// Stores a data vector and its codeword, replacing whatever the slot held.
    ///
    /// Fails with [`Error::InvalidAddress`] when `address` is outside `[0, size)`.
    pub fn write(
        &mut self,
        address: usize,
        data: &BitSlice<u8, Msb0>,
        codeword: &BitSlice<u8, Msb0>,
    ) -> Result<()> {
        self.slot_mut(address)?.write(address, data, codeword);
        Ok(())
    }

    /// Encodes `data` and stores it, returning the codeword.
    pub fn encode_and_write(
        &mut self,
        address: usize,
        data: &BitSlice<u8, Msb0>,
    ) -> Result<Codeword> {
        check_address(address, self.slots.len())?;
        let codeword = hamming::encode(data)?;
        self.write(address, data, &codeword)?;
        Ok(codeword)
    }

    /// The cell at `address`, or `None` when the slot is empty or out of range.
    pub fn read(&self, address: usize) -> Option<&CodewordCell> {
        self.slots.get(address).and_then(Slot::cell)
    }

    /// Flips one bit (1-indexed) of the current codeword at `address`.
    ///
    /// The original codeword is kept for [`CellStore::restore`].
    pub fn flip_bit(&mut self, address: usize, position: usize) -> Result<()> {
        self.slot_mut(address)?.flip_bit(address, position)
    }

    /// Resets the current codeword at `address` to the original and clears the annotation.
    pub fn restore(&mut self, address: usize) -> Result<()> {
        self.slot_mut(address)?.restore(address)
    }

    /// Checks the current codeword at `address`. The stored codeword is left as is.
    pub fn analyze(&self, address: usize) -> Result<Correction> {
        check_address(address, self.slots.len())?;
        self.slots[address].analyze(address)
    }

    /// Empties the slot at `address`.
    pub fn clear(&mut self, address: usize) -> Result<()> {
        *self.slot_mut(address)? = Slot::Empty;
        debug!("cleared address {address}");
        Ok(())
    }

    /// Empties every slot.
    pub fn reset(&mut self) {
        self.slots.fill(Slot::Empty);
    }

    /// Lowest empty address, if any.
    pub fn next_free_address(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_empty)
    }

    /// Occupied cells with their addresses, in address order.
    pub fn snapshot(&self) -> impl Iterator<Item = (usize, &CodewordCell)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(address, slot)| slot.cell().map(|cell| (address, cell)))
    }
}

/// Codeword store that can be shared between threads.
///
/// Every slot has its own lock.
#[derive(Debug)]
pub struct SharedCellStore {
    slots: Vec<Mutex<Slot>>,
}

impl Default for SharedCellStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedCellStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(size: usize) -> Self {
        SharedCellStore {
            slots: (0..size).map(|_| Mutex::new(Slot::Empty)).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    fn lock(&self, address: usize) -> Result<MutexGuard<'_, Slot>> {
        check_address(address, self.slots.len())?;
        // A panic elsewhere cannot leave a slot half-written, so poisoned locks are reused
        Ok(self.slots[address]
            .lock()
            .unwrap_or_else(PoisonError::into_inner))
    }

    pub fn write(
        &self,
        address: usize,
        data: &BitSlice<u8, Msb0>,
        codeword: &BitSlice<u8, Msb0>,
    ) -> Result<()> {
        self.lock(address)?.write(address, data, codeword);
        Ok(())
    }

    pub fn encode_and_write(
        &self,
        address: usize,
        data: &BitSlice<u8, Msb0>,
    ) -> Result<Codeword> {
        check_address(address, self.slots.len())?;
        let codeword = hamming::encode(data)?;
        self.write(address, data, &codeword)?;
        Ok(codeword)
    }

    /// A copy of the cell at `address`.
    pub fn read(&self, address: usize) -> Option<CodewordCell> {
        self.lock(address).ok()?.cell().cloned()
    }

    pub fn flip_bit(&self, address: usize, position: usize) -> Result<()> {
        self.lock(address)?.flip_bit(address, position)
    }

    pub fn restore(&self, address: usize) -> Result<()> {
        self.lock(address)?.restore(address)
    }

    pub fn analyze(&self, address: usize) -> Result<Correction> {
        self.lock(address)?.analyze(address)
    }

    pub fn clear(&self, address: usize) -> Result<()> {
        *self.lock(address)? = Slot::Empty;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::bits::{parse_bits, to_bit_string};
    use crate::ecc::Classification;
    use std::thread;

    fn sample_data() -> Codeword {
        parse_bits("10101100").unwrap()
    }

    #[test]
    fn test_write_and_read() {
        let mut store = CellStore::with_capacity(4);
        let data = sample_data();
        let codeword = hamming::encode(&data).unwrap();

        store.write(2, &data, &codeword).unwrap();
        let cell = store.read(2).unwrap();
        assert_eq!(cell.data(), data.as_bitslice());
        assert_eq!(cell.original(), codeword.as_bitslice());
        assert_eq!(cell.current(), codeword.as_bitslice());
        assert!(!cell.has_error());

        assert!(store.read(0).is_none());
        assert!(store.read(4).is_none());
    }

    #[test]
    fn test_write_out_of_range() {
        let mut store = CellStore::with_capacity(4);
        let data = sample_data();
        assert_eq!(
            store.write(4, &data, &data),
            Err(Error::InvalidAddress { address: 4, size: 4 })
        );
        assert_eq!(
            store.encode_and_write(9, &data),
            Err(Error::InvalidAddress { address: 9, size: 4 })
        );
    }

    #[test]
    fn test_encode_and_write_invalid_length() {
        let mut store = CellStore::new();
        let data = parse_bits("101").unwrap();
        assert_eq!(store.encode_and_write(0, &data), Err(Error::InvalidLength(3)));
        assert!(store.read(0).is_none());
    }

    #[test]
    fn test_flip_analyze_restore() {
        let mut store = CellStore::new();
        let codeword = store.encode_and_write(0, &sample_data()).unwrap();

        store.flip_bit(0, 5).unwrap();
        let cell = store.read(0).unwrap();
        assert!(cell.has_error());
        assert_eq!(cell.annotation().unwrap().positions().to_vec(), vec![5]);
        assert_eq!(cell.original(), codeword.as_bitslice());
        assert_ne!(cell.current(), codeword.as_bitslice());

        let correction = store.analyze(0).unwrap();
        assert_eq!(correction.classification, Classification::SingleErrorCorrected);
        assert_eq!(correction.position, 5);
        assert_eq!(correction.codeword, codeword);
        // Analysis does not write back
        assert!(store.read(0).unwrap().has_error());

        store.flip_bit(0, 7).unwrap();
        assert_eq!(
            store.read(0).unwrap().annotation().unwrap().to_string(),
            "error introduced at bit 5, 7"
        );
        assert_eq!(
            store.analyze(0).unwrap().classification,
            Classification::DoubleErrorDetected
        );

        store.restore(0).unwrap();
        let cell = store.read(0).unwrap();
        assert!(!cell.has_error());
        assert_eq!(to_bit_string(cell.current()), "0111010011000");
        assert_eq!(store.analyze(0).unwrap().classification, Classification::NoError);
    }

    #[test]
    fn test_flip_errors() {
        let mut store = CellStore::with_capacity(8);
        store.encode_and_write(1, &sample_data()).unwrap();

        assert_eq!(
            store.flip_bit(8, 1),
            Err(Error::InvalidAddress { address: 8, size: 8 })
        );
        assert_eq!(
            store.flip_bit(1, 0),
            Err(Error::InvalidPosition { position: 0, len: 13 })
        );
        assert_eq!(
            store.flip_bit(1, 14),
            Err(Error::InvalidPosition { position: 14, len: 13 })
        );
        assert_eq!(store.flip_bit(0, 1), Err(Error::NoOriginal(0)));
        assert!(!store.read(1).unwrap().has_error());
    }

    #[test]
    fn test_restore_errors() {
        let mut store = CellStore::with_capacity(2);
        assert_eq!(
            store.restore(2),
            Err(Error::InvalidAddress { address: 2, size: 2 })
        );
        assert_eq!(store.restore(0), Err(Error::NoOriginal(0)));
        assert_eq!(store.analyze(1), Err(Error::NoOriginal(1)));
    }

    #[test]
    fn test_free_addresses_and_snapshot() {
        let mut store = CellStore::with_capacity(3);
        assert_eq!(store.next_free_address(), Some(0));

        store.encode_and_write(0, &sample_data()).unwrap();
        store.encode_and_write(2, &sample_data()).unwrap();
        assert_eq!(store.next_free_address(), Some(1));

        let addresses: Vec<usize> = store.snapshot().map(|(address, _)| address).collect();
        assert_eq!(addresses, vec![0, 2]);

        store.encode_and_write(1, &sample_data()).unwrap();
        assert_eq!(store.next_free_address(), None);

        store.clear(1).unwrap();
        assert!(store.read(1).is_none());
        assert_eq!(store.next_free_address(), Some(1));

        store.reset();
        assert_eq!(store.snapshot().count(), 0);
        assert_eq!(store.size(), 3);
    }

    #[test]
    fn test_shared_store_across_threads() {
        let store = SharedCellStore::with_capacity(8);
        let data = parse_bits("1100101011110000").unwrap();

        thread::scope(|s| {
            for address in 0..8 {
                let store = &store;
                let data = &data;
                s.spawn(move || {
                    store.encode_and_write(address, data).unwrap();
                    store.flip_bit(address, address + 1).unwrap();
                });
            }
        });

        for address in 0..8 {
            let correction = store.analyze(address).unwrap();
            assert_eq!(correction.classification, Classification::SingleErrorCorrected);
            assert_eq!(correction.position, address as i64 + 1);

            store.restore(address).unwrap();
            assert!(!store.read(address).unwrap().has_error());
        }
        assert!(store.read(8).is_none());
        assert_eq!(
            store.flip_bit(8, 1),
            Err(Error::InvalidAddress { address: 8, size: 8 })
        );
    }
}
