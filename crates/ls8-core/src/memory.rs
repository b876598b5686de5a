//! Flat byte-addressable memory.

use crate::Fault;

/// Size in bytes of the flat address space.
pub const MEMORY_BYTES: usize = 256;

/// Bounds-checked 256-byte memory backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            cells: vec![0; MEMORY_BYTES].into_boxed_slice(),
        }
    }
}

impl Memory {
    /// Reads the byte stored at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when `address` is past the end of
    /// memory.
    pub fn read(&self, address: u16) -> Result<u8, Fault> {
        self.cells
            .get(usize::from(address))
            .copied()
            .ok_or(Fault::AddressOutOfRange { address })
    }

    /// Writes `value` at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when `address` is past the end of
    /// memory.
    pub fn write(&mut self, address: u16, value: u8) -> Result<(), Fault> {
        let cell = self
            .cells
            .get_mut(usize::from(address))
            .ok_or(Fault::AddressOutOfRange { address })?;
        *cell = value;
        Ok(())
    }

    /// Reads `address` without faulting, for diagnostics only.
    #[must_use]
    pub fn peek(&self, address: u16) -> Option<u8> {
        self.cells.get(usize::from(address)).copied()
    }

    /// Full memory contents in address order.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, MEMORY_BYTES};
    use crate::Fault;

    #[test]
    fn backing_store_is_256_zeroed_bytes() {
        let memory = Memory::default();
        assert_eq!(memory.as_slice().len(), MEMORY_BYTES);
        assert!(memory.as_slice().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn write_then_read_hits_the_same_cell() {
        let mut memory = Memory::default();
        memory.write(0x00, 0x82).unwrap();
        memory.write(0xFF, 0x01).unwrap();

        assert_eq!(memory.read(0x00), Ok(0x82));
        assert_eq!(memory.read(0xFF), Ok(0x01));
        assert_eq!(memory.read(0x80), Ok(0x00));
    }

    #[test]
    fn out_of_range_access_faults() {
        let mut memory = Memory::default();

        assert_eq!(
            memory.read(0x100),
            Err(Fault::AddressOutOfRange { address: 0x100 })
        );
        assert_eq!(
            memory.write(0x1234, 7),
            Err(Fault::AddressOutOfRange { address: 0x1234 })
        );
        assert_eq!(memory.peek(0x100), None);
        assert!(memory.as_slice().iter().all(|byte| *byte == 0));
    }
}
