//! Bounded byte FIFO backing each transfer direction.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::error::HifError;

/// Fixed-capacity circular byte buffer.
///
/// `push` and `pop` never block and never overflow: they move as many
/// bytes as fit or as are available and report the count.
pub struct ByteFifo {
    storage: Box<[u8]>,
    read: usize,
    write: usize,
    count: usize,
}

impl ByteFifo {
    /// Allocate a FIFO holding up to `capacity` bytes.
    pub fn new(capacity: usize) -> Result<Self, HifError> {
        if capacity == 0 {
            return Err(HifError::InvalidParameter);
        }

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| HifError::ResourceExhausted)?;
        storage.resize(capacity, 0);

        Ok(Self {
            storage: storage.into_boxed_slice(),
            read: 0,
            write: 0,
            count: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    pub fn free_space(&self) -> usize {
        self.capacity() - self.count
    }

    /// Append one byte; `false` if the FIFO is full.
    pub fn push_byte(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.storage[self.write] = byte;
        self.write = self.advance(self.write, 1);
        self.count += 1;
        true
    }

    /// Remove the oldest byte.
    pub fn pop_byte(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.storage[self.read];
        self.read = self.advance(self.read, 1);
        self.count -= 1;
        Some(byte)
    }

    /// Append as many bytes of `data` as fit. Returns the number accepted.
    pub fn push(&mut self, data: &[u8]) -> usize {
        let accepted = data.len().min(self.free_space());
        let first = accepted.min(self.capacity() - self.write);

        self.storage[self.write..self.write + first].copy_from_slice(&data[..first]);
        self.storage[..accepted - first].copy_from_slice(&data[first..accepted]);

        self.write = self.advance(self.write, accepted);
        self.count += accepted;
        accepted
    }

    /// Move up to `buf.len()` of the oldest bytes into `buf`. Returns the
    /// number removed.
    pub fn pop(&mut self, buf: &mut [u8]) -> usize {
        let removed = buf.len().min(self.count);
        let first = removed.min(self.capacity() - self.read);

        buf[..first].copy_from_slice(&self.storage[self.read..self.read + first]);
        buf[first..removed].copy_from_slice(&self.storage[..removed - first]);

        self.read = self.advance(self.read, removed);
        self.count -= removed;
        removed
    }

    fn advance(&self, cursor: usize, by: usize) -> usize {
        (cursor + by) % self.capacity()
    }
}

impl core::fmt::Debug for ByteFifo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteFifo")
            .field("capacity", &self.capacity())
            .field("count", &self.count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(ByteFifo::new(0).unwrap_err(), HifError::InvalidParameter);
    }

    #[test]
    fn impossible_allocation_is_resource_exhausted() {
        assert_eq!(
            ByteFifo::new(usize::MAX).unwrap_err(),
            HifError::ResourceExhausted
        );
    }

    #[test]
    fn pushes_saturate_at_capacity() {
        let mut fifo = ByteFifo::new(10).unwrap();
        let mut total = 0;
        for chunk in [&[1u8; 4][..], &[2; 4], &[3; 4], &[4; 4]] {
            let free = fifo.free_space();
            let accepted = fifo.push(chunk);
            assert!(accepted <= free);
            total += accepted;
        }
        assert_eq!(total, 10);
        assert_eq!(fifo.len(), 10);
        assert!(fifo.is_full());
        assert!(!fifo.push_byte(9));
        assert_eq!(fifo.push(&[9; 3]), 0);
        assert_eq!(fifo.len(), 10);
    }

    #[test]
    fn pop_returns_what_is_available() {
        let mut fifo = ByteFifo::new(8).unwrap();
        assert_eq!(fifo.pop(&mut [0; 4]), 0);
        assert_eq!(fifo.pop_byte(), None);

        fifo.push(b"abc");
        let mut buf = [0u8; 8];
        assert_eq!(fifo.pop(&mut buf), 3);
        assert_eq!(&buf[..3], b"abc");
        assert!(fifo.is_empty());
    }

    #[test]
    fn order_survives_wrap_around() {
        let mut fifo = ByteFifo::new(5).unwrap();
        let mut out = Vec::new();
        let mut next = 0u8;

        for _ in 0..20 {
            let chunk: Vec<u8> = (0..3).map(|i| next.wrapping_add(i)).collect();
            let accepted = fifo.push(&chunk);
            next = next.wrapping_add(accepted as u8);

            let mut buf = [0u8; 2];
            let removed = fifo.pop(&mut buf);
            out.extend_from_slice(&buf[..removed]);
        }
        while let Some(byte) = fifo.pop_byte() {
            out.push(byte);
        }

        let expected: Vec<u8> = (0..next).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn single_byte_ops_interleave_with_bulk() {
        let mut fifo = ByteFifo::new(4).unwrap();
        assert!(fifo.push_byte(1));
        assert_eq!(fifo.push(&[2, 3, 4, 5]), 3);
        assert_eq!(fifo.pop_byte(), Some(1));
        assert!(fifo.push_byte(6));
        let mut buf = [0u8; 4];
        assert_eq!(fifo.pop(&mut buf), 4);
        assert_eq!(buf, [2, 3, 4, 6]);
        assert!(fifo.is_empty());
        assert_eq!(fifo.free_space(), 4);
    }
}
