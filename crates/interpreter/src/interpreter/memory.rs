use alloc::vec::Vec;
use core::{cmp::min, fmt};
use primitives::{hex, U256};

/// A word-addressable memory of a frame, with explicit context checkpoints.
///
/// Instructions address the region from the last checkpoint; `new_context` /
/// `free_context` bracket the lifetime of a nested region so that scratch
/// space used around a sub-call is released when the sub-call returns.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Memory {
    /// The underlying buffer.
    data: Vec<u8>,
    /// Checkpoints of entered contexts.
    checkpoints: Vec<usize>,
    /// Start of the current context, cached from `checkpoints`.
    last_checkpoint: usize,
    /// Memory limit in bytes. See [`primitives::CfgEnv::memory_limit`].
    memory_limit: u64,
}

impl Default for Memory {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("current_len", &self.len())
            .field("context_memory", &hex::encode(self.context_memory()))
            .finish_non_exhaustive()
    }
}

impl Memory {
    /// Allocates a new memory without a limit.
    ///
    /// Initial capacity is 4KiB, expanded when needed.
    pub fn new() -> Self {
        Self::new_with_memory_limit(u64::MAX)
    }

    /// Allocates a new memory with `memory_limit` as the upper bound of the
    /// total allocation.
    pub fn new_with_memory_limit(memory_limit: u64) -> Self {
        Self {
            data: Vec::with_capacity(4 * 1024),
            checkpoints: Vec::with_capacity(32),
            last_checkpoint: 0,
            memory_limit,
        }
    }

    /// Returns true if resizing the current context to `new_size` would make
    /// the buffer exceed the memory limit.
    #[inline]
    pub fn limit_reached(&self, new_size: usize) -> bool {
        self.last_checkpoint.saturating_add(new_size) as u64 > self.memory_limit
    }

    /// Prepares the memory for a new context.
    #[inline]
    pub fn new_context(&mut self) {
        self.checkpoints.push(self.data.len());
        self.last_checkpoint = self.data.len();
    }

    /// Returns to the previous context, truncating everything the freed
    /// context allocated.
    #[inline]
    pub fn free_context(&mut self) {
        if let Some(checkpoint) = self.checkpoints.pop() {
            self.data.truncate(checkpoint);
            self.last_checkpoint = self.checkpoints.last().copied().unwrap_or_default();
        }
    }

    /// Length of the current context.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() - self.last_checkpoint
    }

    /// Returns true if the current context is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resizes the current context to `new_size`, zeroing the new area.
    ///
    /// Assumes the gas for the expansion has already been recorded and that
    /// `new_size` is a multiple of 32 greater than the current length.
    #[inline]
    pub fn resize(&mut self, new_size: usize) {
        self.data.resize(self.last_checkpoint + new_size, 0);
    }

    /// Returns a byte slice of the current context at the given offset.
    ///
    /// # Panics
    ///
    /// Panics on out of bounds.
    #[inline]
    pub fn slice(&self, offset: usize, size: usize) -> &[u8] {
        &self.context_memory()[offset..offset + size]
    }

    /// Returns a mutable byte slice of the current context at the given
    /// offset.
    ///
    /// # Panics
    ///
    /// Panics on out of bounds.
    #[inline]
    pub fn slice_mut(&mut self, offset: usize, size: usize) -> &mut [u8] {
        let start = self.last_checkpoint + offset;
        &mut self.data[start..start + size]
    }

    /// Sets the byte at the given offset.
    ///
    /// # Panics
    ///
    /// Panics on out of bounds.
    #[inline]
    pub fn set_byte(&mut self, offset: usize, byte: u8) {
        self.data[self.last_checkpoint + offset] = byte;
    }

    /// Reads a 32-byte big-endian word at the given offset.
    ///
    /// # Panics
    ///
    /// Panics on out of bounds.
    #[inline]
    pub fn get_u256(&self, offset: usize) -> U256 {
        U256::from_be_slice(self.slice(offset, 32))
    }

    /// Writes a 32-byte big-endian word at the given offset.
    ///
    /// # Panics
    ///
    /// Panics on out of bounds.
    #[inline]
    pub fn set_u256(&mut self, offset: usize, value: U256) {
        self.set(offset, &value.to_be_bytes::<32>());
    }

    /// Writes `value` into the current context at the given offset.
    ///
    /// # Panics
    ///
    /// Panics on out of bounds.
    #[inline]
    pub fn set(&mut self, offset: usize, value: &[u8]) {
        if !value.is_empty() {
            self.slice_mut(offset, value.len()).copy_from_slice(value);
        }
    }

    /// Writes `len` bytes from `data[data_offset..]` to memory at
    /// `memory_offset`, zero-filling the part that `data` does not cover.
    ///
    /// The memory window `memory_offset..memory_offset + len` must already be
    /// resized; `data_offset` and `len` are bounds-checked against `data`.
    ///
    /// # Panics
    ///
    /// Panics on out of bounds of the memory window.
    #[inline]
    pub fn set_data(&mut self, memory_offset: usize, data_offset: usize, len: usize, data: &[u8]) {
        if data_offset >= data.len() {
            // Nullify the whole memory window.
            self.slice_mut(memory_offset, len).fill(0);
            return;
        }
        let data_end = min(data_offset + len, data.len());
        let copied = data_end - data_offset;
        self.slice_mut(memory_offset, copied)
            .copy_from_slice(&data[data_offset..data_end]);

        // Nullify the rest of the memory window.
        self.slice_mut(memory_offset + copied, len - copied).fill(0);
    }

    /// Copies elements from one part of the current context to another part
    /// of itself.
    ///
    /// # Panics
    ///
    /// Panics on out of bounds.
    #[inline]
    pub fn copy(&mut self, dst: usize, src: usize, len: usize) {
        self.context_memory_mut().copy_within(src..src + len, dst);
    }

    /// The memory of the current context.
    #[inline]
    pub fn context_memory(&self) -> &[u8] {
        &self.data[self.last_checkpoint..]
    }

    /// The mutable memory of the current context.
    #[inline]
    fn context_memory_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.last_checkpoint..]
    }
}
