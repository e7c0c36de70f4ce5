use alloy_primitives::hex;
use bitvec::vec::BitVec;
use core::fmt;

/// A table of valid `jump` destinations.
///
/// It is immutable and memory efficient, with one bit per byte of the padded
/// bytecode. A set bit means that the offset is a `JUMPDEST` opcode and not
/// data of a preceding PUSH.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JumpTable(BitVec<u8>);

impl fmt::Debug for JumpTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JumpTable")
            .field("map", &hex::encode(self.0.as_raw_slice()))
            .finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for JumpTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for JumpTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        BitVec::deserialize(deserializer).map(Self::new)
    }
}

impl JumpTable {
    /// Creates a new jump table from a bit vector.
    #[inline]
    pub fn new(jumps: BitVec<u8>) -> Self {
        Self(jumps)
    }

    /// Gets the raw bytes of the jump map.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_raw_slice()
    }

    /// Gets the bit length of the jump map.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the jump map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks if `pc` is a valid jump destination.
    #[inline]
    pub fn is_valid(&self, pc: usize) -> bool {
        self.0.get(pc).as_deref().copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::{bitvec, order::Lsb0};

    #[test]
    fn is_valid_checks_bounds() {
        let mut bits = bitvec![u8, Lsb0; 0; 8];
        bits.set(2, true);
        let table = JumpTable::new(bits);
        assert!(!table.is_valid(0));
        assert!(table.is_valid(2));
        assert!(!table.is_valid(7));
        assert!(!table.is_valid(8));
        assert!(!table.is_valid(usize::MAX));
    }
}
