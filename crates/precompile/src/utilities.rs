//! Padding helpers shared by the precompile input parsers.

use alloc::vec::Vec;
use core::cmp::min;

/// Gets a fixed-size array from the data, right-padded with zeroes if the
/// data does not cover `offset..offset + LEN`.
#[inline]
pub fn get_right_padded<const LEN: usize>(data: &[u8], offset: usize) -> [u8; LEN] {
    let mut padded = [0; LEN];
    let start = min(offset, data.len());
    let end = min(start.saturating_add(LEN), data.len());
    padded[..end - start].copy_from_slice(&data[start..end]);
    padded
}

/// Gets a vector of the data, right-padded with zeroes if the data does not
/// cover `offset..offset + len`.
#[inline]
pub fn get_right_padded_vec(data: &[u8], offset: usize, len: usize) -> Vec<u8> {
    let mut padded = alloc::vec![0; len];
    let start = min(offset, data.len());
    let end = min(start.saturating_add(len), data.len());
    padded[..end - start].copy_from_slice(&data[start..end]);
    padded
}

/// Left-pads the data to `LEN` bytes. If the data is longer than `LEN`, the
/// rightmost bytes are truncated.
#[inline]
pub fn left_padding<const LEN: usize>(data: &[u8]) -> [u8; LEN] {
    let mut padded = [0; LEN];
    let end = min(LEN, data.len());
    padded[LEN - end..].copy_from_slice(&data[..end]);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_padding() {
        assert_eq!(get_right_padded::<4>(&[1, 2], 0), [1, 2, 0, 0]);
        assert_eq!(get_right_padded::<4>(&[1, 2], 1), [2, 0, 0, 0]);
        assert_eq!(get_right_padded::<2>(&[1, 2, 3], 8), [0, 0]);
        assert_eq!(get_right_padded_vec(&[1, 2, 3], 1, 4), vec![2, 3, 0, 0]);
    }

    #[test]
    fn left_pad() {
        assert_eq!(left_padding::<4>(&[1, 2]), [0, 0, 1, 2]);
        assert_eq!(left_padding::<2>(&[1, 2, 3]), [1, 2]);
    }
}
