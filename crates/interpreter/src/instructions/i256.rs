use core::cmp::Ordering;
use primitives::U256;

/// The sign of a 256-bit signed integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    // The ordering is important: Minus < Zero < Plus.
    Minus,
    Zero,
    Plus,
}

/// The most negative two's complement value, `-2^255`.
pub const MIN_NEGATIVE_VALUE: U256 = U256::from_limbs([0, 0, 0, 0x8000_0000_0000_0000]);

const FLIPH_BITMASK_U64: u64 = 0x7FFF_FFFF_FFFF_FFFF;

#[inline]
pub fn i256_sign(val: &U256) -> Sign {
    if val.bit(U256::BITS - 1) {
        Sign::Minus
    } else if val.is_zero() {
        Sign::Zero
    } else {
        Sign::Plus
    }
}

/// Returns the sign of the value and converts it to its absolute value.
#[inline]
pub fn i256_sign_compl(val: &mut U256) -> Sign {
    let sign = i256_sign(val);
    if sign == Sign::Minus {
        two_compl_mut(val);
    }
    sign
}

#[inline]
fn u256_remove_sign(val: &mut U256) {
    // SAFETY: The limb is masked, not resized.
    unsafe {
        val.as_limbs_mut()[3] &= FLIPH_BITMASK_U64;
    }
}

#[inline]
pub fn two_compl_mut(op: &mut U256) {
    *op = two_compl(*op);
}

#[inline]
pub fn two_compl(op: U256) -> U256 {
    op.wrapping_neg()
}

/// Compares two 256-bit words as signed integers.
#[inline]
pub fn i256_cmp(first: &U256, second: &U256) -> Ordering {
    let first_sign = i256_sign(first);
    let second_sign = i256_sign(second);
    match first_sign.cmp(&second_sign) {
        Ordering::Equal => first.cmp(second),
        o => o,
    }
}

/// Signed division of two 256-bit words.
#[inline]
pub fn i256_div(mut first: U256, mut second: U256) -> U256 {
    let second_sign = i256_sign_compl(&mut second);
    if second_sign == Sign::Zero {
        return U256::ZERO;
    }

    let first_sign = i256_sign_compl(&mut first);
    if first_sign == Sign::Minus && first == MIN_NEGATIVE_VALUE && second == U256::from(1) {
        return two_compl(MIN_NEGATIVE_VALUE);
    }

    let mut d = first / second;

    // Set the sign bit to zero.
    u256_remove_sign(&mut d);

    if d.is_zero() {
        return U256::ZERO;
    }

    match (first_sign, second_sign) {
        (Sign::Zero, Sign::Plus)
        | (Sign::Plus, Sign::Zero)
        | (Sign::Zero, Sign::Zero)
        | (Sign::Plus, Sign::Plus)
        | (Sign::Minus, Sign::Minus) => d,
        (Sign::Zero, Sign::Minus)
        | (Sign::Plus, Sign::Minus)
        | (Sign::Minus, Sign::Zero)
        | (Sign::Minus, Sign::Plus) => two_compl(d),
    }
}

/// Signed remainder of two 256-bit words; the result takes the sign of the
/// dividend.
#[inline]
pub fn i256_mod(mut first: U256, mut second: U256) -> U256 {
    let first_sign = i256_sign_compl(&mut first);
    if first_sign == Sign::Zero {
        return U256::ZERO;
    }

    let second_sign = i256_sign_compl(&mut second);
    if second_sign == Sign::Zero {
        return U256::ZERO;
    }

    let mut r = first % second;

    // Set the sign bit to zero.
    u256_remove_sign(&mut r);

    if r.is_zero() {
        return U256::ZERO;
    }

    if first_sign == Sign::Minus {
        two_compl(r)
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neg(v: u64) -> U256 {
        two_compl(U256::from(v))
    }

    #[test]
    fn signed_division() {
        assert_eq!(i256_div(U256::from(100), U256::from(9)), U256::from(11));
        assert_eq!(i256_div(neg(100), U256::from(9)), neg(11));
        assert_eq!(i256_div(U256::from(100), neg(9)), neg(11));
        assert_eq!(i256_div(neg(100), neg(9)), U256::from(11));
        assert_eq!(i256_div(U256::from(100), U256::ZERO), U256::ZERO);
        // -2^255 / -1 overflows to itself.
        assert_eq!(i256_div(MIN_NEGATIVE_VALUE, neg(1)), MIN_NEGATIVE_VALUE);
    }

    #[test]
    fn signed_remainder() {
        assert_eq!(i256_mod(U256::from(100), U256::from(9)), U256::from(1));
        assert_eq!(i256_mod(neg(100), U256::from(9)), neg(1));
        assert_eq!(i256_mod(U256::from(100), neg(9)), U256::from(1));
        assert_eq!(i256_mod(neg(100), neg(9)), neg(1));
        assert_eq!(i256_mod(U256::from(100), U256::ZERO), U256::ZERO);
    }

    #[test]
    fn signed_compare() {
        assert_eq!(i256_cmp(&neg(1), &U256::from(1)), Ordering::Less);
        assert_eq!(i256_cmp(&U256::from(1), &neg(1)), Ordering::Greater);
        assert_eq!(i256_cmp(&neg(2), &neg(1)), Ordering::Less);
        assert_eq!(i256_cmp(&U256::ZERO, &U256::ZERO), Ordering::Equal);
    }
}
