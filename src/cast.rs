//! This module connects the native floating point types to the semantics that
//! describe them.

use super::float::{Semantics, FP32, FP64};

/// A native binary floating point type that the conversions work on. All
/// the conversion algorithms work on raw bit patterns, and this trait moves
/// values in and out of that representation.
pub trait BinaryFloat: Copy + PartialEq + core::fmt::Debug {
    /// The format of the type.
    const SEM: Semantics;

    /// The largest n such that 10^n is exact in this type.
    const MAX_EXACT_POW10: u32;

    /// Returns the bit pattern of the value.
    fn to_raw(self) -> u64;

    /// Builds a value from its bit pattern.
    fn from_raw(bits: u64) -> Self;

    /// Converts an integer that is at most 2^P, which is exact.
    fn from_exact_u64(val: u64) -> Self;

    /// Returns 10^n, for n <= MAX_EXACT_POW10.
    fn exact_pow10(n: u32) -> Self;

    /// Returns the correctly rounded product.
    fn mul_rounded(self, rhs: Self) -> Self;

    /// Returns the correctly rounded quotient.
    fn div_rounded(self, rhs: Self) -> Self;
}

/// Powers of ten that are exact in binary64.
const F64_POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13,
    1e14, 1e15, 1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Powers of ten that are exact in binary32.
const F32_POW10: [f32; 11] =
    [1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10];

impl BinaryFloat for f64 {
    const SEM: Semantics = FP64;
    const MAX_EXACT_POW10: u32 = 22;

    fn to_raw(self) -> u64 {
        self.to_bits()
    }
    fn from_raw(bits: u64) -> Self {
        f64::from_bits(bits)
    }
    fn from_exact_u64(val: u64) -> Self {
        debug_assert!(val <= 1 << 53);
        val as f64
    }
    fn exact_pow10(n: u32) -> Self {
        F64_POW10[n as usize]
    }
    fn mul_rounded(self, rhs: Self) -> Self {
        self * rhs
    }
    fn div_rounded(self, rhs: Self) -> Self {
        self / rhs
    }
}

impl BinaryFloat for f32 {
    const SEM: Semantics = FP32;
    const MAX_EXACT_POW10: u32 = 10;

    fn to_raw(self) -> u64 {
        self.to_bits() as u64
    }
    fn from_raw(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }
    fn from_exact_u64(val: u64) -> Self {
        debug_assert!(val <= 1 << 24);
        val as f32
    }
    fn exact_pow10(n: u32) -> Self {
        F32_POW10[n as usize]
    }
    fn mul_rounded(self, rhs: Self) -> Self {
        self * rhs
    }
    fn div_rounded(self, rhs: Self) -> Self {
        self / rhs
    }
}

#[test]
fn test_exact_powers() {
    use crate::table::POW10;
    use crate::utils::bit_len;

    // 10^n = 5^n * 2^n is exact when 5^n fits in the significand.
    for n in 0..=f64::MAX_EXACT_POW10 {
        assert!(bit_len(5u128.pow(n)) <= 53);
        assert_eq!(f64::exact_pow10(n) as u128, 10u128.pow(n));
    }
    assert!(bit_len(5u128.pow(f64::MAX_EXACT_POW10 + 1)) > 53);

    for n in 0..=f32::MAX_EXACT_POW10 {
        assert!(bit_len(5u128.pow(n)) <= 24);
        assert_eq!(f32::exact_pow10(n) as u64, POW10[n as usize]);
    }
    assert!(bit_len(5u128.pow(f32::MAX_EXACT_POW10 + 1)) > 24);
}

#[test]
fn test_raw_round_trip() {
    for v in [0.0, -0.0, 1.5, f64::MAX, f64::MIN_POSITIVE, -5e-324] {
        assert_eq!(f64::from_raw(v.to_raw()).to_bits(), v.to_bits());
    }
    for v in [0.0f32, -0.0, 1.5, f32::MAX, f32::MIN_POSITIVE, -1e-45] {
        assert_eq!(f32::from_raw(v.to_raw()).to_bits(), v.to_bits());
    }
    assert_eq!((-1.0f32).to_raw(), 0xbf80_0000);
}
