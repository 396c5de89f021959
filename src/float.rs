//! This module contains the description of the binary interchange formats and
//! the code that splits raw bit patterns into their parts.

use super::table::flog10pow2;
use super::utils::mask;
use core::fmt::Display;

/// Describes an IEEE-754 binary interchange format. All the constants that
/// the conversion algorithms need are derived from the two widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantics {
    /// The number of bits that define the range of the exponent (W).
    pub exponent: u32,
    /// The number of bits in the significand, including the hidden bit (P).
    pub precision: u32,
    /// Subnormal significands below this value are scaled by ten before
    /// they are encoded.
    pub c_tiny: u64,
}

impl Semantics {
    pub const fn new(exponent: u32, precision: u32, c_tiny: u64) -> Self {
        Semantics {
            exponent,
            precision,
            c_tiny,
        }
    }
    /// Returns the precision in bits (P).
    pub const fn get_precision(&self) -> u32 {
        self.precision
    }
    /// Returns the length of the mantissa in bits (precision - 1).
    pub const fn get_mantissa_len(&self) -> u32 {
        self.precision - 1
    }
    /// Returns the length of the exponent in bits (W).
    pub const fn get_exponent_len(&self) -> u32 {
        self.exponent
    }
    /// Returns the total number of bits in the encoding.
    pub const fn get_width(&self) -> u32 {
        self.exponent + self.precision
    }
    /// The binary exponent of the smallest subnormal value.
    pub const fn q_min(&self) -> i32 {
        -(1 << (self.exponent - 1)) - self.precision as i32 + 3
    }
    /// The binary exponent of the largest normal value.
    pub const fn q_max(&self) -> i32 {
        (1 << (self.exponent - 1)) - self.precision as i32
    }
    /// The smallest normal significand, 2^(P-1).
    pub const fn c_min(&self) -> u64 {
        1 << (self.precision - 1)
    }
    /// The maximal number of digits of a shortest decimal.
    pub fn max_digits(&self) -> u32 {
        (flog10pow2(self.precision as i32) + 2) as u32
    }
    /// A decimal 0.d * 10^e with e at or below this value rounds to zero.
    pub fn zero_threshold(&self) -> i32 {
        flog10pow2(self.q_min() - 1)
    }
    /// A decimal 0.d * 10^e with e at or above this value rounds to infinity.
    pub fn infinity_threshold(&self) -> i32 {
        flog10pow2(self.q_max() + self.precision as i32) + 2
    }
    /// The number of hex digits that are enough to round a hex literal.
    pub const fn hex_count(&self) -> usize {
        (self.precision / 4 + 2) as usize
    }
    /// Returns the bit pattern of the positive infinity.
    pub const fn infinity_bits(&self) -> u64 {
        ((1 << self.exponent) - 1) << (self.precision - 1)
    }
    /// Returns the bit pattern of the canonical quiet NaN.
    pub const fn nan_bits(&self) -> u64 {
        self.infinity_bits() | 1 << (self.precision - 2)
    }
    /// Returns the mask of the sign bit.
    pub const fn sign_bit(&self) -> u64 {
        1 << (self.exponent + self.precision - 1)
    }

    /// Assemble the bit pattern of the positive value c * 2^q, where either
    /// 2^(P-1) <= c < 2^P and Q_MIN <= q <= Q_MAX, or c < 2^(P-1) and
    /// q == Q_MIN.
    pub fn make_bits(&self, c: u64, q: i32) -> u64 {
        debug_assert!(c < 1 << self.precision);
        debug_assert!(q >= self.q_min() && q <= self.q_max());
        let be = if c < self.c_min() {
            debug_assert!(q == self.q_min());
            0
        } else {
            (q - self.q_min() + 1) as u64
        };
        be << self.get_mantissa_len() | (c & mask(self.get_mantissa_len()))
    }
}

impl Display for Semantics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "(exponent:{} precision:{})",
            self.get_exponent_len(),
            self.get_precision(),
        )
    }
}

/// Predefined IEEE-754 binary32.
pub const FP32: Semantics = Semantics::new(8, 24, 8);
/// Predefined IEEE-754 binary64.
pub const FP64: Semantics = Semantics::new(11, 53, 3);

/// A positive finite non-zero value c * 2^q with its sign. Either
/// 2^(P-1) <= c < 2^P (normal) or 0 < c < 2^(P-1) and q == Q_MIN (subnormal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatingValue {
    pub sign: bool,
    pub c: u64,
    pub q: i32,
}

/// The result of splitting a bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unpacked {
    Zero(bool),
    Infinity(bool),
    NaN,
    /// A finite non-zero value. When the significand of a subnormal value is
    /// tiny it is multiplied by ten, and `dk` is -1 to compensate for it in
    /// the decimal exponent.
    Finite { value: FloatingValue, dk: i32 },
}

/// Split the `sem`-encoded bit pattern `bits` into its parts.
pub fn decompose(bits: u64, sem: Semantics) -> Unpacked {
    let mantissa_len = sem.get_mantissa_len();
    let sign = (bits >> (sem.get_width() - 1)) & 1 == 1;
    let t = bits & mask(mantissa_len);
    let bq = (bits >> mantissa_len) & mask(sem.get_exponent_len());

    if bq == mask(sem.get_exponent_len()) {
        if t == 0 {
            return Unpacked::Infinity(sign);
        }
        return Unpacked::NaN;
    }

    if bq != 0 {
        // Normal value. The hidden bit is made explicit.
        let value = FloatingValue {
            sign,
            c: sem.c_min() | t,
            q: bq as i32 + sem.q_min() - 1,
        };
        return Unpacked::Finite { value, dk: 0 };
    }

    if t == 0 {
        return Unpacked::Zero(sign);
    }

    // Subnormal value.
    let q = sem.q_min();
    if t < sem.c_tiny {
        let value = FloatingValue { sign, c: 10 * t, q };
        return Unpacked::Finite { value, dk: -1 };
    }
    let value = FloatingValue { sign, c: t, q };
    Unpacked::Finite { value, dk: 0 }
}

/// Returns the (significand, exponent) of the non-negative bit pattern
/// `bits`, without the tiny-subnormal scaling. Zero is (0, Q_MIN).
pub(crate) fn significand_and_exponent(
    bits: u64,
    sem: Semantics,
) -> (u64, i32) {
    let mantissa_len = sem.get_mantissa_len();
    let t = bits & mask(mantissa_len);
    let bq = (bits >> mantissa_len) & mask(sem.get_exponent_len());
    if bq == 0 {
        return (t, sem.q_min());
    }
    (sem.c_min() | t, bq as i32 + sem.q_min() - 1)
}

#[test]
fn test_format_constants() {
    assert_eq!(FP64.q_min(), -1074);
    assert_eq!(FP64.q_max(), 971);
    assert_eq!(FP64.max_digits(), 17);
    assert_eq!(FP64.zero_threshold(), -324);
    assert_eq!(FP64.infinity_threshold(), 310);
    assert_eq!(FP64.hex_count(), 15);
    assert_eq!(FP64.infinity_bits(), f64::INFINITY.to_bits());

    assert_eq!(FP32.q_min(), -149);
    assert_eq!(FP32.q_max(), 104);
    assert_eq!(FP32.max_digits(), 9);
    assert_eq!(FP32.zero_threshold(), -46);
    assert_eq!(FP32.infinity_threshold(), 40);
    assert_eq!(FP32.hex_count(), 8);
    assert_eq!(FP32.infinity_bits(), f32::INFINITY.to_bits() as u64);
    assert!(f32::from_bits(FP32.nan_bits() as u32).is_nan());
    assert!(f64::from_bits(FP64.nan_bits()).is_nan());
}

#[test]
fn test_tiny_threshold() {
    // C_TINY is the smallest c such that c * 2^Q_MIN has enough precision to
    // be encoded without scaling: c_tiny = ceil(2^-Q_MIN * 10^(K_MIN + 1)),
    // with K_MIN = flog10pow2(Q_MIN). Check it with exact integers:
    // (c_tiny - 1) * 2^Q_MIN < 10^(K_MIN+1) <= c_tiny * 2^Q_MIN.
    use crate::bigint::BigInt;
    for sem in [FP32, FP64] {
        let q = sem.q_min();
        let k = flog10pow2(q) + 1;
        assert!(k < 0);
        // Multiply both sides by 2^-q * 10^-k = 2^(-q-k) * 5^-k.
        let bound = BigInt::value_of_pow52(0, (-q) as u32);
        let p = (-k) as u32;
        let hi = BigInt::value_of_mul_pow52(sem.c_tiny, p, p);
        let lo = BigInt::value_of_mul_pow52(sem.c_tiny - 1, p, p);
        assert!(lo < bound);
        assert!(bound <= hi);
    }
}

#[test]
fn test_decompose() {
    assert_eq!(decompose(0, FP64), Unpacked::Zero(false));
    assert_eq!(decompose((-0.0f64).to_bits(), FP64), Unpacked::Zero(true));
    assert_eq!(
        decompose(f64::NEG_INFINITY.to_bits(), FP64),
        Unpacked::Infinity(true)
    );
    assert_eq!(decompose(f64::NAN.to_bits(), FP64), Unpacked::NaN);
    assert_eq!(decompose((-f64::NAN).to_bits(), FP64), Unpacked::NaN);
    assert_eq!(
        decompose(f32::INFINITY.to_bits() as u64, FP32),
        Unpacked::Infinity(false)
    );

    let one = FloatingValue {
        sign: false,
        c: 1 << 52,
        q: -52,
    };
    assert_eq!(
        decompose(1.0f64.to_bits(), FP64),
        Unpacked::Finite { value: one, dk: 0 }
    );

    let minus_three = FloatingValue {
        sign: true,
        c: 3 << 22,
        q: -22,
    };
    assert_eq!(
        decompose((-3.0f32).to_bits() as u64, FP32),
        Unpacked::Finite {
            value: minus_three,
            dk: 0
        }
    );

    // Tiny subnormals are scaled.
    let tiny = FloatingValue {
        sign: false,
        c: 20,
        q: -1074,
    };
    assert_eq!(decompose(2, FP64), Unpacked::Finite { value: tiny, dk: -1 });
    let sub = FloatingValue {
        sign: false,
        c: 3,
        q: -1074,
    };
    assert_eq!(decompose(3, FP64), Unpacked::Finite { value: sub, dk: 0 });
}

#[test]
fn test_make_bits() {
    for v in [1.0f64, 0.1, f64::MAX, f64::MIN_POSITIVE, 5e-324, 1e-310] {
        let (c, q) = significand_and_exponent(v.to_bits(), FP64);
        assert_eq!(FP64.make_bits(c, q), v.to_bits());
    }
    for v in [1.0f32, 0.1, f32::MAX, f32::MIN_POSITIVE, 1e-45, 1e-40] {
        let (c, q) = significand_and_exponent(v.to_bits() as u64, FP32);
        assert_eq!(FP32.make_bits(c, q), v.to_bits() as u64);
    }
}
