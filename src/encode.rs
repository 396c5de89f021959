//! This module contains the implementation of the shortest decimal encoder.
//! See "The Schubfach way to render doubles" by Raffaello Giulietti.

use super::cast::BinaryFloat;
use super::float::{decompose, FloatingValue, Semantics, Unpacked};
use super::table::{
    decimal_len, flog10_three_quarters_pow2, flog10pow2, flog2pow10, g,
};
use super::utils::multiply_high;

const MASK_63: u64 = (1 << 63) - 1;

/// A decimal f * 10^(e - n), where f has exactly n digits. Zero is f = 0 and
/// n = 0. In other words, the value is 0.d1..dn * 10^e.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalDigits {
    pub f: u64,
    pub n: u32,
    pub e: i32,
}

impl DecimalDigits {
    /// Returns the decimal f * 10^k, without trailing zeros in f.
    pub fn new(mut f: u64, mut k: i32) -> Self {
        if f == 0 {
            return Self::zero();
        }
        while f % 10 == 0 {
            f /= 10;
            k += 1;
        }
        let n = decimal_len(f);
        DecimalDigits {
            f,
            n,
            e: k + n as i32,
        }
    }

    pub fn zero() -> Self {
        DecimalDigits { f: 0, n: 0, e: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.f == 0
    }

    /// Returns the decimal exponent of the least significant digit.
    pub fn lsd_exponent(&self) -> i32 {
        self.e - self.n as i32
    }

    /// Returns the digits of f, or "0" for zero.
    pub fn digit_string(&self) -> String {
        self.f.to_string()
    }
}

/// Computes rop(g * cp * 2^-127), where g = g1 * 2^63 + g0, and rop() rounds
/// to odd.
fn rop(g1: u64, g0: u64, cp: u64) -> u64 {
    let x1 = multiply_high(g0, cp);
    let y0 = g1.wrapping_mul(cp);
    let y1 = multiply_high(g1, cp);
    let z = (y0 >> 1) + x1;
    let vbp = y1 + (z >> 63);
    vbp | ((z & MASK_63) + MASK_63) >> 63
}

/// Returns the shortest decimal (f, k), such that f * 10^k rounds to
/// c * 2^q, which is in the rounding interval of c * 2^q. When several
/// decimals are equally short, the closest one is selected. The decimal
/// exponent is adjusted by `dk`.
fn to_decimal(sem: Semantics, q: i32, c: u64, dk: i32) -> (u64, i32) {
    let out = c & 1;
    let cb = c << 2;
    let cbr = cb + 2;

    // The left neighbor is closer when c is at the bottom of its binade.
    let (cbl, k) = if c != sem.c_min() || q == sem.q_min() {
        (cb - 2, flog10pow2(q))
    } else {
        (cb - 1, flog10_three_quarters_pow2(q))
    };
    let h = q + flog2pow10(-k) + 2;
    debug_assert!((2..=5).contains(&h));

    // The values cb, cbl and cbr scaled by 10^-k, in units of 1/4.
    let (g1, g0) = g(-k);
    let vb = rop(g1, g0, cb << h);
    let vbl = rop(g1, g0, cbl << h);
    let vbr = rop(g1, g0, cbr << h);

    let s = vb >> 2;
    if s >= 100 {
        // Try to drop one digit: sp10 and tp10 are the multiples of 10 next
        // to s.
        let sp10 = 10 * (s / 10);
        let tp10 = sp10 + 10;
        let upin = vbl + out <= sp10 << 2;
        let wpin = (tp10 << 2) + out <= vbr;
        if upin != wpin {
            return (if upin { sp10 } else { tp10 }, k);
        }
    }

    // Keep all the digits: s and t are the integers next to the value.
    let t = s + 1;
    let uin = vbl + out <= s << 2;
    let win = (t << 2) + out <= vbr;
    if uin != win {
        return (if uin { s } else { t }, k + dk);
    }

    // Both are in the rounding interval. Pick the closest one, and break
    // ties to even.
    let cmp = vb as i64 - ((s + t) << 1) as i64;
    let f = if cmp < 0 || (cmp == 0 && s & 1 == 0) {
        s
    } else {
        t
    };
    (f, k + dk)
}

/// Returns the shortest decimal of the finite non-zero `value`, with the
/// exponent correction `dk` from `decompose`.
pub fn encode(value: FloatingValue, dk: i32, sem: Semantics) -> DecimalDigits {
    let FloatingValue { c, q, .. } = value;
    debug_assert!(c != 0);

    // Integers with a small exponent are printed exactly.
    if -(sem.get_precision() as i32) < q && q < 0 && dk == 0 {
        let f = c >> -q;
        if f << -q == c {
            return DecimalDigits::new(f, 0);
        }
    }
    let (f, k) = to_decimal(sem, q, c, dk);
    DecimalDigits::new(f, k)
}

/// The decimal form of a binary floating point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decimal {
    Zero(bool),
    Infinity(bool),
    NaN,
    /// A finite non-zero value: the sign and the shortest digits.
    Finite(bool, DecimalDigits),
}

impl Decimal {
    /// Returns the shortest decimal of the `sem`-encoded `bits`.
    pub fn from_bits(bits: u64, sem: Semantics) -> Decimal {
        match decompose(bits, sem) {
            Unpacked::Zero(sign) => Decimal::Zero(sign),
            Unpacked::Infinity(sign) => Decimal::Infinity(sign),
            Unpacked::NaN => Decimal::NaN,
            Unpacked::Finite { value, dk } => {
                Decimal::Finite(value.sign, encode(value, dk, sem))
            }
        }
    }

    /// Returns the shortest decimal of `val`.
    pub fn from_float<F: BinaryFloat>(val: F) -> Decimal {
        Self::from_bits(val.to_raw(), F::SEM)
    }

    /// Returns true for negative values, including the negative zero. NaN is
    /// never negative.
    pub fn is_negative(&self) -> bool {
        match self {
            Decimal::Zero(sign) | Decimal::Infinity(sign) => *sign,
            Decimal::Finite(sign, _) => *sign,
            Decimal::NaN => false,
        }
    }

    /// Returns true for infinities and NaN.
    pub fn is_exceptional(&self) -> bool {
        matches!(self, Decimal::Infinity(_) | Decimal::NaN)
    }

    /// Returns the decimal exponent e of the value 0.d1..dn * 10^e. Zeros and
    /// exceptional values return zero.
    pub fn decimal_exponent(&self) -> i32 {
        match self {
            Decimal::Finite(_, digits) => digits.e,
            _ => 0,
        }
    }

    /// Returns the digits of finite values. Zeros have zero digits.
    pub fn digits(&self) -> Option<DecimalDigits> {
        match self {
            Decimal::Zero(_) => Some(DecimalDigits::zero()),
            Decimal::Finite(_, digits) => Some(*digits),
            _ => None,
        }
    }
}

#[cfg(test)]
fn shortest_f64(v: f64) -> (u64, i32) {
    let d = Decimal::from_float(v).digits().unwrap();
    (d.f, d.lsd_exponent())
}

#[cfg(test)]
fn shortest_f32(v: f32) -> (u64, i32) {
    let d = Decimal::from_float(v).digits().unwrap();
    (d.f, d.lsd_exponent())
}

#[test]
fn test_rop() {
    // With g = 2^125 (g1 = 2^62, g0 = 0) the result is cp * 2^-2, rounded
    // to odd.
    assert_eq!(rop(1 << 62, 0, 64), 16);
    assert_eq!(rop(1 << 62, 0, 65), 17);
    assert_eq!(rop(1 << 62, 0, 66), 17);
    assert_eq!(rop(1 << 62, 0, 68), 17);
    assert_eq!(rop(1 << 62, 0, 72), 18);
}

#[test]
fn test_simple_values() {
    assert_eq!(shortest_f64(1.0), (1, 0));
    assert_eq!(shortest_f64(0.1), (1, -1));
    assert_eq!(shortest_f64(100.0), (1, 2));
    assert_eq!(shortest_f64(1e21), (1, 21));
    assert_eq!(shortest_f64(1e23), (1, 23));
    assert_eq!(shortest_f64(0.3), (3, -1));
    assert_eq!(shortest_f64(0.1 + 0.2), (30000000000000004, -17));
    assert_eq!(shortest_f64(123456.789), (123456789, -3));
    assert_eq!(shortest_f64(f64::MAX), (17976931348623157, 292));
    assert_eq!(shortest_f64(f64::MIN_POSITIVE), (22250738585072014, -324));
    assert_eq!(shortest_f64(f64::EPSILON), (2220446049250313, -31));
    assert_eq!(shortest_f64(9007199254740993.0), (9007199254740992, 0));

    assert_eq!(shortest_f32(1.0), (1, 0));
    assert_eq!(shortest_f32(0.1), (1, -1));
    assert_eq!(shortest_f32(1.0 / 3.0), (33333334, -8));
    assert_eq!(shortest_f32(f32::MAX), (34028235, 31));
    assert_eq!(shortest_f32(f32::MIN_POSITIVE), (11754944, -45));
    assert_eq!(shortest_f32(16777216.0), (16777216, 0));
}

#[test]
fn test_subnormals() {
    // The smallest values always print with two digits.
    assert_eq!(shortest_f64(5e-324), (49, -325));
    assert_eq!(shortest_f64(1e-323), (99, -325));
    assert_eq!(shortest_f64(1.5e-323), (15, -324));
    assert_eq!(shortest_f32(1e-45), (14, -46));
    assert_eq!(shortest_f32(3e-45), (28, -46));
    assert_eq!(shortest_f32(1e-40), (1, -40));
}

#[test]
fn test_ties_to_even() {
    // Both neighbors are in the rounding interval and are exactly as far
    // from the value, so the even one is selected.
    assert_eq!(shortest_f32(1936951.25), (19369512, -1));
    assert_eq!(shortest_f32(446579.625), (44657962, -2));

    assert_eq!(shortest_f32(1936951.75), (19369518, -1));

    // Only one neighbor is in the rounding interval.
    assert_eq!(shortest_f32(1936951.375), (19369514, -1));
    assert_eq!(shortest_f32(1936951.125), (19369511, -1));
}

#[test]
fn test_specials() {
    assert_eq!(Decimal::from_float(0.0f64), Decimal::Zero(false));
    assert_eq!(Decimal::from_float(-0.0f32), Decimal::Zero(true));
    assert_eq!(Decimal::from_float(f64::INFINITY), Decimal::Infinity(false));
    assert_eq!(Decimal::from_float(f32::NEG_INFINITY), Decimal::Infinity(true));
    assert_eq!(Decimal::from_float(f64::NAN), Decimal::NaN);
    assert!(!Decimal::from_float(-f64::NAN).is_negative());
    assert!(Decimal::from_float(f64::NAN).is_exceptional());
    assert!(!Decimal::from_float(-0.0f64).is_exceptional());
    assert!(Decimal::from_float(-0.0f64).is_negative());
    assert_eq!(Decimal::from_float(f64::NAN).digits(), None);
    assert_eq!(
        Decimal::from_float(0.0f64).digits(),
        Some(DecimalDigits::zero())
    );

    let d = Decimal::from_float(-123.5f64);
    assert!(d.is_negative());
    assert_eq!(d.decimal_exponent(), 3);
    assert_eq!(d.digits().unwrap().digit_string(), "1235");
}

#[test]
fn test_decimal_digits() {
    let d = DecimalDigits::new(12300, -2);
    assert_eq!(d, DecimalDigits { f: 123, n: 3, e: 3 });
    assert_eq!(d.lsd_exponent(), 0);
    assert_eq!(DecimalDigits::new(0, 17), DecimalDigits::zero());
    assert!(DecimalDigits::zero().is_zero());
    assert_eq!(DecimalDigits::zero().digit_string(), "0");
    let d = DecimalDigits::new(5, -324);
    assert_eq!(d.e, -323);
}
