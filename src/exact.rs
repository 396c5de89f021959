//! This module contains the exact decimal expansion of binary values. Every
//! binary value c * 2^q has a finite decimal expansion, and this module
//! computes all of its digits.

use super::bigint::BigInt;
use super::cast::BinaryFloat;
use super::encode::Decimal;
use super::float::{decompose, significand_and_exponent, Unpacked};
use super::table::flog10pow2;
use super::utils::bit_len;
use core::cmp::Ordering;
use core::fmt::Display;

/// The exact value d1.d2..dn * 10^exponent, where `digits` holds the ASCII
/// digits d1..dn without trailing zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    digits: String,
    exponent: i32,
}

impl Expansion {
    /// Returns the decimal digits, most significant first.
    pub fn get_digits(&self) -> &str {
        &self.digits
    }

    /// Returns the exponent of the first digit.
    pub fn get_exponent(&self) -> i32 {
        self.exponent
    }
}

impl Display for Expansion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (first, rest) = self.digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        write!(f, "{}.{}E{}", first, rest, self.exponent)
    }
}

/// Returns the exact decimal expansion of c * 2^q.
pub fn expand(c: u64, q: i32) -> Expansion {
    if c == 0 {
        return Expansion {
            digits: String::from("0"),
            exponent: 0,
        };
    }

    // The value is numer / denom.
    let mut numer = BigInt::value_of_mul_pow52(c, 0, q.max(0) as u32);
    let mut denom = BigInt::value_of_pow52(0, (-q).max(0) as u32);

    // Scale the fraction to the range [1, 10). The estimate is either the
    // exponent of the first digit or one less.
    let mut k = flog10pow2(q + bit_len(c as u128) as i32 - 1);
    if k >= 0 {
        denom.inplace_mul_pow52(k as u32, k as u32);
    } else {
        numer.inplace_mul_pow52(-k as u32, -k as u32);
    }
    let mut denom10 = denom.clone();
    denom10.inplace_mul_u32(10);
    if numer >= denom10 {
        denom = denom10;
        k += 1;
    }

    let mut digits = String::new();
    while !numer.is_zero() {
        let d = numer.quo_rem_iteration(&denom);
        digits.push(char::from(b'0' + d as u8));
    }
    Expansion {
        digits,
        exponent: k,
    }
}

/// Returns the exact decimal expansion of the magnitude of `val`, or None
/// for infinities and NaN.
pub fn expand_float<F: BinaryFloat>(val: F) -> Option<Expansion> {
    let sem = F::SEM;
    match decompose(val.to_raw(), sem) {
        Unpacked::Infinity(_) | Unpacked::NaN => None,
        _ => {
            let bits = val.to_raw() & !sem.sign_bit();
            let (c, q) = significand_and_exponent(bits, sem);
            Some(expand(c, q))
        }
    }
}

/// Compares the shortest decimal of `val` with the exact value of `val`,
/// both without the sign. Returns None for infinities and NaN.
pub fn compare_shortest<F: BinaryFloat>(val: F) -> Option<Ordering> {
    let d = Decimal::from_float(val).digits()?;
    if d.is_zero() {
        return Some(Ordering::Equal);
    }
    let bits = val.to_raw() & !F::SEM.sign_bit();
    let (c, q) = significand_and_exponent(bits, F::SEM);

    // Compare f * 5^k * 2^k with c * 2^q.
    let k = d.lsd_exponent();
    let p2 = k.min(q);
    let lhs = BigInt::value_of_mul_pow52(
        d.f,
        k.max(0) as u32,
        (k - p2) as u32,
    );
    let rhs = BigInt::value_of_mul_pow52(
        c,
        (-k).max(0) as u32,
        (q - p2) as u32,
    );
    Some(lhs.cmp(&rhs))
}

/// Returns true if the last shortest digit of `val` was rounded up, so the
/// digits are larger than the value.
pub fn digits_rounded_up<F: BinaryFloat>(val: F) -> bool {
    compare_shortest(val) == Some(Ordering::Greater)
}

/// Returns true if the shortest digits of the finite `val` are its exact
/// value.
pub fn digits_exact<F: BinaryFloat>(val: F) -> bool {
    compare_shortest(val) == Some(Ordering::Equal)
}

#[test]
fn test_expand_simple() {
    fn check(c: u64, q: i32, digits: &str, exponent: i32) {
        let e = expand(c, q);
        assert_eq!(e.get_digits(), digits);
        assert_eq!(e.get_exponent(), exponent);
    }
    check(0, 10, "0", 0);
    check(1, 0, "1", 0);
    check(3, -1, "15", 0);
    check(1, -1, "5", -1);
    check(5, -4, "3125", -1);
    check(1, 10, "1024", 3);
    check(10, 0, "1", 1);
    check(999, 0, "999", 2);
    check(1000, 0, "1", 3);
    check(1, 64, "18446744073709551616", 19);
    check(1, -20, "95367431640625", -7);
}

#[test]
fn test_expand_float() {
    let e = expand_float(5e-324f64).unwrap();
    // 2^-1074 = 5^1074 * 10^-1074
    assert_eq!(e.get_digits().len(), 751);
    assert!(e.get_digits().starts_with("4940656458412465441765687928682"));
    assert!(e.get_digits().ends_with("533447265625"));
    assert_eq!(e.get_exponent(), -324);

    let e = expand_float(-0.1f32).unwrap();
    assert_eq!(e.to_string(), "1.00000001490116119384765625E-1");
    assert_eq!(expand_float(f64::MAX).unwrap().get_digits().len(), 309);
    assert_eq!(expand_float(0.0f64).unwrap().to_string(), "0.0E0");
    assert_eq!(expand_float(f64::NAN), None);
    assert_eq!(expand_float(f32::NEG_INFINITY), None);
}

#[test]
fn test_expansion_parses_back() {
    use crate::parse::parse;
    use crate::utils::Lfsr;

    let mut lfsr = Lfsr::new_with_seed(7);
    for _ in 0..200 {
        let v = f64::from_bits(lfsr.get64() & !(1 << 63));
        if !v.is_finite() {
            continue;
        }
        let text = expand_float(v).unwrap().to_string();
        assert_eq!(parse::<f64>(&text).unwrap().to_bits(), v.to_bits());
    }
}

#[test]
fn test_midpoints_round_to_even() {
    use crate::float::FP64;
    use crate::parse::parse;
    use crate::utils::Lfsr;

    let mut lfsr = Lfsr::new();
    for i in 0..300 {
        // Pick both normal and subnormal values.
        let bits = if i % 3 == 0 {
            lfsr.below(1 << 52)
        } else {
            lfsr.below(0x7fe0_0000_0000_0000)
        };
        let (c, q) = significand_and_exponent(bits, FP64);
        let mid = expand(2 * c + 1, q - 1);
        let even = if bits & 1 == 0 { bits } else { bits + 1 };
        let text = mid.to_string();
        assert_eq!(parse::<f64>(&text).unwrap().to_bits(), even, "{}", text);

        // Anything above the midpoint rounds up.
        let above = format!(
            "{}.{}1E{}",
            &mid.get_digits()[..1],
            &mid.get_digits()[1..],
            mid.get_exponent()
        );
        assert_eq!(parse::<f64>(&above).unwrap().to_bits(), bits + 1);
    }

    // The midpoints around the smallest binary32 subnormal.
    let mid = expand(1, -150).to_string();
    assert_eq!(parse::<f32>(&mid).unwrap().to_bits(), 0);
    let mid = expand(3, -150).to_string();
    assert_eq!(parse::<f32>(&mid).unwrap().to_bits(), 2);
}

#[test]
fn test_compare_shortest() {
    assert!(digits_exact(0.5f64));
    assert!(digits_exact(123.0f32));
    assert!(digits_exact(-0.0f64));
    assert!(!digits_exact(f64::NAN));
    assert_eq!(compare_shortest(f32::INFINITY), None);

    // 0.1 is 0.1000000000000000055.. and 0.3 is 0.2999999999999999888..
    assert_eq!(compare_shortest(0.1f64), Some(Ordering::Less));
    assert!(digits_rounded_up(0.3f64));
    assert!(digits_rounded_up(-0.3f64));
    assert!(digits_rounded_up(1e23f64));
    assert!(!digits_rounded_up(5e-324f64));
    assert!(!digits_rounded_up(0.1f32));
    assert!(digits_rounded_up(1.0f32 / 3.0));
}

#[test]
fn test_compare_shortest_with_expansion() {
    use crate::utils::Lfsr;

    // Compare the shortest digits with all the digits. Both have no
    // trailing zeros, so with equal exponents the text order is the value
    // order.
    let mut lfsr = Lfsr::new_with_seed(11);
    for _ in 0..300 {
        let v = f64::from_bits(lfsr.get64());
        if !v.is_finite() || v == 0.0 {
            continue;
        }
        let exact = expand_float(v).unwrap();
        let d = Decimal::from_float(v).digits().unwrap();
        let expected = (d.e - 1)
            .cmp(&exact.get_exponent())
            .then_with(|| d.digit_string().as_str().cmp(exact.get_digits()));
        assert_eq!(compare_shortest(v), Some(expected), "{}", v);
    }
}
