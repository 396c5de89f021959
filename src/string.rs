//! This module contains the conversion of values to their shortest text.

use super::cast::BinaryFloat;
use super::encode::{Decimal, DecimalDigits};
use core::fmt::{Display, Write};

const INFINITY_REP: &str = "Infinity";
const NAN_REP: &str = "NaN";

/// Write the digits of the non-zero `d` to `out`. Numbers in the range
/// [10^-3, 10^7) are written in plain notation, and all other numbers in
/// scientific notation.
fn write_digits<W: Write>(d: &DecimalDigits, out: &mut W) -> core::fmt::Result {
    let digits = d.digit_string();
    let n = d.n as i32;
    let e = d.e;
    debug_assert_eq!(digits.len() as i32, n);

    if 0 < e && e <= 7 {
        // Plain format, with at least one digit after the point:
        // ddd.ddd or ddd00.0
        if n <= e {
            out.write_str(&digits)?;
            for _ in n..e {
                out.write_char('0')?;
            }
            return out.write_str(".0");
        }
        let (int, frac) = digits.split_at(e as usize);
        out.write_str(int)?;
        out.write_char('.')?;
        return out.write_str(frac);
    }

    if -3 < e && e <= 0 {
        // Plain format with leading zeros: 0.00ddd
        out.write_str("0.")?;
        for _ in e..0 {
            out.write_char('0')?;
        }
        return out.write_str(&digits);
    }

    // Scientific format: d.dddEx
    let (first, rest) = digits.split_at(1);
    out.write_str(first)?;
    out.write_char('.')?;
    out.write_str(if rest.is_empty() { "0" } else { rest })?;
    write!(out, "E{}", e - 1)
}

impl Decimal {
    /// Write the canonical text of the value to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> core::fmt::Result {
        if self.is_negative() {
            out.write_char('-')?;
        }
        match self {
            Decimal::NaN => out.write_str(NAN_REP),
            Decimal::Infinity(_) => out.write_str(INFINITY_REP),
            Decimal::Zero(_) => out.write_str("0.0"),
            Decimal::Finite(_, digits) => write_digits(digits, out),
        }
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.write_to(f)
    }
}

/// Returns the shortest text that parses back to `val`.
pub fn to_string<F: BinaryFloat>(val: F) -> String {
    Decimal::from_float(val).to_string()
}

/// Append the shortest text that parses back to `val` to `out`.
pub fn write_to<F: BinaryFloat, W: Write>(
    val: F,
    out: &mut W,
) -> core::fmt::Result {
    Decimal::from_float(val).write_to(out)
}

#[test]
fn test_convert_to_string() {
    fn to_str(val: f64) -> String {
        to_string(val)
    }

    assert_eq!("1.0", to_str(1.0));
    assert_eq!("0.1", to_str(0.1));
    assert_eq!("0.5", to_str(0.5));
    assert_eq!("100.0", to_str(100.0));
    assert_eq!("-100.0", to_str(-100.0));
    assert_eq!("1.0E21", to_str(1e21));
    assert_eq!("1.0E20", to_str(1e20));
    assert_eq!("1.0E7", to_str(1e7));
    assert_eq!("9999999.0", to_str(9999999.0));
    assert_eq!("1234567.5", to_str(1234567.5));
    assert_eq!("12345.678", to_str(12345.678));
    assert_eq!("0.001", to_str(0.001));
    assert_eq!("1.0E-4", to_str(0.0001));
    assert_eq!("1.2345E-4", to_str(0.00012345));
    assert_eq!("0.0012345", to_str(0.0012345));
    assert_eq!("0.30000000000000004", to_str(0.1 + 0.2));
    assert_eq!("3.141592653589793", to_str(core::f64::consts::PI));
    assert_eq!("1.7976931348623157E308", to_str(f64::MAX));
    assert_eq!("-1.7976931348623157E308", to_str(f64::MIN));
    assert_eq!("2.2250738585072014E-308", to_str(f64::MIN_POSITIVE));
    assert_eq!("4.9E-324", to_str(5e-324));
    assert_eq!("1.0E23", to_str(1e23));
    assert_eq!("9.007199254740992E15", to_str(9007199254740992.0));
    assert_eq!("123.0", to_str(123.0));
    assert_eq!("1.5E10", to_str(1.5e10));
}

#[test]
fn test_specials_to_string() {
    assert_eq!("0.0", to_string(0.0f64));
    assert_eq!("-0.0", to_string(-0.0f64));
    assert_eq!("Infinity", to_string(1.0f64 / 0.0));
    assert_eq!("-Infinity", to_string(f64::NEG_INFINITY));
    assert_eq!("NaN", to_string(f64::NAN));
    assert_eq!("NaN", to_string(-f64::NAN));
    assert_eq!("0.0", to_string(0.0f32));
    assert_eq!("-0.0", to_string(-0.0f32));
    assert_eq!("Infinity", to_string(f32::INFINITY));
    assert_eq!("NaN", to_string(f32::NAN));
}

#[test]
fn test_float_to_string() {
    assert_eq!("1.0", to_string(1.0f32));
    assert_eq!("0.1", to_string(0.1f32));
    assert_eq!("0.33333334", to_string(1.0f32 / 3.0));
    assert_eq!("3.4028235E38", to_string(f32::MAX));
    assert_eq!("1.1754944E-38", to_string(f32::MIN_POSITIVE));
    assert_eq!("1.4E-45", to_string(1e-45f32));
    assert_eq!("1.6777216E7", to_string(16777216.0f32));
    assert_eq!("100.0", to_string(100.0f32));
    assert_eq!("0.5", to_string(0.5f32));

    // Two equally close candidates: the even digit wins.
    assert_eq!("1936951.2", to_string(1936951.25f32));
    assert_eq!("446579.62", to_string(446579.625f32));
}

#[test]
fn test_write_to() {
    let mut buff = String::from("x = ");
    write_to(2.5f64, &mut buff).unwrap();
    buff.push_str(", y = ");
    write_to(-1e-10f32, &mut buff).unwrap();
    assert_eq!(buff, "x = 2.5, y = -1.0E-10");
    assert_eq!(format!("{}", Decimal::from_float(0.5f64)), "0.5");
}
