//! This module contains the fixed precision rendering of values, in the
//! plain (%f), scientific (%e) and general (%g) styles. The rendering starts
//! from the shortest decimal of the value and rounds it half-up.

use super::cast::BinaryFloat;
use super::encode::{Decimal, DecimalDigits};
use super::table::POW10;
use core::fmt::Display;

/// The rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// d.ddd with an exponent.
    Scientific,
    /// ddd.ddd without an exponent.
    Plain,
    /// Plain or scientific, depending on the magnitude.
    General,
}

impl FormatMode {
    /// Returns the mode for a printf-style conversion letter ("e", "f", "g")
    /// or for the name of the mode.
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "e" | "scientific" => Some(FormatMode::Scientific),
            "f" | "plain" => Some(FormatMode::Plain),
            "g" | "general" => Some(FormatMode::General),
            _ => None,
        }
    }
}

/// The text of a rendered value, without the sign. The exponent has a sign
/// and at least two digits, and is only present in the scientific style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    mantissa: String,
    exponent: Option<String>,
}

impl Formatted {
    pub fn get_mantissa(&self) -> &str {
        &self.mantissa
    }

    pub fn get_exponent(&self) -> Option<&str> {
        self.exponent.as_deref()
    }
}

impl Display for Formatted {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.exponent {
            Some(exp) => write!(f, "{}e{}", self.mantissa, exp),
            None => f.write_str(&self.mantissa),
        }
    }
}

/// Round `d` to `p` digits, with ties going away from zero. Rounding to
/// fewer than zero digits produces zero.
fn round_half_up(d: &mut DecimalDigits, p: i32) {
    let n = d.n as i32;
    if d.is_zero() || p >= n {
        return;
    }
    if p < 0 {
        *d = DecimalDigits::zero();
        return;
    }
    if p == 0 {
        // Everything is dropped. The value is either 0 or 10^e.
        if d.f >= 5 * POW10[(n - 1) as usize] {
            *d = DecimalDigits {
                f: 1,
                n: 1,
                e: d.e + 1,
            };
        } else {
            *d = DecimalDigits::zero();
        }
        return;
    }
    let pow = POW10[(n - p) as usize];
    let mut f = (d.f + pow / 2) / pow;
    let mut e = d.e;
    if f == POW10[p as usize] {
        // The carry added a digit: 99.5 -> 100.
        f = POW10[(p - 1) as usize];
        e += 1;
    }
    *d = DecimalDigits { f, n: p as u32, e };
}

/// Returns the digit i (starting at 1) of `digits`, or '0' past the end.
fn digit_at(digits: &[u8], i: i32) -> char {
    if 1 <= i && i as usize <= digits.len() {
        char::from(digits[i as usize - 1])
    } else {
        '0'
    }
}

fn plain(mut d: DecimalDigits, prec: u32) -> Formatted {
    let p = d.e + prec as i32;
    round_half_up(&mut d, p);
    let digits = if d.is_zero() {
        Vec::new()
    } else {
        d.digit_string().into_bytes()
    };

    let mut mantissa = String::new();
    if d.e <= 0 {
        mantissa.push('0');
    } else {
        mantissa.extend((1..=d.e).map(|i| digit_at(&digits, i)));
    }
    if prec > 0 {
        mantissa.push('.');
        mantissa.extend((1..=prec as i32).map(|j| digit_at(&digits, d.e + j)));
    }
    Formatted {
        mantissa,
        exponent: None,
    }
}

fn scientific(mut d: DecimalDigits, prec: u32) -> Formatted {
    round_half_up(&mut d, prec as i32 + 1);
    let (digits, exp) = if d.is_zero() {
        (Vec::from([b'0']), 0)
    } else {
        (d.digit_string().into_bytes(), d.e - 1)
    };

    let mut mantissa = String::new();
    mantissa.push(digit_at(&digits, 1));
    if prec > 0 {
        mantissa.push('.');
        mantissa.extend((2..=prec as i32 + 1).map(|i| digit_at(&digits, i)));
    }
    let sign = if exp < 0 { '-' } else { '+' };
    Formatted {
        mantissa,
        exponent: Some(format!("{}{:02}", sign, exp.unsigned_abs())),
    }
}

fn general(mut d: DecimalDigits, prec: u32) -> Formatted {
    let p = prec.max(1) as i32;
    round_half_up(&mut d, p);
    let er = if d.is_zero() { 0 } else { d.e - 1 };
    if -4 <= er && er < p {
        plain(d, (p - 1 - er) as u32)
    } else {
        scientific(d, (p - 1) as u32)
    }
}

/// Render the magnitude of `val` with `precision` digits, or return None if
/// the value is not finite.
/// In the plain style the precision counts the digits after the point. In
/// the scientific style it counts the digits after the first digit. In the
/// general style it counts all the significant digits (and zero counts as
/// one), and the plain style is selected when the rounded value is in the
/// range [10^-4, 10^precision).
pub fn formatted<F: BinaryFloat>(
    val: F,
    precision: u32,
    mode: FormatMode,
) -> Option<Formatted> {
    let digits = Decimal::from_float(val).digits()?;
    Some(match mode {
        FormatMode::Plain => plain(digits, precision),
        FormatMode::Scientific => scientific(digits, precision),
        FormatMode::General => general(digits, precision),
    })
}

#[cfg(test)]
fn render(
    val: f64,
    precision: u32,
    mode: FormatMode,
) -> (String, Option<String>) {
    let res = formatted(val, precision, mode).unwrap();
    (
        res.get_mantissa().to_string(),
        res.get_exponent().map(String::from),
    )
}

#[test]
fn test_round_half_up() {
    let mut d = DecimalDigits::new(12345, 0);
    round_half_up(&mut d, 3);
    assert_eq!(d, DecimalDigits { f: 123, n: 3, e: 5 });

    let mut d = DecimalDigits::new(125, -3);
    round_half_up(&mut d, 2);
    assert_eq!(d, DecimalDigits { f: 13, n: 2, e: 0 });

    let mut d = DecimalDigits::new(995, 0);
    round_half_up(&mut d, 2);
    assert_eq!(d, DecimalDigits { f: 10, n: 2, e: 4 });

    let mut d = DecimalDigits::new(5, 0);
    round_half_up(&mut d, 0);
    assert_eq!(d, DecimalDigits { f: 1, n: 1, e: 2 });

    let mut d = DecimalDigits::new(49, 0);
    round_half_up(&mut d, 0);
    assert!(d.is_zero());

    let mut d = DecimalDigits::new(17976931348623157, 292);
    round_half_up(&mut d, -1);
    assert!(d.is_zero());

    // A long run of nines carries into a new digit.
    let mut d = DecimalDigits::new(9999999999999999999, 0);
    round_half_up(&mut d, 1);
    assert_eq!(d, DecimalDigits { f: 1, n: 1, e: 20 });
}

#[test]
fn test_plain() {
    use FormatMode::Plain;
    assert_eq!(render(1234.5678, 2, Plain), ("1234.57".into(), None));
    assert_eq!(render(0.125, 2, Plain).0, "0.13");
    assert_eq!(render(2.5, 0, Plain).0, "3");
    assert_eq!(render(0.5, 0, Plain).0, "1");
    assert_eq!(render(0.4, 0, Plain).0, "0");
    assert_eq!(render(0.001, 2, Plain).0, "0.00");
    assert_eq!(render(0.005, 2, Plain).0, "0.01");
    assert_eq!(render(1e-10, 3, Plain).0, "0.000");
    assert_eq!(render(123.0, 3, Plain).0, "123.000");
    assert_eq!(render(9.999, 2, Plain).0, "10.00");
    assert_eq!(render(-1.5, 1, Plain).0, "1.5");
    assert_eq!(render(0.0, 2, Plain).0, "0.00");
    assert_eq!(render(1e20, 1, Plain).0, "100000000000000000000.0");
    assert_eq!(render(0.1 + 0.2, 20, Plain).0, "0.30000000000000004000");
}

#[test]
fn test_scientific() {
    use FormatMode::Scientific;
    let sci = |v, p| {
        let (m, e) = render(v, p, Scientific);
        (m, e.unwrap())
    };
    assert_eq!(sci(1234.5678, 2), ("1.23".into(), "+03".into()));
    assert_eq!(sci(0.0, 3), ("0.000".into(), "+00".into()));
    assert_eq!(sci(9.96, 1), ("1.0".into(), "+01".into()));
    assert_eq!(sci(1e-100, 0), ("1".into(), "-100".into()));
    assert_eq!(sci(5e-324, 2), ("4.90".into(), "-324".into()));
    assert_eq!(sci(f64::MAX, 16), ("1.7976931348623157".into(), "+308".into()));
    assert_eq!(sci(0.15, 0), ("2".into(), "-01".into()));
}

#[test]
fn test_general() {
    use FormatMode::General;
    assert_eq!(render(1234.5678, 6, General), ("1234.57".into(), None));
    assert_eq!(render(0.0001, 3, General).0, "0.000100");
    assert_eq!(
        render(0.00001, 3, General),
        ("1.00".into(), Some("-05".into()))
    );
    assert_eq!(
        render(123456789.0, 3, General),
        ("1.23".into(), Some("+08".into()))
    );
    assert_eq!(render(0.0, 0, General), ("0".into(), None));
    assert_eq!(render(0.0, 3, General).0, "0.00");
    assert_eq!(
        render(99999.5, 5, General),
        ("1.0000".into(), Some("+05".into()))
    );
    assert_eq!(render(99999.4, 5, General).0, "99999");
    assert_eq!(render(2.5, 1, General).0, "3");
}

#[test]
fn test_formatted_types() {
    assert_eq!(formatted(f64::NAN, 2, FormatMode::Plain), None);
    assert_eq!(formatted(f32::INFINITY, 2, FormatMode::General), None);
    let res = formatted(0.1f32, 10, FormatMode::Plain).unwrap();
    assert_eq!(res.get_mantissa(), "0.1000000000");
    let res = formatted(-1.0f32 / 3.0, 3, FormatMode::Scientific).unwrap();
    assert_eq!(res.to_string(), "3.333e-01");
}

#[test]
fn test_mode_from_string() {
    assert_eq!(FormatMode::from_string("e"), Some(FormatMode::Scientific));
    assert_eq!(FormatMode::from_string("plain"), Some(FormatMode::Plain));
    assert_eq!(FormatMode::from_string("g"), Some(FormatMode::General));
    assert_eq!(FormatMode::from_string("x"), None);
}
