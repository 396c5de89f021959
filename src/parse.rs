//! This module contains the conversion of decimal and hexadecimal literals to
//! correctly rounded binary values.

use super::bigint::BigInt;
use super::cast::BinaryFloat;
use super::float::{significand_and_exponent, Semantics};
use super::table::{flog2pow10, g, POW10};
use super::utils::bit_len;
use core::cmp::Ordering;
use core::fmt::{Debug, Display};
use std::error::Error;

const INFINITY_REP: &[u8] = b"Infinity";
const NAN_REP: &[u8] = b"NaN";

/// Exponents are accumulated up to this value. Anything larger rounds to
/// zero or to infinity anyway.
const EXPONENT_LIMIT: i64 = 10_000_000_000;

/// The number of decimal digits that the bracket fast path uses.
const BRACKET_DIGITS: usize = 19;

/// Inputs longer than this are shortened in error messages.
const MAX_OUT: usize = 1000;
const OMITTED: &str = " ... ";
const L_HALF: usize = (MAX_OUT - OMITTED.len()) / 2;
const R_HALF: usize = MAX_OUT - (L_HALF + OMITTED.len());

/// The kinds of malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input is empty or only contains whitespace.
    Empty,
    /// The significand has more than one point.
    MultiplePoints,
    /// The significand has no digits.
    MissingDigits,
    /// The exponent letter is not followed by digits.
    MalformedExponent,
    /// A hexadecimal literal has no binary exponent.
    MissingExponent,
    /// The literal is followed by something other than whitespace.
    TrailingCharacters,
    /// A misspelled Infinity or NaN.
    InvalidSymbol,
}

/// The error that parsing reports for malformed input.
pub struct ParseError {
    kind: ParseErrorKind,
    input: String,
}

impl ParseError {
    fn new(kind: ParseErrorKind, input: &str) -> Self {
        let len = input.chars().count();
        let input = if len > MAX_OUT {
            // Discard the middle of the input.
            let head: String = input.chars().take(L_HALF).collect();
            let tail: String = input.chars().skip(len - R_HALF).collect();
            head + OMITTED + &tail
        } else {
            input.to_string()
        };
        ParseError { kind, input }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Returns the (possibly shortened) input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let reason = match self.kind {
            ParseErrorKind::Empty => "The input is empty",
            ParseErrorKind::MultiplePoints => "Multiple points",
            ParseErrorKind::MissingDigits => "The significand has no digits",
            ParseErrorKind::MalformedExponent => "Malformed exponent",
            ParseErrorKind::MissingExponent => {
                "Hexadecimal numbers need a binary exponent"
            }
            ParseErrorKind::TrailingCharacters => {
                "Unexpected trailing characters"
            }
            ParseErrorKind::InvalidSymbol => "Expected Infinity or NaN",
        };
        write!(f, "{}: for input string: \"{}\"", reason, self.input)
    }
}

impl Debug for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

/// A syntactically valid literal. The value of a number is f * 10^ep
/// (decimal) or f * 2^ep (hexadecimal), where the integer f is made of the n
/// significant digits in `significand`, which may contain a point.
#[derive(Debug, PartialEq, Eq)]
enum Literal<'a> {
    Zero(bool),
    Infinity(bool),
    NaN,
    Decimal {
        negative: bool,
        significand: &'a [u8],
        n: i64,
        ep: i64,
    },
    Hex {
        negative: bool,
        significand: &'a [u8],
        n: i64,
        ep: i64,
    },
}

/// Returns the index after the whitespace at `i`. Every char up to ' ' is
/// whitespace.
fn skip_whitespace(input: &[u8], mut i: usize) -> usize {
    while i < input.len() && input[i] <= b' ' {
        i += 1;
    }
    i
}

fn is_digit(ch: u8, is_dec: bool) -> bool {
    ch.is_ascii_digit() || (!is_dec && ch.is_ascii_hexdigit())
}

/// Returns the value of the hex digit `ch`.
fn digit_for(ch: u8) -> u64 {
    match ch {
        b'0'..=b'9' => (ch - b'0') as u64,
        _ => (ch.to_ascii_lowercase() - b'a' + 10) as u64,
    }
}

/// Append the decimal digit `ch` to `val`, saturating at
/// EXPONENT_LIMIT.
fn append_dec_digit(val: i64, ch: u8) -> i64 {
    if val < EXPONENT_LIMIT / 10 {
        10 * val + (ch - b'0') as i64
    } else {
        EXPONENT_LIMIT
    }
}

/// Check that `input` has `sym` at `i`, followed by optional whitespace.
fn scan_symbolic(
    input: &[u8],
    i: usize,
    sym: &[u8],
) -> Result<(), ParseErrorKind> {
    let rest = &input[i..];
    if rest.starts_with(sym)
        && skip_whitespace(input, i + sym.len()) == input.len()
    {
        return Ok(());
    }
    Err(ParseErrorKind::InvalidSymbol)
}

/// Returns the position after the point at `i`, unless a point was already
/// found.
fn check_multiple_points(pt: usize, i: usize) -> Result<usize, ParseErrorKind> {
    if pt != 0 {
        return Err(ParseErrorKind::MultiplePoints);
    }
    Ok(i)
}

/// Validate the whole input and extract the parts of the literal. No
/// arithmetic is done before the input is known to be valid.
fn scan(input: &[u8]) -> Result<Literal<'_>, ParseErrorKind> {
    let len = input.len();

    // Skip the leading whitespace.
    let mut i = skip_whitespace(input, 0);
    if i == len {
        return Err(ParseErrorKind::Empty);
    }

    // Scan the optional sign.
    let mut negative = false;
    if input[i] == b'-' || input[i] == b'+' {
        negative = input[i] == b'-';
        i += 1;
    }

    // Handle the symbolic values and the hex prefix.
    let mut is_dec = true;
    if i < len {
        match input[i] {
            b'I' => {
                scan_symbolic(input, i, INFINITY_REP)?;
                return Ok(Literal::Infinity(negative));
            }
            b'N' => {
                // The sign of NaN is ignored.
                scan_symbolic(input, i, NAN_REP)?;
                return Ok(Literal::NaN);
            }
            b'0' if i + 1 < len && input[i + 1] | 0x20 == b'x' => {
                is_dec = false;
                i += 2;
            }
            _ => {}
        }
    }

    // The index after the point, or zero if there is no point.
    let mut pt = 0;
    let start = i;

    // Skip the leading zeros, and maybe a point.
    while i < len && (input[i] == b'0' || input[i] == b'.') {
        i += 1;
        if input[i - 1] == b'.' {
            pt = check_multiple_points(pt, i)?;
        }
    }
    let lz = i;

    // Scan the rest of the significand, and find the index after the last
    // non-zero digit (or zero if there is none).
    let mut tnz = 0;
    while i < len && (is_digit(input[i], is_dec) || input[i] == b'.') {
        i += 1;
        if input[i - 1] == b'.' {
            pt = check_multiple_points(pt, i)?;
        } else if input[i - 1] != b'0' {
            tnz = i;
        }
    }
    if i - start <= (pt != 0) as usize {
        return Err(ParseErrorKind::MissingDigits);
    }
    let stop = i;

    // Scan the exponent. It is optional for decimal numbers and mandatory
    // for hex numbers.
    let mut ep: i64 = 0;
    let mut has_exp = false;
    if i < len {
        let ch = input[i].to_ascii_lowercase();
        if (ch == b'e' && is_dec) || (ch == b'p' && !is_dec) {
            i += 1;
            let mut explicit_sign = false;
            let mut negative_exp = false;
            if i < len && (input[i] == b'-' || input[i] == b'+') {
                explicit_sign = true;
                negative_exp = input[i] == b'-';
                i += 1;
            }
            while i < len && input[i].is_ascii_digit() {
                ep = append_dec_digit(ep, input[i]);
                i += 1;
            }
            // At least one digit after the letter and the sign.
            if !(i - stop >= 3 || (i - stop == 2 && !explicit_sign)) {
                return Err(ParseErrorKind::MalformedExponent);
            }
            if negative_exp {
                ep = -ep;
            }
            has_exp = true;
        }
    }
    if !is_dec && !has_exp {
        return Err(ParseErrorKind::MissingExponent);
    }

    // Skip the optional type suffix.
    if i < len && matches!(input[i].to_ascii_lowercase(), b'f' | b'd') {
        i += 1;
    }

    if skip_whitespace(input, i) != len {
        return Err(ParseErrorKind::TrailingCharacters);
    }

    // The input is valid.
    if tnz == 0 {
        return Ok(Literal::Zero(negative));
    }

    // Move the point to be right after the last non-zero digit, and count
    // the significant digits.
    let emult = if is_dec { 1 } else { 4 };
    let mut n = (tnz - lz) as i64;
    if pt == 0 {
        ep += emult * (stop - tnz) as i64;
    } else {
        ep += emult * (pt as i64 - tnz as i64);
        if pt > tnz {
            // The point was counted as a digit position.
            ep -= emult;
        } else if lz < pt {
            // The point is between the significant digits.
            n -= 1;
        }
    }

    let significand = &input[lz..tnz];
    if is_dec {
        Ok(Literal::Decimal {
            negative,
            significand,
            n,
            ep,
        })
    } else {
        Ok(Literal::Hex {
            negative,
            significand,
            n,
            ep,
        })
    }
}

/// Round the value (top + sticky) * 2^exp2 to the nearest value, ties to
/// even, and return its bit pattern. A set `sticky` stands for a non-zero
/// fraction below the last bit of `top`.
fn round_to_bits(
    sem: Semantics,
    top: u128,
    exp2: i32,
    sticky: bool,
) -> u64 {
    debug_assert!(top != 0);
    let p = sem.get_precision() as i32;
    let bl = bit_len(top) as i32;
    let mut q = (bl + exp2 - p).max(sem.q_min());
    let shift = q - exp2;

    let c = if shift <= 0 {
        // The value is exact.
        debug_assert!(!sticky);
        (top << -shift) as u64
    } else if shift >= 128 {
        // The value is below half of the smallest subnormal.
        debug_assert!(bl < 127);
        0
    } else {
        let mut c = (top >> shift) as u64;
        let rem = top & ((1 << shift) - 1);
        let half = 1 << (shift - 1);
        if rem > half || (rem == half && (sticky || c & 1 == 1)) {
            c += 1;
            if c == 1 << p {
                c >>= 1;
                q += 1;
            }
        }
        c
    };

    if q > sem.q_max() {
        return sem.infinity_bits();
    }
    if c == 0 {
        return 0;
    }
    sem.make_bits(c, q)
}

/// Returns f * g, where g = g1 * 2^63 + g0, divided by 2^64. The flag is set
/// if the division is inexact.
fn mul_g(f: u64, g1: u64, g0: u64) -> (u128, bool) {
    let p1 = f as u128 * g1 as u128;
    let p0 = f as u128 * g0 as u128;
    let low = ((p1 & 1) << 63) + p0;
    ((p1 >> 1) + (low >> 64), low as u64 != 0)
}

/// Returns the integer value of the decimal digits.
fn digits_to_u64(digits: &[u8]) -> u64 {
    debug_assert!(digits.len() <= BRACKET_DIGITS);
    digits
        .iter()
        .fold(0, |acc, d| 10 * acc + (d - b'0') as u64)
}

/// Returns the bits of the positive value 0.d1..dm * 10^e. The digits have
/// no leading or trailing zeros, and the exponent is between the zero and
/// infinity thresholds of the format.
fn decimal_to_bits<F: BinaryFloat>(e: i32, digits: &[u8]) -> u64 {
    let sem = F::SEM;
    let m = digits.len();
    // The value is d * 10^ep.
    let ep = e - m as i32;

    if m <= BRACKET_DIGITS {
        let d = digits_to_u64(digits);

        // The value is an integer that fits in 64 bits.
        if (0..20).contains(&ep) {
            if let Some(v) = d.checked_mul(POW10[ep as usize]) {
                return round_to_bits(sem, v as u128, 0, false);
            }
        }

        // Both d and the power of ten are exact, and a single operation is
        // correctly rounded.
        let max_d = 1u64 << sem.get_precision();
        let max_pow = F::MAX_EXACT_POW10 as i32;
        if d <= max_d {
            if ep < 0 && -ep <= max_pow {
                let pow = F::exact_pow10(-ep as u32);
                return F::from_exact_u64(d).div_rounded(pow).to_raw();
            }
            let (mut d, mut ep) = (d, ep);
            while ep > max_pow && d * 10 <= max_d {
                d *= 10;
                ep -= 1;
            }
            if (0..=max_pow).contains(&ep) {
                let pow = F::exact_pow10(ep as u32);
                return F::from_exact_u64(d).mul_rounded(pow).to_raw();
            }
        }
    }

    // Bracket the value with the first digits, and check if both ends round
    // to the same value.
    let mm = m.min(BRACKET_DIGITS);
    let f = digits_to_u64(&digits[..mm]);
    let f_hi = if m > mm { f + 1 } else { f };
    let e2 = e - mm as i32;
    let (g1, g0) = g(e2);
    let (g1_lo, g0_lo) = if g0 > 0 {
        (g1, g0 - 1)
    } else {
        (g1 - 1, (1 << 63) - 1)
    };
    let exp2 = flog2pow10(e2) - 61;
    let (lo, lo_sticky) = mul_g(f, g1_lo, g0_lo);
    let (hi, hi_sticky) = mul_g(f_hi, g1, g0);
    let bits_lo = round_to_bits(sem, lo, exp2, lo_sticky);
    let bits_hi = round_to_bits(sem, hi, exp2, hi_sticky);
    if bits_lo == bits_hi {
        return bits_lo;
    }
    debug_assert_eq!(bits_lo + 1, bits_hi);

    // The value is very close to the midpoint between two neighbors.
    // Compare it exactly with the midpoint (2c + 1) * 2^(q-1).
    let (c, q) = significand_and_exponent(bits_lo, sem);
    let cr = 2 * c + 1;
    let qr = q - 1;
    let ep = e - m as i32;
    let lhs = BigInt::value_of_mul_pow52(
        cr,
        (-ep).max(0) as u32,
        (qr - ep).max(0) as u32,
    );
    let mut rhs = BigInt::from_decimal(digits);
    rhs.inplace_mul_pow52(ep.max(0) as u32, (ep - qr).max(0) as u32);
    match lhs.cmp(&rhs) {
        Ordering::Greater => bits_lo,
        Ordering::Less => bits_lo + 1,
        Ordering::Equal => {
            if bits_lo & 1 == 0 {
                bits_lo
            } else {
                bits_lo + 1
            }
        }
    }
}

/// Returns the bits of the positive value 0.d1..dn * 10^e, where `digits`
/// yields the n significant digits, without leading or trailing zeros.
fn decimal_literal_to_bits<F: BinaryFloat, I: Iterator<Item = u8>>(
    digits: I,
    n: i64,
    ep: i64,
) -> u64 {
    let sem = F::SEM;
    let zero = sem.zero_threshold();
    let inf = sem.infinity_threshold();

    // Here 10^(e-1) <= x < 10^e.
    let e = (ep + n).clamp(zero as i64, inf as i64) as i32;
    if e == zero {
        return 0;
    }
    if e == inf {
        return sem.infinity_bits();
    }

    // Only a prefix of the digits matters for rounding: the integer part and
    // enough digits of the fraction to tell where the rounding boundaries
    // are. The rest is replaced by a non-zero sticky digit.
    let p = sem.get_precision() as i32;
    let ql = (flog2pow10(e - 1) - (p - 1)).max(sem.q_min());
    let np = (e + (2 - ql).max(1)) as i64;
    let mut prefix: Vec<u8> = digits.take(n.min(np) as usize).collect();
    if n >= np {
        prefix[(np - 1) as usize] = b'3';
    }
    decimal_to_bits::<F>(e, &prefix)
}

/// Returns the bits of the positive value f * 2^ep, where `digits` yields
/// the n significant hex digits of f.
fn hex_to_bits<I: Iterator<Item = u8>>(
    sem: Semantics,
    digits: I,
    n: i64,
    mut ep: i64,
) -> u64 {
    // The leading P+2 bits decide the rounding, and the rest is sticky.
    let le = n.min(sem.hex_count() as i64);
    let c = digits
        .take(le as usize)
        .fold(0u64, |acc, d| acc << 4 | digit_for(d));
    let sticky = n > le;
    if sticky {
        ep += 4 * (n - le);
    }

    // Here 2^(ep+bl-1) <= x < 2^(ep+bl).
    let bl = bit_len(c as u128) as i64;
    if ep < sem.q_min() as i64 - bl {
        return 0;
    }
    if ep > (sem.q_max() + sem.get_precision() as i32) as i64 - bl {
        return sem.infinity_bits();
    }
    round_to_bits(sem, c as u128, ep as i32, sticky)
}

/// Returns the bits with the sign bit set if `negative`.
fn with_sign(bits: u64, negative: bool, sem: Semantics) -> u64 {
    if negative {
        bits | sem.sign_bit()
    } else {
        bits
    }
}

/// Parse the literal `input` and return the nearest value of type F, with
/// ties rounded to even.
///
/// The grammar is: optional whitespace, an optional sign, then either
/// `Infinity`, `NaN`, a decimal number (digits with an optional point and an
/// optional exponent `e` or `E` with an optional sign) or a hexadecimal
/// number (`0x` or `0X`, hex digits with an optional point and a mandatory
/// binary exponent `p` or `P`), followed by an optional suffix `f`, `F`, `d`
/// or `D`, and optional whitespace.
pub fn parse<F: BinaryFloat>(input: &str) -> Result<F, ParseError> {
    let sem = F::SEM;
    let literal =
        scan(input.as_bytes()).map_err(|kind| ParseError::new(kind, input))?;
    let (negative, bits) = match literal {
        Literal::NaN => return Ok(F::from_raw(sem.nan_bits())),
        Literal::Zero(negative) => (negative, 0),
        Literal::Infinity(negative) => (negative, sem.infinity_bits()),
        Literal::Decimal {
            negative,
            significand,
            n,
            ep,
        } => {
            let digits = significand.iter().copied().filter(|d| *d != b'.');
            (negative, decimal_literal_to_bits::<F, _>(digits, n, ep))
        }
        Literal::Hex {
            negative,
            significand,
            n,
            ep,
        } => {
            let digits = significand.iter().copied().filter(|d| *d != b'.');
            (negative, hex_to_bits(sem, digits, n, ep))
        }
    };
    Ok(F::from_raw(with_sign(bits, negative, sem)))
}

/// Returns the nearest value to 0.d1..dn * 10^dec_exp, where `digits` are
/// the ASCII digits d1..dn. Leading and trailing zeros are allowed. Returns
/// None if one of the digits is not a decimal digit.
pub fn from_digits<F: BinaryFloat>(dec_exp: i32, digits: &[u8]) -> Option<F> {
    if !digits.iter().all(|d| d.is_ascii_digit()) {
        return None;
    }
    let first = digits.iter().position(|d| *d != b'0');
    let first = match first {
        Some(first) => first,
        None => return Some(F::from_raw(0)),
    };
    let last = digits.iter().rposition(|d| *d != b'0').unwrap_or(first);
    let significant = &digits[first..=last];
    let n = significant.len() as i64;
    // 0.d1..dn * 10^e = f * 10^(e - n), after moving the leading zeros.
    let ep = dec_exp as i64 - first as i64 - n;
    let digits = significant.iter().copied();
    let bits = decimal_literal_to_bits::<F, _>(digits, n, ep);
    Some(F::from_raw(bits))
}

#[cfg(test)]
fn parse64(s: &str) -> f64 {
    parse::<f64>(s).unwrap()
}

#[cfg(test)]
fn parse32(s: &str) -> f32 {
    parse::<f32>(s).unwrap()
}

#[test]
fn test_scan() {
    assert_eq!(scan(b"  -0.000  "), Ok(Literal::Zero(true)));
    assert_eq!(scan(b"0x0p5"), Ok(Literal::Zero(false)));
    assert_eq!(scan(b"-Infinity"), Ok(Literal::Infinity(true)));
    assert_eq!(scan(b"-NaN "), Ok(Literal::NaN));
    assert_eq!(
        scan(b"0012.5000e3"),
        Ok(Literal::Decimal {
            negative: false,
            significand: b"12.5",
            n: 3,
            ep: 2,
        })
    );
    assert_eq!(
        scan(b"+1200"),
        Ok(Literal::Decimal {
            negative: false,
            significand: b"12",
            n: 2,
            ep: 2,
        })
    );
    assert_eq!(
        scan(b"0.05"),
        Ok(Literal::Decimal {
            negative: false,
            significand: b"5",
            n: 1,
            ep: -2,
        })
    );
    assert_eq!(
        scan(b"120."),
        Ok(Literal::Decimal {
            negative: false,
            significand: b"12",
            n: 2,
            ep: 1,
        })
    );
    assert_eq!(
        scan(b"-0x1.8p1"),
        Ok(Literal::Hex {
            negative: true,
            significand: b"1.8",
            n: 2,
            ep: -3,
        })
    );
}

#[test]
fn test_errors() {
    fn kind(s: &str) -> ParseErrorKind {
        parse::<f64>(s).unwrap_err().kind()
    }
    use ParseErrorKind::*;
    assert_eq!(kind(""), Empty);
    assert_eq!(kind("  \t\n"), Empty);
    assert_eq!(kind("1.2.3"), MultiplePoints);
    assert_eq!(kind("..1"), MultiplePoints);
    assert_eq!(kind("+"), MissingDigits);
    assert_eq!(kind("."), MissingDigits);
    assert_eq!(kind("-.e5"), MissingDigits);
    assert_eq!(kind("0x"), MissingDigits);
    assert_eq!(kind("0x.p1"), MissingDigits);
    assert_eq!(kind("e5"), MissingDigits);
    assert_eq!(kind("1e"), MalformedExponent);
    assert_eq!(kind("1e+"), MalformedExponent);
    assert_eq!(kind("1E-"), MalformedExponent);
    assert_eq!(kind("0x1.8"), MissingExponent);
    assert_eq!(kind("0x1e5"), MissingExponent);
    assert_eq!(kind("1.5x"), TrailingCharacters);
    assert_eq!(kind("1.5 5"), TrailingCharacters);
    assert_eq!(kind("1.5ff"), TrailingCharacters);
    assert_eq!(kind("1e5e5"), TrailingCharacters);
    assert_eq!(kind("0x1p1.5"), TrailingCharacters);
    assert_eq!(kind("Inf"), InvalidSymbol);
    assert_eq!(kind("infinity"), MissingDigits);
    assert_eq!(kind("Infinity1"), InvalidSymbol);
    assert_eq!(kind("-Nan"), InvalidSymbol);
    assert_eq!(kind("NaN NaN"), InvalidSymbol);

    let err = parse::<f32>("1..").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Multiple points: for input string: \"1..\""
    );
    assert_eq!(format!("{:?}", err), err.to_string());
}

#[test]
fn test_error_elision() {
    let long = "1".repeat(600) + "x" + &"2".repeat(600);
    let err = parse::<f64>(&long).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::TrailingCharacters);
    assert_eq!(err.input().chars().count(), MAX_OUT);
    assert!(err.input().starts_with(&"1".repeat(L_HALF)));
    let tail = String::from(OMITTED) + &"2".repeat(R_HALF);
    assert!(err.input().ends_with(&tail));
}

#[test]
fn test_parse_simple() {
    assert_eq!(parse64("1.0"), 1.0);
    assert_eq!(parse64("0.1"), 0.1);
    assert_eq!(parse64("  100  "), 100.0);
    assert_eq!(parse64("+1e21"), 1e21);
    assert_eq!(parse64("-2.5E-3"), -0.0025);
    assert_eq!(parse64(".5"), 0.5);
    assert_eq!(parse64("5."), 5.0);
    assert_eq!(parse64("1.5f"), 1.5);
    assert_eq!(parse64("1.5D\n"), 1.5);
    assert_eq!(parse64("000000000000000000000000000000000123"), 123.0);
    assert_eq!(parse64("123000000000000000000000000000000000"), 1.23e35);
    assert_eq!(parse64("1e22"), 1e22);
    assert_eq!(parse64("1e23"), 1e23);
    assert_eq!(parse64("9007199254740993"), 9007199254740992.0);
    assert_eq!(parse64("3.141592653589793"), core::f64::consts::PI);
    assert_eq!(parse64("2.2250738585072014E-308"), f64::MIN_POSITIVE);
    assert_eq!(parse64("4.9E-324"), 5e-324);
    assert_eq!(parse64("4.9E-324").to_bits(), 1);
    assert_eq!(parse64("1.7976931348623157e308"), f64::MAX);
    assert_eq!(parse64("1e1000000000000000"), f64::INFINITY);
    assert_eq!(parse64("-1e-1000000000000000").to_bits(), (-0.0f64).to_bits());
    assert_eq!(parse64("2.4703282292062327e-324").to_bits(), 0);
    assert_eq!(parse64("2.4703282292062328e-324").to_bits(), 1);
    assert_eq!(parse64("1e-400"), 0.0);
    assert_eq!(parse64("1e400"), f64::INFINITY);

    assert_eq!(parse32("1.0"), 1.0);
    assert_eq!(parse32("0.1"), 0.1);
    assert_eq!(parse32("0.33333334"), 1.0 / 3.0);
    assert_eq!(parse32("3.4028235E38"), f32::MAX);
    assert_eq!(parse32("3.4028235677973366E38"), f32::MAX);
    assert_eq!(parse32("3.4028236E38"), f32::INFINITY);
    assert_eq!(parse32("1.4E-45").to_bits(), 1);
    assert_eq!(parse32("1.17549435E-38"), f32::MIN_POSITIVE);
    assert_eq!(parse32("16777217"), 16777216.0);
}

#[test]
fn test_parse_specials() {
    assert!(parse64("NaN").is_nan());
    assert!(parse64("-NaN").is_nan());
    assert!(parse64("+NaN").is_sign_positive());
    assert!(parse32("NaN").is_nan());
    assert_eq!(parse64("Infinity"), f64::INFINITY);
    assert_eq!(parse64("+Infinity"), f64::INFINITY);
    assert_eq!(parse64(" -Infinity "), f64::NEG_INFINITY);
    assert_eq!(parse32("-Infinity"), f32::NEG_INFINITY);
    assert_eq!(parse64("0").to_bits(), 0);
    assert_eq!(parse64("-0.0").to_bits(), (-0.0f64).to_bits());
    assert_eq!(parse32("-0e99999").to_bits(), (-0.0f32).to_bits());
}

#[test]
fn test_parse_hex() {
    assert_eq!(parse64("0x1p0"), 1.0);
    assert_eq!(parse64("0X1.8P1"), 3.0);
    assert_eq!(parse64("-0x.8p1"), -1.0);
    assert_eq!(parse64("0x1.fffffffffffffp1023"), f64::MAX);
    assert_eq!(parse64("0x1.fffffffffffff8p1023"), f64::INFINITY);
    assert_eq!(parse64("0x1.fffffffffffff7ffp1023"), f64::MAX);
    assert_eq!(parse64("0x1p-1022"), f64::MIN_POSITIVE);
    assert_eq!(parse64("0x0.0000000000001p-1022").to_bits(), 1);
    assert_eq!(parse64("0x1p-1074").to_bits(), 1);
    // Exactly half of the smallest subnormal rounds to even (zero), and
    // anything above it rounds up.
    assert_eq!(parse64("0x1p-1075").to_bits(), 0);
    assert_eq!(parse64("0x1.0000000000000000001p-1075").to_bits(), 1);
    assert_eq!(parse64("0x1.8p-1074").to_bits(), 2);
    // Ties to even in the middle of the range.
    assert_eq!(parse64("0x1.00000000000008p0"), 1.0);
    assert_eq!(parse64("0x1.00000000000018p0").to_bits(), 1.0f64.to_bits() + 2);
    assert_eq!(
        parse64("0x1.000000000000080000000001p0").to_bits(),
        1.0f64.to_bits() + 1
    );
    assert_eq!(parse64("0xABCp-4f"), 171.75);
    assert_eq!(parse64("0x1p99999999999"), f64::INFINITY);
    assert_eq!(parse64("0x1p-99999999999"), 0.0);

    assert_eq!(parse32("0x1.fffffep127"), f32::MAX);
    assert_eq!(parse32("0x1.ffffffp127"), f32::INFINITY);
    assert_eq!(parse32("0x1p-149").to_bits(), 1);
    assert_eq!(parse32("0x1.000001p0"), 1.0);
    assert_eq!(parse32("0x1.000003p0").to_bits(), 1.0f32.to_bits() + 2);
}

#[test]
fn test_from_digits() {
    assert_eq!(from_digits::<f64>(1, b"15"), Some(1.5));
    assert_eq!(from_digits::<f64>(0, b"0001"), Some(0.0001));
    assert_eq!(from_digits::<f64>(3, b"1230000"), Some(123.0));
    assert_eq!(from_digits::<f64>(-323, b"49"), Some(5e-324));
    assert_eq!(from_digits::<f64>(-1000, b"1"), Some(0.0));
    assert_eq!(from_digits::<f64>(400, b"1"), Some(f64::INFINITY));
    assert_eq!(from_digits::<f64>(7, b"000"), Some(0.0));
    assert_eq!(from_digits::<f32>(0, b"33333334"), Some(1.0 / 3.0));
    assert_eq!(from_digits::<f64>(1, b"1x"), None);
}

#[test]
fn test_round_to_bits() {
    use crate::float::FP64;
    // Exact values.
    assert_eq!(round_to_bits(FP64, 1, 0, false), 1.0f64.to_bits());
    assert_eq!(round_to_bits(FP64, 3, -1, false), 1.5f64.to_bits());
    assert_eq!(round_to_bits(FP64, 1, -1074, false), 1);
    // Halfway cases.
    let c = (1u128 << 53) + 1;
    assert_eq!(round_to_bits(FP64, c, 0, false), 9007199254740992f64.to_bits());
    assert_eq!(round_to_bits(FP64, c, 0, true), 9007199254740994f64.to_bits());
    let next = 9007199254740996f64.to_bits();
    assert_eq!(round_to_bits(FP64, c + 2, 0, false), next);
    // Far below the smallest subnormal.
    assert_eq!(round_to_bits(FP64, 1 << 100, -1300, true), 0);
    // Carry into the next binade and into infinity.
    let all = (1u128 << 54) - 1;
    assert_eq!(
        round_to_bits(FP64, all, 0, false),
        18014398509481984f64.to_bits()
    );
    assert_eq!(round_to_bits(FP64, all, 971, false), f64::INFINITY.to_bits());
}

#[test]
fn test_against_std() {
    use crate::utils::Lfsr;
    let mut lfsr = Lfsr::new();

    // Compare random literals with the standard library, which rounds
    // correctly.
    for _ in 0..20000 {
        let len = 1 + lfsr.below(25) as usize;
        let mut s: String = (0..len)
            .map(|_| char::from(b'0' + lfsr.below(10) as u8))
            .collect();
        if lfsr.below(2) == 0 {
            s.insert(lfsr.below(len as u64) as usize, '.');
        }
        let exp = lfsr.below(680) as i64 - 345;
        let s = format!("{}e{}", s, exp);
        let expected: f64 = s.parse().unwrap();
        assert_eq!(parse64(&s).to_bits(), expected.to_bits(), "{}", s);

        let exp = lfsr.below(100) as i64 - 60;
        let s = format!("{}e{}", &s[..s.find('e').unwrap()], exp);
        let expected: f32 = s.parse().unwrap();
        assert_eq!(parse32(&s).to_bits(), expected.to_bits(), "{}", s);
    }
}

#[test]
fn test_monotonic() {
    // Consecutive decimals around a few interesting values parse to
    // non-decreasing values.
    let bases = [
        (9007199254740990u64, 0),
        (2225073858507200, -323),
        (4940656458412, -336),
        (17976931348623150, 292),
        (1000000000000000, -16),
    ];
    for (base, exp) in bases {
        let mut prev = 0.0f64;
        for k in 0..3000 {
            let v = parse64(&format!("{}e{}", base + k, exp));
            assert!(v >= prev, "{} {}", base + k, exp);
            prev = v;
        }
    }
    let mut prev = 0.0f32;
    for k in 0..3000u64 {
        let v = parse32(&format!("{}e-45", 1000 + k));
        assert!(v >= prev);
        prev = v;
    }
}

#[test]
fn test_round_trip() {
    use crate::string::to_string;
    use crate::utils::Lfsr;

    // Returns the number of significant digits that the standard library
    // prints for the shortest representation.
    fn std_len(text: String) -> usize {
        let mantissa = &text[..text.find('e').unwrap()];
        mantissa.bytes().filter(|b| b.is_ascii_digit()).count()
    }
    fn our_len(text: &str) -> usize {
        let mantissa = text.split('E').next().unwrap();
        let digits = mantissa.trim_start_matches(['-', '0', '.']);
        let digits = digits.replace('.', "");
        digits.trim_end_matches('0').len()
    }

    let mut lfsr = Lfsr::new();
    for _ in 0..20000 {
        let v = f64::from_bits(lfsr.get64());
        if !v.is_finite() {
            continue;
        }
        let text = to_string(v);
        assert_eq!(parse64(&text).to_bits(), v.to_bits(), "{}", text);
        if v != 0.0 {
            let len = std_len(format!("{:e}", v)).max(2);
            assert!(our_len(&text) <= len, "{}", text);
        }

        let v = f32::from_bits(lfsr.get());
        if !v.is_finite() {
            continue;
        }
        let text = to_string(v);
        assert_eq!(parse32(&text).to_bits(), v.to_bits(), "{}", text);
        if v != 0.0 {
            let len = std_len(format!("{:e}", v)).max(2);
            assert!(our_len(&text) <= len, "{}", text);
        }
    }
}
