//! Conversions between binary floating point values (`f32` and `f64`) and
//! decimal text.
//!
//! Values are printed with the shortest digits that parse back to the same
//! bits, and text is parsed to the nearest value, with ties rounded to even.
//!
//! ```
//!    use fpdecimal::{parse, to_string};
//!
//!    assert_eq!(to_string(0.1 + 0.2), "0.30000000000000004");
//!    assert_eq!(to_string(1e-7f32), "1.0E-7");
//!    assert_eq!(to_string(5e-324), "4.9E-324");
//!
//!    let x: f64 = parse("2.2250738585072014E-308").unwrap();
//!    assert_eq!(x, f64::MIN_POSITIVE);
//!    let y: f32 = parse(" 0x1.8p1f ").unwrap();
//!    assert_eq!(y, 3.0);
//!    assert!(parse::<f64>("1.2.3").is_err());
//! ```
//!
//! Fixed precision rendering rounds the shortest digits half-up:
//!
//! ```
//!    use fpdecimal::{formatted, FormatMode};
//!
//!    let res = formatted(1234.5678, 2, FormatMode::Scientific).unwrap();
//!    assert_eq!(res.get_mantissa(), "1.23");
//!    assert_eq!(res.get_exponent(), Some("+03"));
//!    let res = formatted(0.125, 2, FormatMode::Plain).unwrap();
//!    assert_eq!(res.to_string(), "0.13");
//! ```

mod bigint;
mod cast;
mod encode;
mod exact;
mod float;
mod parse;
mod render;
mod string;
mod table;
mod utils;

#[cfg(feature = "python")]
mod py;

pub use self::bigint::{pow5, BigInt};
pub use self::cast::BinaryFloat;
pub use self::encode::{encode, Decimal, DecimalDigits};
pub use self::exact::{
    compare_shortest, digits_exact, digits_rounded_up, expand, expand_float,
    Expansion,
};
pub use self::float::{
    decompose, FloatingValue, Semantics, Unpacked, FP32, FP64,
};
pub use self::parse::{from_digits, parse, ParseError, ParseErrorKind};
pub use self::render::{formatted, FormatMode, Formatted};
pub use self::string::{to_string, write_to};
pub use self::table::{flog10_three_quarters_pow2, flog10pow2, flog2pow10};
