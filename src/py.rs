use crate::{expand_float, formatted, parse, to_string, FormatMode};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Returns the shortest text that parses back to the binary64 value.
///
/// Args:
///     x: The value to print
#[pyfunction(name = "to_string")]
fn py_to_string(x: f64) -> String {
    to_string(x)
}

/// Returns the shortest text that parses back to the binary32 value.
///
/// Args:
///     x: The value to print, after rounding it to binary32
#[pyfunction]
fn to_string_f32(x: f32) -> String {
    to_string(x)
}

/// Parse a decimal or hexadecimal literal to the nearest binary64 value.
///
/// Args:
///     s: The literal, e.g. "1.5e-3", "-Infinity" or "0x1.8p1"
///
/// Raises:
///     ValueError: If the literal is malformed
#[pyfunction(name = "parse")]
fn py_parse(s: &str) -> PyResult<f64> {
    parse::<f64>(s).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Parse a decimal or hexadecimal literal to the nearest binary32 value.
///
/// Raises:
///     ValueError: If the literal is malformed
#[pyfunction]
fn parse_f32(s: &str) -> PyResult<f32> {
    parse::<f32>(s).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Render the magnitude of the value with a fixed precision.
///
/// Args:
///     x: The value to render
///     precision: The number of digits
///     mode: "e" (scientific), "f" (plain) or "g" (general)
///
/// Returns:
///     The pair (mantissa, exponent), where the exponent is None in the
///     plain style, or None if the value is not finite.
#[pyfunction(name = "formatted")]
fn py_formatted(
    x: f64,
    precision: u32,
    mode: &str,
) -> PyResult<Option<(String, Option<String>)>> {
    let mode = FormatMode::from_string(mode)
        .ok_or_else(|| PyValueError::new_err("Invalid format mode"))?;
    Ok(formatted(x, precision, mode).map(|res| {
        (
            res.get_mantissa().to_string(),
            res.get_exponent().map(String::from),
        )
    }))
}

/// Returns all the digits of the binary64 value, or None if the value is
/// not finite.
#[pyfunction]
fn expand(x: f64) -> Option<String> {
    expand_float(x).map(|e| e.to_string())
}

#[pymodule]
fn _fpdecimal(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_to_string, m)?)?;
    m.add_function(wrap_pyfunction!(to_string_f32, m)?)?;
    m.add_function(wrap_pyfunction!(py_parse, m)?)?;
    m.add_function(wrap_pyfunction!(parse_f32, m)?)?;
    m.add_function(wrap_pyfunction!(py_formatted, m)?)?;
    m.add_function(wrap_pyfunction!(expand, m)?)?;
    Ok(())
}
