//! Value normalization: raw string series to typed numeric series.
//!
//! The rig emits several value grammars under the same `key: value` line
//! format. The shape of a key's values is inferred from the first value only
//! and then applied to the whole series:
//! - Compound sub-fields: `latency=12.5 ms, jitter=0.3 ms`
//! - Unit-tagged numbers: `12.5 ms`, `440 Hz`
//! - Plain scalars: integers, floats, or free text
//!
//! Malformed later values are dropped with a diagnostic rather than aborting
//! the key; strict mode turns those drops into errors.

use std::fmt;
use strum::EnumString;

use super::types::{FileScan, NormalizedSeries, SeriesValues};
use super::ParseError;

/// Unit token attached to a tagged-numeric value.
///
/// The rig usually logs durations and rates; anything else is carried through
/// verbatim so no information is lost in the augmented key.
#[derive(Clone, Debug, EnumString, PartialEq, Eq)]
pub enum Unit {
    #[strum(serialize = "ms")]
    Milliseconds,
    #[strum(serialize = "us")]
    Microseconds,
    #[strum(serialize = "ns")]
    Nanoseconds,
    #[strum(serialize = "Hz")]
    Hertz,
    #[strum(default)]
    Other(String),
}

impl Unit {
    /// Parse a free-form unit token
    pub fn from_token(token: &str) -> Unit {
        token
            .parse()
            .unwrap_or_else(|_| Unit::Other(token.to_string()))
    }

    /// The token as it appeared in the log
    pub fn label(&self) -> &str {
        match self {
            Unit::Milliseconds => "ms",
            Unit::Microseconds => "us",
            Unit::Nanoseconds => "ns",
            Unit::Hertz => "Hz",
            Unit::Other(token) => token,
        }
    }

    /// Value-axis label for charts of series carrying this unit.
    ///
    /// Units ending in `s` are durations, `Hz` is a rate; anything else is
    /// shown as the bare token.
    pub fn axis_label(&self) -> String {
        match self {
            Unit::Hertz => "Frequency (Hz)".to_string(),
            unit => {
                let label = unit.label();
                if label.ends_with('s') {
                    format!("Time ({})", label)
                } else {
                    label.to_string()
                }
            }
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extract the unit from an augmented key such as `"latency (ms)"`.
///
/// Returns `None` for keys without a trailing `(unit)` suffix.
pub fn unit_suffix(key: &str) -> Option<Unit> {
    let inner = key.trim_end().strip_suffix(')')?;
    let start = inner.rfind('(')?;
    let token = &inner[start + 1..];
    if token.is_empty() {
        return None;
    }
    Some(Unit::from_token(token))
}

/// Numeric mode for single-token scalar series
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarMode {
    Int,
    Float,
    Text,
}

/// Value shape inferred from the first raw value of a series.
///
/// Downstream code pattern-matches on this instead of re-inspecting strings
/// or relying on key naming conventions.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueShape {
    /// Single token per value, parsed in one fixed mode
    Scalar(ScalarMode),
    /// `<number> <unit>` per value
    TaggedNumeric(Unit),
    /// Comma-separated `subkey=subvalue` pairs per value
    Compound,
    /// None of the recognized grammars
    Unrecognized,
}

impl ValueShape {
    /// Infer the shape of a whole series from its first value
    pub fn infer(first: &str) -> ValueShape {
        if first.contains('=') {
            return ValueShape::Compound;
        }

        let tokens: Vec<&str> = first.split_whitespace().collect();
        match tokens.as_slice() {
            [token] => ValueShape::Scalar(scalar_mode(token)),
            [number, unit] if parse_float(number).is_some() => {
                ValueShape::TaggedNumeric(Unit::from_token(unit))
            }
            [] => ValueShape::Scalar(ScalarMode::Text),
            _ => ValueShape::Unrecognized,
        }
    }
}

/// Pick the numeric mode for a single token: no `.` means integer, a `.`
/// means float, and a failed parse falls back to text for the whole series.
fn scalar_mode(token: &str) -> ScalarMode {
    if token.contains('.') {
        if parse_float(token).is_some() {
            ScalarMode::Float
        } else {
            ScalarMode::Text
        }
    } else if token.parse::<i64>().is_ok() {
        ScalarMode::Int
    } else {
        ScalarMode::Text
    }
}

/// Parse a finite float. NaN and infinities would poison percentile
/// ordering, so they count as parse failures.
fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize one key's raw values into zero or more augmented-key series.
///
/// In lenient mode malformed values are dropped with a diagnostic and this
/// never fails; with `strict` the same conditions return an error.
pub fn normalize(
    key: &str,
    values: &[String],
    strict: bool,
) -> Result<Vec<(String, SeriesValues)>, ParseError> {
    let Some(first) = values.first() else {
        return Ok(vec![]);
    };

    match ValueShape::infer(first) {
        ValueShape::Compound => normalize_compound(key, values, strict),
        shape => normalize_flat(key, values, shape, strict),
    }
}

/// Run every key of a file scan through [`normalize`] in file order.
pub fn normalize_scan(scan: &FileScan, strict: bool) -> Result<NormalizedSeries, ParseError> {
    let mut out = NormalizedSeries::default();
    for (key, values) in scan.series.iter() {
        for (augmented, series) in normalize(key, values, strict)? {
            out.insert(augmented, series);
        }
    }
    Ok(out)
}

/// Split compound values into per-subkey series and normalize each one.
///
/// Sub-series recurse into the flat grammars only; nested `=` inside a
/// subvalue is not split again.
fn normalize_compound(
    key: &str,
    values: &[String],
    strict: bool,
) -> Result<Vec<(String, SeriesValues)>, ParseError> {
    let mut subseries: Vec<(String, Vec<String>)> = vec![];

    for value in values {
        for chunk in value.split(',') {
            if chunk.trim().is_empty() {
                continue;
            }
            let Some((subkey, subvalue)) = chunk.split_once('=') else {
                if strict {
                    return Err(ParseError::MalformedCompoundChunk {
                        key: key.to_string(),
                        chunk: chunk.trim().to_string(),
                    });
                }
                tracing::debug!(key, chunk = chunk.trim(), "compound chunk without '=' dropped");
                continue;
            };

            let subkey = subkey.trim();
            match subseries.iter_mut().find(|(k, _)| k == subkey) {
                Some((_, accumulated)) => accumulated.push(subvalue.to_string()),
                None => subseries.push((subkey.to_string(), vec![subvalue.to_string()])),
            }
        }
    }

    let mut out = vec![];
    for (subkey, accumulated) in subseries {
        let augmented = format!("{}, {}", key, subkey);
        let Some(first) = accumulated.first() else {
            continue;
        };
        let shape = match ValueShape::infer(first) {
            // A stray '=' inside a subvalue does not start another level
            ValueShape::Compound => ValueShape::Unrecognized,
            shape => shape,
        };
        out.extend(normalize_flat(&augmented, &accumulated, shape, strict)?);
    }
    Ok(out)
}

/// Normalize a series whose shape has already been inferred.
fn normalize_flat(
    key: &str,
    values: &[String],
    shape: ValueShape,
    strict: bool,
) -> Result<Vec<(String, SeriesValues)>, ParseError> {
    match shape {
        ValueShape::Scalar(ScalarMode::Text) => {
            // Free text passes through unchanged for the aggregator to skip
            Ok(vec![(
                key.to_string(),
                SeriesValues::Text(values.to_vec()),
            )])
        }
        ValueShape::Scalar(mode) => {
            let expected = match mode {
                ScalarMode::Int => "integer",
                _ => "float",
            };
            let mut numbers = Vec::with_capacity(values.len());
            for value in values {
                let parsed = match mode {
                    ScalarMode::Int => value.trim().parse::<i64>().ok().map(|v| v as f64),
                    _ => parse_float(value.trim()),
                };
                match parsed {
                    Some(number) => numbers.push(number),
                    None => drop_value(key, value, expected, strict)?,
                }
            }
            Ok(vec![(key.to_string(), SeriesValues::Numbers(numbers))])
        }
        ValueShape::TaggedNumeric(unit) => {
            let augmented = format!("{} ({})", key, unit.label());
            let mut numbers = Vec::with_capacity(values.len());
            for value in values {
                let parsed = value.split_whitespace().next().and_then(parse_float);
                match parsed {
                    Some(number) => numbers.push(number),
                    None => drop_value(&augmented, value, "number with unit", strict)?,
                }
            }
            Ok(vec![(augmented, SeriesValues::Numbers(numbers))])
        }
        ValueShape::Compound => normalize_compound(key, values, strict),
        ValueShape::Unrecognized => {
            if strict {
                return Err(ParseError::UnrecognizedKeyShape {
                    key: key.to_string(),
                    first: values.first().cloned().unwrap_or_default(),
                });
            }
            tracing::warn!(
                key,
                first = values.first().map(String::as_str).unwrap_or(""),
                "unrecognized value shape, key excluded from normalized series"
            );
            Ok(vec![])
        }
    }
}

/// Drop one malformed value, or fail the whole operation in strict mode
fn drop_value(key: &str, value: &str, expected: &'static str, strict: bool) -> Result<(), ParseError> {
    if strict {
        return Err(ParseError::UnparseableValue {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        });
    }
    tracing::debug!(key, value, expected, "unparseable value dropped");
    Ok(())
}
