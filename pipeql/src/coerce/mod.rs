//! Turns raw query tokens into typed BSON values.
//!
//! All literal handling lives here so that every stage kind agrees on what
//! `true`, `'007'`, `$price` and `12` mean.

use bson::Bson;


/// An untyped value as it appears in a query string, or as an operator
/// reshaped it (e.g. `in` turns one token into a list of tokens).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Token(String),
    List(Vec<RawValue>),
}

impl From<&str> for RawValue {
    fn from(token: &str) -> Self {
        RawValue::Token(token.to_string())
    }
}

impl From<String> for RawValue {
    fn from(token: String) -> Self {
        RawValue::Token(token)
    }
}

/// Coerces a raw value. Lists are coerced element by element.
pub fn coerce(raw: &RawValue) -> Bson {
    match raw {
        RawValue::Token(token) => coerce_token(token),
        RawValue::List(items) => Bson::Array(items.iter().map(coerce).collect()),
    }
}

/// Coerces a single token. Rules apply in order:
///
/// 1. `true` / `false` become booleans
/// 2. the empty string stays empty
/// 3. `$`-prefixed tokens are field references and pass through untouched
/// 4. `'quoted'` tokens lose their quotes and are never numeric
/// 5. tokens that round-trip through a number become that number
/// 6. everything else is a string
pub fn coerce_token(token: &str) -> Bson {
    match token {
        "true" => return Bson::Boolean(true),
        "false" => return Bson::Boolean(false),
        "" => return Bson::String(String::new()),
        _ => {}
    }
    if is_field_reference(token) {
        return Bson::String(token.to_string());
    }
    if let Some(literal) = quoted_literal(token) {
        return Bson::String(literal.to_string());
    }
    parse_number(token).unwrap_or_else(|| Bson::String(token.to_string()))
}

pub(crate) fn is_field_reference(token: &str) -> bool {
    token.starts_with('$')
}

/// Returns the contents of a single-quoted token with at least one character
/// between the quotes.
pub(crate) fn quoted_literal(token: &str) -> Option<&str> {
    if token.len() > 2 && token.starts_with('\'') && token.ends_with('\'') {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

/// Parses a token as a number only if rendering the number reproduces the
/// token, so `007`, `+1`, `1e3` and overflowing digit strings stay strings.
/// Trailing zeros of a fraction carry no value and are ignored: `1.0` and
/// `10.50` are doubles. Integers use the narrowest of Int32/Int64.
pub(crate) fn parse_number(token: &str) -> Option<Bson> {
    if let Ok(int) = token.parse::<i64>() {
        if int.to_string() != token {
            return None;
        }
        return Some(match i32::try_from(int) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(int),
        });
    }
    let float = parse_finite_float(token)?;
    let canonical = match token.split_once('.') {
        Some((_, fraction)) if !fraction.is_empty() => {
            token.trim_end_matches('0').trim_end_matches('.')
        }
        Some(_) => return None,
        None => token,
    };
    (float.to_string() == canonical).then_some(Bson::Double(float))
}

/// Any token Rust reads as a finite `f64`, including forms `parse_number`
/// keeps as strings.
pub(crate) fn parse_finite_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|float| float.is_finite())
}
