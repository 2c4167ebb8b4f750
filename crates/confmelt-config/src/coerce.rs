//! Coercion of user-entered text into a declared scalar type.

use crate::error::ValueCoercionError;
use crate::types::{Scalar, ScalarType};

impl Scalar {
    /// Parse `input` as a value of type `declared`.
    ///
    /// - `String` keeps the input verbatim.
    /// - `Integer` / `Float` accept surrounding whitespace.
    /// - `Boolean` accepts `true` / `false` in any case.
    /// - `Null` ignores the input.
    pub fn coerce(input: &str, declared: ScalarType) -> Result<Scalar, ValueCoercionError> {
        let rejected = || ValueCoercionError {
            input: input.to_string(),
            expected: declared,
        };

        match declared {
            ScalarType::String => Ok(Scalar::String(input.to_string())),
            ScalarType::Integer => input
                .trim()
                .parse::<i64>()
                .map(Scalar::Integer)
                .map_err(|_| rejected()),
            ScalarType::Float => input
                .trim()
                .parse::<f64>()
                .map(Scalar::Float)
                .map_err(|_| rejected()),
            ScalarType::Boolean => parse_bool(input.trim())
                .map(Scalar::Boolean)
                .ok_or_else(rejected),
            ScalarType::Null => Ok(Scalar::Null),
        }
    }
}

fn parse_bool(input: &str) -> Option<bool> {
    if input.eq_ignore_ascii_case("true") {
        Some(true)
    } else if input.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
