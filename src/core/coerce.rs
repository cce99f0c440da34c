//! Coercion matrix: requested type ← stored value
//!
//! Setiap tipe Rust yang bisa diminta lewat `get::<T>` mengimplementasi
//! `FromValue`. Satu match arm per pasangan (requested, stored); pasangan
//! yang tidak tercantum selalu `FormatMismatch`.
//!
//! | requested       | stored yang diterima                    |
//! |-----------------|-----------------------------------------|
//! | bool            | boolean, string                         |
//! | i8/i16/i32/i64  | integer yang sama atau lebih sempit, string |
//! | f32             | float, string                           |
//! | f64             | float, double, string                   |
//! | char            | char                                    |
//! | String          | semua primitive                         |
//! | Vec<u8>         | bytes                                   |
//! | Value           | apa saja                                |
//!
//! Coercion tidak pernah mengubah nilai yang tersimpan.

use std::str::FromStr;

use super::value::{Value, ValueKind};
use crate::error::CoercionError;

/// Tipe yang bisa dibaca dari field store.
pub trait FromValue: Sized {
    const KIND: ValueKind;

    /// Nilai saat field tidak ada.
    ///
    /// Primitive mengembalikan zero value (`false`, `0`, `'\0'`), sedangkan
    /// string, bytes, dan object mengembalikan `None`. Asimetri ini bagian
    /// dari kontrak map message ala JMS.
    fn missing() -> Self;

    fn from_value(value: &Value) -> Result<Self, CoercionError>;
}

#[inline]
fn parse_text<T: FromStr>(requested: ValueKind, text: &str) -> Result<T, CoercionError> {
    text.parse::<T>()
        .map_err(|_| CoercionError::unparsable(requested, text))
}

#[inline(always)]
fn mismatch<T>(requested: ValueKind, found: &Value) -> Result<T, CoercionError> {
    Err(CoercionError::new(requested, found.kind()))
}

impl FromValue for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn missing() -> Self {
        false
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Boolean(v) => Ok(*v),
            // Teks selain "true" (case-insensitive) dibaca sebagai false
            Value::String(s) => Ok(s.eq_ignore_ascii_case("true")),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl FromValue for i8 {
    const KIND: ValueKind = ValueKind::Byte;

    fn missing() -> Self {
        0
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Byte(v) => Ok(*v),
            Value::String(s) => parse_text(Self::KIND, s),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl FromValue for i16 {
    const KIND: ValueKind = ValueKind::Short;

    fn missing() -> Self {
        0
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Byte(v) => Ok(i16::from(*v)),
            Value::Short(v) => Ok(*v),
            Value::String(s) => parse_text(Self::KIND, s),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl FromValue for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn missing() -> Self {
        0
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Byte(v) => Ok(i32::from(*v)),
            Value::Short(v) => Ok(i32::from(*v)),
            Value::Int(v) => Ok(*v),
            Value::String(s) => parse_text(Self::KIND, s),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl FromValue for i64 {
    const KIND: ValueKind = ValueKind::Long;

    fn missing() -> Self {
        0
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Byte(v) => Ok(i64::from(*v)),
            Value::Short(v) => Ok(i64::from(*v)),
            Value::Int(v) => Ok(i64::from(*v)),
            Value::Long(v) => Ok(*v),
            Value::String(s) => parse_text(Self::KIND, s),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl FromValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn missing() -> Self {
        0.0
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Float(v) => Ok(*v),
            Value::String(s) => parse_text(Self::KIND, s),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl FromValue for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn missing() -> Self {
        0.0
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Float(v) => Ok(f64::from(*v)),
            Value::Double(v) => Ok(*v),
            Value::String(s) => parse_text(Self::KIND, s),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl FromValue for char {
    const KIND: ValueKind = ValueKind::Char;

    fn missing() -> Self {
        '\0'
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Char(v) => Ok(*v),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl FromValue for Option<String> {
    const KIND: ValueKind = ValueKind::String;

    fn missing() -> Self {
        None
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value.to_text() {
            Some(text) => Ok(Some(text)),
            None => mismatch(Self::KIND, value),
        }
    }
}

impl FromValue for Option<Vec<u8>> {
    const KIND: ValueKind = ValueKind::Bytes;

    fn missing() -> Self {
        None
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Bytes(v) => Ok(Some(v.clone())),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl FromValue for Option<Value> {
    const KIND: ValueKind = ValueKind::Opaque;

    fn missing() -> Self {
        None
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        Ok(Some(value.clone()))
    }
}
