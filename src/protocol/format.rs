//! Map Body Wire Format
//!
//! Layout (semua integer big-endian):
//! ┌─────────────────────────────────────────────────────┐
//! │ format_tag (1) │ entry_count (4)                    │
//! ├─────────────────────────────────────────────────────┤
//! │ name_len (2) │ name (UTF-8) │ type_tag (1) │ payload │  × entry_count
//! └─────────────────────────────────────────────────────┘
//!
//! Payload fixed-width untuk numeric/boolean/char, sedangkan string dan
//! bytes memakai prefix panjang 4 byte.

use crate::core::{OpaqueValue, Value};

/// Format tag map body ('M')
pub const FORMAT_TAG: u8 = 0x4D;
/// format_tag + entry_count
pub const BODY_HEADER_SIZE: usize = 5;
/// name_len + type_tag + payload 1 byte terkecil
pub const MIN_ENTRY_SIZE: usize = 4;
pub const MAX_NAME_LEN: usize = u16::MAX as usize;

pub const DEFAULT_MAX_ENTRIES: u32 = 65_536;
pub const DEFAULT_MAX_VALUE_LEN: u32 = 64 * 1024 * 1024; // 64MB per value

/// Tipe field di wire
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Boolean = 1,
    Byte = 2,
    Short = 3,
    Char = 4,
    Int = 5,
    Long = 6,
    Float = 7,
    Double = 8,
    String = 9,
    Bytes = 10,
}

impl TypeTag {
    #[inline(always)]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Boolean),
            2 => Some(Self::Byte),
            3 => Some(Self::Short),
            4 => Some(Self::Char),
            5 => Some(Self::Int),
            6 => Some(Self::Long),
            7 => Some(Self::Float),
            8 => Some(Self::Double),
            9 => Some(Self::String),
            10 => Some(Self::Bytes),
            _ => None,
        }
    }

    /// Tag untuk sebuah value; opaque tidak punya tag dan dikembalikan
    /// sebagai error.
    #[inline(always)]
    pub fn of(value: &Value) -> Result<Self, &OpaqueValue> {
        match value {
            Value::Boolean(_) => Ok(Self::Boolean),
            Value::Byte(_) => Ok(Self::Byte),
            Value::Short(_) => Ok(Self::Short),
            Value::Char(_) => Ok(Self::Char),
            Value::Int(_) => Ok(Self::Int),
            Value::Long(_) => Ok(Self::Long),
            Value::Float(_) => Ok(Self::Float),
            Value::Double(_) => Ok(Self::Double),
            Value::String(_) => Ok(Self::String),
            Value::Bytes(_) => Ok(Self::Bytes),
            Value::Opaque(o) => Err(o),
        }
    }
}

/// Batas ukuran body, berlaku untuk encode dan decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Jumlah entry maksimum per body
    pub max_entries: u32,
    /// Panjang maksimum string/bytes per value
    pub max_value_len: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for raw in 1..=10u8 {
            let tag = TypeTag::from_u8(raw).unwrap();
            assert_eq!(tag as u8, raw);
        }
        assert_eq!(TypeTag::from_u8(0), None);
        assert_eq!(TypeTag::from_u8(11), None);
    }

    #[test]
    fn test_tag_of_value() {
        assert_eq!(TypeTag::of(&Value::Long(1)), Ok(TypeTag::Long));
        assert_eq!(TypeTag::of(&Value::from("x")), Ok(TypeTag::String));

        let opaque = OpaqueValue::new(1u8);
        let value = Value::Opaque(opaque.clone());
        assert_eq!(TypeTag::of(&value), Err(&opaque));
    }
}
