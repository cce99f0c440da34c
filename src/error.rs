//! Error taxonomy untuk map message
//!
//! Semua error bersifat sinkron dan atomik: instance tetap di state
//! sebelum pemanggilan.

use thiserror::Error;

use crate::core::ValueKind;

pub type Result<T> = std::result::Result<T, MapMessageError>;

/// Top-level error untuk semua operasi message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapMessageError {
    /// Nama field kosong atau hanya whitespace.
    #[error("field name is required")]
    InvalidName,

    /// Write saat message read-only.
    #[error("message is not writable")]
    NotWritable,

    /// Tipe yang diminta tidak kompatibel dengan nilai tersimpan.
    #[error("field `{name}`: {source}")]
    FormatMismatch {
        name: String,
        #[source]
        source: CoercionError,
    },

    /// Nilai tidak bisa di-encode ke wire format.
    #[error("field `{name}` is not serializable: {reason}")]
    NotSerializable { name: String, reason: String },

    /// Byte stream rusak atau tidak dikenal.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] DecodeError),

    /// Offset/length di luar batas slice sumber.
    #[error("byte range {offset}+{len} out of bounds for {available} bytes")]
    InvalidRange {
        offset: usize,
        len: usize,
        available: usize,
    },
}

/// Coercion ditolak oleh matrix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot read {found} as {requested}{}", detail_suffix(.detail))]
pub struct CoercionError {
    pub requested: ValueKind,
    pub found: ValueKind,
    pub detail: Option<String>,
}

impl CoercionError {
    pub(crate) fn new(requested: ValueKind, found: ValueKind) -> Self {
        Self {
            requested,
            found,
            detail: None,
        }
    }

    pub(crate) fn unparsable(requested: ValueKind, text: &str) -> Self {
        Self {
            requested,
            found: ValueKind::String,
            detail: Some(format!("unparsable text {text:?}")),
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" ({d})"),
        None => String::new(),
    }
}

/// Penyebab spesifik kegagalan decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated at offset {offset}: needed {needed} more bytes")]
    Truncated { offset: usize, needed: usize },

    #[error("unknown format tag 0x{0:02x}")]
    UnknownFormatTag(u8),

    #[error("unknown type tag 0x{tag:02x} for field `{name}`")]
    UnknownTypeTag { name: String, tag: u8 },

    #[error("{what} {value} exceeds limit {limit}")]
    LengthOutOfRange {
        what: &'static str,
        value: u64,
        limit: u64,
    },

    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("invalid char scalar 0x{0:08x}")]
    InvalidChar(u32),

    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBoolean(u8),

    #[error("blank field name in entry {0}")]
    BlankName(u32),

    #[error("duplicate field name `{0}`")]
    DuplicateName(String),

    #[error("{0} trailing bytes after last entry")]
    TrailingBytes(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = MapMessageError::FormatMismatch {
            name: "n".into(),
            source: CoercionError::unparsable(ValueKind::Int, "abc"),
        };
        assert_eq!(
            err.to_string(),
            "field `n`: cannot read string as int (unparsable text \"abc\")"
        );

        let err = MapMessageError::from(DecodeError::UnknownFormatTag(0x7f));
        assert_eq!(err.to_string(), "malformed encoding: unknown format tag 0x7f");
    }
}
