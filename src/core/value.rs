//! Tagged-union value untuk field map message
//!
//! Satu enum untuk semua tipe yang bisa disimpan. Tidak ada reflection:
//! tipe runtime dibaca langsung dari discriminant.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Jenis nilai (tanpa payload)
///
/// Dipakai sebagai "requested type" saat coercion dan untuk pesan error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
    Opaque,
}

impl ValueKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Opaque => "opaque",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Nilai arbitrary yang bukan tipe primitive.
///
/// Disimpan apa adanya dan hanya bisa dibaca kembali lewat `get_object`.
/// Tidak bisa di-encode ke wire format. Equality berdasarkan identitas
/// alokasi, bukan isi.
#[derive(Clone)]
pub struct OpaqueValue {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl OpaqueValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Nilai field yang tersimpan
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Opaque(OpaqueValue),
}

impl Value {
    #[inline(always)]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Byte(_) => ValueKind::Byte,
            Self::Short(_) => ValueKind::Short,
            Self::Char(_) => ValueKind::Char,
            Self::Int(_) => ValueKind::Int,
            Self::Long(_) => ValueKind::Long,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Opaque(_) => ValueKind::Opaque,
        }
    }

    /// Representasi tekstual untuk primitive; `None` untuk bytes/opaque.
    ///
    /// Float memakai format `Debug` supaya `1.0` tetap `"1.0"` dan hasilnya
    /// bisa di-parse kembali tanpa kehilangan presisi.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Boolean(v) => Some(v.to_string()),
            Self::Byte(v) => Some(v.to_string()),
            Self::Short(v) => Some(v.to_string()),
            Self::Char(v) => Some(v.to_string()),
            Self::Int(v) => Some(v.to_string()),
            Self::Long(v) => Some(v.to_string()),
            Self::Float(v) => Some(format!("{v:?}")),
            Self::Double(v) => Some(format!("{v:?}")),
            Self::String(v) => Some(v.clone()),
            Self::Bytes(_) | Self::Opaque(_) => None,
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline(always)]
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    char => Char,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec<u8> => Bytes,
    OpaqueValue => Opaque,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}
