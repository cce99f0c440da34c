//! Encoder/Decoder untuk map body
//!
//! Encoder menulis ke buffer internal yang bisa di-reuse antar message.
//! Decoder membaca langsung dari slice input (zero-copy sampai nilai
//! di-materialize ke `FieldStore`).

use tracing::{debug, trace};

use super::format::{
    CodecConfig, TypeTag, BODY_HEADER_SIZE, FORMAT_TAG, MAX_NAME_LEN, MIN_ENTRY_SIZE,
};
use crate::core::{FieldStore, Value};
use crate::error::{DecodeError, MapMessageError, Result};

/// Reusable encoder buffer
///
/// Buffer tidak di-shrink saat `reset`, jadi encode berulang untuk message
/// berukuran serupa tidak melakukan alokasi baru.
///
/// Batas `CodecConfig` yang sama dengan decoder berlaku di sini, jadi
/// setiap body yang berhasil di-encode juga bisa di-decode dengan config
/// yang sama.
pub struct Encoder {
    buffer: Vec<u8>,
    config: CodecConfig,
}

impl Encoder {
    /// Membuat encoder dengan kapasitas awal tertentu dan batas default
    pub fn new(capacity: usize) -> Self {
        Self::with_config(capacity, CodecConfig::default())
    }

    pub fn with_config(capacity: usize, config: CodecConfig) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            config,
        }
    }

    /// Reset encoder untuk reuse
    #[inline(always)]
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Encode satu map body ke buffer
    ///
    /// Field ditulis dalam urutan nama supaya store yang sama selalu
    /// menghasilkan byte yang sama. Jika gagal, buffer dikosongkan.
    pub fn encode(&mut self, store: &FieldStore) -> Result<&[u8]> {
        self.reset();
        if let Err(e) = self.write_body(store) {
            self.reset();
            return Err(e);
        }

        trace!(fields = store.len(), bytes = self.buffer.len(), "map body encoded");
        Ok(self.buffer.as_slice())
    }

    fn write_body(&mut self, store: &FieldStore) -> Result<()> {
        let count = u32::try_from(store.len())
            .ok()
            .filter(|count| *count <= self.config.max_entries)
            .ok_or_else(|| MapMessageError::NotSerializable {
                name: String::new(),
                reason: format!(
                    "{} entries exceed limit {}",
                    store.len(),
                    self.config.max_entries
                ),
            })?;

        let mut entries: Vec<(&String, &Value)> = store.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        self.buffer.push(FORMAT_TAG);
        self.buffer.extend_from_slice(&count.to_be_bytes());

        for (name, value) in entries {
            self.write_entry(name, value)?;
        }
        Ok(())
    }

    fn write_entry(&mut self, name: &str, value: &Value) -> Result<()> {
        let not_serializable = |reason: String| MapMessageError::NotSerializable {
            name: name.to_owned(),
            reason,
        };

        let tag = TypeTag::of(value)
            .map_err(|o| not_serializable(format!("opaque value of type {}", o.type_name())))?;

        if name.len() > MAX_NAME_LEN {
            return Err(not_serializable(format!(
                "name is {} bytes, limit {}",
                name.len(),
                MAX_NAME_LEN
            )));
        }

        self.buffer
            .extend_from_slice(&(name.len() as u16).to_be_bytes());
        self.buffer.extend_from_slice(name.as_bytes());
        self.buffer.push(tag as u8);

        match value {
            Value::Boolean(v) => self.buffer.push(u8::from(*v)),
            Value::Byte(v) => self.buffer.extend_from_slice(&v.to_be_bytes()),
            Value::Short(v) => self.buffer.extend_from_slice(&v.to_be_bytes()),
            Value::Char(v) => self.buffer.extend_from_slice(&u32::from(*v).to_be_bytes()),
            Value::Int(v) => self.buffer.extend_from_slice(&v.to_be_bytes()),
            Value::Long(v) => self.buffer.extend_from_slice(&v.to_be_bytes()),
            Value::Float(v) => self.buffer.extend_from_slice(&v.to_bits().to_be_bytes()),
            Value::Double(v) => self.buffer.extend_from_slice(&v.to_bits().to_be_bytes()),
            Value::String(v) => self.write_blob(v.as_bytes()).map_err(not_serializable)?,
            Value::Bytes(v) => self.write_blob(v).map_err(not_serializable)?,
            // Ditolak oleh TypeTag::of
            Value::Opaque(_) => {}
        }
        Ok(())
    }

    fn write_blob(&mut self, data: &[u8]) -> std::result::Result<(), String> {
        let limit = self.config.max_value_len;
        let len = u32::try_from(data.len())
            .ok()
            .filter(|len| *len <= limit)
            .ok_or_else(|| format!("value is {} bytes, limit {}", data.len(), limit))?;
        self.buffer.extend_from_slice(&len.to_be_bytes());
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// Get current buffer content
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Zero-copy decoder cursor
pub struct Decoder<'a> {
    buffer: &'a [u8],
    read_pos: usize,
    config: CodecConfig,
}

impl<'a> Decoder<'a> {
    /// Membuat decoder dari buffer dengan batas default
    #[inline(always)]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_config(buffer, CodecConfig::default())
    }

    #[inline(always)]
    pub fn with_config(buffer: &'a [u8], config: CodecConfig) -> Self {
        Self {
            buffer,
            read_pos: 0,
            config,
        }
    }

    /// Decode seluruh buffer menjadi satu `FieldStore`
    ///
    /// All-or-nothing: store hanya dikembalikan jika seluruh input valid
    /// dan habis terbaca.
    pub fn decode(mut self) -> std::result::Result<FieldStore, DecodeError> {
        let format_tag = self.read_u8()?;
        if format_tag != FORMAT_TAG {
            return Err(DecodeError::UnknownFormatTag(format_tag));
        }

        let count = self.read_u32()?;
        if count > self.config.max_entries {
            return Err(DecodeError::LengthOutOfRange {
                what: "entry count",
                value: u64::from(count),
                limit: u64::from(self.config.max_entries),
            });
        }

        // Jangan percaya count untuk alokasi: batasi dengan sisa input
        let plausible = self.remaining() / MIN_ENTRY_SIZE;
        let mut store = FieldStore::with_capacity((count as usize).min(plausible));

        for index in 0..count {
            let name = self.read_name(index)?;
            let value = self.read_value(&name)?;
            if !store.insert_new(name.clone(), value) {
                return Err(DecodeError::DuplicateName(name));
            }
        }

        if self.remaining() > 0 {
            return Err(DecodeError::TrailingBytes(self.remaining()));
        }

        Ok(store)
    }

    fn read_name(&mut self, index: u32) -> std::result::Result<String, DecodeError> {
        let len = self.read_u16()? as usize;
        let raw = self.take(len)?;
        let name = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8("field name"))?;
        if name.trim().is_empty() {
            return Err(DecodeError::BlankName(index));
        }
        Ok(name.to_owned())
    }

    fn read_value(&mut self, name: &str) -> std::result::Result<Value, DecodeError> {
        let raw_tag = self.read_u8()?;
        let tag = TypeTag::from_u8(raw_tag).ok_or_else(|| DecodeError::UnknownTypeTag {
            name: name.to_owned(),
            tag: raw_tag,
        })?;

        let value = match tag {
            TypeTag::Boolean => match self.read_u8()? {
                0 => Value::Boolean(false),
                1 => Value::Boolean(true),
                other => return Err(DecodeError::InvalidBoolean(other)),
            },
            TypeTag::Byte => Value::Byte(i8::from_be_bytes(self.read_array()?)),
            TypeTag::Short => Value::Short(i16::from_be_bytes(self.read_array()?)),
            TypeTag::Char => {
                let scalar = self.read_u32()?;
                Value::Char(char::from_u32(scalar).ok_or(DecodeError::InvalidChar(scalar))?)
            }
            TypeTag::Int => Value::Int(i32::from_be_bytes(self.read_array()?)),
            TypeTag::Long => Value::Long(i64::from_be_bytes(self.read_array()?)),
            TypeTag::Float => Value::Float(f32::from_bits(self.read_u32()?)),
            TypeTag::Double => Value::Double(f64::from_bits(u64::from_be_bytes(self.read_array()?))),
            TypeTag::String => {
                let raw = self.read_blob()?;
                let text =
                    std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8("string value"))?;
                Value::String(text.to_owned())
            }
            TypeTag::Bytes => Value::Bytes(self.read_blob()?.to_vec()),
        };
        Ok(value)
    }

    fn read_blob(&mut self) -> std::result::Result<&'a [u8], DecodeError> {
        let len = self.read_u32()?;
        if len > self.config.max_value_len {
            return Err(DecodeError::LengthOutOfRange {
                what: "value length",
                value: u64::from(len),
                limit: u64::from(self.config.max_value_len),
            });
        }
        self.take(len as usize)
    }

    #[inline(always)]
    fn take(&mut self, len: usize) -> std::result::Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::Truncated {
                offset: self.read_pos,
                needed: len - remaining,
            });
        }
        let start = self.read_pos;
        self.read_pos += len;
        Ok(&self.buffer[start..self.read_pos])
    }

    #[inline(always)]
    fn read_array<const N: usize>(&mut self) -> std::result::Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    #[inline(always)]
    fn read_u8(&mut self) -> std::result::Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    #[inline(always)]
    fn read_u16(&mut self) -> std::result::Result<u16, DecodeError> {
        self.read_array().map(u16::from_be_bytes)
    }

    #[inline(always)]
    fn read_u32(&mut self) -> std::result::Result<u32, DecodeError> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Remaining bytes
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.read_pos)
    }
}

/// Encode store ke buffer baru
pub fn encode(store: &FieldStore) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(BODY_HEADER_SIZE + store.len() * 16);
    let bytes = encoder.encode(store)?.to_vec();
    Ok(bytes)
}

/// Decode buffer dengan batas default
pub fn decode(bytes: &[u8]) -> Result<FieldStore> {
    decode_with(bytes, CodecConfig::default())
}

pub fn decode_with(bytes: &[u8], config: CodecConfig) -> Result<FieldStore> {
    Decoder::with_config(bytes, config).decode().map_err(|e| {
        debug!(error = %e, len = bytes.len(), "map body decode failed");
        MapMessageError::MalformedEncoding(e)
    })
}
