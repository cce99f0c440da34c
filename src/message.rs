//! MapMessage: Value Store + lifecycle read-only
//!
//! State machine:
//! - Writable (awal): semua setter boleh; `mark_read_only()` → ReadOnly
//! - ReadOnly: setter gagal `NotWritable`, getter tetap jalan
//! - `clear()` dari state mana pun → Writable dengan body kosong
//!
//! Message hanya boleh diakses satu owner pada satu waktu. Tidak ada
//! sinkronisasi internal; semua mutasi lewat `&mut self`.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::{check_name, FieldStore, FromValue, MapNames, Value};
use crate::error::{MapMessageError, Result};
use crate::protocol;

/// State lifecycle message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageState {
    #[default]
    Writable,
    ReadOnly,
}

/// Body message berbentuk map dengan akses bertipe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapMessage {
    fields: FieldStore,
    state: MessageState,
}

impl MapMessage {
    /// Message kosong dan writable
    pub fn new() -> Self {
        Self::default()
    }

    /// Message writable yang sudah berisi field dari luar
    pub fn from_fields(fields: FieldStore) -> Self {
        Self {
            fields,
            state: MessageState::Writable,
        }
    }

    /// Decode body dari wire; hasilnya read-only (state "received")
    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        let fields = protocol::decode(bytes)?;
        trace!(fields = fields.len(), bytes = bytes.len(), "map message received");
        Ok(Self {
            fields,
            state: MessageState::ReadOnly,
        })
    }

    /// Encode body lalu tandai read-only (state "sent")
    ///
    /// Jika encode gagal, state tidak berubah.
    pub fn to_wire(&mut self) -> Result<Vec<u8>> {
        let bytes = protocol::encode(&self.fields)?;
        self.mark_read_only();
        Ok(bytes)
    }

    #[inline(always)]
    pub fn state(&self) -> MessageState {
        self.state
    }

    #[inline(always)]
    pub fn is_read_only(&self) -> bool {
        self.state == MessageState::ReadOnly
    }

    pub fn mark_read_only(&mut self) {
        if self.state != MessageState::ReadOnly {
            trace!(fields = self.fields.len(), "map message marked read-only");
        }
        self.state = MessageState::ReadOnly;
    }

    /// Kosongkan body dan kembali ke Writable, dari state apa pun
    pub fn clear(&mut self) {
        trace!(fields = self.fields.len(), state = ?self.state, "map message cleared");
        self.fields.clear();
        self.state = MessageState::Writable;
    }

    /// Body sebagai map bertipe
    pub fn body(&self) -> &FieldStore {
        &self.fields
    }

    /// Body dalam bentuk wire bytes, tanpa mengubah state
    pub fn body_bytes(&self) -> Result<Vec<u8>> {
        protocol::encode(&self.fields)
    }

    pub fn into_fields(self) -> FieldStore {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    /// Baca field dengan coercion. Lihat `FromValue` untuk matrix dan
    /// nilai default saat field tidak ada.
    #[inline]
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        self.fields.get(name)
    }

    /// `false` jika field tidak ada
    pub fn get_boolean(&self, name: &str) -> Result<bool> {
        self.get(name)
    }

    /// `0` jika field tidak ada
    pub fn get_byte(&self, name: &str) -> Result<i8> {
        self.get(name)
    }

    pub fn get_short(&self, name: &str) -> Result<i16> {
        self.get(name)
    }

    /// `'\0'` jika field tidak ada
    pub fn get_char(&self, name: &str) -> Result<char> {
        self.get(name)
    }

    pub fn get_int(&self, name: &str) -> Result<i32> {
        self.get(name)
    }

    pub fn get_long(&self, name: &str) -> Result<i64> {
        self.get(name)
    }

    pub fn get_float(&self, name: &str) -> Result<f32> {
        self.get(name)
    }

    pub fn get_double(&self, name: &str) -> Result<f64> {
        self.get(name)
    }

    /// `None` jika field tidak ada (berbeda dengan getter primitive)
    pub fn get_string(&self, name: &str) -> Result<Option<String>> {
        self.get(name)
    }

    /// `None` jika field tidak ada
    pub fn get_bytes(&self, name: &str) -> Result<Option<Vec<u8>>> {
        self.get(name)
    }

    /// Nilai apa adanya, tanpa coercion
    pub fn get_object(&self, name: &str) -> Result<Option<Value>> {
        self.get(name)
    }

    pub fn item_exists(&self, name: &str) -> Result<bool> {
        self.fields.exists(name)
    }

    /// Snapshot nama field saat pemanggilan
    pub fn map_names(&self) -> MapNames {
        self.fields.names()
    }

    // ------------------------------------------------------------------
    // Write side
    // ------------------------------------------------------------------

    /// Simpan nilai persis seperti diberikan
    ///
    /// Urutan validasi: nama dulu (`InvalidName`), lalu lock (`NotWritable`).
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        check_name(name)?;
        if self.is_read_only() {
            debug!(field = name, "write rejected: map message is read-only");
            return Err(MapMessageError::NotWritable);
        }
        self.fields.set(name, value)
    }

    pub fn set_boolean(&mut self, name: &str, value: bool) -> Result<()> {
        self.set(name, value)
    }

    pub fn set_byte(&mut self, name: &str, value: i8) -> Result<()> {
        self.set(name, value)
    }

    pub fn set_short(&mut self, name: &str, value: i16) -> Result<()> {
        self.set(name, value)
    }

    pub fn set_char(&mut self, name: &str, value: char) -> Result<()> {
        self.set(name, value)
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> Result<()> {
        self.set(name, value)
    }

    pub fn set_long(&mut self, name: &str, value: i64) -> Result<()> {
        self.set(name, value)
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<()> {
        self.set(name, value)
    }

    pub fn set_double(&mut self, name: &str, value: f64) -> Result<()> {
        self.set(name, value)
    }

    pub fn set_string(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.set(name, Value::String(value.into()))
    }

    pub fn set_bytes(&mut self, name: &str, value: impl Into<Vec<u8>>) -> Result<()> {
        self.set(name, Value::Bytes(value.into()))
    }

    /// Simpan `value[offset..offset + len]`
    ///
    /// Range di luar batas gagal dengan `InvalidRange` dan message tidak
    /// berubah.
    pub fn set_bytes_range(
        &mut self,
        name: &str,
        value: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<()> {
        let slice = offset
            .checked_add(len)
            .and_then(|end| value.get(offset..end))
            .ok_or(MapMessageError::InvalidRange {
                offset,
                len,
                available: value.len(),
            })?;
        self.set(name, slice)
    }

    /// Simpan value apa pun, termasuk `Value::Opaque`
    pub fn set_object(&mut self, name: &str, value: Value) -> Result<()> {
        self.set(name, value)
    }
}

impl From<FieldStore> for MapMessage {
    fn from(fields: FieldStore) -> Self {
        Self::from_fields(fields)
    }
}

impl TryFrom<HashMap<String, Value>> for MapMessage {
    type Error = MapMessageError;

    fn try_from(fields: HashMap<String, Value>) -> Result<Self> {
        FieldStore::try_from(fields).map(Self::from_fields)
    }
}
