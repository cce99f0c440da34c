//! mapmsg - Typed Map Message Body
//!
//! Arsitektur:
//! - Value Store: name → typed value, coercion saat dibaca
//! - Lifecycle: writable / read-only, reset via `clear()`
//! - Binary Protocol: self-describing tag stream, big-endian
//!
//! Satu `MapMessage` hanya boleh diakses oleh satu owner pada satu waktu.
//! Tidak ada sinkronisasi internal; mutasi butuh `&mut self`.

pub mod core;
pub mod error;
pub mod message;
pub mod protocol;

pub use crate::core::{FieldStore, FromValue, MapNames, OpaqueValue, Value, ValueKind};
pub use error::{CoercionError, DecodeError, MapMessageError, Result};
pub use message::{MapMessage, MessageState};
pub use protocol::{decode, encode, CodecConfig, Decoder, Encoder};
