//! Protocol Layer: Map Body Binary Encoding
//!
//! Prinsip desain:
//! - Self-describing: setiap field membawa type tag sendiri
//! - Big-endian, fixed-width untuk primitive
//! - All-or-nothing decode: tidak ada store setengah jadi

mod encoder;
mod format;

pub use encoder::{decode, decode_with, encode, Decoder, Encoder};
pub use format::{CodecConfig, TypeTag, FORMAT_TAG, MAX_NAME_LEN};
