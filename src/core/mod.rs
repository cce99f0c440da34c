//! Core module: Value Store dengan coercion matrix
//!
//! Prinsip desain:
//! - Tagged union: satu enum `Value`, tanpa reflection
//! - Coercion eksplisit: satu match arm per pasangan (requested, stored)
//! - Read-side only: coercion tidak pernah mengubah storage

mod coerce;
mod store;
mod value;

pub use coerce::FromValue;
pub(crate) use store::check_name;
pub use store::{FieldStore, MapNames};
pub use value::{OpaqueValue, Value, ValueKind};
