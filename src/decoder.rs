//! Record decoding: descriptor-driven reads from fixed-size sample records.
//!
//! Field layout is static per recording, so every read is a bounds check
//! followed by a little-endian conversion straight out of the record slice.
//! No intermediate buffers are allocated for scalar fields.
//!
//! ```rust
//! use pitwall_ibt::{FieldCatalog, RecordDecoder, Value, VariableDescriptor, VariableType};
//! use std::sync::Arc;
//!
//! let catalog = FieldCatalog::new(vec![
//!     VariableDescriptor::new("RPM", VariableType::Float32, 0, 1).with_unit("revs/min"),
//! ]);
//! let decoder = RecordDecoder::new(Arc::new(catalog));
//! let record = 4500.0f32.to_le_bytes();
//!
//! let rpm = decoder.decode_named(&record, "rpm").unwrap().unwrap();
//! assert_eq!(rpm.value, Value::Float32(4500.0));
//! assert_eq!(rpm.unit, "revs/min");
//! ```

use std::sync::Arc;

use tracing::warn;

use crate::types::{
    DecodedField, DecodedRecord, FieldCatalog, FieldValue, Value, VariableDescriptor, VariableType,
};
use crate::{Result, TelemetryError};

/// Decodes fields of records laid out by a shared [`FieldCatalog`].
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    catalog: Arc<FieldCatalog>,
}

impl RecordDecoder {
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Decode the value described by `descriptor` from `record`.
    ///
    /// Arrays (`count > 1`) decode to [`Value::Array`] of `count` elements,
    /// each `size / count` bytes apart.
    pub fn decode_field(record: &[u8], descriptor: &VariableDescriptor) -> Result<Value> {
        let bytes = field_bytes(record, descriptor)?;
        let width = descriptor.element_width();

        if descriptor.count == 1 {
            return Ok(decode_element(descriptor.data_type, bytes));
        }

        Ok(Value::Array(
            bytes.chunks_exact(width).map(|chunk| decode_element(descriptor.data_type, chunk)).collect(),
        ))
    }

    /// Decode a field by name. Unknown names are `Ok(None)`, not errors.
    pub fn decode_named(&self, record: &[u8], name: &str) -> Result<Option<DecodedField>> {
        let Some(descriptor) = self.catalog.lookup(name) else {
            return Ok(None);
        };

        let value = Self::decode_field(record, descriptor)?;
        Ok(Some(DecodedField {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            unit: descriptor.unit.clone(),
            value,
        }))
    }

    /// Decode every field of `record` in declaration order.
    ///
    /// Fields that cannot be decoded are logged and skipped so one bad
    /// descriptor never loses the rest of the record.
    pub fn decode_all(&self, record: &[u8]) -> DecodedRecord {
        let mut decoded = DecodedRecord::with_capacity(self.catalog.len());

        for descriptor in self.catalog.effective() {
            match Self::decode_field(record, descriptor) {
                Ok(value) => decoded.push(
                    descriptor.name.clone(),
                    FieldValue { value, unit: descriptor.unit.clone() },
                ),
                Err(e) => warn!("Skipping field '{}': {}", descriptor.name, e),
            }
        }

        decoded
    }
}

/// Bytes occupied by `descriptor` within `record`, after layout validation.
pub(crate) fn field_bytes<'a>(record: &'a [u8], descriptor: &VariableDescriptor) -> Result<&'a [u8]> {
    descriptor.validate()?;

    descriptor
        .offset
        .checked_add(descriptor.size)
        .and_then(|end| record.get(descriptor.offset..end))
        .ok_or_else(|| TelemetryError::OffsetOutOfRange {
            field: descriptor.name.clone(),
            offset: descriptor.offset,
            size: descriptor.size,
            record_len: record.len(),
        })
}

/// Decode one element from the start of `bytes`.
///
/// Callers guarantee `bytes.len() >= data_type.size()`, which
/// [`VariableDescriptor::validate`] establishes for every element slot.
pub(crate) fn decode_element(data_type: VariableType, bytes: &[u8]) -> Value {
    match data_type {
        VariableType::Char => Value::Char(char::from(bytes[0])),
        VariableType::Bool => Value::Bool(bytes[0] != 0),
        VariableType::Int8 => Value::Int8(i8::from_le_bytes(le_array(bytes))),
        VariableType::UInt8 => Value::UInt8(bytes[0]),
        VariableType::Int16 => Value::Int16(i16::from_le_bytes(le_array(bytes))),
        VariableType::UInt16 => Value::UInt16(u16::from_le_bytes(le_array(bytes))),
        VariableType::Int32 => Value::Int32(i32::from_le_bytes(le_array(bytes))),
        VariableType::UInt32 => Value::UInt32(u32::from_le_bytes(le_array(bytes))),
        VariableType::Float32 => Value::Float32(f32::from_le_bytes(le_array(bytes))),
        VariableType::Float64 => Value::Float64(f64::from_le_bytes(le_array(bytes))),
    }
}

pub(crate) fn le_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut array = [0u8; N];
    array.copy_from_slice(&bytes[..N]);
    array
}
