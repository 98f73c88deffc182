//! Core types for recorded telemetry.
//!
//! ## Architecture
//!
//! The type system maps directly to the IBT layout:
//! - [`VariableDescriptor`] locates one named variable inside a sample record
//! - [`FieldCatalog`] indexes descriptors by case-insensitive name in O(1)
//! - [`VariableType`] is the closed set of primitive representations
//! - [`Value`], [`DecodedField`] and [`DecodedRecord`] carry decoded data
//! - [`VarData`] provides type-checked extraction into Rust primitives
//! - [`Sample`] is a view over one record, as produced by sample access
//!
//! ## Usage Example
//!
//! ```rust
//! use pitwall_ibt::types::{FieldCatalog, VarData, VariableDescriptor, VariableType};
//!
//! let catalog = FieldCatalog::new(vec![
//!     VariableDescriptor::new("RPM", VariableType::Float32, 0, 1).with_unit("revs/min"),
//! ]);
//! let data = 4500.0f32.to_le_bytes();
//!
//! let rpm_info = catalog.lookup("rpm").unwrap();
//! let rpm = f32::from_bytes(&data, rpm_info).unwrap();
//! assert!((rpm - 4500.0).abs() < f32::EPSILON);
//! ```

mod catalog;
mod decoded;
mod descriptor;
mod sample;
mod var_data;
mod variable_type;

// Re-export all public types
pub use catalog::{CatalogWarning, FieldCatalog};
pub use decoded::{DecodedField, DecodedRecord, FieldValue};
pub use descriptor::VariableDescriptor;
pub use sample::Sample;
pub use var_data::{VarData, VarElement};
pub use variable_type::{Value, VariableType};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn all_types() -> Vec<VariableType> {
        vec![
            VariableType::Char,
            VariableType::Bool,
            VariableType::Int8,
            VariableType::UInt8,
            VariableType::Int16,
            VariableType::UInt16,
            VariableType::Int32,
            VariableType::UInt32,
            VariableType::Float32,
            VariableType::Float64,
        ]
    }

    proptest! {
        #[test]
        fn prop_decoded_width_matches_descriptor_size(
            data_type in prop::sample::select(all_types()),
            count in 1..8usize,
            offset in 0..32usize
        ) {
            let descriptor = VariableDescriptor::new("Var", data_type, offset, count);
            prop_assert_eq!(descriptor.size, data_type.size() * count);

            let record = vec![0u8; offset + descriptor.size];
            let value = crate::RecordDecoder::decode_field(&record, &descriptor).unwrap();
            match value {
                Value::Array(values) => prop_assert_eq!(values.len(), count),
                _ => prop_assert_eq!(count, 1),
            }

            let short = vec![0u8; offset + descriptor.size - 1];
            prop_assert!(crate::RecordDecoder::decode_field(&short, &descriptor).is_err());
        }
    }

    #[test]
    fn variable_type_size_returns_correct_values() {
        assert_eq!(VariableType::Char.size(), 1);
        assert_eq!(VariableType::Bool.size(), 1);
        assert_eq!(VariableType::Int8.size(), 1);
        assert_eq!(VariableType::UInt8.size(), 1);
        assert_eq!(VariableType::Int16.size(), 2);
        assert_eq!(VariableType::UInt16.size(), 2);
        assert_eq!(VariableType::Int32.size(), 4);
        assert_eq!(VariableType::UInt32.size(), 4);
        assert_eq!(VariableType::Float32.size(), 4);
        assert_eq!(VariableType::Float64.size(), 8);
    }

    #[test]
    fn irsdk_codes_map_to_types() {
        assert_eq!(VariableType::from_irsdk_code(0), Some(VariableType::Char));
        assert_eq!(VariableType::from_irsdk_code(3), Some(VariableType::UInt32));
        assert_eq!(VariableType::from_irsdk_code(5), Some(VariableType::Float64));
        assert_eq!(VariableType::from_irsdk_code(6), None);
    }

    #[test]
    fn value_views() {
        assert_eq!(Value::Int8(-1).as_f64(), Some(-1.0));
        assert_eq!(Value::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
        assert_eq!(Value::Char('x').as_f64(), None);

        let text = Value::Array(vec![Value::Char('G'), Value::Char('T'), Value::Char('\0'), Value::Char('x')]);
        assert_eq!(text.as_text().as_deref(), Some("GT"));
        assert_eq!(Value::Array(vec![Value::Int8(1)]).as_text(), None);
    }
}
