//! Typed field extraction

use super::{VariableDescriptor, VariableType};
use crate::decoder::{field_bytes, le_array};

/// Trait for types that can be parsed from binary telemetry data.
pub trait VarData: Sized {
    /// Parse this type from `data` at the location described by `descriptor`.
    fn from_bytes(data: &[u8], descriptor: &VariableDescriptor) -> crate::Result<Self>;
}

/// A scalar that can be read from one element slot of a record.
pub trait VarElement: Sized {
    /// Whether values of `data_type` convert to `Self` without loss.
    fn accepts(data_type: VariableType) -> bool;

    /// Read from the start of an element slot.
    fn read_element(bytes: &[u8]) -> Self;
}

macro_rules! impl_var_element {
    ($ty:ty, $size:literal, [$($variant:ident),+]) => {
        impl VarElement for $ty {
            fn accepts(data_type: VariableType) -> bool {
                matches!(data_type, $(VariableType::$variant)|+)
            }

            fn read_element(bytes: &[u8]) -> Self {
                <$ty>::from_le_bytes(le_array::<$size>(bytes))
            }
        }

        impl VarData for $ty {
            fn from_bytes(data: &[u8], descriptor: &VariableDescriptor) -> crate::Result<Self> {
                read_first(data, descriptor)
            }
        }
    };
}

impl_var_element!(f32, 4, [Float32]);
impl_var_element!(f64, 8, [Float64]);
impl_var_element!(i32, 4, [Int32]);
impl_var_element!(u32, 4, [UInt32]);
impl_var_element!(i16, 2, [Int16]);
impl_var_element!(u16, 2, [UInt16]);
impl_var_element!(i8, 1, [Int8]);
impl_var_element!(u8, 1, [UInt8, Char]);

impl VarElement for bool {
    fn accepts(data_type: VariableType) -> bool {
        data_type == VariableType::Bool
    }

    fn read_element(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

impl VarData for bool {
    fn from_bytes(data: &[u8], descriptor: &VariableDescriptor) -> crate::Result<Self> {
        read_first(data, descriptor)
    }
}

// Array support for VarData
impl<T: VarElement> VarData for Vec<T> {
    fn from_bytes(data: &[u8], descriptor: &VariableDescriptor) -> crate::Result<Self> {
        check_type::<T>(descriptor)?;
        let bytes = field_bytes(data, descriptor)?;
        Ok(bytes.chunks_exact(descriptor.element_width()).map(T::read_element).collect())
    }
}

fn read_first<T: VarElement>(data: &[u8], descriptor: &VariableDescriptor) -> crate::Result<T> {
    check_type::<T>(descriptor)?;
    let bytes = field_bytes(data, descriptor)?;
    Ok(T::read_element(bytes))
}

fn check_type<T: VarElement>(descriptor: &VariableDescriptor) -> crate::Result<()> {
    if T::accepts(descriptor.data_type) {
        Ok(())
    } else {
        Err(crate::TelemetryError::TypeConversion {
            details: format!(
                "'{}' is {:?}, not {}",
                descriptor.name,
                descriptor.data_type,
                std::any::type_name::<T>()
            ),
        })
    }
}
