//! Telemetry variable type definitions

use serde::{Deserialize, Serialize};

/// Primitive representation of a recorded variable.
/// Every multi-byte type is stored little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum VariableType {
    /// 8-bit character (maps to irsdk_char)
    Char,
    /// Boolean value, any non-zero byte is true (maps to irsdk_bool)
    Bool,
    /// 32-bit signed integer (maps to irsdk_int)
    Int32,
    /// 32-bit unsigned integer (irsdk_bitField is recorded as this)
    UInt32,
    /// 32-bit floating point (maps to irsdk_float)
    Float32,
    /// 64-bit floating point (maps to irsdk_double)
    Float64,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    UInt16,
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    UInt8,
}

impl VariableType {
    /// Returns the size in bytes of one element of this type.
    pub const fn size(&self) -> usize {
        match self {
            VariableType::Char | VariableType::Bool => 1,
            VariableType::Int8 | VariableType::UInt8 => 1,
            VariableType::Int16 | VariableType::UInt16 => 2,
            VariableType::Int32 | VariableType::UInt32 | VariableType::Float32 => 4,
            VariableType::Float64 => 8,
        }
    }

    /// Maps an `irsdk_VarType` code from a variable header to a type.
    ///
    /// Bitfields (code 3) decode as [`VariableType::UInt32`].
    pub const fn from_irsdk_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(VariableType::Char),
            1 => Some(VariableType::Bool),
            2 => Some(VariableType::Int32),
            3 => Some(VariableType::UInt32),
            4 => Some(VariableType::Float32),
            5 => Some(VariableType::Float64),
            _ => None,
        }
    }
}

/// Runtime value decoded from a record.
///
/// Serializes untagged, so exported records read as plain numbers,
/// booleans, characters and arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(untagged)]
pub enum Value {
    Char(char),
    Bool(bool),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
    Array(Vec<Value>),
}

impl Value {
    /// Numeric view of a scalar value. Booleans map to 0/1, characters and arrays to `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Value::Int8(v) => Some(v as f64),
            Value::UInt8(v) => Some(v as f64),
            Value::Int16(v) => Some(v as f64),
            Value::UInt16(v) => Some(v as f64),
            Value::Int32(v) => Some(v as f64),
            Value::UInt32(v) => Some(v as f64),
            Value::Float32(v) => Some(v as f64),
            Value::Float64(v) => Some(v),
            Value::Char(_) | Value::Array(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Joins a character value or character array into text, stopping at the first NUL.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Char(c) => Some(c.to_string()),
            Value::Array(values) => values
                .iter()
                .take_while(|value| !matches!(value, Value::Char('\0')))
                .map(|value| match value {
                    Value::Char(c) => Some(*c),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }
}
