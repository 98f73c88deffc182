//! Variable descriptors: where a named value lives inside a record.

use serde::{Deserialize, Serialize};

use super::VariableType;
use crate::{Result, TelemetryError};

/// Information about one recorded variable, as read from the descriptor table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct VariableDescriptor {
    /// Variable name as defined by iRacing
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Units of measurement (e.g., "m/s", "C", "N*m")
    pub unit: String,
    /// Primitive type of each element
    pub data_type: VariableType,
    /// Byte offset within the record
    pub offset: usize,
    /// Number of elements (1 for scalar, >1 for arrays)
    pub count: usize,
    /// Total bytes occupied by all elements
    pub size: usize,
}

impl VariableDescriptor {
    /// Creates a descriptor whose size is `count` packed elements of `data_type`.
    pub fn new(name: impl Into<String>, data_type: VariableType, offset: usize, count: usize) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            unit: String::new(),
            data_type,
            offset,
            count,
            size: data_type.size().saturating_mul(count),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overrides the byte size, for layouts that pad elements.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Bytes between the start of consecutive elements.
    pub fn element_width(&self) -> usize {
        self.size.checked_div(self.count).unwrap_or(0)
    }

    /// Checks that count and size describe a readable layout.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(TelemetryError::invalid_descriptor(&self.name, "count must be positive"));
        }
        if self.size == 0 {
            return Err(TelemetryError::invalid_descriptor(&self.name, "size must be positive"));
        }
        if self.size % self.count != 0 {
            return Err(TelemetryError::invalid_descriptor(
                &self.name,
                format!("size {} is not a multiple of count {}", self.size, self.count),
            ));
        }
        if self.element_width() < self.data_type.size() {
            return Err(TelemetryError::invalid_descriptor(
                &self.name,
                format!(
                    "element width {} is narrower than {:?} ({} bytes)",
                    self.element_width(),
                    self.data_type,
                    self.data_type.size()
                ),
            ));
        }
        Ok(())
    }

    /// Whether this descriptor lies entirely inside a record of `record_len` bytes.
    pub fn fits_within(&self, record_len: usize) -> bool {
        self.offset.checked_add(self.size).is_some_and(|end| end <= record_len)
    }
}
