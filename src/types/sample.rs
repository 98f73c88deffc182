//! Record views handed out by sample access.
//!
//! A [`Sample`] is a self-contained view over one fixed-size record. Samples
//! produced by bulk reads share one backing buffer; every other sample owns
//! its own. Either way a sample stays valid after the source is closed.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::{DecodedField, DecodedRecord, VarData, VariableDescriptor};
use crate::Result;
use crate::decoder::RecordDecoder;

#[derive(Debug, Clone)]
pub struct Sample {
    data: Arc<[u8]>,
    start: usize,
    len: usize,
    index: usize,
    decoder: RecordDecoder,
}

impl Sample {
    /// View `len` bytes of `data` starting at `start`. Callers keep the range in bounds.
    pub(crate) fn new(
        data: Arc<[u8]>,
        start: usize,
        len: usize,
        index: usize,
        decoder: RecordDecoder,
    ) -> Self {
        debug_assert!(start + len <= data.len());
        Self { data, start, len, index, decoder }
    }

    /// Position of this record in the sample region.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw record bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data[self.start..self.start + self.len]
    }

    /// Returns descriptor metadata if present.
    pub fn descriptor(&self, name: &str) -> Option<&VariableDescriptor> {
        self.decoder.catalog().lookup(name)
    }

    /// Decode one field by name, ignoring case. Unknown names are `Ok(None)`.
    pub fn field(&self, name: &str) -> Result<Option<DecodedField>> {
        self.decoder.decode_named(self.bytes(), name)
    }

    /// Decode every field, skipping any that do not fit the record.
    pub fn all_fields(&self) -> DecodedRecord {
        self.decoder.decode_all(self.bytes())
    }

    /// Generic typed lookup by variable name.
    /// Returns None if the variable is missing or type conversion fails.
    pub fn get<T: VarData>(&self, name: &str) -> Option<T> {
        let descriptor = self.descriptor(name)?;
        T::from_bytes(self.bytes(), descriptor).ok()
    }

    /// Convenience typed helpers
    pub fn f32(&self, name: &str) -> Option<f32> {
        self.get(name)
    }
    pub fn f64(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
    pub fn i32(&self, name: &str) -> Option<i32> {
        self.get(name)
    }
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name)
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.all_fields().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldCatalog, Value, VariableType};

    fn sample_over(data: Vec<u8>, start: usize, len: usize) -> Sample {
        let catalog = FieldCatalog::new(vec![
            VariableDescriptor::new("RPM", VariableType::Int32, 0, 1).with_unit("revs/min"),
            VariableDescriptor::new("Speed", VariableType::Float32, 4, 1).with_unit("m/s"),
            VariableDescriptor::new("CarIdxLapDistPct", VariableType::Float32, 8, 4)
                .with_unit("%"),
        ]);
        Sample::new(data.into(), start, len, 0, RecordDecoder::new(Arc::new(catalog)))
    }

    fn record(rpm: i32, speed: f32, lap_dist: [f32; 4]) -> Vec<u8> {
        let mut data = Vec::with_capacity(24);
        data.extend_from_slice(&rpm.to_le_bytes());
        data.extend_from_slice(&speed.to_le_bytes());
        for value in lap_dist {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data
    }

    #[test]
    fn sample_basic_lookup() {
        let lap_dist = [0.10f32, 0.20, 0.30, 0.40];
        let sample = sample_over(record(1234, 42.5, lap_dist), 0, 24);

        assert_eq!(sample.i32("RPM"), Some(1234));
        assert_eq!(sample.f32("speed"), Some(42.5));
        let lap_dist_values: Vec<f32> = sample.get("CarIdxLapDistPct").unwrap();
        assert_eq!(lap_dist_values, lap_dist);
        assert_eq!(sample.i32("Missing"), None);
        assert_eq!(sample.f32("RPM"), None);
    }

    #[test]
    fn views_into_shared_buffers_stay_separate() {
        let mut data = record(1000, 10.0, [0.0; 4]);
        data.extend(record(2000, 20.0, [0.5; 4]));
        let shared: Arc<[u8]> = data.into();

        let catalog = Arc::new(FieldCatalog::new(vec![VariableDescriptor::new(
            "RPM",
            VariableType::Int32,
            0,
            1,
        )]));
        let first = Sample::new(Arc::clone(&shared), 0, 24, 0, RecordDecoder::new(Arc::clone(&catalog)));
        let second = Sample::new(shared, 24, 24, 1, RecordDecoder::new(catalog));

        assert_eq!(first.i32("RPM"), Some(1000));
        assert_eq!(second.i32("RPM"), Some(2000));
        assert_eq!(second.bytes().len(), 24);
        assert_eq!(second.index(), 1);
    }

    #[test]
    fn field_returns_metadata_with_value() {
        let sample = sample_over(record(1, 33.0, [0.0; 4]), 0, 24);
        let field = sample.field("Speed").unwrap().unwrap();
        assert_eq!(field.unit, "m/s");
        assert_eq!(field.value, Value::Float32(33.0));
        assert!(sample.field("Throttle").unwrap().is_none());
    }

    #[test]
    fn serializes_as_name_value_unit_map() {
        let sample = sample_over(record(7000, 1.5, [0.25; 4]), 0, 24);
        let json = serde_json::to_value(&sample).unwrap();

        assert_eq!(json["RPM"]["value"], 7000);
        assert_eq!(json["RPM"]["unit"], "revs/min");
        assert_eq!(json["Speed"]["value"], 1.5);
        assert_eq!(json["CarIdxLapDistPct"]["value"][3], 0.25);
    }
}
