//! Recording: the composition of layout, metadata and sample access.
//!
//! A [`Recording`] is built from what the outer IBT header parser produces
//! (the [`RecordHeader`], the descriptor table and the raw session YAML) plus
//! a borrowed [`SampleSource`]. Construction normalizes the metadata up front,
//! so a recording whose metadata cannot be repaired is never observable.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_yaml_ng::Value;
use tracing::{info, warn};

use crate::ibt::{RecordHeader, SampleAccessor, SampleSource, SequentialSamples};
use crate::metadata::{MetadataNormalizer, NormalizedMetadata, NormalizerConfig, Repair};
use crate::{FieldCatalog, RecordDecoder, Result, Sample, TelemetryError};

/// A decoded view of one IBT recording.
pub struct Recording<'a, S: SampleSource + ?Sized> {
    catalog: Arc<FieldCatalog>,
    metadata: NormalizedMetadata,
    accessor: SampleAccessor<'a, S>,
}

impl<'a, S: SampleSource + ?Sized> Recording<'a, S> {
    /// Build a recording with the default metadata rules.
    pub fn from_source(
        header: RecordHeader,
        catalog: FieldCatalog,
        raw_metadata: &str,
        source: &'a S,
    ) -> Result<Self> {
        Self::from_source_with_config(header, catalog, raw_metadata, source, NormalizerConfig::default())
    }

    /// Build a recording, normalizing metadata with `config`.
    ///
    /// Fails with [`TelemetryError::UnrecoverableMetadata`] if the metadata
    /// cannot be repaired, or [`TelemetryError::InvalidHeader`] for a zero
    /// record length.
    pub fn from_source_with_config(
        header: RecordHeader,
        catalog: FieldCatalog,
        raw_metadata: &str,
        source: &'a S,
        config: NormalizerConfig,
    ) -> Result<Self> {
        header.validate()?;
        let metadata = MetadataNormalizer::new(config).normalize(raw_metadata)?;

        for descriptor in catalog.overflowing(header.record_length) {
            warn!(
                "Variable '{}' at offset {} with size {} exceeds record length {}; it will be skipped",
                descriptor.name, descriptor.offset, descriptor.size, header.record_length
            );
        }

        info!(
            variables = catalog.len(),
            record_length = header.record_length,
            sample_byte_offset = header.sample_byte_offset,
            metadata_repairs = metadata.repairs.len(),
            "Opened recording"
        );

        let catalog = Arc::new(catalog);
        let decoder = RecordDecoder::new(Arc::clone(&catalog));
        Ok(Self { catalog, metadata, accessor: SampleAccessor::new(source, header, decoder) })
    }

    pub fn header(&self) -> RecordHeader {
        self.accessor.header()
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Parsed session metadata.
    pub fn metadata(&self) -> &Value {
        &self.metadata.tree
    }

    /// Session metadata text after repairs.
    pub fn metadata_text(&self) -> &str {
        &self.metadata.text
    }

    /// Repairs applied while normalizing the metadata.
    pub fn metadata_repairs(&self) -> &[Repair] {
        &self.metadata.repairs
    }

    /// Deserialize the session metadata into a typed structure.
    pub fn metadata_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_yaml_ng::from_value(self.metadata.tree.clone()).map_err(|e| TelemetryError::Parse {
            context: "Session metadata deserialization".to_string(),
            details: e.to_string(),
        })
    }

    pub fn sequential_samples(&self) -> SequentialSamples<'a, S> {
        self.accessor.sequential()
    }

    pub fn all_samples(&self) -> Result<Vec<Sample>> {
        self.accessor.samples()
    }

    pub fn sample_count(&self) -> Result<usize> {
        self.accessor.sample_count()
    }

    pub fn sample_at(&self, index: usize) -> Result<Sample> {
        self.accessor.sample_at(index)
    }
}

impl<S: SampleSource + ?Sized> std::fmt::Debug for Recording<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recording")
            .field("variables", &self.catalog.len())
            .field("metadata_repairs", &self.metadata.repairs.len())
            .field("accessor", &self.accessor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        MALFORMED_SESSION_YAML, RECORD_LENGTH, SyntheticSample, init_tracing, standard_catalog,
        standard_header, synthetic_file,
    };
    use crate::{VariableDescriptor, VariableType};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct WeekendInfo {
        track_name: String,
        team_racing: i32,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Session {
        weekend_info: WeekendInfo,
    }

    #[test]
    fn exposes_metadata_and_samples() {
        init_tracing();
        let file = synthetic_file(3, 5);
        let recording =
            Recording::from_source(standard_header(), standard_catalog(), MALFORMED_SESSION_YAML, &file)
                .unwrap();

        assert_eq!(recording.metadata()["WeekendInfo"]["TrackName"], Value::from("lagunaseca"));
        assert!(!recording.metadata_repairs().is_empty());
        assert_eq!(recording.catalog().len(), 6);
        assert_eq!(recording.sample_count().unwrap(), 3);

        let expected = SyntheticSample::at(2);
        let sample = recording.sample_at(2).unwrap();
        assert_eq!(sample.f32("Speed"), Some(expected.speed));
        assert_eq!(sample.bool("IsOnTrack"), Some(expected.is_on_track));
    }

    #[test]
    fn typed_metadata() {
        let file = synthetic_file(1, 0);
        let recording =
            Recording::from_source(standard_header(), standard_catalog(), MALFORMED_SESSION_YAML, &file)
                .unwrap();

        let session: Session = recording.metadata_as().unwrap();
        assert_eq!(session.weekend_info.track_name, "lagunaseca");
        assert_eq!(session.weekend_info.team_racing, 0);
        assert!(matches!(recording.metadata_as::<Vec<i32>>(), Err(TelemetryError::Parse { .. })));
    }

    #[test]
    fn unrecoverable_metadata_fails_construction() {
        let file = synthetic_file(1, 0);
        let config = NormalizerConfig::default().with_max_repair_attempts(0);
        let result = Recording::from_source_with_config(
            standard_header(),
            standard_catalog(),
            "A: 1\nKey: value: other",
            &file,
            config,
        );
        assert!(matches!(result, Err(TelemetryError::UnrecoverableMetadata { .. })));
    }

    #[test]
    fn overflowing_descriptor_is_skipped_in_full_decode() {
        let file = synthetic_file(1, 0);
        let mut descriptors: Vec<VariableDescriptor> = standard_catalog().all().to_vec();
        descriptors.push(VariableDescriptor::new("Ghost", VariableType::Float64, RECORD_LENGTH - 4, 1));

        let recording =
            Recording::from_source(standard_header(), FieldCatalog::new(descriptors), "", &file).unwrap();
        let sample = recording.sample_at(0).unwrap();

        assert!(sample.field("Ghost").is_err());
        let fields = sample.all_fields();
        assert_eq!(fields.len(), 6);
        assert!(fields.get("Ghost").is_none());
        assert!(recording.metadata().as_mapping().is_some_and(|map| map.is_empty()));
    }
}
