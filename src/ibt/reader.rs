//! Sample access over the record region of an IBT file.
//!
//! Three access patterns share one decoder:
//! - [`SampleAccessor::sequential`] streams records with bounded memory
//! - [`SampleAccessor::samples`] reads the whole region in one call
//! - [`SampleAccessor::sample_at`] seeks straight to one record
//!
//! ## Usage Example
//!
//! ```rust
//! use pitwall_ibt::{FieldCatalog, RecordDecoder, RecordHeader, SampleAccessor};
//! use pitwall_ibt::{VariableDescriptor, VariableType};
//! use std::sync::Arc;
//!
//! fn read_speeds() -> pitwall_ibt::Result<()> {
//!     let catalog = FieldCatalog::new(vec![
//!         VariableDescriptor::new("Speed", VariableType::Float32, 0, 1).with_unit("m/s"),
//!     ]);
//!     let mut file = vec![0u8; 16];
//!     file.extend(12.5f32.to_le_bytes());
//!     file.extend(13.0f32.to_le_bytes());
//!
//!     let header = RecordHeader::new(16, 4)?;
//!     let accessor = SampleAccessor::new(&file, header, RecordDecoder::new(Arc::new(catalog)));
//!
//!     for sample in accessor.sequential() {
//!         let sample = sample?;
//!         println!("Sample {} speed {:?}", sample.index(), sample.f32("Speed"));
//!     }
//!     assert_eq!(accessor.sample_count()?, 2);
//!     assert_eq!(accessor.sample_at(1)?.f32("speed"), Some(13.0));
//!     Ok(())
//! }
//! # read_speeds().unwrap();
//! ```
//!
//! ## Performance Notes
//!
//! - Sequential and random reads allocate exactly one record buffer per sample
//! - Bulk reads issue a single read and hand out views into the shared buffer
//! - The sample count is computed from the source size once and then cached

use std::iter::FusedIterator;
use std::sync::{Arc, OnceLock};

use tracing::{debug, trace};

use super::{RecordHeader, SampleSource};
use crate::{RecordDecoder, Result, Sample, TelemetryError};

/// Reads fixed-size records from a borrowed [`SampleSource`].
pub struct SampleAccessor<'a, S: SampleSource + ?Sized> {
    source: &'a S,
    header: RecordHeader,
    decoder: RecordDecoder,
    sample_count: OnceLock<usize>,
}

impl<'a, S: SampleSource + ?Sized> SampleAccessor<'a, S> {
    pub fn new(source: &'a S, header: RecordHeader, decoder: RecordDecoder) -> Self {
        Self { source, header, decoder, sample_count: OnceLock::new() }
    }

    pub fn header(&self) -> RecordHeader {
        self.header
    }

    pub fn decoder(&self) -> &RecordDecoder {
        &self.decoder
    }

    /// Lazy sequence of records from the start of the sample region.
    ///
    /// The sequence ends at the first read shorter than one record. A read
    /// error is yielded once and ends the sequence as well.
    pub fn sequential(&self) -> SequentialSamples<'a, S> {
        SequentialSamples {
            source: self.source,
            header: self.header,
            decoder: self.decoder.clone(),
            next_index: 0,
            finished: false,
        }
    }

    /// Number of whole records in the source. Computed once, then cached.
    ///
    /// Fails with [`TelemetryError::ClosedSource`] after the source is released,
    /// even when the count is already cached.
    pub fn sample_count(&self) -> Result<usize> {
        self.source.ensure_open()?;
        if let Some(count) = self.sample_count.get() {
            return Ok(*count);
        }

        let size = self.source.size_in_bytes()?;
        let count = self.header.sample_count(size);
        debug!(
            "Source holds {} samples ({} bytes, region at {}, {} bytes per record)",
            count, size, self.header.sample_byte_offset, self.header.record_length
        );
        // A concurrent caller may have won the race; both computed the same value.
        let _ = self.sample_count.set(count);
        Ok(count)
    }

    /// Read every record with one contiguous read.
    ///
    /// Fails with [`TelemetryError::ShortRead`] if the source returns less
    /// than the whole region; no partial result is produced.
    pub fn samples(&self) -> Result<Vec<Sample>> {
        let count = self.sample_count()?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let record_length = self.header.record_length;
        let expected = count.checked_mul(record_length).ok_or_else(|| TelemetryError::InvalidHeader {
            details: format!("Sample region of {} x {} bytes overflows", count, record_length),
        })?;
        let offset = self.header.sample_byte_offset;

        let bytes = self.source.read_at(offset, expected)?;
        if bytes.len() < expected {
            return Err(TelemetryError::ShortRead { offset, expected, actual: bytes.len() });
        }
        debug!("Bulk read {} samples ({} bytes) at {}", count, expected, offset);

        let shared: Arc<[u8]> = bytes.into();
        Ok((0..count)
            .map(|index| {
                Sample::new(
                    Arc::clone(&shared),
                    index * record_length,
                    record_length,
                    index,
                    self.decoder.clone(),
                )
            })
            .collect())
    }

    /// Read the record at `index` with a single positioned read.
    pub fn sample_at(&self, index: usize) -> Result<Sample> {
        let count = self.sample_count()?;
        if index >= count {
            return Err(TelemetryError::IndexOutOfRange { index, count });
        }

        let offset = self
            .header
            .record_offset(index)
            .ok_or(TelemetryError::IndexOutOfRange { index, count })?;
        let expected = self.header.record_length;

        let bytes = self.source.read_at(offset, expected)?;
        if bytes.len() < expected {
            return Err(TelemetryError::ShortRead { offset, expected, actual: bytes.len() });
        }
        trace!("Read sample {} at {}", index, offset);

        Ok(Sample::new(bytes.into(), 0, expected, index, self.decoder.clone()))
    }
}

impl<S: SampleSource + ?Sized> std::fmt::Debug for SampleAccessor<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleAccessor")
            .field("header", &self.header)
            .field("sample_count", &self.sample_count.get())
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`SampleAccessor::sequential`].
pub struct SequentialSamples<'a, S: SampleSource + ?Sized> {
    source: &'a S,
    header: RecordHeader,
    decoder: RecordDecoder,
    next_index: usize,
    finished: bool,
}

impl<S: SampleSource + ?Sized> Iterator for SequentialSamples<'_, S> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let index = self.next_index;
        let record_length = self.header.record_length;
        let Some(offset) = self.header.record_offset(index).filter(|_| record_length > 0) else {
            self.finished = true;
            return None;
        };

        match self.source.read_at(offset, record_length) {
            Ok(bytes) if bytes.len() == record_length => {
                trace!("Read sample {} at {}", index, offset);
                self.next_index += 1;
                Some(Ok(Sample::new(bytes.into(), 0, record_length, index, self.decoder.clone())))
            }
            Ok(bytes) => {
                debug!(
                    "Sequential read ended after {} samples ({} of {} bytes at {})",
                    index,
                    bytes.len(),
                    record_length,
                    offset
                );
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl<S: SampleSource + ?Sized> FusedIterator for SequentialSamples<'_, S> {}
