//! Sample region layout supplied by the file-header parser

use crate::{Result, TelemetryError};

/// Location and record size of the sample region.
///
/// Derived from `irsdk_header.varBuf[0].bufOffset` and `irsdk_header.bufLen`
/// by whoever parses the outer IBT header. Built through [`RecordHeader::new`],
/// so the record length is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub(crate) sample_byte_offset: u64,
    pub(crate) record_length: usize,
}

impl RecordHeader {
    pub fn new(sample_byte_offset: u64, record_length: usize) -> Result<Self> {
        let header = Self { sample_byte_offset, record_length };
        header.validate()?;
        Ok(header)
    }

    /// Byte offset of the first sample in the file.
    pub fn sample_byte_offset(&self) -> u64 {
        self.sample_byte_offset
    }

    /// Bytes per sample record.
    pub fn record_length(&self) -> usize {
        self.record_length
    }

    pub fn validate(&self) -> Result<()> {
        if self.record_length == 0 {
            return Err(TelemetryError::InvalidHeader {
                details: "Record length must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Number of whole records in a file of `file_size` bytes. Trailing partial records are ignored.
    ///
    /// A zero record length holds no records.
    pub fn sample_count(&self, file_size: u64) -> usize {
        let region = file_size.saturating_sub(self.sample_byte_offset);
        region
            .checked_div(self.record_length as u64)
            .map_or(0, |count| usize::try_from(count).unwrap_or(usize::MAX))
    }

    /// File offset of the record at `index`, if it is addressable.
    pub fn record_offset(&self, index: usize) -> Option<u64> {
        (index as u64)
            .checked_mul(self.record_length as u64)
            .and_then(|relative| self.sample_byte_offset.checked_add(relative))
    }
}
