//! Type-safe decoding of iRacing IBT telemetry recordings.
//!
//! We Race Pitwall IBT turns the sample region of an IBT file into named,
//! typed values and repairs the session YAML iRacing embeds alongside it.
//!
//! # Features
//!
//! - **Offset-exact decoding**: little-endian reads of every iRacing primitive, arrays included
//! - **Three access patterns**: lazy sequential, bulk, and random access over any [`SampleSource`]
//! - **Metadata repair**: line-level fixes plus a parse-and-patch loop for malformed session YAML
//! - **Cross-platform**: no platform APIs; the caller owns the file handle
//!
//! # Quick Start
//!
//! The outer IBT header and descriptor table are parsed elsewhere; a
//! [`Recording`] takes what that parser produced.
//!
//! ```rust
//! use pitwall_ibt::{FieldCatalog, RecordHeader, Recording, VariableDescriptor, VariableType};
//!
//! fn main() -> pitwall_ibt::Result<()> {
//!     let catalog = FieldCatalog::new(vec![
//!         VariableDescriptor::new("Speed", VariableType::Float32, 0, 1).with_unit("m/s"),
//!         VariableDescriptor::new("Gear", VariableType::Int32, 4, 1),
//!     ]);
//!     let header = RecordHeader::new(32, 8)?;
//!
//!     let mut file = vec![0u8; 32];
//!     for (speed, gear) in [(41.5f32, 3i32), (44.0, 4)] {
//!         file.extend(speed.to_le_bytes());
//!         file.extend(gear.to_le_bytes());
//!     }
//!
//!     let session = "WeekendInfo:\n TrackName: spa\nDriverInfo:\n AbbrevName: ,\n";
//!     let recording = Recording::from_source(header, catalog, session, &file)?;
//!
//!     assert_eq!(recording.metadata()["DriverInfo"]["AbbrevName"].as_str(), Some("unknown"));
//!     for sample in recording.sequential_samples() {
//!         let sample = sample?;
//!         println!("Speed: {:?} Gear: {:?}", sample.f32("Speed"), sample.i32("Gear"));
//!     }
//!     assert_eq!(recording.sample_at(1)?.i32("gear"), Some(4));
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod decoder;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;
mod yaml_utils;

// Data source and metadata modules
pub mod ibt;
pub mod metadata;
mod recording;

// Core exports
pub use decoder::RecordDecoder;
pub use error::*;
pub use types::*;

// Data source exports
pub use ibt::{ClosableSource, RecordHeader, SampleAccessor, SampleSource, SequentialSamples};

// Metadata exports
pub use metadata::{MetadataNormalizer, NormalizedMetadata, NormalizerConfig, Repair, RepairKind};

pub use recording::Recording;
