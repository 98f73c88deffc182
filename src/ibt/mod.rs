//! IBT sample region access (cross-platform)
//!
//! The outer file header and descriptor table are parsed elsewhere; this
//! module takes the resulting [`RecordHeader`] and a borrowed
//! [`SampleSource`] and serves decoded sample views from the record region.

mod header;
pub mod reader;
mod source;

pub use header::RecordHeader;
pub use reader::{SampleAccessor, SequentialSamples};
pub use source::{ClosableSource, SampleSource};
