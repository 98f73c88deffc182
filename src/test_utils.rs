//! Test utilities for building synthetic recordings in memory
//!
//! Real IBT captures are large and not redistributable, so tests and benches
//! build a recording byte-for-byte instead: a filler header, a sample region of
//! little-endian records, and optional trailing garbage.

#![cfg(any(test, feature = "benchmark"))]

use std::sync::Once;

use crate::{FieldCatalog, RecordHeader, VariableDescriptor, VariableType};

/// Start of the sample region in synthetic recordings.
pub const SAMPLE_BYTE_OFFSET: u64 = 64;

/// Bytes per synthetic record.
pub const RECORD_LENGTH: usize = 40;

/// Slots in the `CarIdxLapDistPct` array.
pub const CAR_SLOTS: usize = 4;

/// Session metadata shaped like an iRacing `DriverInfo` block, including the
/// malformations the normalizer has to repair.
pub const MALFORMED_SESSION_YAML: &str = "\
WeekendInfo:
 TrackName: lagunaseca
 TrackDisplayName: WeatherTech Raceway Laguna Seca
 TeamRacing: 0
DriverInfo:
 DriverCarIdx: 0
 DriverUserID: 991832
 Drivers:
 - CarIdx: 0
   UserName: Enzo Belejkanid
   AbbrevName: ,
   Initials:
   TeamName Belejkanid Racing
   UserID: 991832
   ClubName: Benelux
 , Initials: EB
   CarScreenName: Mazda MX-5 Cup
   CarClassShortName: @MX5
";

/// Recording layout used throughout the tests.
///
/// | field              | type    | offset | count |
/// |--------------------|---------|--------|-------|
/// | `SessionTime`      | Float64 | 0      | 1     |
/// | `Speed`            | Float32 | 8      | 1     |
/// | `RPM`              | Float32 | 12     | 1     |
/// | `Gear`             | Int32   | 16     | 1     |
/// | `IsOnTrack`        | Bool    | 20     | 1     |
/// | `CarIdxLapDistPct` | Float32 | 24     | 4     |
pub fn standard_catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        VariableDescriptor::new("SessionTime", VariableType::Float64, 0, 1)
            .with_unit("s")
            .with_description("Seconds since session start"),
        VariableDescriptor::new("Speed", VariableType::Float32, 8, 1)
            .with_unit("m/s")
            .with_description("GPS vehicle speed"),
        VariableDescriptor::new("RPM", VariableType::Float32, 12, 1)
            .with_unit("revs/min")
            .with_description("Engine rpm"),
        VariableDescriptor::new("Gear", VariableType::Int32, 16, 1)
            .with_description("-1=reverse  0=neutral  1..n=current gear"),
        VariableDescriptor::new("IsOnTrack", VariableType::Bool, 20, 1)
            .with_description("1=Car on track physics running with player in car"),
        VariableDescriptor::new("CarIdxLapDistPct", VariableType::Float32, 24, CAR_SLOTS)
            .with_unit("%")
            .with_description("Percentage distance around lap by car index"),
    ])
}

/// Header matching [`standard_catalog`].
pub fn standard_header() -> RecordHeader {
    RecordHeader { sample_byte_offset: SAMPLE_BYTE_OFFSET, record_length: RECORD_LENGTH }
}

/// Values written into record `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSample {
    pub session_time: f64,
    pub speed: f32,
    pub rpm: f32,
    pub gear: i32,
    pub is_on_track: bool,
    pub lap_dist_pct: [f32; CAR_SLOTS],
}

impl SyntheticSample {
    pub fn at(index: usize) -> Self {
        let step = index as f32;
        Self {
            session_time: index as f64 / 60.0,
            speed: 20.0 + step * 0.5,
            rpm: 3000.0 + step * 25.0,
            gear: (index % 6) as i32 + 1,
            is_on_track: index % 4 != 3,
            lap_dist_pct: std::array::from_fn(|car| (step * 0.001 + car as f32 * 0.25) % 1.0),
        }
    }

    /// Encode as one little-endian record laid out by [`standard_catalog`].
    pub fn encode(&self) -> Vec<u8> {
        let mut record = Vec::with_capacity(RECORD_LENGTH);
        record.extend_from_slice(&self.session_time.to_le_bytes());
        record.extend_from_slice(&self.speed.to_le_bytes());
        record.extend_from_slice(&self.rpm.to_le_bytes());
        record.extend_from_slice(&self.gear.to_le_bytes());
        record.extend_from_slice(&[u8::from(self.is_on_track), 0, 0, 0]);
        for pct in self.lap_dist_pct {
            record.extend_from_slice(&pct.to_le_bytes());
        }
        debug_assert_eq!(record.len(), RECORD_LENGTH);
        record
    }
}

/// File bytes of a recording with `samples` records followed by
/// `trailing_bytes` bytes of garbage.
pub fn synthetic_file(samples: usize, trailing_bytes: usize) -> Vec<u8> {
    let mut bytes = vec![0xA5; SAMPLE_BYTE_OFFSET as usize];
    for index in 0..samples {
        bytes.extend(SyntheticSample::at(index).encode());
    }
    bytes.extend(std::iter::repeat_n(0xEE, trailing_bytes));
    bytes
}

/// Install a `tracing` subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
