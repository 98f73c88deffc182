//! Byte sources backing sample access.
//!
//! The recording never opens or closes files itself: the caller owns the
//! handle and lends it to a [`Recording`](crate::Recording). Implement
//! [`SampleSource`] for any storage that can serve positioned reads.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::{Result, TelemetryError};

/// Positioned, read-only byte access.
pub trait SampleSource {
    /// Read up to `len` bytes starting at `offset`.
    ///
    /// Returns fewer bytes (possibly none) when the read crosses the end of the data.
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>>;

    /// Total size of the underlying data in bytes.
    fn size_in_bytes(&self) -> Result<u64>;

    /// Fails once the owner has released the source.
    fn ensure_open(&self) -> Result<()> {
        Ok(())
    }
}

impl SampleSource for [u8] {
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.len());
        let end = start.saturating_add(len).min(self.len());
        Ok(self[start..end].to_vec())
    }

    fn size_in_bytes(&self) -> Result<u64> {
        Ok(self.len() as u64)
    }
}

impl SampleSource for Vec<u8> {
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        self.as_slice().read_at(offset, len)
    }

    fn size_in_bytes(&self) -> Result<u64> {
        self.as_slice().size_in_bytes()
    }
}

/// Reads seek the shared file cursor, so one `File` should not serve
/// concurrent readers.
impl SampleSource for File {
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut file = self;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| TelemetryError::io(format!("seek to byte {}", offset), e))?;

        let mut buffer = Vec::with_capacity(len);
        file.take(len as u64)
            .read_to_end(&mut buffer)
            .map_err(|e| TelemetryError::io(format!("read of {} bytes at {}", len, offset), e))?;
        Ok(buffer)
    }

    fn size_in_bytes(&self) -> Result<u64> {
        self.metadata()
            .map(|metadata| metadata.len())
            .map_err(|e| TelemetryError::io("file metadata", e))
    }
}

/// A source its owner can release while borrowers still hold it.
///
/// After [`close`](ClosableSource::close) every read fails with
/// [`TelemetryError::ClosedSource`].
#[derive(Debug)]
pub struct ClosableSource<S> {
    inner: RwLock<Option<S>>,
}

impl<S> ClosableSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner: RwLock::new(Some(inner)) }
    }

    /// Release the underlying source, returning it if it was still open.
    pub fn close(&self) -> Option<S> {
        let released = self.inner.write().unwrap_or_else(PoisonError::into_inner).take();
        if released.is_some() {
            debug!("Sample source closed");
        }
        released
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    fn with_open<T>(&self, f: impl FnOnce(&S) -> Result<T>) -> Result<T> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(source) => f(source),
            None => Err(TelemetryError::ClosedSource),
        }
    }
}

impl<S: SampleSource> SampleSource for ClosableSource<S> {
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        self.with_open(|source| source.read_at(offset, len))
    }

    fn size_in_bytes(&self) -> Result<u64> {
        self.with_open(|source| source.size_in_bytes())
    }

    fn ensure_open(&self) -> Result<()> {
        self.with_open(|source| source.ensure_open())
    }
}
