use crate::error::CsvError;

/// Result returned by every [`ItemWriter`] operation.
pub type ItemWriterResult = Result<(), CsvError>;

/// A destination that accepts items one chunk at a time.
pub trait ItemWriter<W> {
    /// Prepares the writer before the first chunk. The default does nothing.
    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    /// Writes a chunk of items.
    fn write(&self, items: &[W]) -> ItemWriterResult;

    /// Flushes whatever the writer or its sink buffers.
    fn flush(&self) -> ItemWriterResult;

    /// Releases the writer. The default does nothing.
    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}
