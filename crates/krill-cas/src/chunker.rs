//! Fixed-size chunker for splitting files into content-addressed chunks.

use krill_types::ChunkId;
use tokio::io::AsyncRead;

use crate::error::CasError;

/// A single chunk of data with its content-addressed ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Content-addressed identifier: `blake3(data)`.
    pub id: ChunkId,
    /// Byte offset within the original file.
    pub offset: u64,
    /// The raw chunk data.
    pub data: Vec<u8>,
}

/// Fixed-size chunker that splits a file into chunks of a configured size.
///
/// The last chunk may be smaller than `chunk_size`; a zero-length trailing
/// chunk is never produced. Empty input produces zero chunks.
pub struct Chunker {
    chunk_size: u32,
}

impl Chunker {
    /// Create a new chunker with the given chunk size in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: u32) -> Self {
        assert!(chunk_size > 0, "chunk size must be nonzero");
        Self { chunk_size }
    }

    /// Return the configured chunk size.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Split data into fixed-size chunks, fingerprinting each slice.
    pub fn chunk(&self, data: &[u8]) -> Vec<Chunk> {
        let chunk_size = self.chunk_size as usize;
        let mut chunks = Vec::with_capacity(data.len().div_ceil(chunk_size));
        let mut offset = 0usize;

        while offset < data.len() {
            let end = usize::min(offset + chunk_size, data.len());
            let slice = &data[offset..end];
            chunks.push(Chunk {
                id: ChunkId::from_data(slice),
                offset: offset as u64,
                data: slice.to_vec(),
            });
            offset = end;
        }

        chunks
    }

    /// Split data from an async reader into fixed-size chunks.
    ///
    /// Reads the entire stream, producing chunks as it goes. The result is
    /// identical to [`Chunker::chunk`] over the same bytes.
    pub async fn chunk_stream(
        &self,
        mut reader: impl AsyncRead + Unpin,
    ) -> Result<Vec<Chunk>, CasError> {
        use tokio::io::AsyncReadExt;

        let chunk_size = self.chunk_size as usize;
        let mut chunks = Vec::new();
        let mut offset = 0u64;

        loop {
            let mut buf = vec![0u8; chunk_size];
            let mut filled = 0;

            // Fill the buffer completely, or stop at EOF.
            while filled < chunk_size {
                let n = reader.read(&mut buf[filled..]).await?;
                if n == 0 {
                    break;
                }
                filled += n;
            }

            if filled == 0 {
                break;
            }

            buf.truncate(filled);
            chunks.push(Chunk {
                id: ChunkId::from_data(&buf),
                offset,
                data: buf,
            });
            offset += filled as u64;
        }

        Ok(chunks)
    }
}
