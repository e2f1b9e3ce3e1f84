//! Fixed-size chunking for bulk store operations
//!
//! Batch writes are capped by the platform (500 mutations per batch for
//! the common stores), so bulk deletes walk their inputs in fixed-size
//! chunks, one atomic batch per chunk.

/// Default chunk size for bulk deletes
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// An ordered sequence split into fixed-size chunks
#[derive(Debug, Clone)]
pub struct ArrayChunk<T> {
    items: Vec<T>,
    chunk: usize,
}

impl<T> ArrayChunk<T> {
    /// Chunk a sequence at [`DEFAULT_CHUNK_SIZE`]
    pub fn new(items: Vec<T>) -> Self {
        Self::with_size(items, DEFAULT_CHUNK_SIZE)
    }

    /// Chunk a sequence at a caller-chosen size (minimum 1)
    pub fn with_size(items: Vec<T>, chunk: usize) -> Self {
        Self {
            items,
            chunk: chunk.max(1),
        }
    }

    /// Total number of items across all chunks
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the chunks in order
    pub fn iter(&self) -> impl Iterator<Item = &[T]> {
        self.items.chunks(self.chunk)
    }
}
