/// Outcome of filling a chunk from the reader.
#[derive(Debug, PartialEq)]
pub enum ChunkStatus {
    /// The chunk reached its configured size; more input may remain.
    Full,
    /// The reader signalled end of stream while filling this chunk.
    Finished,
}

/// An ordered, bounded group of processed records.
///
/// The chunk is the unit of transactional commit: the step fills it up to
/// `chunk_size` records, hands it to the writer inside a transaction scope,
/// then clears it and starts over.
pub struct Chunk<W> {
    items: Vec<W>,
    chunk_size: usize,
}

impl<W> Chunk<W> {
    pub fn new(chunk_size: usize) -> Chunk<W> {
        Chunk {
            items: Vec::with_capacity(chunk_size),
            chunk_size,
        }
    }

    /// Appends a processed record, preserving input order.
    pub fn push(&mut self, item: W) {
        self.items.push(item);
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.chunk_size
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[W] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_is_full_at_configured_size() {
        let mut chunk = Chunk::new(2);
        assert!(chunk.is_empty());
        chunk.push(1);
        assert!(!chunk.is_full());
        chunk.push(2);
        assert!(chunk.is_full());
        assert_eq!(chunk.items(), &[1, 2]);
    }

    #[test]
    fn clear_resets_the_chunk() {
        let mut chunk = Chunk::new(1);
        chunk.push("a");
        chunk.clear();
        assert!(chunk.is_empty());
        assert_eq!(chunk.len(), 0);
    }
}
