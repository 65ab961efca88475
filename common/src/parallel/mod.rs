//! Parallel processing utilities.

use rayon::prelude::*;


/// Multiplier for number of chunks relative to CPU threads.
/// Using 3x threads provides good load balancing when some rows are cheaper than others.
const CHUNKS_PER_THREAD: usize = 3;

/// Number of items per chunk so that every worker gets a few chunks.
#[inline]
fn auto_chunk_size(len: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (len / num_chunks).max(1)
}

/// Extension trait for row-aligned mutable parallel chunks with automatic sizing.
pub trait ParRowsMutAuto<'a, T: Send + 'a> {
    /// Split into mutable parallel chunks aligned to row boundaries.
    /// Yields `(chunk_start_row, chunk)` pairs where chunk contains complete rows.
    ///
    /// `width` must be non-zero and divide the slice length.
    fn par_rows_mut_auto(
        &'a mut self,
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])>;
}

impl<'a, T: Send + 'a> ParRowsMutAuto<'a, T> for [T] {
    fn par_rows_mut_auto(
        &'a mut self,
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])> {
        assert!(width > 0, "row width must be non-zero");
        assert_eq!(
            self.len() % width,
            0,
            "slice length must be a multiple of the row width"
        );
        let height = self.len() / width;
        let chunk_rows = auto_chunk_size(height);
        self.par_chunks_mut(width * chunk_rows)
            .enumerate()
            .map(move |(idx, chunk)| (idx * chunk_rows, chunk))
    }
}
