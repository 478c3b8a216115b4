use rayon::prelude::*;

/// Number of pixels from which [`ExecutionStrategy::Auto`] runs in parallel.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 100_000;

/// Controls how row-wise operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    Parallel,

    /// Parallel for stacks with at least [`PARALLEL_PIXEL_THRESHOLD`] pixels, serial otherwise.
    #[default]
    Auto,
}

impl ExecutionStrategy {
    /// Whether an operation over `num_pixels` pixels should run in parallel.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => num_pixels >= PARALLEL_PIXEL_THRESHOLD,
        }
    }
}

/// Apply a function to each row of a buffer, in parallel or serially.
///
/// The closure receives the row index and the mutable row. Rows never alias,
/// so the closure only needs shared access to its inputs.
///
/// # Arguments
///
/// * `dst` - The destination buffer, a whole number of rows long.
/// * `row_len` - The number of elements per row. Nothing runs when it is zero.
/// * `parallel` - Whether to use the global Rayon thread pool.
/// * `f` - The function to apply to each `(row index, row)`.
pub fn for_each_row<T: Send>(
    dst: &mut [T],
    row_len: usize,
    parallel: bool,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) {
    if row_len == 0 {
        return;
    }

    if parallel {
        dst.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(r, row)| f(r, row));
    } else {
        dst.chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(r, row)| f(r, row));
    }
}
