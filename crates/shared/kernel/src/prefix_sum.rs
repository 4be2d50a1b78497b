use crate::error::KernelError;
use ctiprd_pool::{ThreadPool, partition};
use std::ops::Add;

/// Parallel scans over the worker pool.
#[derive(Debug, Clone, Copy)]
pub struct PrefixSum;

impl PrefixSum {
    /// Exclusive scan: `out[i] = values[0] + ... + values[i - 1]`, `out[0] = T::default()`.
    ///
    /// Chunks are summed in parallel, the chunk totals are scanned sequentially and each
    /// chunk is then filled in parallel from its offset.
    ///
    /// # Errors
    /// [`KernelError::Pool`] if a worker job fails.
    pub fn exclusive<T>(values: &[T], pool: &ThreadPool) -> Result<Vec<T>, KernelError>
    where
        T: Copy + Add<Output = T> + Default + Send + Sync,
    {
        let ranges = partition(values.len(), pool.granularity());
        let totals = pool.map_scoped(ranges.iter().map(|r| &values[r.clone()]).collect(), |chunk: &[T]| {
            chunk.iter().fold(T::default(), |acc, &x| acc + x)
        })?;

        let offsets = sequential_exclusive(&totals);

        let mut out = vec![T::default(); values.len()];
        let mut rest = out.as_mut_slice();
        let mut jobs = Vec::with_capacity(ranges.len());
        for (range, offset) in ranges.iter().zip(offsets) {
            let (head, tail) = rest.split_at_mut(range.len());
            jobs.push((head, &values[range.clone()], offset));
            rest = tail;
        }
        pool.run_scoped(jobs, |(dst, src, offset)| {
            let mut acc = offset;
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = acc;
                acc = acc + s;
            }
        })?;
        Ok(out)
    }
}

pub(crate) fn sequential_exclusive<T>(values: &[T]) -> Vec<T>
where
    T: Copy + Add<Output = T> + Default,
{
    values
        .iter()
        .scan(T::default(), |acc, &x| {
            let current = *acc;
            *acc = *acc + x;
            Some(current)
        })
        .collect()
}
