//! Conditional parallel iteration over loan collections.
//!
//! Uses rayon when the `parallel` feature is enabled and the collection is
//! larger than the configured threshold; otherwise iterates sequentially.
//! Output order always matches input order.

/// Maps `f` over `items`, in parallel for large collections.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], threshold: usize, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if items.len() > threshold {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
