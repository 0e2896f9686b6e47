//! Conditional parallel iteration for batch analysis.
//!
//! Uses rayon when the `parallel` feature is enabled and the batch is large
//! enough; otherwise falls back to a plain iterator. Output order always
//! matches input order.

use crate::types::AnalyzerConfig;

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The collection size reaches `config.parallel_threshold`
///
/// # Example
///
/// ```rust
/// use holdwise_portfolio::{parallel::maybe_parallel_map, AnalyzerConfig};
///
/// let lengths = maybe_parallel_map(&["VTI 100%", "BND"], &AnalyzerConfig::sequential(), |s| s.len());
/// assert_eq!(lengths, vec![8, 3]);
/// ```
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &AnalyzerConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maybe_parallel_map_sequential() {
        let config = AnalyzerConfig::sequential();
        let items = vec![1, 2, 3, 4, 5];
        let results: Vec<i32> = maybe_parallel_map(&items, &config, |x| x * 2);
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_order_preserved_above_threshold() {
        let config = AnalyzerConfig::default().with_threshold(4);
        let items: Vec<usize> = (0..64).collect();
        let results = maybe_parallel_map(&items, &config, |x| x * 3);
        assert_eq!(results, items.iter().map(|x| x * 3).collect::<Vec<_>>());
    }

    #[test]
    fn test_parallel_threshold() {
        let config = AnalyzerConfig::default().with_threshold(10);
        assert!(!config.should_parallelize(5));

        // only true when the parallel feature is enabled
        #[cfg(feature = "parallel")]
        assert!(config.should_parallelize(100));
    }
}
