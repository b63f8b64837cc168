//! Parallel processing utilities

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for parallel column generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Generate independent columns on the rayon pool
    pub enabled: bool,
    /// Number of threads (None = use the global pool)
    pub n_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a new parallel configuration (disabled)
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable parallel generation
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Set number of threads
    pub fn with_threads(mut self, n: usize) -> Self {
        self.enabled = true;
        self.n_threads = Some(n);
        self
    }

    /// Get the number of threads to use
    pub fn num_threads(&self) -> usize {
        self.n_threads.unwrap_or_else(rayon::current_num_threads)
    }
}

/// Map `f` over `items`, on the rayon pool when `config` enables it.
///
/// Output order always matches input order. A dedicated pool that fails to
/// build falls back to the global pool.
pub fn parallel_map<T, U, F>(items: Vec<T>, config: &ParallelConfig, f: F) -> Vec<U>
where
    T: Send + Sync,
    U: Send,
    F: Fn(T) -> U + Send + Sync,
{
    if !config.enabled || items.len() < 2 {
        return items.into_iter().map(f).collect();
    }

    match config.n_threads {
        Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => pool.install(|| items.into_par_iter().map(&f).collect()),
            Err(e) => {
                tracing::debug!(error = %e, "Falling back to global rayon pool");
                items.into_par_iter().map(f).collect()
            }
        },
        None => items.into_par_iter().map(f).collect(),
    }
}
