//! Runtime configuration for an [`Automaton`](super::Automaton).

/// Knobs that do not affect simulation results, only how they are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutomatonConfig {
    /// Worker threads for chunk generation. `0` generates on the calling
    /// thread without building a pool.
    pub threads: usize,
}

impl AutomatonConfig {
    pub fn sequential() -> Self {
        AutomatonConfig { threads: 0 }
    }

    pub fn with_threads(threads: usize) -> Self {
        AutomatonConfig { threads }
    }

    /// Build the worker pool this configuration asks for, if any.
    ///
    /// Falls back to a single-threaded pool when the requested size cannot
    /// be built.
    pub(crate) fn build_thread_pool(&self) -> crate::error::Result<Option<rayon::ThreadPool>> {
        if self.threads == 0 {
            return Ok(None);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("chunk-gen-{}", i))
            .build()
            .or_else(|_| rayon::ThreadPoolBuilder::new().num_threads(1).build())?;
        Ok(Some(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sequential() {
        assert_eq!(AutomatonConfig::default(), AutomatonConfig::sequential());
        assert!(AutomatonConfig::default().build_thread_pool().unwrap().is_none());
    }

    #[test]
    fn test_pool_has_requested_threads() {
        let pool = AutomatonConfig::with_threads(3)
            .build_thread_pool()
            .unwrap()
            .unwrap();
        assert_eq!(pool.current_num_threads(), 3);
    }
}
