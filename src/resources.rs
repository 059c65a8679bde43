//! Lazily-initialized, process-wide resource handles.
//!
//! Embedding and reranking models are expensive to construct and must be
//! built at most once per process, even when the first calls race. Pipelines
//! receive a `Shared<T>` at construction time instead of reaching for module
//! globals.

use std::sync::OnceLock;

/// A thread-safe holder for a resource built on first use.
///
/// Concurrent first calls are serialized by the inner `OnceLock`; exactly one
/// initializer runs, every caller gets the same handle.
pub struct Shared<T> {
    cell: OnceLock<T>,
}

impl<T> Shared<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Get the resource, building it with `init` if this is the first use.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(init)
    }

    /// Get the resource if it has already been initialized.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Whether the resource has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn initializes_on_first_use_only() {
        let shared: Shared<String> = Shared::new();
        assert!(!shared.is_initialized());
        assert!(shared.get().is_none());

        let value = shared.get_or_init(|| "model-handle".to_string());
        assert_eq!(value, "model-handle");
        assert!(shared.is_initialized());

        // Second init closure must not run
        let value = shared.get_or_init(|| "other".to_string());
        assert_eq!(value, "model-handle");
    }

    #[test]
    fn concurrent_first_calls_initialize_once() {
        let shared: Arc<Shared<usize>> = Arc::new(Shared::new());
        let init_count = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&shared);
                let init_count = Arc::clone(&init_count);
                std::thread::spawn(move || {
                    *shared.get_or_init(|| {
                        init_count.fetch_add(1, Ordering::SeqCst);
                        42
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 42);
        }
        assert_eq!(init_count.load(Ordering::SeqCst), 1);
    }
}
