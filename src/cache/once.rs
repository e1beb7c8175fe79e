//! Load-once cache.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::OnceCell;

/// A value loaded on first access and reused afterwards.
///
/// Callers that arrive while the first load is in flight wait for that load
/// instead of starting their own. A failed load is not remembered; the next
/// caller tries again.
#[derive(Debug)]
pub struct OnceCache<T> {
    cell: OnceCell<T>,
    loads: AtomicUsize,
}

impl<T> OnceCache<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Return the cached value, running `load` if nothing is cached yet.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cell
            .get_or_try_init(move || async move {
                self.loads.fetch_add(1, Ordering::Relaxed);
                load().await
            })
            .await
    }

    /// The cached value, if a load has completed.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// How many loads have been started.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl<T> Default for OnceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
