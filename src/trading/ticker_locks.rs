//! Per-ticker mutual exclusion for the position check and order submit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Hands out one async mutex per symbol.
///
/// Signals for different tickers never wait on each other. An entry lives
/// only while someone holds or waits for it.
#[derive(Debug, Default)]
pub struct TickerLocks {
    // Never held across an await
    locks: Mutex<LockMap>,
}

/// Exclusive access to one symbol. Dropping it releases the lock.
#[derive(Debug)]
pub struct TickerGuard<'a> {
    owner: &'a TickerLocks,
    symbol: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl TickerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `symbol`.
    pub async fn acquire(&self, symbol: &str) -> TickerGuard<'_> {
        let lock = self
            .map()
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();

        let guard = lock.lock_owned().await;

        TickerGuard {
            owner: self,
            symbol: symbol.to_string(),
            guard: Some(guard),
        }
    }

    fn map(&self) -> std::sync::MutexGuard<'_, LockMap> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map().len()
    }
}

impl Drop for TickerGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        // Only the map's own handle left: nobody holds or waits on it
        let mut locks = self.owner.map();
        if locks
            .get(&self.symbol)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.symbol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_same_symbol_is_exclusive() {
        let locks = TickerLocks::new();

        let mut first = task::spawn(locks.acquire("AAPL"));
        let guard = assert_ready!(first.poll());

        let mut second = task::spawn(locks.acquire("AAPL"));
        assert_pending!(second.poll());

        drop(guard);
        assert!(second.is_woken());
        let _guard = assert_ready!(second.poll());
    }

    #[tokio::test]
    async fn test_different_symbols_do_not_block() {
        let locks = TickerLocks::new();
        let _aapl = locks.acquire("AAPL").await;

        let tsla = tokio::time::timeout(Duration::from_millis(100), locks.acquire("TSLA")).await;
        assert!(tsla.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_entry_removed_once_released() {
        let locks = TickerLocks::new();

        let mut first = task::spawn(locks.acquire("AAPL"));
        let guard = assert_ready!(first.poll());

        let mut second = task::spawn(locks.acquire("AAPL"));
        assert_pending!(second.poll());

        drop(guard);
        assert_eq!(locks.len(), 1, "a waiter keeps the entry alive");

        let guard = assert_ready!(second.poll());
        drop(guard);
        assert_eq!(locks.len(), 0);
    }
}
