//! Round-robin pool of API credentials.

use std::sync::atomic::{AtomicUsize, Ordering};

use tubeshelf_core::Credential;

use crate::error::ApiError;

/// Ordered credentials with a rotating cursor.
///
/// Invariant: `cursor < credentials.len()` whenever the pool is non-empty.
/// The cursor is read and advanced in one atomic step, so concurrent
/// callers sharing the pool through an `Arc` never lease the same cursor
/// position twice in a row.
#[derive(Debug, Default)]
pub struct KeyPool {
    credentials: Vec<Credential>,
    cursor: AtomicUsize,
}

impl KeyPool {
    #[must_use]
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials, cursor: AtomicUsize::new(0) }
    }

    /// Builds a pool from raw keys, dropping blank entries. Order is kept.
    #[must_use]
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(keys.into_iter().filter_map(|k| Credential::new(k.as_ref())).collect())
    }

    /// Returns the credential at the cursor and advances the cursor.
    ///
    /// # Errors
    /// Returns [`ApiError::PoolExhausted`] when the pool is empty.
    pub fn lease(&self) -> Result<Credential, ApiError> {
        let len = self.credentials.len();
        if len == 0 {
            return Err(ApiError::PoolExhausted);
        }
        let index = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some((c + 1) % len))
            .unwrap_or_else(|c| c);
        self.credentials.get(index).cloned().ok_or(ApiError::PoolExhausted)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.credentials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn leased(pool: &KeyPool, n: usize) -> Vec<String> {
        (0..n).map(|_| pool.lease().unwrap().expose().to_owned()).collect()
    }

    #[test]
    fn test_round_robin_wraps_to_first() {
        let pool = KeyPool::from_keys(["A", "B", "C"]);
        assert_eq!(leased(&pool, 4), vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_every_credential_once_per_cycle() {
        for n in 1..=7 {
            let keys: Vec<String> = (0..n).map(|i| format!("key-{i}")).collect();
            let pool = KeyPool::from_keys(&keys);
            assert_eq!(leased(&pool, n), keys);
            assert_eq!(pool.lease().unwrap().expose(), "key-0");
        }
    }

    #[test]
    fn test_single_credential_repeats() {
        let pool = KeyPool::from_keys(["only"]);
        assert_eq!(leased(&pool, 3), vec!["only", "only", "only"]);
    }

    #[test]
    fn test_empty_pool_is_exhausted() {
        let pool = KeyPool::default();
        assert!(matches!(pool.lease(), Err(ApiError::PoolExhausted)));
        assert_eq!(pool.size(), 0);
    }

    #[test]
    fn test_blank_keys_are_dropped() {
        let pool = KeyPool::from_keys(["A", "  ", "", "B"]);
        assert_eq!(pool.size(), 2);
        assert_eq!(leased(&pool, 2), vec!["A", "B"]);
    }

    #[test]
    fn test_concurrent_leases_cover_pool_evenly() {
        let pool = Arc::new(KeyPool::from_keys(["A", "B", "C", "D"]));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || leased(&pool, 100))
            })
            .collect();

        let mut counts = std::collections::HashMap::new();
        for handle in handles {
            for key in handle.join().unwrap() {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        let keys: HashSet<_> = counts.keys().cloned().collect();
        assert_eq!(keys.len(), 4);
        assert!(counts.values().all(|&c| c == 100));
    }
}
