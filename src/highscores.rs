//! Best score record
//!
//! A single integer persisted as decimal text, read once at startup and
//! written only when beaten.

use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// Storage key for the best score
pub const STORAGE_KEY: &str = "dinobus_highscore";

/// Best score seen on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Read the stored record.
    ///
    /// A missing or unparseable value counts as 0; a failing backend is an
    /// error.
    pub fn load(store: &impl KeyValueStore) -> Result<Self, StorageError> {
        let best = match store.get(STORAGE_KEY)? {
            Some(text) => text.trim().parse::<u64>().unwrap_or_else(|_| {
                log::warn!("Ignoring corrupt high score {text:?}");
                0
            }),
            None => 0,
        };
        log::info!("Loaded high score {best}");
        Ok(Self { best })
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Offer a finished run's score. Returns true for a new record.
    ///
    /// The record is updated in memory even if persisting it fails; the
    /// failure is logged.
    pub fn submit(&mut self, score: u64, store: &mut impl KeyValueStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match store.set(STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New high score {score}"),
            Err(e) => log::warn!("New high score {score} not saved: {e}"),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    /// Store whose writes always fail
    struct ReadOnly(MemoryStore);

    impl KeyValueStore for ReadOnly {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota".into(),
            })
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_empty_store_starts_at_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).unwrap().best(), 0);
    }

    #[test]
    fn test_store_and_reload() {
        let mut store = MemoryStore::new();
        let mut hs = HighScore::load(&store).unwrap();
        assert!(hs.submit(1234, &mut store));
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("1234"));

        let reloaded = HighScore::load(&store).unwrap();
        assert_eq!(reloaded.best(), 1234);
    }

    #[test]
    fn test_lower_score_is_not_written() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "500").unwrap();
        let mut hs = HighScore::load(&store).unwrap();

        assert!(!hs.submit(500, &mut store));
        assert!(!hs.submit(20, &mut store));
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("500"));
        assert_eq!(hs.best(), 500);
    }

    #[test]
    fn test_corrupt_value_counts_as_zero() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "lots").unwrap();
        assert_eq!(HighScore::load(&store).unwrap().best(), 0);
    }

    #[test]
    fn test_write_failure_keeps_record_in_memory() {
        let mut store = ReadOnly(MemoryStore::new());
        let mut hs = HighScore::default();
        assert!(hs.submit(77, &mut store));
        assert_eq!(hs.best(), 77);
    }
}
