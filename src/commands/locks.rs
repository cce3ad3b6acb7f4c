use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum LockKey {
    Club(String),
    Competition(String),
}

/// Per-record locks serializing bookings
///
/// A booking holds the lock of its club and the lock of its competition from the moment it
/// reloads the records until they are persisted. The club lock is always taken first, which
/// rules out lock-order cycles between bookings.
#[derive(Clone, Debug, Default)]
pub struct BookingLocks {
    locks: Arc<Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>>,
}

/// Held for the duration of a booking
#[derive(Debug)]
pub struct BookingGuard {
    _club: OwnedMutexGuard<()>,
    _competition: OwnedMutexGuard<()>,
}

impl BookingLocks {
    pub async fn lock(&self, club_name: &str, competition_name: &str) -> BookingGuard {
        let club = self
            .get(LockKey::Club(club_name.to_string()))
            .lock_owned()
            .await;
        let competition = self
            .get(LockKey::Competition(competition_name.to_string()))
            .lock_owned()
            .await;

        BookingGuard {
            _club: club,
            _competition: competition,
        }
    }

    fn get(&self, key: LockKey) -> Arc<AsyncMutex<()>> {
        // The map only ever gains entries, so a poisoned map is still consistent
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key).or_default().clone()
    }
}
