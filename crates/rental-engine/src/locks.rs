//! Per-car async locks.
//!
//! Every booking creation, booking decision and car mutation touches exactly
//! one car, so holding that car's lock serializes both races on one booking
//! and competing approvals for one car. Reads never take it.
//!
//! Entries exist only for cars that existed when locked. Callers resolve the
//! car first and [`CarLocks::forget`] it once it is gone.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct CarLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CarLocks {
    /// Waits for and returns the guard for `car_id`.
    pub(crate) async fn lock(&self, car_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.locks.lock().await;
            map.entry(car_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drops the entry for a deleted car.
    pub(crate) async fn forget(&self, car_id: &str) {
        self.locks.lock().await.remove(car_id);
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
