use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::controller::ForecastController;
use super::observer::{ForecastObserver, NullObserver};

/// Cloneable handle that serialises access to one controller.
///
/// Mutations take the write lock for their whole duration, so a reader never
/// observes a half-propagated balance.
pub struct SharedController<O: ForecastObserver = NullObserver> {
    inner: Arc<RwLock<ForecastController<O>>>,
}

impl<O: ForecastObserver> SharedController<O> {
    pub fn new(controller: ForecastController<O>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(controller)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ForecastController<O>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ForecastController<O>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swaps in `controller` and hands back the previous one.
    pub fn replace(&self, controller: ForecastController<O>) -> ForecastController<O> {
        std::mem::replace(&mut *self.write(), controller)
    }
}

impl<O: ForecastObserver> Clone for SharedController<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn concurrent_writers_keep_forecast_consistent() {
        let shared = SharedController::new(ForecastController::new(2024));
        let handles: Vec<_> = (1..=4u32)
            .map(|week| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for value in 0..25 {
                        shared
                            .write()
                            .add_transaction(week, format!("w{week}-{value}"), value)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let controller = shared.read();
        assert_eq!(controller.forecast().len(), 100);
        assert!(controller.consistency_warnings().is_empty());
        assert_eq!(controller.forecast().closing_balance(), 4 * (0..25).sum::<i64>());
    }

    #[test]
    fn replace_returns_previous_controller() {
        let shared = SharedController::new(ForecastController::new(2024));
        shared.write().add_transaction(1, "old", 1).unwrap();
        let previous = shared.replace(ForecastController::new(2025));
        assert_eq!(previous.forecast().len(), 1);
        assert_eq!(shared.read().year(), 2025);
        assert!(shared.read().forecast().is_empty());
    }
}
