use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::time::interval;
use tracing::{error, info};

use crate::core::{Clock, Result, SystemClock};
use crate::modules::installments::repositories::InstallmentRepository;

/// Store surface the overdue sweep needs
#[async_trait]
pub trait OverdueStore: Send + Sync {
    /// Flip pending installments due before today to overdue; returns the
    /// number of rows updated
    async fn mark_overdue_before(&self, today: NaiveDate) -> Result<u64>;
}

#[async_trait]
impl OverdueStore for InstallmentRepository {
    async fn mark_overdue_before(&self, today: NaiveDate) -> Result<u64> {
        InstallmentRepository::mark_overdue_before(self, today).await
    }
}

/// Background sweep that transitions past-due pending installments to
/// overdue.
///
/// Spawned as a tokio task from `main`; failures are logged and the sweep
/// keeps running.
pub struct OverdueChecker {
    store: Arc<dyn OverdueStore>,
    clock: Arc<dyn Clock>,
    sweep_interval: Duration,
}

impl OverdueChecker {
    pub fn new(store: Arc<dyn OverdueStore>, interval_secs: u64) -> Self {
        Self::with_clock(store, interval_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn OverdueStore>,
        interval_secs: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            clock,
            sweep_interval: Duration::from_secs(interval_secs),
        }
    }

    /// Run the sweep forever at the configured interval
    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.sweep_interval.as_secs(),
            "Starting overdue installment sweep"
        );

        let mut ticker = interval(self.sweep_interval);

        loop {
            ticker.tick().await;

            match self.run_once().await {
                Ok(marked) => {
                    if marked > 0 {
                        info!(marked = marked, "Installments marked overdue");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Overdue sweep failed");
                }
            }
        }
    }

    /// Single sweep pass
    pub async fn run_once(&self) -> Result<u64> {
        self.store.mark_overdue_before(self.clock.today()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use std::sync::Mutex;

    struct RecordingStore {
        calls: Mutex<Vec<NaiveDate>>,
    }

    #[async_trait]
    impl OverdueStore for RecordingStore {
        async fn mark_overdue_before(&self, today: NaiveDate) -> Result<u64> {
            self.calls.lock().unwrap().push(today);
            Ok(3)
        }
    }

    #[tokio::test]
    async fn test_run_once_passes_injected_today() {
        let store = Arc::new(RecordingStore {
            calls: Mutex::new(Vec::new()),
        });
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let checker = OverdueChecker::with_clock(
            store.clone(),
            3600,
            Arc::new(FixedClock::at_date(today)),
        );

        let marked = checker.run_once().await.unwrap();

        assert_eq!(marked, 3);
        assert_eq!(store.calls.lock().unwrap().as_slice(), &[today]);
    }
}
