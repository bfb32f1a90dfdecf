use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Source of the current date and time.
///
/// Urgency classification and overdue transitions depend on "today", so the
/// clock is injected rather than read from the wall clock inline. Production
/// code uses [`SystemClock`]; tests pin a [`FixedClock`].
pub trait Clock: Send + Sync {
    /// Current calendar date (UTC)
    fn today(&self) -> NaiveDate;

    /// Current timestamp (UTC)
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Clock pinned to a fixed instant, for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(12, 0, 0).expect("valid time of day"))
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0.date()
    }

    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
