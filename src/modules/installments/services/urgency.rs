use chrono::NaiveDate;
use serde::Serialize;

use crate::modules::installments::models::ScheduledInstallment;

/// Installments due within this many days are flagged "soon"
pub const SOON_WINDOW_DAYS: i64 = 7;

/// Due-date proximity category for upcoming-payments views.
///
/// Derived at read time and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Overdue,
    Today,
    Soon,
    Scheduled,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Today => "today",
            Self::Soon => "soon",
            Self::Scheduled => "scheduled",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whole days from today until the due date; negative once past due
pub fn days_until_due(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days()
}

/// Classify a due date against today. First match wins: past → overdue,
/// zero days → today, within a week → soon, anything later → scheduled.
pub fn classify(due_date: NaiveDate, today: NaiveDate) -> Urgency {
    let days = days_until_due(due_date, today);

    if days < 0 {
        Urgency::Overdue
    } else if days == 0 {
        Urgency::Today
    } else if days <= SOON_WINDOW_DAYS {
        Urgency::Soon
    } else {
        Urgency::Scheduled
    }
}

/// An open installment decorated with its due-date proximity
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingInstallment {
    pub installment: ScheduledInstallment,
    pub days_until_due: i64,
    pub urgency: Urgency,
}

impl UpcomingInstallment {
    pub fn classify(installment: ScheduledInstallment, today: NaiveDate) -> Self {
        let days = days_until_due(installment.due_date, today);
        let urgency = classify(installment.due_date, today);

        Self {
            installment,
            days_until_due: days,
            urgency,
        }
    }
}
