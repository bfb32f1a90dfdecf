pub mod amortization;
pub mod overdue_checker;
pub mod schedule_generator;
pub mod urgency;

pub use amortization::{AmortizationCalculator, AmortizedPlan};
pub use overdue_checker::{OverdueChecker, OverdueStore};
pub use schedule_generator::{build_schedule, ScheduleService};
pub use urgency::{classify, days_until_due, UpcomingInstallment, Urgency};
