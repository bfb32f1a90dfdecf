pub mod payment_plan;
pub mod scheduled_installment;

pub use payment_plan::{PaymentPlan, PlanFields, ALLOWED_FREQUENCIES, ALLOWED_PLAN_YEARS};
pub use scheduled_installment::{InstallmentStatus, ScheduledInstallment};
