pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{InstallmentStatus, PaymentPlan, ScheduledInstallment};
pub use repositories::InstallmentRepository;
pub use services::{AmortizationCalculator, OverdueChecker, ScheduleService, UpcomingInstallment, Urgency};
