pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Payment, PaymentMethod};
pub use repositories::PaymentRepository;
pub use services::ReconciliationService;
