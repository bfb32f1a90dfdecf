pub mod reconciliation_service;

pub use reconciliation_service::ReconciliationService;
