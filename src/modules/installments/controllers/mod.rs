pub mod installment_controller;

pub use installment_controller::{configure, InstallmentResponse};
