pub mod models;
pub mod repositories;

pub use models::Booking;
pub use repositories::BookingRepository;
