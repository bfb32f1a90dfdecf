pub mod booking_repository;

pub use booking_repository::BookingRepository;
