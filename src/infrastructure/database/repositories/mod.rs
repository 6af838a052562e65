//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod repository_provider;
pub mod slot_repository;
pub mod station_repository;
pub mod user_repository;

pub use booking_repository::SeaOrmBookingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use slot_repository::SeaOrmSlotRepository;
pub use station_repository::SeaOrmStationRepository;
pub use user_repository::SeaOrmUserRepository;
