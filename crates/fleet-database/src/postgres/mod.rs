//! PostgreSQL provider.

mod administrator;
mod filter;
mod scope;
mod store;
mod table;
mod unit_of_work;
mod vehicle;

pub use administrator::PgAdministratorRepository;
pub use store::PgDataStore;
pub use unit_of_work::PgUnitOfWork;
pub use vehicle::PgVehicleRepository;
