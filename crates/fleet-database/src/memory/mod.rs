//! In-process provider.
//!
//! Keeps both tables behind one lock and mirrors the PostgreSQL provider's
//! unit-of-work semantics: a unit records its writes and replays them onto
//! the shared tables when they are saved or committed. Used for local
//! development and the test suites.

mod repository;
mod scope;
mod store;
mod table;
mod unit_of_work;

pub use repository::MemoryRepository;
pub use store::MemoryDataStore;
pub use table::{MemoryEntity, MemoryTable, MemoryTables};
pub use unit_of_work::MemoryUnitOfWork;
