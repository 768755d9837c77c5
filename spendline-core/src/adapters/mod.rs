//! Adapter implementations (hexagonal architecture)
//!
//! Concrete implementations of the Repository port.

pub mod duckdb;
pub mod local_store;
pub mod memory;

pub use self::duckdb::DuckDbRepository;
pub use local_store::LocalStoreRepository;
pub use memory::InMemoryRepository;
