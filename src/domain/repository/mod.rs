pub mod store_repository;

pub use store_repository::{StoreRepository, RepositoryError};

#[cfg(test)]
pub use store_repository::MockStoreRepository;
