pub mod json_repository;
pub mod memory_repository;

pub use json_repository::JsonStoreRepository;
pub use memory_repository::MemoryStoreRepository;
