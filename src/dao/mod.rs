/// Database model definitions.
pub mod models;
/// Store contract and backend implementations.
pub mod score_store;
/// Storage abstraction layer shared by every backend.
pub mod storage;
