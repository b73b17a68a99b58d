/// Database model definitions.
pub mod models;
/// Roster storage and retrieval operations.
pub mod roster_store;
/// Storage abstraction layer for database operations.
pub mod storage;
