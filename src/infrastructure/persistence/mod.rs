//! Record store implementation and the blob backends it persists through.
//!
//! - [`BlobRecordStore`] - [`crate::domain::repositories::RecordStore`] over one blob
//! - [`MemoryBackend`] - In-process, non-durable
//! - [`FileBackend`] - One JSON file per blob
//! - [`RedisBackend`] - One Redis key per blob

mod blob_record_store;
mod file_backend;
mod memory_backend;
mod redis_backend;

pub use blob_record_store::{BlobRecordStore, DEFAULT_STORAGE_KEY};
pub use file_backend::FileBackend;
pub use memory_backend::MemoryBackend;
pub use redis_backend::RedisBackend;
