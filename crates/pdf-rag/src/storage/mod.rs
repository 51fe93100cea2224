//! Storage module for uploaded files
//!
//! Only the raw uploads touch disk; the vector index is memory-only.

mod uploads;

pub use uploads::UploadStore;
