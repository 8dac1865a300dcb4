//! Storage abstraction layer
//!
//! A trait-based transactional sink so the loader can run against
//! PostgreSQL or the in-memory tables.

pub mod factory;
pub mod traits;

pub use factory::create_record_sink;
pub use traits::{RecordBatch, RecordSink, SinkTransaction};
